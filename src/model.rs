use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    blur::BlurOpts,
    error::{MorphixError, MorphixResult},
};

/// A blend run described as a JSON document, so batch jobs can be checked in
/// and replayed instead of being encoded in shell flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlendJob {
    /// Base image path.
    pub input: PathBuf,
    /// Target image path; resized to the base image's dimensions when needed.
    pub target: PathBuf,
    /// Optional blur post-pass applied to every produced frame.
    #[serde(default)]
    pub blur: Option<BlurOpts>,
    pub output: JobOutput,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutput {
    /// A single still at one mix factor.
    Still { mix: u32, out: PathBuf },
    /// The full 0..=100 sweep as a still sequence.
    Frames {
        dir: PathBuf,
        #[serde(default = "default_stem")]
        stem: String,
        #[serde(default = "default_format")]
        format: String,
    },
    /// The full 0..=100 sweep as an MP4 video.
    Video {
        out: PathBuf,
        #[serde(default = "default_fps")]
        fps: u32,
        #[serde(default = "default_overwrite")]
        overwrite: bool,
    },
}

fn default_stem() -> String {
    "image".to_string()
}

fn default_format() -> String {
    "jpg".to_string()
}

fn default_fps() -> u32 {
    crate::encode_ffmpeg::DEFAULT_FPS
}

fn default_overwrite() -> bool {
    true
}

impl BlendJob {
    pub fn from_path(path: &Path) -> MorphixResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open job file '{}'", path.display()))?;
        let r = BufReader::new(f);
        let job: BlendJob = serde_json::from_reader(r)
            .map_err(|e| MorphixError::serde(format!("parse job JSON: {e}")))?;
        Ok(job)
    }

    pub fn validate(&self) -> MorphixResult<()> {
        match &self.output {
            JobOutput::Still { mix, .. } => {
                if *mix > 100 {
                    return Err(MorphixError::validation(format!(
                        "job mix {mix} out of range 0..=100"
                    )));
                }
            }
            JobOutput::Frames { stem, format, .. } => {
                if stem.is_empty() {
                    return Err(MorphixError::validation("job stem must be non-empty"));
                }
                if format.is_empty() {
                    return Err(MorphixError::validation("job format must be non-empty"));
                }
            }
            JobOutput::Video { fps, .. } => {
                if *fps == 0 {
                    return Err(MorphixError::validation("job fps must be non-zero"));
                }
            }
        }

        if let Some(blur) = &self.blur
            && (!blur.sigma.is_finite() || blur.sigma <= 0.0)
        {
            return Err(MorphixError::validation("job blur sigma must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_job_parses_with_defaults() {
        let json = r#"{
            "input": "a.png",
            "target": "b.png",
            "output": { "kind": "still", "mix": 50, "out": "out.png" }
        }"#;
        let job: BlendJob = serde_json::from_str(json).unwrap();
        job.validate().unwrap();
        assert!(job.blur.is_none());
        assert!(matches!(job.output, JobOutput::Still { mix: 50, .. }));
    }

    #[test]
    fn video_job_defaults_fps() {
        let json = r#"{
            "input": "a.png",
            "target": "b.png",
            "output": { "kind": "video", "out": "out.mp4" }
        }"#;
        let job: BlendJob = serde_json::from_str(json).unwrap();
        job.validate().unwrap();
        assert!(matches!(job.output, JobOutput::Video { fps: 10, .. }));
    }

    #[test]
    fn out_of_range_mix_fails_validation() {
        let json = r#"{
            "input": "a.png",
            "target": "b.png",
            "output": { "kind": "still", "mix": 101, "out": "out.png" }
        }"#;
        let job: BlendJob = serde_json::from_str(json).unwrap();
        assert!(job.validate().is_err());
    }

    #[test]
    fn unknown_output_kind_is_a_parse_error() {
        let json = r#"{
            "input": "a.png",
            "target": "b.png",
            "output": { "kind": "gif", "out": "out.gif" }
        }"#;
        assert!(serde_json::from_str::<BlendJob>(json).is_err());
    }
}
