use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{assets, blend::MixFactor, buffer::FrameRGB, error::MorphixResult};

/// Where produced frames go: a still-image sequence or a video encoder stream.
/// Frames arrive in ascending mix-factor order; `finish` must be called once
/// after the last frame.
pub trait FrameSink {
    fn write_frame(&mut self, mix: MixFactor, frame: &FrameRGB) -> MorphixResult<()>;
    fn finish(&mut self) -> MorphixResult<()>;
}

/// Writes one still per mix factor, named by zero-padded percentage index:
/// `<stem>_000.<ext>` through `<stem>_100.<ext>`.
pub struct StillSequenceSink {
    dir: PathBuf,
    stem: String,
    ext: String,
}

impl StillSequenceSink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>, ext: impl Into<String>) -> MorphixResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            stem: stem.into(),
            ext: ext.into(),
        })
    }

    pub fn frame_path(&self, mix: MixFactor) -> PathBuf {
        self.dir
            .join(format!("{}_{:03}.{}", self.stem, mix.as_percent(), self.ext))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FrameSink for StillSequenceSink {
    fn write_frame(&mut self, mix: MixFactor, frame: &FrameRGB) -> MorphixResult<()> {
        assets::save_frame(frame, &self.frame_path(mix))
    }

    fn finish(&mut self) -> MorphixResult<()> {
        Ok(())
    }
}
