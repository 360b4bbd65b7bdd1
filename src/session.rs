use std::path::Path;

use crate::{
    assets,
    blend::{MixFactor, blend_into},
    blur::{BlurOpts, blur_frame},
    buffer::{FrameRGB, ensure_same_dimensions},
    error::MorphixResult,
};

/// Owns everything a blend run needs: the base frame, the target frame
/// (equalized to the base frame's dimensions at load time), a reused scratch
/// buffer for results, and the optional blur post-pass.
pub struct BlendSession {
    base: FrameRGB,
    target: FrameRGB,
    scratch: FrameRGB,
    blur: Option<BlurOpts>,
}

impl BlendSession {
    /// Build a session from two already-decoded frames. The frames must share
    /// dimensions; resizing is the loader's job, not the blender's.
    pub fn new(base: FrameRGB, target: FrameRGB, blur: Option<BlurOpts>) -> MorphixResult<Self> {
        ensure_same_dimensions(&base, &target)?;
        let scratch = FrameRGB::new(base.width, base.height)?;
        Ok(Self {
            base,
            target,
            scratch,
            blur,
        })
    }

    /// Load both images; when the target's dimensions differ from the base
    /// image's, the target is resized to match.
    pub fn from_paths(
        input: &Path,
        target: &Path,
        blur: Option<BlurOpts>,
    ) -> MorphixResult<Self> {
        let base = assets::load_frame(input)?;
        let mut target_frame = assets::load_frame(target)?;

        if !base.same_dimensions(&target_frame) {
            tracing::debug!(
                base_width = base.width,
                base_height = base.height,
                target_width = target_frame.width,
                target_height = target_frame.height,
                "resizing target image to match base image"
            );
            target_frame = assets::resize_frame(&target_frame, base.width, base.height)?;
        }

        Self::new(base, target_frame, blur)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    pub fn blur(&self) -> Option<BlurOpts> {
        self.blur
    }

    pub fn set_blur(&mut self, blur: Option<BlurOpts>) {
        self.blur = blur;
    }

    /// Blend into the scratch buffer and apply the blur post-pass when
    /// configured. The returned reference is valid until the next render.
    pub fn render(&mut self, mix: MixFactor) -> MorphixResult<&FrameRGB> {
        blend_into(&mut self.scratch, &self.base, &self.target, mix)?;
        if let Some(opts) = self.blur {
            self.scratch = blur_frame(&self.scratch, opts)?;
        }
        Ok(&self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32, px: [u8; 3]) -> FrameRGB {
        FrameRGB::from_raw(w, h, px.repeat((w * h) as usize)).unwrap()
    }

    #[test]
    fn new_rejects_mismatched_frames() {
        let base = frame(2, 2, [0, 0, 0]);
        let target = frame(3, 2, [0, 0, 0]);
        assert!(BlendSession::new(base, target, None).is_err());
    }

    #[test]
    fn render_reuses_the_scratch_buffer() {
        let base = frame(2, 2, [0, 0, 0]);
        let target = frame(2, 2, [100, 200, 50]);
        let mut sess = BlendSession::new(base, target, None).unwrap();

        let mid = sess.render(MixFactor::HALF).unwrap().clone();
        assert_eq!(mid.pixel(0, 0), Some([50, 100, 25]));

        let full = sess.render(MixFactor::FULL).unwrap();
        assert_eq!(full.pixel(1, 1), Some([100, 200, 50]));
    }

    #[test]
    fn blur_pass_keeps_constant_frames_constant() {
        let base = frame(4, 4, [10, 20, 30]);
        let target = frame(4, 4, [10, 20, 30]);
        let mut sess =
            BlendSession::new(base.clone(), target, Some(BlurOpts::default())).unwrap();
        assert_eq!(sess.render(MixFactor::HALF).unwrap(), &base);
    }
}
