use std::path::Path;

use anyhow::Context as _;

use crate::{
    buffer::FrameRGB,
    error::{MorphixError, MorphixResult},
};

/// Decode an image file into an RGB8 frame. Any alpha channel is dropped.
pub fn load_frame(path: &Path) -> MorphixResult<FrameRGB> {
    let dyn_img = image::open(path).map_err(|e| {
        MorphixError::decode(format!("failed to decode '{}': {e}", path.display()))
    })?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    FrameRGB::from_raw(width, height, rgb.into_raw())
}

/// Bilinear resize to the given dimensions.
pub fn resize_frame(frame: &FrameRGB, width: u32, height: u32) -> MorphixResult<FrameRGB> {
    if width == 0 || height == 0 {
        return Err(MorphixError::validation(
            "resize width/height must be non-zero",
        ));
    }

    let img = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| MorphixError::validation("frame data does not match its dimensions"))?;
    let resized = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
    FrameRGB::from_raw(width, height, resized.into_raw())
}

/// Encode a frame to disk; the format is chosen from the path's extension.
pub fn save_frame(frame: &FrameRGB, path: &Path) -> MorphixResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
    )
    .map_err(|e| MorphixError::encode(format!("failed to write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn gradient(w: u32, h: u32) -> FrameRGB {
        let mut f = FrameRGB::new(w, h).unwrap();
        for (i, px) in f.data.chunks_exact_mut(3).enumerate() {
            px[0] = (i % 256) as u8;
            px[1] = ((i * 3) % 256) as u8;
            px[2] = ((i * 7) % 256) as u8;
        }
        f
    }

    #[test]
    fn save_and_load_png_round_trips() {
        let dir = PathBuf::from("target").join("assets_roundtrip");
        let path = dir.join("frame.png");
        let frame = gradient(6, 4);

        save_frame(&frame, &path).unwrap();
        let loaded = load_frame(&path).unwrap();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn load_missing_file_is_a_decode_error() {
        let err = load_frame(Path::new("target/definitely_missing.png")).unwrap_err();
        assert!(matches!(err, MorphixError::Decode(_)));
    }

    #[test]
    fn resize_changes_dimensions() {
        let frame = gradient(8, 8);
        let small = resize_frame(&frame, 4, 2).unwrap();
        assert_eq!(small.dimensions(), (4, 2));
        assert_eq!(small.data.len(), 4 * 2 * 3);
    }

    #[test]
    fn resize_to_zero_is_rejected() {
        let frame = gradient(2, 2);
        assert!(resize_frame(&frame, 0, 2).is_err());
    }
}
