use std::path::Path;

use crate::foundation::core::{Dimensions, Fps};
use crate::foundation::error::{FramereelError, FramereelResult};
use crate::frames::scan::ImageSet;

/// One decoded frame: opaque RGBA8, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

/// A validated image set paired with a display rate.
///
/// Each image is shown for `1/fps` seconds; the sequence duration is
/// `frame count / fps`. Frames decode lazily, one at a time, while
/// streaming into a sink.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    images: ImageSet,
    fps: Fps,
}

impl FrameSequence {
    /// Pair a scanned image set with a frame rate.
    pub fn new(images: ImageSet, fps: Fps) -> Self {
        Self { images, fps }
    }

    /// The display rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Pixel dimensions shared by every frame.
    pub fn dimensions(&self) -> Dimensions {
        self.images.dimensions()
    }

    /// Number of frames.
    pub fn frame_count(&self) -> u64 {
        self.images.len() as u64
    }

    /// Sequence duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame_count())
    }

    /// Decode the frame at `index` to opaque RGBA8.
    pub fn decode_frame(&self, index: usize) -> FramereelResult<FrameRgba> {
        let path = self.images.paths().get(index).ok_or_else(|| {
            FramereelError::invalid_input(format!("frame index {index} out of range"))
        })?;
        decode_frame_rgba(path, self.dimensions())
    }

    /// Iterate over all frames in order, decoding on demand.
    pub fn iter_frames(&self) -> impl Iterator<Item = FramereelResult<FrameRgba>> + '_ {
        (0..self.images.len()).map(move |i| self.decode_frame(i))
    }
}

fn decode_frame_rgba(path: &Path, expected: Dimensions) -> FramereelResult<FrameRgba> {
    let img = image::open(path).map_err(|e| FramereelError::image_read(path, e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width != expected.width || height != expected.height {
        // The header probe and the full decode disagree on size.
        return Err(FramereelError::DimensionMismatch {
            path: path.to_path_buf(),
            got_w: width,
            got_h: height,
            want_w: expected.width,
            want_h: expected.height,
        });
    }

    let mut data = rgba.into_raw();
    flatten_alpha_over_black(&mut data);
    Ok(FrameRgba {
        width,
        height,
        data,
    })
}

/// Flatten straight-alpha RGBA8 over a black background, in place.
///
/// The encoders downstream expect fully opaque pixels.
fn flatten_alpha_over_black(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a) as u8;
        px[1] = mul_div255(u16::from(px[1]), a) as u8;
        px[2] = mul_div255(u16::from(px[2]), a) as u8;
        px[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::scan::scan_image_folder;

    #[test]
    fn duration_is_frame_count_over_fps() {
        let dir = std::env::temp_dir().join(format!(
            "framereel_seq_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..10 {
            let img = image::RgbaImage::from_pixel(6, 4, image::Rgba([i * 20, 0, 0, 255]));
            img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
        }

        let seq = FrameSequence::new(scan_image_folder(&dir).unwrap(), Fps::new(8).unwrap());
        assert_eq!(seq.frame_count(), 10);
        assert!((seq.duration_secs() - 1.25).abs() < 1e-12);

        let frame = seq.decode_frame(0).unwrap();
        assert_eq!((frame.width, frame.height), (6, 4));
        assert_eq!(frame.data.len(), 6 * 4 * 4);
        assert!(seq.decode_frame(10).is_err());
    }

    #[test]
    fn flatten_makes_pixels_opaque_over_black() {
        let mut px = vec![255u8, 0, 0, 128, 10, 20, 30, 255];
        flatten_alpha_over_black(&mut px);
        assert_eq!(px, vec![128, 0, 0, 255, 10, 20, 30, 255]);
    }
}
