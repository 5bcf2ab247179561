use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{FramereelError, FramereelResult};

/// Frames-per-second of the output clip.
///
/// The tab exposes a 1–60 slider; the same bounds are enforced here so the
/// library boundary holds the invariant without the UI in front of it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Fps(u32);

impl Fps {
    /// Lowest accepted frame rate.
    pub const MIN: u32 = 1;
    /// Highest accepted frame rate.
    pub const MAX: u32 = 60;

    /// Create a validated FPS value.
    pub fn new(fps: u32) -> FramereelResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&fps) {
            return Err(FramereelError::invalid_input(format!(
                "fps must be between {} and {}, got {fps}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(fps))
    }

    /// The raw frame rate.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Convert a frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output container format selected in the tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Animated GIF; no codec selection applies.
    Gif,
    /// MP4 video; encoded with the selected [`VideoCodec`].
    Mp4,
}

impl OutputFormat {
    /// File extension (without the dot) used when allocating output paths.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FramereelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gif" => Ok(Self::Gif),
            "mp4" => Ok(Self::Mp4),
            other => Err(FramereelError::invalid_input(format!(
                "unknown output format '{other}' (expected 'gif' or 'mp4')"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Video codec selector; meaningful only when the format is MP4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// NVIDIA hardware H.264 encoder; requires a compatible GPU.
    H264Nvenc,
    /// Software H.264 encoder; slower but works everywhere.
    Libx264,
    /// Legacy MPEG-4 part 2; broader compatibility, lower efficiency.
    Mpeg4,
}

impl VideoCodec {
    /// Encoder name as understood by the external media encoder.
    pub fn encoder_name(self) -> &'static str {
        match self {
            Self::H264Nvenc => "h264_nvenc",
            Self::Libx264 => "libx264",
            Self::Mpeg4 => "mpeg4",
        }
    }
}

impl FromStr for VideoCodec {
    type Err = FramereelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h264_nvenc" => Ok(Self::H264Nvenc),
            "libx264" => Ok(Self::Libx264),
            "mpeg4" => Ok(Self::Mpeg4),
            other => Err(FramereelError::invalid_input(format!(
                "unknown codec '{other}' (expected 'h264_nvenc', 'libx264' or 'mpeg4')"
            ))),
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoder_name())
    }
}

/// Pixel dimensions shared by every frame of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
