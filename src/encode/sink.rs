use std::path::PathBuf;

use crate::foundation::core::{Dimensions, Fps, OutputFormat, VideoCodec};
use crate::foundation::error::FramereelResult;
use crate::frames::sequence::FrameRgba;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Pixel dimensions of every frame.
    pub dimensions: Dimensions,
    /// Display rate of the sequence.
    pub fps: Fps,
    /// Output container format.
    pub format: OutputFormat,
    /// Codec selection; required for MP4, ignored for GIF.
    pub codec: Option<VideoCodec>,
    /// Optional external audio input; only consulted for MP4.
    pub audio: Option<AudioInput>,
}

/// External audio file muxed into the output.
#[derive(Debug, Clone)]
pub struct AudioInput {
    /// Path to the audio source file.
    pub path: PathBuf,
    /// Cap on the muxed audio duration in seconds; `None` keeps the source
    /// length (the video stream is never extended to match it).
    pub limit_secs: Option<f64>,
}

/// Sink contract for consuming frames in sequence order.
///
/// `push_frame` is called once per frame, front to back; `finish` completes
/// the artifact. A sink dropped before `finish` must release whatever it
/// acquired in `begin`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: &SinkConfig) -> FramereelResult<()>;
    /// Push the next frame.
    fn push_frame(&mut self, frame: &FrameRgba) -> FramereelResult<()>;
    /// Called once after the last frame.
    fn finish(&mut self) -> FramereelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameRgba>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames captured so far, in push order.
    pub fn frames(&self) -> &[FrameRgba] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: &SinkConfig) -> FramereelResult<()> {
        self.cfg = Some(cfg.clone());
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRgba) -> FramereelResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> FramereelResult<()> {
        Ok(())
    }
}
