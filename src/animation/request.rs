use std::path::PathBuf;

use crate::foundation::core::{Fps, OutputFormat, VideoCodec};
use crate::foundation::error::{FramereelError, FramereelResult};

/// One UI-triggered animation request, mirroring the tab's controls.
///
/// Fields arrive as the host UI produced them; the string-level checks and
/// the typed parse happen in [`AnimationRequest::validate`]. A request is
/// constructed fresh per invocation and never persisted.
#[derive(Clone, Debug, Default)]
pub struct AnimationRequest {
    /// Folder containing the numbered source images.
    pub folder_path: String,
    /// Target frame rate (1–60).
    pub fps: u32,
    /// Output format: `"gif"` or `"mp4"`.
    pub output_format: String,
    /// Codec selector; read only when the format is `"mp4"`.
    pub codec: String,
    /// Audio file path; `Some` when the user enabled the audio option.
    pub audio_file: Option<String>,
}

/// Typed form of a request after validation.
#[derive(Clone, Debug)]
pub(crate) struct ValidRequest {
    pub folder: PathBuf,
    pub fps: Fps,
    pub format: OutputFormat,
    pub codec: Option<VideoCodec>,
    pub audio_file: Option<PathBuf>,
}

impl AnimationRequest {
    /// Run the ordered precondition checks; the first failure short-circuits.
    ///
    /// Order: blank folder path, blank output format, blank audio path when
    /// audio was requested for mp4, then the typed parse of format, fps and
    /// codec. Nothing is touched on disk here.
    pub(crate) fn validate(&self) -> FramereelResult<ValidRequest> {
        if self.folder_path.trim().is_empty() {
            return Err(FramereelError::invalid_input(
                "the folder path is empty; provide a valid folder path",
            ));
        }
        if self.output_format.trim().is_empty() {
            return Err(FramereelError::invalid_input(
                "the output format is empty; select a valid output format",
            ));
        }
        let format_str = self.output_format.trim();
        if format_str == "mp4"
            && self
                .audio_file
                .as_deref()
                .is_some_and(|a| a.trim().is_empty())
        {
            return Err(FramereelError::invalid_input(
                "the audio file path is empty; provide a valid audio file path",
            ));
        }

        let format: OutputFormat = format_str.parse()?;
        let fps = Fps::new(self.fps)?;
        let (codec, audio_file) = match format {
            OutputFormat::Mp4 => (
                Some(self.codec.trim().parse::<VideoCodec>()?),
                self.audio_file.as_deref().map(PathBuf::from),
            ),
            // Codec and audio are mp4-only concerns.
            OutputFormat::Gif => (None, None),
        };

        Ok(ValidRequest {
            folder: PathBuf::from(&self.folder_path),
            fps,
            format,
            codec,
            audio_file,
        })
    }
}
