use std::path::{Path, PathBuf};

use crate::foundation::error::{FramereelError, FramereelResult};

/// A probed external audio input for MP4 muxing.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    path: PathBuf,
    duration_secs: f64,
}

impl AudioTrack {
    /// Load an audio track: verify the file exists, then probe its duration
    /// with the system `ffprobe` binary.
    pub fn load(path: &Path) -> FramereelResult<Self> {
        if !path.exists() {
            return Err(FramereelError::AudioFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let duration_secs = probe_audio_duration(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            duration_secs,
        })
    }

    /// The source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probed duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Cap, in seconds, to apply when muxing against a video of `video_secs`.
    ///
    /// Longer audio is truncated to the video duration; shorter audio is
    /// used as-is and the video is never trimmed or extended to match it.
    pub fn mux_limit_secs(&self, video_secs: f64) -> Option<f64> {
        (self.duration_secs > video_secs).then_some(video_secs)
    }
}

fn probe_audio_duration(path: &Path) -> FramereelResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| FramereelError::audio_decode(path, format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(FramereelError::audio_decode(
            path,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| FramereelError::audio_decode(path, format!("ffprobe json parse failed: {e}")))?;

    let audio_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| FramereelError::audio_decode(path, "no audio stream found"))?;

    // Some containers report duration per stream, some only at format level.
    audio_stream
        .duration
        .as_deref()
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
        })
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| FramereelError::audio_decode(path, "could not determine audio duration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_audio_file_not_found() {
        let path = std::env::temp_dir().join(format!(
            "framereel_audio_missing_{}.mp3",
            std::process::id()
        ));
        let err = AudioTrack::load(&path).unwrap_err();
        assert!(matches!(err, FramereelError::AudioFileNotFound { .. }));
    }

    #[test]
    fn longer_audio_is_capped_to_video_duration() {
        let track = AudioTrack {
            path: PathBuf::from("tone.wav"),
            duration_secs: 3.0,
        };
        assert_eq!(track.mux_limit_secs(1.25), Some(1.25));
    }

    #[test]
    fn shorter_or_equal_audio_is_used_as_is() {
        let track = AudioTrack {
            path: PathBuf::from("tone.wav"),
            duration_secs: 1.0,
        };
        assert_eq!(track.mux_limit_secs(1.25), None);
        let exact = AudioTrack {
            path: PathBuf::from("tone.wav"),
            duration_secs: 1.25,
        };
        assert_eq!(exact.mux_limit_secs(1.25), None);
    }
}
