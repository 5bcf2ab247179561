use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;
use tracing::debug;

use crate::encode::sink::{AudioInput, FrameSink, SinkConfig};
use crate::foundation::core::{OutputFormat, VideoCodec};
use crate::foundation::error::{FramereelError, FramereelResult};
use crate::frames::sequence::FrameRgba;

/// Encoder preset: fast encode at somewhat lower compression efficiency.
const ENCODE_PRESET: &str = "fast";

/// Single-spawn GIF palette pipeline: generate a palette from the full
/// frame stream, then map the stream through it. This is a filter graph,
/// not a codec selection; the GIF path carries no codec parameters.
const GIF_FILTER: &str =
    "[0:v]split[a][b];[a]palettegen=stats_mode=diff[p];[b][p]paletteuse=dither=bayer:bayer_scale=5";

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path; the container follows [`SinkConfig::format`].
    pub out_path: PathBuf,
    /// Overwrite an existing output file. The path allocator hands out
    /// collision-free paths, so this stays off in normal operation.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options targeting `out_path`, without overwrite.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: false,
        }
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Streams raw RGBA8 frames into a spawned system `ffmpeg` process.
///
/// One sink produces one artifact. All acquired resources (child process,
/// pipes, stderr drain thread) are released on every exit path; dropping an
/// unfinished sink kills the encoder and removes the partial output file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder_label: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
}

impl FfmpegSink {
    /// Create a sink that will stream into `ffmpeg` once begun.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder_label: "ffmpeg".to_string(),
            child: None,
            stdin: None,
            stderr_drain: None,
            frame_len: 0,
        }
    }

    fn encoding_error(&self, reason: impl Into<String>) -> FramereelError {
        FramereelError::encoding(self.encoder_label.clone(), reason)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: &SinkConfig) -> FramereelResult<()> {
        let (width, height) = (cfg.dimensions.width, cfg.dimensions.height);
        if width == 0 || height == 0 {
            return Err(FramereelError::invalid_input(
                "frame width/height must be non-zero",
            ));
        }

        self.encoder_label = match cfg.format {
            OutputFormat::Gif => "gif".to_string(),
            OutputFormat::Mp4 => codec_for_mp4(cfg)?.encoder_name().to_string(),
        };

        if cfg.format == OutputFormat::Mp4
            && (!width.is_multiple_of(2) || !height.is_multiple_of(2))
        {
            return Err(self.encoding_error(format!(
                "width/height must be even for yuv420p mp4 output, got {width}x{height}"
            )));
        }

        if let Some(parent) = self.opts.out_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(FramereelError::invalid_input(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(self.encoding_error(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }

        let args = build_ffmpeg_args(cfg, &self.opts)?;
        debug!(encoder = %self.encoder_label, "spawning ffmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                self.encoding_error(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.encoding_error("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.encoding_error("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.frame_len = (width as usize) * (height as usize) * 4;
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRgba) -> FramereelResult<()> {
        if frame.data.len() != self.frame_len {
            return Err(FramereelError::invalid_input(format!(
                "frame size mismatch: got {} bytes ({}x{}), expected {}",
                frame.data.len(),
                frame.width,
                frame.height,
                self.frame_len
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(self.encoding_error("encoder not started or already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&frame.data)
            .map_err(|e| {
                FramereelError::encoding(
                    self.encoder_label.clone(),
                    format!("failed to write frame to ffmpeg stdin: {e}"),
                )
            })
    }

    fn finish(&mut self) -> FramereelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| self.encoding_error("encoder not started"))?;

        let status = child
            .wait()
            .map_err(|e| self.encoding_error(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| self.encoding_error("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| self.encoding_error(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            // Whatever ffmpeg managed to write is garbage at this point.
            let _ = std::fs::remove_file(&self.opts.out_path);
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(self.encoding_error(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let size = std::fs::metadata(&self.opts.out_path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            let _ = std::fs::remove_file(&self.opts.out_path);
            return Err(self.encoding_error("output file is missing or empty after encode"));
        }

        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        drop(self.stdin.take());
        let _ = child.kill();
        let _ = child.wait();
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        // A killed encode leaves a partial artifact behind.
        let _ = std::fs::remove_file(&self.opts.out_path);
    }
}

fn codec_for_mp4(cfg: &SinkConfig) -> FramereelResult<VideoCodec> {
    cfg.codec.ok_or_else(|| {
        FramereelError::invalid_input("a codec selection is required for mp4 output")
    })
}

/// Effective audio input: GIF output never carries one.
fn effective_audio(cfg: &SinkConfig) -> Option<&AudioInput> {
    match cfg.format {
        OutputFormat::Gif => None,
        OutputFormat::Mp4 => cfg.audio.as_ref(),
    }
}

/// Build the full ffmpeg argument list for a configuration.
///
/// Input is raw RGBA8 on stdin at the sequence frame rate; the output side
/// is container-specific. Kept free of process state so the argument shape
/// is unit-testable.
fn build_ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> FramereelResult<Vec<OsString>> {
    let (width, height) = (cfg.dimensions.width, cfg.dimensions.height);
    let audio = effective_audio(cfg);

    let mut args: Vec<OsString> = Vec::new();
    args.push(OsString::from(if opts.overwrite { "-y" } else { "-n" }));
    args.extend(["-loglevel", "error"].map(OsString::from));
    args.extend(
        [
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &cfg.fps.get().to_string(),
            "-i",
            "pipe:0",
        ]
        .map(OsString::from),
    );
    if let Some(audio) = audio {
        args.push("-i".into());
        args.push(audio.path.clone().into_os_string());
    }

    match cfg.format {
        OutputFormat::Gif => {
            args.push("-filter_complex".into());
            args.push(GIF_FILTER.into());
        }
        OutputFormat::Mp4 => {
            let codec = codec_for_mp4(cfg)?;
            if audio.is_some() {
                // Two inputs: take video from the pipe and audio from the
                // file, even when the audio source also has video streams.
                args.extend(["-map", "0:v:0", "-map", "1:a:0"].map(OsString::from));
            } else {
                args.push("-an".into());
            }
            args.extend(
                [
                    "-c:v",
                    codec.encoder_name(),
                    "-pix_fmt",
                    "yuv420p",
                    "-bf",
                    "0",
                    "-preset",
                    ENCODE_PRESET,
                ]
                .map(OsString::from),
            );
            match codec {
                VideoCodec::H264Nvenc => {
                    args.extend(["-profile:v", "main", "-cq", "22"].map(OsString::from));
                }
                VideoCodec::Libx264 => {
                    args.extend(["-profile:v", "main", "-crf", "23"].map(OsString::from));
                }
                VideoCodec::Mpeg4 => {
                    args.extend(["-qscale:v", "5"].map(OsString::from));
                }
            }
            if let Some(audio) = audio {
                args.extend(["-c:a", "aac"].map(OsString::from));
                if let Some(limit) = audio.limit_secs {
                    args.push("-t".into());
                    args.push(format!("{limit:.3}").into());
                }
            }
            args.extend(["-movflags", "+faststart"].map(OsString::from));
        }
    }

    args.push(opts.out_path.clone().into_os_string());
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Dimensions, Fps};

    fn cfg(format: OutputFormat, codec: Option<VideoCodec>) -> SinkConfig {
        SinkConfig {
            dimensions: Dimensions {
                width: 64,
                height: 64,
            },
            fps: Fps::new(8).unwrap(),
            format,
            codec,
            audio: None,
        }
    }

    fn strs(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn has_pair(args: &[String], key: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == key && w[1] == value)
    }

    #[test]
    fn gif_args_carry_no_codec_selection() {
        let mut config = cfg(OutputFormat::Gif, Some(VideoCodec::Libx264));
        config.audio = Some(AudioInput {
            path: PathBuf::from("tone.wav"),
            limit_secs: Some(1.0),
        });
        let args = strs(&build_ffmpeg_args(&config, &FfmpegSinkOpts::new("out.gif")).unwrap());

        // Codec and audio parameters are both ignored on the GIF path.
        assert!(!args.iter().any(|a| a == "-c:v"));
        assert!(!args.iter().any(|a| a == "-crf"));
        assert!(!args.iter().any(|a| a == "tone.wav"));
        assert!(args.iter().any(|a| a == "-filter_complex"));
        assert_eq!(args.last().unwrap(), "out.gif");
        assert_eq!(args.first().unwrap(), "-n");
    }

    #[test]
    fn libx264_args_use_crf_and_main_profile() {
        let args = strs(
            &build_ffmpeg_args(
                &cfg(OutputFormat::Mp4, Some(VideoCodec::Libx264)),
                &FfmpegSinkOpts::new("out.mp4"),
            )
            .unwrap(),
        );
        assert!(has_pair(&args, "-c:v", "libx264"));
        assert!(has_pair(&args, "-crf", "23"));
        assert!(has_pair(&args, "-profile:v", "main"));
        assert!(has_pair(&args, "-pix_fmt", "yuv420p"));
        assert!(has_pair(&args, "-bf", "0"));
        assert!(has_pair(&args, "-preset", "fast"));
        assert!(args.iter().any(|a| a == "-an"));
        assert!(!args.iter().any(|a| a == "-t"));
    }

    #[test]
    fn nvenc_uses_cq_and_mpeg4_uses_qscale() {
        let nvenc = strs(
            &build_ffmpeg_args(
                &cfg(OutputFormat::Mp4, Some(VideoCodec::H264Nvenc)),
                &FfmpegSinkOpts::new("out.mp4"),
            )
            .unwrap(),
        );
        assert!(has_pair(&nvenc, "-c:v", "h264_nvenc"));
        assert!(has_pair(&nvenc, "-cq", "22"));

        let mpeg4 = strs(
            &build_ffmpeg_args(
                &cfg(OutputFormat::Mp4, Some(VideoCodec::Mpeg4)),
                &FfmpegSinkOpts::new("out.mp4"),
            )
            .unwrap(),
        );
        assert!(has_pair(&mpeg4, "-c:v", "mpeg4"));
        assert!(has_pair(&mpeg4, "-qscale:v", "5"));
        assert!(!mpeg4.iter().any(|a| a == "-crf" || a == "-cq"));
        assert!(!mpeg4.iter().any(|a| a == "-profile:v"));
    }

    #[test]
    fn audio_input_maps_streams_and_truncates_only_when_capped() {
        let mut config = cfg(OutputFormat::Mp4, Some(VideoCodec::Libx264));
        config.audio = Some(AudioInput {
            path: PathBuf::from("tone.wav"),
            limit_secs: Some(1.25),
        });
        let args = strs(&build_ffmpeg_args(&config, &FfmpegSinkOpts::new("out.mp4")).unwrap());
        assert!(args.iter().any(|a| a == "tone.wav"));
        assert!(has_pair(&args, "-map", "0:v:0"));
        assert!(has_pair(&args, "-map", "1:a:0"));
        assert!(has_pair(&args, "-c:a", "aac"));
        assert!(has_pair(&args, "-t", "1.250"));
        assert!(!args.iter().any(|a| a == "-an"));

        config.audio = Some(AudioInput {
            path: PathBuf::from("tone.wav"),
            limit_secs: None,
        });
        let args = strs(&build_ffmpeg_args(&config, &FfmpegSinkOpts::new("out.mp4")).unwrap());
        assert!(!args.iter().any(|a| a == "-t"));
    }

    #[test]
    fn overwrite_flag_selects_y() {
        let mut opts = FfmpegSinkOpts::new("out.mp4");
        opts.overwrite = true;
        let args = strs(
            &build_ffmpeg_args(&cfg(OutputFormat::Mp4, Some(VideoCodec::Libx264)), &opts).unwrap(),
        );
        assert_eq!(args.first().unwrap(), "-y");
    }

    #[test]
    fn mp4_without_codec_is_rejected() {
        let err = build_ffmpeg_args(
            &cfg(OutputFormat::Mp4, None),
            &FfmpegSinkOpts::new("out.mp4"),
        )
        .unwrap_err();
        assert!(matches!(err, FramereelError::InvalidInput(_)));
    }

    #[test]
    fn odd_dimensions_for_mp4_fail_before_spawning() {
        let out = std::env::temp_dir().join(format!(
            "framereel_odd_{}.mp4",
            std::process::id()
        ));
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
        let mut config = cfg(OutputFormat::Mp4, Some(VideoCodec::Libx264));
        config.dimensions = Dimensions {
            width: 63,
            height: 64,
        };
        let err = sink.begin(&config).unwrap_err();
        assert!(matches!(err, FramereelError::Encoding { .. }));
        assert!(!out.exists());
    }
}
