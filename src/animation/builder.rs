use std::path::PathBuf;

use anyhow::Context as _;
use tracing::{debug, error, info};

use crate::animation::request::AnimationRequest;
use crate::audio::AudioTrack;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInput, FrameSink, SinkConfig};
use crate::foundation::error::FramereelResult;
use crate::frames::scan::scan_image_folder;
use crate::frames::sequence::FrameSequence;
use crate::output::{OUTPUT_DIR_NAME, allocate_output_path};

/// Generate an animation (GIF or MP4) from a folder of numbered images.
///
/// The request is checked front to back (blank fields, then the typed
/// field domains, then the image set itself); the first failing check
/// returns a descriptive error with nothing written to disk. On success the
/// artifact lands under `<folder>/output/` at a collision-free path, which
/// is returned as an absolute path.
///
/// The whole operation is synchronous; an in-flight encode runs to
/// completion or fails before control returns.
pub fn make_animation(request: &AnimationRequest) -> FramereelResult<PathBuf> {
    match build(request) {
        Ok(path) => Ok(path),
        Err(err) => {
            error!(%err, "animation request failed");
            Err(err)
        }
    }
}

fn build(request: &AnimationRequest) -> FramereelResult<PathBuf> {
    let req = request.validate()?;

    let images = scan_image_folder(&req.folder)?;
    info!(
        count = images.len(),
        format = %req.format,
        fps = %req.fps,
        "found images, creating animation"
    );

    let sequence = FrameSequence::new(images, req.fps);
    let dims = sequence.dimensions();
    debug!(
        width = dims.width,
        height = dims.height,
        "all images share one size"
    );

    let out_dir = req.folder.join(OUTPUT_DIR_NAME);
    let out_path = allocate_output_path(&out_dir, req.format.extension())?;

    let audio = match &req.audio_file {
        None => None,
        Some(path) => {
            let track = AudioTrack::load(path)?;
            let video_secs = sequence.duration_secs();
            let limit = track.mux_limit_secs(video_secs);
            info!(
                video_secs,
                audio_secs = track.duration_secs(),
                truncated = limit.is_some(),
                "attaching audio track"
            );
            Some(AudioInput {
                path: track.path().to_path_buf(),
                limit_secs: limit,
            })
        }
    };

    let cfg = SinkConfig {
        dimensions: dims,
        fps: sequence.fps(),
        format: req.format,
        codec: req.codec,
        audio,
    };

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out_path));
    encode_sequence(&sequence, &mut sink, &cfg)?;

    let out_path = std::path::absolute(&out_path).with_context(|| {
        format!(
            "failed to resolve absolute path for '{}'",
            out_path.display()
        )
    })?;
    info!(path = %out_path.display(), "animation created");
    Ok(out_path)
}

/// Stream every frame of `sequence` through `sink` in order.
pub(crate) fn encode_sequence(
    sequence: &FrameSequence,
    sink: &mut dyn FrameSink,
    cfg: &SinkConfig,
) -> FramereelResult<()> {
    sink.begin(cfg)?;
    for frame in sequence.iter_frames() {
        sink.push_frame(&frame?)?;
    }
    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::sink::InMemorySink;
    use crate::foundation::core::{Fps, OutputFormat};
    use crate::foundation::error::FramereelError;
    use std::path::Path;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "framereel_builder_{tag}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frames(dir: &Path, count: u8) {
        for i in 0..count {
            let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([i * 10, 0, 0, 255]));
            img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
        }
    }

    #[test]
    fn blank_folder_writes_nothing() {
        let err = make_animation(&AnimationRequest::default()).unwrap_err();
        assert!(matches!(err, FramereelError::InvalidInput(_)));
    }

    #[test]
    fn validation_failures_create_no_output_directory() {
        let dir = unique_temp_dir("noout");
        write_frames(&dir, 3);

        let req = AnimationRequest {
            folder_path: dir.to_string_lossy().into_owned(),
            fps: 8,
            output_format: "mp4".to_string(),
            codec: "libx264".to_string(),
            audio_file: Some(String::new()),
        };
        let err = make_animation(&req).unwrap_err();
        assert!(matches!(err, FramereelError::InvalidInput(_)));
        assert!(!dir.join(OUTPUT_DIR_NAME).exists());
    }

    #[test]
    fn missing_audio_file_stops_before_encoding() {
        let dir = unique_temp_dir("noaudio");
        write_frames(&dir, 3);

        let req = AnimationRequest {
            folder_path: dir.to_string_lossy().into_owned(),
            fps: 8,
            output_format: "mp4".to_string(),
            codec: "libx264".to_string(),
            audio_file: Some(dir.join("missing.mp3").to_string_lossy().into_owned()),
        };
        let err = make_animation(&req).unwrap_err();
        assert!(matches!(err, FramereelError::AudioFileNotFound { .. }));
        // The output directory was allocated, but no artifact was written.
        assert!(
            std::fs::read_dir(dir.join(OUTPUT_DIR_NAME))
                .map(|mut d| d.next().is_none())
                .unwrap_or(true)
        );
    }

    #[test]
    fn encode_sequence_pushes_every_frame_in_order() {
        let dir = unique_temp_dir("inmem");
        write_frames(&dir, 5);

        let sequence = FrameSequence::new(
            scan_image_folder(&dir).unwrap(),
            Fps::new(8).unwrap(),
        );
        let cfg = SinkConfig {
            dimensions: sequence.dimensions(),
            fps: sequence.fps(),
            format: OutputFormat::Gif,
            codec: None,
            audio: None,
        };
        let mut sink = InMemorySink::new();
        encode_sequence(&sequence, &mut sink, &cfg).unwrap();

        assert_eq!(sink.frames().len(), 5);
        assert!(sink.config().is_some());
        // Frames arrive in lexicographic order: the first one is frame_000.
        assert_eq!(sink.frames()[0].data[0], 0);
        assert_eq!(sink.frames()[4].data[0], 40);
    }
}
