//! Framereel turns a folder of sequentially numbered still images into an
//! animated GIF or MP4 clip, optionally muxed with an audio track.
//!
//! The crate is a plugin, not a standalone tool: a host application calls
//! [`host::registry::register_animation_tab`] once at startup and later
//! invokes [`make_animation`] with the values collected from the tab's
//! controls. All real media work (decoding audio, encoding, muxing) is
//! delegated to the system `ffmpeg`/`ffprobe` binaries.
//!
//! ```no_run
//! use framereel::AnimationRequest;
//!
//! framereel::host::diagnostics::init();
//!
//! let request = AnimationRequest {
//!     folder_path: "/data/renders/run-42".to_string(),
//!     fps: 8,
//!     output_format: "gif".to_string(),
//!     codec: String::new(),
//!     audio_file: None,
//! };
//! let artifact = framereel::make_animation(&request)?;
//! println!("wrote {}", artifact.display());
//! # Ok::<(), framereel::FramereelError>(())
//! ```
#![forbid(unsafe_code)]

pub mod animation;
pub mod audio;
pub mod encode;
pub mod foundation;
pub mod frames;
pub mod host;
pub mod output;
pub mod ui;

pub use crate::animation::builder::make_animation;
pub use crate::animation::request::AnimationRequest;
pub use crate::audio::AudioTrack;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInput, FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{Dimensions, Fps, OutputFormat, VideoCodec};
pub use crate::foundation::error::{FramereelError, FramereelResult};
pub use crate::frames::scan::{ImageSet, scan_image_folder};
pub use crate::frames::sequence::{FrameRgba, FrameSequence};
pub use crate::output::allocate_output_path;
