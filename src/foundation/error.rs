use std::path::PathBuf;

/// Convenience alias for results produced by this crate.
pub type FramereelResult<T> = Result<T, FramereelError>;

/// Error taxonomy of the animation pipeline.
///
/// Every failure is detected synchronously and returned to the caller as a
/// value; the host UI displays the message verbatim as the operation's
/// result text. Nothing here is retried.
#[derive(thiserror::Error, Debug)]
pub enum FramereelError {
    /// A request field is missing, blank, or outside its domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The source folder contains no qualifying image files.
    #[error("no images found in '{}'", .folder.display())]
    EmptyFolder {
        /// The folder that was scanned.
        folder: PathBuf,
    },

    /// An image file could not be opened or decoded.
    #[error("failed to read image '{}': {}", .path.display(), .reason)]
    ImageRead {
        /// The offending file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// An image's pixel dimensions differ from the first image's.
    #[error(
        "image size mismatch: '{}' is {}x{}, expected {}x{}; all images must be the same size",
        .path.display(), .got_w, .got_h, .want_w, .want_h
    )]
    DimensionMismatch {
        /// The first offending file in lexicographic order.
        path: PathBuf,
        /// Offending width.
        got_w: u32,
        /// Offending height.
        got_h: u32,
        /// Width of the first image in the set.
        want_w: u32,
        /// Height of the first image in the set.
        want_h: u32,
    },

    /// The supplied audio file path does not exist.
    #[error("audio file not found: '{}'", .path.display())]
    AudioFileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// The supplied audio file exists but could not be read as audio.
    #[error("failed to decode audio '{}': {}", .path.display(), .reason)]
    AudioDecode {
        /// The offending file.
        path: PathBuf,
        /// Probe/decoder message.
        reason: String,
    },

    /// The external media encoder failed.
    #[error("encoding failed ({encoder}): {reason}")]
    Encoding {
        /// Encoder or codec name the failure belongs to.
        encoder: String,
        /// Underlying message, usually the encoder's stderr.
        reason: String,
    },

    /// Ambient I/O failure outside the taxonomy above.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramereelError {
    /// Build an [`FramereelError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`FramereelError::ImageRead`].
    pub fn image_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ImageRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`FramereelError::AudioDecode`].
    pub fn audio_decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::AudioDecode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`FramereelError::Encoding`].
    pub fn encoding(encoder: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            encoder: encoder.into(),
            reason: reason.into(),
        }
    }
}
