use serde::{Deserialize, Serialize};

use crate::foundation::core::OutputFormat;

/// The two inputs the reactive visibility rules depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Currently selected output format.
    pub format: OutputFormat,
    /// Whether the "Add Audio" checkbox is ticked.
    pub audio_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            format: OutputFormat::Mp4,
            audio_enabled: false,
        }
    }
}

/// Visibility flags for the controls that react to state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    /// Codec dropdown.
    pub codec_selector: bool,
    /// "Add Audio" checkbox.
    pub audio_checkbox: bool,
    /// Audio file path textbox.
    pub audio_file_input: bool,
}

/// Resolve the visibility flags for a state. Pure; the host applies the
/// flags to the controls after every transition.
pub fn resolve(state: UiState) -> Visibility {
    let mp4 = state.format == OutputFormat::Mp4;
    Visibility {
        codec_selector: mp4,
        audio_checkbox: mp4,
        audio_file_input: mp4 && state.audio_enabled,
    }
}

/// Transition: the format dropdown changed.
///
/// Switching to GIF clears the audio option so a later switch back to MP4
/// starts from the unchecked state.
pub fn on_format_changed(state: UiState, format: OutputFormat) -> UiState {
    let audio_enabled = match format {
        OutputFormat::Gif => false,
        OutputFormat::Mp4 => state.audio_enabled,
    };
    UiState {
        format,
        audio_enabled,
    }
}

/// Transition: the audio checkbox changed.
pub fn on_audio_toggled(state: UiState, audio_enabled: bool) -> UiState {
    UiState {
        audio_enabled,
        ..state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(format: OutputFormat, audio_enabled: bool) -> UiState {
        UiState {
            format,
            audio_enabled,
        }
    }

    #[test]
    fn visibility_truth_table() {
        let cases = [
            // (format, audio_enabled) -> (codec, checkbox, file input)
            (state(OutputFormat::Mp4, false), (true, true, false)),
            (state(OutputFormat::Mp4, true), (true, true, true)),
            (state(OutputFormat::Gif, false), (false, false, false)),
            // Unreachable through transitions (gif clears audio), but the
            // resolver still hides everything audio-related.
            (state(OutputFormat::Gif, true), (false, false, false)),
        ];
        for (input, (codec, checkbox, file_input)) in cases {
            let v = resolve(input);
            assert_eq!(v.codec_selector, codec, "{input:?}");
            assert_eq!(v.audio_checkbox, checkbox, "{input:?}");
            assert_eq!(v.audio_file_input, file_input, "{input:?}");
        }
    }

    #[test]
    fn switching_to_gif_clears_the_audio_option() {
        let s = state(OutputFormat::Mp4, true);
        let s = on_format_changed(s, OutputFormat::Gif);
        assert!(!s.audio_enabled);

        // Coming back to mp4 starts unchecked.
        let s = on_format_changed(s, OutputFormat::Mp4);
        assert!(!s.audio_enabled);
        assert!(!resolve(s).audio_file_input);
    }

    #[test]
    fn toggling_audio_shows_the_path_input_for_mp4_only() {
        let s = on_audio_toggled(UiState::default(), true);
        assert!(resolve(s).audio_file_input);

        let s = on_format_changed(s, OutputFormat::Gif);
        assert!(!resolve(s).audio_file_input);
    }
}
