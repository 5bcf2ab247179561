use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, OutputFormat, VideoCodec};
use crate::ui::visibility::{UiState, resolve};

/// Default frame rate preselected on the slider.
pub const DEFAULT_FPS: u32 = 8;

/// Control element ids, stable across host sessions.
pub mod ids {
    /// Folder path textbox.
    pub const FOLDER_INPUT: &str = "folder-input";
    /// FPS slider.
    pub const FPS_SLIDER: &str = "fps-slider";
    /// Output format dropdown.
    pub const FORMAT_SELECTOR: &str = "format-selector";
    /// Codec dropdown (mp4 only).
    pub const CODEC_SELECTOR: &str = "codec-selector";
    /// "Add Audio" checkbox.
    pub const AUDIO_CHECKBOX: &str = "audio-checkbox";
    /// Audio file path textbox.
    pub const AUDIO_FILE_INPUT: &str = "audio-file-input";
    /// Result textbox the generate handler writes into.
    pub const OUTPUT_PATH: &str = "output-path";
    /// Generate button.
    pub const GENERATE_BUTTON: &str = "generate-button";
}

/// One control in the tab's layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    /// Single-line text input.
    Textbox {
        id: String,
        label: String,
        placeholder: String,
        interactive: bool,
        visible: bool,
    },
    /// Integer slider.
    Slider {
        id: String,
        label: String,
        min: u32,
        max: u32,
        step: u32,
        value: u32,
    },
    /// Single-choice dropdown.
    Dropdown {
        id: String,
        label: String,
        choices: Vec<String>,
        value: String,
        visible: bool,
    },
    /// Boolean checkbox.
    Checkbox {
        id: String,
        label: String,
        value: bool,
        visible: bool,
    },
    /// Action button.
    Button { id: String, label: String },
    /// Static markdown text.
    Markdown { text: String },
    /// Collapsible group of controls.
    Accordion {
        label: String,
        open: bool,
        children: Vec<Control>,
    },
}

/// Event kind a binding listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEvent {
    /// The control's value changed.
    Changed,
    /// The control was clicked.
    Clicked,
}

/// What the host runs when a bound event fires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    /// Re-run the visibility transition for the source control's new value
    /// and apply the resulting flags (see [`crate::ui::visibility`]).
    ApplyVisibility,
    /// Invoke the animation builder with the current control values and
    /// write the result (output path or error text) into `output`.
    Generate {
        /// Id of the textbox receiving the result.
        output: String,
    },
}

/// Event wired from a control to a handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBinding {
    /// Source control id.
    pub source: String,
    /// Event kind.
    pub event: UiEvent,
    /// Handler to run.
    pub action: UiAction,
}

/// Toolkit-independent description of the plugin tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Tab heading.
    pub title: String,
    /// Control layout, in display order.
    pub controls: Vec<Control>,
    /// Event wiring.
    pub bindings: Vec<EventBinding>,
}

const HELP_TEXT: &str = "\
### Instructions
1. Select a folder with images.
2. Choose FPS and output format.
3. Optionally, add audio for MP4.
4. Click 'Generate Animation'.

### Codec Information
- **h264_nvenc**: Uses NVIDIA GPU hardware acceleration for faster encoding. Requires a compatible GPU.
- **libx264**: A widely supported software-based codec. Slower but works on most systems.
- **mpeg4**: An older codec with broader compatibility but lower efficiency compared to h264.
";

/// Build the animation tab: controls, defaults, and event wiring.
///
/// Initial visibility matches the default state (mp4 selected, audio off)
/// run through the same rules the change events use.
pub fn animation_panel() -> Panel {
    let initial = resolve(UiState::default());

    Panel {
        title: "GIF/MP4 Generator".to_string(),
        controls: vec![
            Control::Markdown {
                text: "## GIF/MP4 Generator".to_string(),
            },
            Control::Textbox {
                id: ids::FOLDER_INPUT.to_string(),
                label: "Folder with Images".to_string(),
                placeholder: "/path/to/images".to_string(),
                interactive: true,
                visible: true,
            },
            Control::Slider {
                id: ids::FPS_SLIDER.to_string(),
                label: "FPS (Frames per Second)".to_string(),
                min: Fps::MIN,
                max: Fps::MAX,
                step: 1,
                value: DEFAULT_FPS,
            },
            Control::Dropdown {
                id: ids::FORMAT_SELECTOR.to_string(),
                label: "Output Format".to_string(),
                choices: vec![
                    OutputFormat::Mp4.to_string(),
                    OutputFormat::Gif.to_string(),
                ],
                value: OutputFormat::Mp4.to_string(),
                visible: true,
            },
            Control::Dropdown {
                id: ids::CODEC_SELECTOR.to_string(),
                label: "Codec (for MP4) - See Help for details".to_string(),
                choices: vec![
                    VideoCodec::H264Nvenc.to_string(),
                    VideoCodec::Libx264.to_string(),
                    VideoCodec::Mpeg4.to_string(),
                ],
                value: VideoCodec::H264Nvenc.to_string(),
                visible: initial.codec_selector,
            },
            Control::Checkbox {
                id: ids::AUDIO_CHECKBOX.to_string(),
                label: "Add Audio".to_string(),
                value: false,
                visible: initial.audio_checkbox,
            },
            Control::Textbox {
                id: ids::AUDIO_FILE_INPUT.to_string(),
                label: "Audio File Path".to_string(),
                placeholder: "/path/to/audio.mp3".to_string(),
                interactive: true,
                visible: initial.audio_file_input,
            },
            Control::Textbox {
                id: ids::OUTPUT_PATH.to_string(),
                label: "Output Path".to_string(),
                placeholder: "Output path will be shown here".to_string(),
                interactive: false,
                visible: true,
            },
            Control::Button {
                id: ids::GENERATE_BUTTON.to_string(),
                label: "Generate Animation".to_string(),
            },
            Control::Accordion {
                label: "Help".to_string(),
                open: false,
                children: vec![Control::Markdown {
                    text: HELP_TEXT.to_string(),
                }],
            },
        ],
        bindings: vec![
            EventBinding {
                source: ids::FORMAT_SELECTOR.to_string(),
                event: UiEvent::Changed,
                action: UiAction::ApplyVisibility,
            },
            EventBinding {
                source: ids::AUDIO_CHECKBOX.to_string(),
                event: UiEvent::Changed,
                action: UiAction::ApplyVisibility,
            },
            EventBinding {
                source: ids::GENERATE_BUTTON.to_string(),
                event: UiEvent::Clicked,
                action: UiAction::Generate {
                    output: ids::OUTPUT_PATH.to_string(),
                },
            },
        ],
    }
}
