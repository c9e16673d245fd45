mod load;
mod save;

use onair_reveal::{
    Action, CrossoutSwap, Ease, EaseMode, Props, RevealSpec, ToggleActions, TriggerPoint,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use load::{PageSummary, load_page, load_page_summary};
pub use save::{save_page, save_page_packed};

pub const DEFAULT_FALLBACK_MS: u64 = 1200;

fn default_fallback_ms() -> u64 {
    DEFAULT_FALLBACK_MS
}

/// A page file. Keys are camelCase throughout, matching the reveal props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio: Option<RadioConfig>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Assets for the radio widget. Paths are relative to the assets root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioConfig {
    pub lead_in: PathBuf,
    pub tracks: Vec<PathBuf>,
    /// How long to wait for the lead-in to finish before starting the
    /// track anyway.
    #[serde(default = "default_fallback_ms")]
    pub fallback_ms: u64,
}

impl RadioConfig {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    /// One line revealed as a whole.
    Line,
    /// Split into words, staggered.
    Words,
    /// Split into characters, staggered.
    Chars,
    Typewriter,
    /// A line drawn under the text.
    Underline,
    /// A line drawn through the text.
    Strike,
    /// Struck through, then swapped for the block's `replacement`.
    Crossout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
    /// What a crossout block's text turns into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealSpec>,
    /// Scrubbed drift as a percentage of the block's height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax: Option<f32>,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            replacement: None,
            reveal: None,
            parallax: None,
        }
    }

    pub fn with_reveal(mut self, reveal: RevealSpec) -> Self {
        self.reveal = Some(reveal);
        self
    }

    pub fn with_replacement(mut self, text: impl Into<String>) -> Self {
        self.replacement = Some(text.into());
        self
    }

    pub fn with_parallax(mut self, y_percent: f32) -> Self {
        self.parallax = Some(y_percent);
        self
    }

    /// The block's own reveal, or the default choreography for its kind.
    pub fn reveal_spec(&self) -> RevealSpec {
        if let Some(spec) = &self.reveal {
            return spec.clone();
        }
        match self.kind {
            BlockKind::Heading | BlockKind::Typewriter => RevealSpec::fade_in().with_once(true),
            BlockKind::Line => RevealSpec::default(),
            BlockKind::Words => RevealSpec {
                from: Props::opacity(0.0).with_y(20.0),
                duration: 0.6,
                ..RevealSpec::default()
            }
            .with_stagger(0.08),
            BlockKind::Chars => RevealSpec {
                from: Props {
                    opacity: Some(0.0),
                    y_percent: Some(100.0),
                    ..Props::default()
                },
                to: Props {
                    opacity: Some(1.0),
                    y_percent: Some(0.0),
                    ..Props::default()
                },
                duration: 0.5,
                ..RevealSpec::default()
            }
            .with_stagger(0.03),
            BlockKind::Underline | BlockKind::Strike => RevealSpec {
                from: Props::undrawn(1.0),
                to: Props::undrawn(0.0),
                ease: Ease::Power(2, EaseMode::InOut),
                start: TriggerPoint::new(0.0, 0.8),
                ..RevealSpec::default()
            },
            // The swap's own tweens run off the reveal's playhead
            BlockKind::Crossout => RevealSpec {
                from: Props::default(),
                to: Props::default(),
                duration: CrossoutSwap::default().duration(),
                ease: Ease::None,
                start: TriggerPoint::new(0.0, 0.8),
                toggle_actions: ToggleActions {
                    on_enter: Action::Play,
                    on_leave: Action::None,
                    on_enter_back: Action::Play,
                    on_leave_back: Action::None,
                },
                ..RevealSpec::default()
            }
            .with_once(true),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] rmp_serde::decode::Error),

    #[error("Invalid page: {0}")]
    Invalid(String),
}

impl Page {
    pub fn validate(&self) -> Result<(), PageError> {
        if let Some(radio) = &self.radio {
            if radio.tracks.is_empty() {
                return Err(PageError::Invalid("radio has no tracks".to_string()));
            }
            if radio.lead_in.as_os_str().is_empty() {
                return Err(PageError::Invalid("radio has no lead-in clip".to_string()));
            }
        }
        if let Some(i) = self
            .blocks
            .iter()
            .position(|b| b.kind == BlockKind::Crossout && b.replacement.is_none())
        {
            return Err(PageError::Invalid(format!(
                "crossout block {} has no replacement",
                i + 1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        Page {
            name: "Pigeon Post".to_string(),
            radio: Some(RadioConfig {
                lead_in: PathBuf::from("audio/tune-in.mp3"),
                tracks: vec![
                    PathBuf::from("audio/track-1.mp3"),
                    PathBuf::from("audio/track-2.mp3"),
                    PathBuf::from("audio/track-3.mp3"),
                ],
                fallback_ms: 1200,
            }),
            blocks: vec![
                Block::new(BlockKind::Heading, "Mailing Pigeon"),
                Block::new(BlockKind::Words, "Here's to the crazy ones."),
            ],
        }
    }

    #[test]
    fn test_minimal_json() {
        let page: Page = serde_json::from_str(r#"{"name":"Bare"}"#).unwrap();
        assert!(page.radio.is_none());
        assert!(page.blocks.is_empty());
        page.validate().unwrap();
    }

    #[test]
    fn test_fallback_defaults() {
        let json = r#"{"leadIn":"a.mp3","tracks":["b.mp3"]}"#;
        let radio: RadioConfig = serde_json::from_str(json).unwrap();
        assert_eq!(radio.fallback_ms, DEFAULT_FALLBACK_MS);
        assert_eq!(radio.fallback_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn test_block_kinds_are_lowercase() {
        let block: Block =
            serde_json::from_str(r#"{"kind":"typewriter","text":"hello"}"#).unwrap();
        assert_eq!(block.kind, BlockKind::Typewriter);
        let json = serde_json::to_string(&Block::new(BlockKind::Chars, "x")).unwrap();
        assert_eq!(json, r#"{"kind":"chars","text":"x"}"#);
    }

    #[test]
    fn test_block_reveal_override() {
        let block: Block = serde_json::from_str(
            r#"{"kind":"line","text":"t","reveal":{"duration":2.0,"once":true}}"#,
        )
        .unwrap();
        let spec = block.reveal_spec();
        assert_eq!(spec.duration, 2.0);
        assert!(spec.once);
    }

    #[test]
    fn test_default_reveals_per_kind() {
        let chars = Block::new(BlockKind::Chars, "abc").reveal_spec();
        assert!(chars.stagger > 0.0);
        assert_eq!(chars.from.y_percent, Some(100.0));

        let heading = Block::new(BlockKind::Heading, "abc").reveal_spec();
        assert!(heading.once);
        assert_eq!(heading.stagger, 0.0);
    }

    #[test]
    fn test_validate_rejects_empty_tracks() {
        let mut page = sample_page();
        page.validate().unwrap();

        page.radio.as_mut().unwrap().tracks.clear();
        assert!(matches!(page.validate(), Err(PageError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_missing_lead_in() {
        let mut page = sample_page();
        page.radio.as_mut().unwrap().lead_in = PathBuf::new();
        assert!(matches!(page.validate(), Err(PageError::Invalid(_))));
    }

    #[test]
    fn test_page_msgpack_roundtrip() {
        let page = sample_page();
        let bytes = rmp_serde::encode::to_vec_named(&page).expect("serialize");
        let decoded: Page = rmp_serde::decode::from_slice(&bytes).expect("deserialize");
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_keys_are_camel_case() {
        let json = serde_json::to_value(sample_page()).unwrap();
        let radio = &json["radio"];
        assert_eq!(radio["leadIn"], "audio/tune-in.mp3");
        assert_eq!(radio["fallbackMs"], 1200);
        assert!(radio.get("lead_in").is_none());

        let block: Block = serde_json::from_str(
            r#"{"kind":"line","text":"t","reveal":{"toggleActions":"play none none none"}}"#,
        )
        .unwrap();
        assert_eq!(block.reveal_spec().toggle_actions.on_leave_back, Action::None);

        let snake = r#"{"lead_in":"a.mp3","tracks":["b.mp3"]}"#;
        assert!(serde_json::from_str::<RadioConfig>(snake).is_err());
    }

    #[test]
    fn test_line_kinds_draw_in() {
        for kind in [BlockKind::Underline, BlockKind::Strike] {
            let spec = Block::new(kind, "crazy").reveal_spec();
            assert_eq!(spec.from.drawn_fraction(), 0.0);
            assert_eq!(spec.to.drawn_fraction(), 1.0);
            assert_eq!(spec.from.opacity, None);
        }
    }

    #[test]
    fn test_crossout_plays_once_for_whole_swap() {
        let block = Block::new(BlockKind::Crossout, "pigeons").with_replacement("heroes");
        let spec = block.reveal_spec();
        assert!(spec.once);
        assert_eq!(spec.duration, CrossoutSwap::default().duration());
        assert_eq!(spec.toggle_actions.on_enter_back, Action::Play);

        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"kind":"crossout","text":"pigeons","replacement":"heroes"}"#);
    }

    #[test]
    fn test_validate_rejects_crossout_without_replacement() {
        let mut page = sample_page();
        page.blocks.push(Block::new(BlockKind::Crossout, "pigeons"));
        assert!(matches!(page.validate(), Err(PageError::Invalid(msg)) if msg.contains("block 3")));

        page.blocks[2].replacement = Some("heroes".to_string());
        page.validate().unwrap();
    }
}
