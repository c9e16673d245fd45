use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

pub const NBSP: &str = "\u{00A0}";

const DELAY_AFTER_SPACE: Duration = Duration::from_millis(30);
const DELAY_AFTER_CHAR: Duration = Duration::from_millis(25);
const DELAY_REDUCED_MOTION: Duration = Duration::from_millis(5);

/// One span per grapheme. Spaces become non-breaking so an inline-block
/// span for a space keeps its width.
pub fn split_chars(text: &str) -> Vec<String> {
    text.graphemes(true)
        .map(|g| if g == " " { NBSP.to_string() } else { g.to_string() })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub text: String,
    /// Whitespace runs and anything carrying markup are emitted verbatim.
    pub animate: bool,
}

/// Split on whitespace runs, keeping the runs so joining the tokens gives
/// back the input.
pub fn split_words(text: &str) -> Vec<WordToken> {
    let mut tokens: Vec<WordToken> = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for ch in text.chars() {
        let is_space = ch.is_whitespace();
        if !current.is_empty() && is_space != in_space {
            tokens.push(word_token(std::mem::take(&mut current), in_space));
        }
        in_space = is_space;
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(word_token(current, in_space));
    }
    tokens
}

fn word_token(text: String, is_space: bool) -> WordToken {
    let animate = !is_space && !text.contains('<');
    WordToken { text, animate }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStep {
    /// A grapheme, or a whole `<...>` tag.
    pub chunk: String,
    /// Pause after this chunk before the next one appears.
    pub delay: Duration,
}

/// Steps a string out one visible character at a time. Markup tags are
/// emitted whole so a half-typed tag never shows up.
#[derive(Debug, Clone)]
pub struct Typewriter {
    steps: Vec<TypeStep>,
}

impl Typewriter {
    pub fn new(text: &str, reduced_motion: bool) -> Self {
        let mut steps = Vec::new();
        let mut graphemes = text.graphemes(true);

        while let Some(g) = graphemes.next() {
            let mut chunk = g.to_string();
            if g == "<" {
                // An unterminated tag swallows the rest of the text
                for next in graphemes.by_ref() {
                    chunk.push_str(next);
                    if next == ">" {
                        break;
                    }
                }
            }

            let delay = if reduced_motion {
                DELAY_REDUCED_MOTION
            } else if chunk.ends_with(' ') {
                DELAY_AFTER_SPACE
            } else {
                DELAY_AFTER_CHAR
            };
            steps.push(TypeStep { chunk, delay });
        }

        Self { steps }
    }

    pub fn steps(&self) -> &[TypeStep] {
        &self.steps
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }

    /// Text visible `elapsed` after typing began. The first chunk shows immediately.
    pub fn visible_at(&self, elapsed: Duration) -> String {
        let mut shown = String::new();
        let mut at = Duration::ZERO;
        for step in &self.steps {
            if at > elapsed {
                break;
            }
            shown.push_str(&step.chunk);
            at += step.delay;
        }
        shown
    }

    pub fn is_done_at(&self, elapsed: Duration) -> bool {
        let last_start = self.total_duration().saturating_sub(
            self.steps.last().map(|s| s.delay).unwrap_or_default(),
        );
        elapsed >= last_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chars_uses_nbsp() {
        assert_eq!(split_chars("a b"), vec!["a", NBSP, "b"]);
    }

    #[test]
    fn test_split_chars_keeps_graphemes_whole() {
        let chars = split_chars("ne\u{301}e");
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[1], "e\u{301}");
    }

    #[test]
    fn test_split_words_roundtrips_text() {
        let text = "Here's to  the crazy ones.";
        let tokens = split_words(text);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text);

        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.animate)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["Here's", "to", "the", "crazy", "ones."]);
        assert_eq!(tokens[3].text, "  ");
    }

    #[test]
    fn test_split_words_leaves_markup_static() {
        let tokens = split_words("the <em>misfits</em> rebels");
        let marked: Vec<bool> = tokens.iter().map(|t| t.animate).collect();
        assert_eq!(marked, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_split_words_empty() {
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_typewriter_emits_tags_whole() {
        let typewriter = Typewriter::new("a<br>b", false);
        let chunks: Vec<&str> = typewriter.steps().iter().map(|s| s.chunk.as_str()).collect();
        assert_eq!(chunks, vec!["a", "<br>", "b"]);
    }

    #[test]
    fn test_typewriter_delays() {
        let typewriter = Typewriter::new("a b", false);
        let delays: Vec<u64> = typewriter
            .steps()
            .iter()
            .map(|s| s.delay.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![25, 30, 25]);

        let reduced = Typewriter::new("a b", true);
        assert_eq!(reduced.total_duration(), Duration::from_millis(15));
    }

    #[test]
    fn test_typewriter_unterminated_tag() {
        let typewriter = Typewriter::new("x<b oops", false);
        assert_eq!(typewriter.steps().len(), 2);
        assert_eq!(typewriter.steps()[1].chunk, "<b oops");
    }

    #[test]
    fn test_visible_at() {
        let typewriter = Typewriter::new("abc", false);
        assert_eq!(typewriter.visible_at(Duration::ZERO), "a");
        assert_eq!(typewriter.visible_at(Duration::from_millis(25)), "ab");
        assert_eq!(typewriter.visible_at(Duration::from_millis(49)), "ab");
        assert_eq!(typewriter.visible_at(Duration::from_secs(1)), "abc");
        assert!(!typewriter.is_done_at(Duration::from_millis(49)));
        assert!(typewriter.is_done_at(Duration::from_millis(50)));
    }
}
