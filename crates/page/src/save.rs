use crate::{Page, PageError};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn save_page(path: &Path, page: &Page) -> Result<(), PageError> {
    page.validate()?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, page)?;

    Ok(())
}

/// Compact MessagePack form, readable by [`crate::load_page`].
pub fn save_page_packed(path: &Path, page: &Page) -> Result<(), PageError> {
    page.validate()?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    rmp_serde::encode::write_named(&mut writer, page)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Block, BlockKind, RadioConfig, load_page};
    use onair_reveal::RevealSpec;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample_page() -> Page {
        Page {
            name: "Round Trip".to_string(),
            radio: Some(RadioConfig {
                lead_in: PathBuf::from("audio/tune-in.mp3"),
                tracks: vec![
                    PathBuf::from("audio/one.mp3"),
                    PathBuf::from("audio/two.mp3"),
                ],
                fallback_ms: 900,
            }),
            blocks: vec![
                Block::new(BlockKind::Heading, "Mailing Pigeon"),
                Block::new(BlockKind::Typewriter, "...but the <em>message</em> got through!"),
                Block::new(BlockKind::Line, "Over the hills")
                    .with_reveal(RevealSpec::fade_in().with_stagger(0.1))
                    .with_parallax(-5.0),
            ],
        }
    }

    #[test]
    fn test_save_page_creates_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.json");

        save_page(&path, &sample_page()).expect("save");

        assert!(path.exists());
    }

    #[test]
    fn test_saved_page_is_pretty_json() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.json");

        save_page(&path, &sample_page()).expect("save");

        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&content).expect("json");
        assert_eq!(value["name"], "Round Trip");
        assert_eq!(value["radio"]["fallbackMs"], 900);
        assert_eq!(value["blocks"][1]["kind"], "typewriter");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.json");
        let page = sample_page();

        save_page(&path, &page).expect("save");
        let loaded = load_page(&path).expect("load");

        assert_eq!(loaded, page);
    }

    #[test]
    fn test_save_packed_then_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.onair");
        let page = sample_page();

        save_page_packed(&path, &page).expect("save");
        let loaded = load_page(&path).expect("load");

        assert_eq!(loaded, page);
    }

    #[test]
    fn test_save_refuses_invalid_page() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("page.json");
        let mut page = sample_page();
        page.radio.as_mut().unwrap().tracks.clear();

        assert!(matches!(save_page(&path, &page), Err(PageError::Invalid(_))));
        assert!(!path.exists());
    }
}
