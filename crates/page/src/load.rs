use crate::{Page, PageError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub name: String,
    pub block_count: usize,
    /// Zero when the page has no radio.
    pub track_count: usize,
}

fn load_page_data(path: &Path) -> Result<Page, PageError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    // Try JSON first, fall back to MessagePack
    serde_json::from_reader(reader).or_else(|json_err| {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        // A file that is neither reports the JSON problem, it is the format we write
        rmp_serde::decode::from_read(reader).map_err(|_| PageError::Json(json_err))
    })
}

pub fn load_page(path: &Path) -> Result<Page, PageError> {
    let page = load_page_data(path)?;
    page.validate()?;
    Ok(page)
}

/// Read just enough to describe a page, without validating it.
pub fn load_page_summary(path: &Path) -> Result<PageSummary, PageError> {
    let page = load_page_data(path)?;

    Ok(PageSummary {
        name: page.name,
        block_count: page.blocks.len(),
        track_count: page.radio.map(|r| r.tracks.len()).unwrap_or(0),
    })
}
