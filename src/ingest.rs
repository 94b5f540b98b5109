//! Watch-history log ingestion.
//!
//! The exported log is an HTML document where each watch occurrence is one
//! content cell: the first anchor carries the display title and destination
//! link, and the last text fragment of the cell is the free-form timestamp.
//! Ingestion only lifts these three strings out of the markup; all
//! interpretation happens in the parser.

use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};

use crate::models::RawEntry;

/// Reader with the cell/anchor selectors compiled once.
pub struct HistoryReader {
    cell_selector: Selector,
    anchor_selector: Selector,
}

impl HistoryReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            cell_selector: Selector::parse(
                "div.content-cell.mdl-cell.mdl-cell--6-col.mdl-typography--body-1",
            )
            .map_err(|e| anyhow!("invalid cell selector: {e:?}"))?,
            anchor_selector: Selector::parse("a")
                .map_err(|e| anyhow!("invalid anchor selector: {e:?}"))?,
        })
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<RawEntry>> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read history log {}", path.display()))?;
        Ok(self.extract_entries(&html))
    }

    /// Extract raw entries in document order. Cells without an anchor are
    /// skipped; everything else is left for the parser to judge.
    pub fn extract_entries(&self, html: &str) -> Vec<RawEntry> {
        let document = Html::parse_document(html);
        let mut entries = Vec::new();

        for cell in document.select(&self.cell_selector) {
            let anchor = match cell.select(&self.anchor_selector).next() {
                Some(anchor) => anchor,
                None => continue,
            };

            let url = anchor.value().attr("href").unwrap_or_default().to_string();
            let title = anchor.text().collect::<String>().trim().to_string();

            // The timestamp is the last non-empty text fragment of the cell.
            let timestamp_text = cell
                .text()
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .last()
                .unwrap_or_default()
                .to_string();

            entries.push(RawEntry {
                title,
                url,
                timestamp_text,
            });
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL_CLASS: &str = "content-cell mdl-cell mdl-cell--6-col mdl-typography--body-1";

    fn cell(inner: &str) -> String {
        format!(r#"<div class="{CELL_CLASS}">{inner}</div>"#)
    }

    #[test]
    fn extracts_title_url_and_timestamp() {
        let html = cell(concat!(
            r#"Watched&nbsp;<a href="https://www.youtube.com/watch?v=abcdefghijk">Some video</a>"#,
            r#"<br>2024. 3. 15. 오후 9:12:44 KST"#,
        ));
        let reader = HistoryReader::new().unwrap();
        let entries = reader.extract_entries(&html);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Some video");
        assert_eq!(
            entries[0].url,
            "https://www.youtube.com/watch?v=abcdefghijk"
        );
        assert_eq!(entries[0].timestamp_text, "2024. 3. 15. 오후 9:12:44 KST");
    }

    #[test]
    fn skips_cells_without_anchor() {
        let html = cell("Viewed a video that has been removed");
        let reader = HistoryReader::new().unwrap();
        assert!(reader.extract_entries(&html).is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let html = format!(
            "{}{}",
            cell(r#"<a href="u1">first</a><br>t1"#),
            cell(r#"<a href="u2">second</a><br>t2"#)
        );
        let reader = HistoryReader::new().unwrap();
        let entries = reader.extract_entries(&html);
        assert_eq!(entries[0].title, "first");
        assert_eq!(entries[1].title, "second");
    }
}
