//! Paragraph feed
//!
//! A feed is the ordered list of paragraphs extracted from one document, each
//! with the alignment its source element declared. Feeds are read from JSON
//! Lines, JSON arrays or CSV files with `text,alignment` columns.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Declared alignment of a paragraph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Alignment {
    Center,
    Right,
    /// No alignment, or one that carries no structural meaning (left, justify)
    #[default]
    None,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::None => "",
        }
    }
}

impl From<&str> for Alignment {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Alignment::Center,
            "right" => Alignment::Right,
            _ => Alignment::None,
        }
    }
}

impl From<Option<String>> for Alignment {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Alignment::from).unwrap_or_default()
    }
}

impl From<Alignment> for String {
    fn from(value: Alignment) -> Self {
        value.as_str().to_string()
    }
}

/// One paragraph of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Raw paragraph text
    pub text: String,

    /// Declared alignment
    #[serde(default)]
    pub alignment: Alignment,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            text: text.into(),
            alignment,
        }
    }

    pub fn centered(text: impl Into<String>) -> Self {
        Self::new(text, Alignment::Center)
    }

    pub fn right(text: impl Into<String>) -> Self {
        Self::new(text, Alignment::Right)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Alignment::None)
    }
}

/// Load a paragraph feed, choosing the format from the file extension
///
/// # Parameters
/// * `path` - Path to a `.jsonl`, `.json` or `.csv` feed
///
/// # Returns
/// * `Ok(Vec<Paragraph>)` - Paragraphs in document order
/// * `Err(FeedError)` - Error reading or decoding the feed
pub fn load_paragraphs<P: AsRef<Path>>(path: P) -> Result<Vec<Paragraph>, FeedError> {
    let path = path.as_ref();

    match path.extension().and_then(|s| s.to_str()) {
        Some("jsonl") | Some("ndjson") => {
            let content = read(path)?;
            parse_json_lines(&content).map_err(|(line, e)| FeedError::Json {
                path: path.to_path_buf(),
                line,
                source: e,
            })
        }
        Some("json") => {
            let content = read(path)?;
            serde_json::from_str(&content).map_err(|e| FeedError::Json {
                path: path.to_path_buf(),
                line: e.line(),
                source: e,
            })
        }
        Some("csv") => {
            let mut reader = csv::Reader::from_path(path)
                .map_err(|e| FeedError::Csv(path.to_path_buf(), e))?;
            reader
                .deserialize()
                .collect::<Result<Vec<Paragraph>, _>>()
                .map_err(|e| FeedError::Csv(path.to_path_buf(), e))
        }
        _ => Err(FeedError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Parse JSON Lines content, skipping blank lines
///
/// # Returns
/// * `Ok(Vec<Paragraph>)` - One paragraph per non-blank line
/// * `Err((line, error))` - 1-based line number of the first bad record
pub fn parse_json_lines(content: &str) -> Result<Vec<Paragraph>, (usize, serde_json::Error)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| serde_json::from_str(line).map_err(|e| (index + 1, e)))
        .collect()
}

fn read(path: &Path) -> Result<String, FeedError> {
    fs::read_to_string(path).map_err(|e| FeedError::Io(path.to_path_buf(), e))
}

/// Errors that can occur when loading a paragraph feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Unsupported feed format: {path} (expected .jsonl, .json or .csv)", path = .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid JSON in {file}:{line}: {source}", file = .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV in {path}: {source}", path = .0.display(), source = .1)]
    Csv(PathBuf, #[source] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_from_attribute() {
        assert_eq!(Alignment::from("center"), Alignment::Center);
        assert_eq!(Alignment::from(" Right "), Alignment::Right);
        assert_eq!(Alignment::from("justify"), Alignment::None);
        assert_eq!(Alignment::from(""), Alignment::None);
        assert_eq!(Alignment::from(None::<String>), Alignment::None);
    }

    #[test]
    fn test_json_lines_with_missing_and_null_alignment() {
        let content = r#"{"text": "ประมวลกฎหมายอาญา", "alignment": "center"}

{"text": "มาตรา 1 ในประมวลกฎหมายนี้"}
{"text": "ท้ายกฎหมาย", "alignment": null}
{"text": "ผู้รับสนอง", "alignment": "right"}
"#;
        let paragraphs = parse_json_lines(content).unwrap();
        assert_eq!(paragraphs.len(), 4);
        assert_eq!(paragraphs[0].alignment, Alignment::Center);
        assert_eq!(paragraphs[1].alignment, Alignment::None);
        assert_eq!(paragraphs[2].alignment, Alignment::None);
        assert_eq!(paragraphs[3].alignment, Alignment::Right);
    }

    #[test]
    fn test_json_lines_reports_line_number() {
        let content = "{\"text\": \"ok\"}\n{broken\n";
        let (line, _) = parse_json_lines(content).unwrap_err();
        assert_eq!(line, 2);
    }

    #[test]
    fn test_load_csv_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.csv");
        fs::write(
            &path,
            "text,alignment\nภาค 1 บทบัญญัติทั่วไป,center\n\"มาตรา 1 ข้อความ, ต่อ\",\n",
        )
        .unwrap();

        let paragraphs = load_paragraphs(&path).unwrap();
        assert_eq!(
            paragraphs,
            vec![
                Paragraph::centered("ภาค 1 บทบัญญัติทั่วไป"),
                Paragraph::plain("มาตรา 1 ข้อความ, ต่อ"),
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_paragraphs("feed.txt");
        assert!(matches!(result, Err(FeedError::UnsupportedFormat(_))));
    }
}
