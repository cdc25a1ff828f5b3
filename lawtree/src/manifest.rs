//! Batch manifest from lawtree.toml

use crate::paragraph::Alignment;
use crate::parser::ParserOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// List of documents to convert in one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentManifest {
    /// Optional keyword taxonomy file, relative to the manifest
    pub keywords: Option<PathBuf>,

    /// Documents to convert, in order
    #[serde(default, rename = "document")]
    pub documents: Vec<DocumentEntry>,
}

/// One document of the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Document title, exactly as its title paragraph reads
    pub title: String,

    /// Paragraph feed file, relative to the manifest
    pub paragraphs: PathBuf,

    /// Replacement for newlines in the table's `text` column
    pub newline_placeholder: Option<String>,

    /// Paragraph text whose declared alignment is wrong in the source,
    /// mapped to the alignment to use instead
    #[serde(default)]
    pub alignment_overrides: IndexMap<String, Alignment>,
}

impl DocumentEntry {
    /// Parser options for this document
    pub fn parser_options(&self) -> ParserOptions {
        let mut options = ParserOptions {
            alignment_overrides: self.alignment_overrides.clone(),
            ..ParserOptions::default()
        };
        if let Some(placeholder) = &self.newline_placeholder {
            options.newline_placeholder = placeholder.clone();
        }
        options
    }
}

impl DocumentManifest {
    /// Load a manifest from a lawtree.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the manifest file
    ///
    /// # Returns
    /// * `Ok(DocumentManifest)` - Successfully loaded manifest
    /// * `Err(ManifestError)` - Error reading or parsing the manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(&path).map_err(ManifestError::IoError)?;

        let manifest: DocumentManifest =
            toml::from_str(&content).map_err(ManifestError::ParseError)?;

        Ok(manifest)
    }

    /// Save the manifest to a lawtree.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the manifest will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved manifest
    /// * `Err(ManifestError)` - Error serializing or writing the manifest file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ManifestError> {
        let content = toml::to_string_pretty(self).map_err(ManifestError::SerializeError)?;

        fs::write(&path, content).map_err(ManifestError::IoError)?;

        Ok(())
    }

    /// Find a document by title
    pub fn document(&self, title: &str) -> Option<&DocumentEntry> {
        self.documents.iter().find(|doc| doc.title == title)
    }
}

/// Errors that can occur when loading or saving a manifest
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ManifestError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::IoError(e) => write!(f, "IO error: {}", e),
            ManifestError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ManifestError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ManifestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_manifest() {
        let toml_content = r#"
keywords = "keywords.toml"

[[document]]
title = "ประมวลกฎหมายอาญา"
paragraphs = "feeds/criminal.jsonl"

[[document]]
title = "ประมวลรัษฎากร"
paragraphs = "feeds/revenue.csv"
newline_placeholder = "<br>"

[document.alignment_overrides]
"ประมวลรัษฎากร" = "center"
"#;

        let manifest: DocumentManifest = toml::from_str(toml_content).unwrap();

        assert_eq!(manifest.keywords, Some(PathBuf::from("keywords.toml")));
        assert_eq!(manifest.documents.len(), 2);
        assert!(manifest.documents[0].alignment_overrides.is_empty());

        let revenue = manifest.document("ประมวลรัษฎากร").unwrap();
        assert_eq!(revenue.paragraphs, PathBuf::from("feeds/revenue.csv"));

        let options = revenue.parser_options();
        assert_eq!(options.newline_placeholder, "<br>");
        assert_eq!(
            options.alignment_overrides.get("ประมวลรัษฎากร"),
            Some(&Alignment::Center)
        );
    }

    #[test]
    fn test_manifest_roundtrip() {
        let mut overrides = IndexMap::new();
        overrides.insert("ประมวลกฎหมายที่ดิน".to_string(), Alignment::Center);

        let manifest = DocumentManifest {
            keywords: None,
            documents: vec![DocumentEntry {
                title: "ประมวลกฎหมายที่ดิน".to_string(),
                paragraphs: PathBuf::from("land.jsonl"),
                newline_placeholder: None,
                alignment_overrides: overrides,
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lawtree.toml");
        manifest.save(&path).unwrap();

        let loaded = DocumentManifest::load(&path).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].title, "ประมวลกฎหมายที่ดิน");
        assert_eq!(
            loaded.documents[0].alignment_overrides.get("ประมวลกฎหมายที่ดิน"),
            Some(&Alignment::Center)
        );
    }

    #[test]
    fn test_default_options_without_overrides() {
        let entry = DocumentEntry {
            title: "ประมวลกฎหมายอาญา".to_string(),
            paragraphs: PathBuf::from("criminal.jsonl"),
            newline_placeholder: None,
            alignment_overrides: IndexMap::new(),
        };
        assert_eq!(entry.parser_options(), ParserOptions::default());
    }
}
