//! Keyword taxonomy
//!
//! Maps the leading word of a heading paragraph to the structural kind it
//! opens and that kind's nesting level. The taxonomy is loaded once and passed
//! by reference to every parser; it never changes while parsing.

use crate::law_model::TokenKind;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in taxonomy for Thai legal codes
const DEFAULT_TAXONOMY: &str = include_str!("keywords/default.toml");

/// Kinds the parser looks up by name; a taxonomy must define all of them
const REQUIRED_KINDS: [TokenKind; 3] =
    [TokenKind::LawTitle, TokenKind::LawFooter, TokenKind::Extra];

/// What a heading keyword opens and how deep it nests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Structural kind opened by the keyword
    #[serde(alias = "token")]
    pub kind: TokenKind,

    /// Nesting level; the synthetic root sits at -1
    pub level: i32,
}

impl KeywordEntry {
    pub fn new(kind: TokenKind, level: i32) -> Self {
        Self { kind, level }
    }
}

/// Validated keyword taxonomy
#[derive(Debug, Clone)]
pub struct KeywordTaxonomy {
    entries: IndexMap<String, KeywordEntry>,
    law_title: KeywordEntry,
    law_footer: KeywordEntry,
    extra: KeywordEntry,
}

impl KeywordTaxonomy {
    /// Build a taxonomy from keyword entries
    ///
    /// # Parameters
    /// * `entries` - Pairs of leading word and entry; later duplicates replace earlier ones
    ///
    /// # Returns
    /// * `Ok(KeywordTaxonomy)` - The taxonomy is non-empty and defines every required entry
    /// * `Err(TaxonomyError)` - The taxonomy is empty or misses a required entry
    pub fn new<I, K>(entries: I) -> Result<Self, TaxonomyError>
    where
        I: IntoIterator<Item = (K, KeywordEntry)>,
        K: Into<String>,
    {
        let entries: IndexMap<String, KeywordEntry> = entries
            .into_iter()
            .map(|(word, entry)| (word.into(), entry))
            .collect();

        if entries.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let required = |kind: TokenKind| {
            entries
                .get(kind.as_str())
                .copied()
                .ok_or(TaxonomyError::MissingEntry(kind))
        };
        let law_title = required(TokenKind::LawTitle)?;
        let law_footer = required(TokenKind::LawFooter)?;
        let extra = required(TokenKind::Extra)?;

        for kind in REQUIRED_KINDS {
            if let Some(entry) = entries.get(kind.as_str()) {
                if entry.kind != kind {
                    log::warn!(
                        "Taxonomy entry '{}' maps to kind '{}'",
                        kind.as_str(),
                        entry.kind
                    );
                }
            }
        }

        Ok(Self {
            entries,
            law_title,
            law_footer,
            extra,
        })
    }

    /// The taxonomy compiled into the binary
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::from_toml_str(DEFAULT_TAXONOMY)
    }

    /// Load a taxonomy file, choosing the format from its extension
    ///
    /// # Parameters
    /// * `path` - Path to a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Returns
    /// * `Ok(KeywordTaxonomy)` - Successfully loaded and validated taxonomy
    /// * `Err(TaxonomyError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| TaxonomyError::Io(path.to_path_buf(), e))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(TaxonomyError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse a taxonomy from TOML, one `word = { kind, level }` pair per keyword
    pub fn from_toml_str(content: &str) -> Result<Self, TaxonomyError> {
        let entries: IndexMap<String, KeywordEntry> = toml::from_str(content)?;
        Self::new(entries)
    }

    /// Parse a taxonomy from YAML, one `word: { kind, level }` mapping per keyword
    pub fn from_yaml_str(content: &str) -> Result<Self, TaxonomyError> {
        let entries: IndexMap<String, KeywordEntry> = serde_yaml::from_str(content)?;
        Self::new(entries)
    }

    /// Look up a heading's leading word
    pub fn get(&self, word: &str) -> Option<KeywordEntry> {
        self.entries.get(word).copied()
    }

    pub fn law_title(&self) -> KeywordEntry {
        self.law_title
    }

    pub fn law_footer(&self) -> KeywordEntry {
        self.law_footer
    }

    pub fn extra(&self) -> KeywordEntry {
        self.extra
    }

    /// All entries in definition order
    pub fn entries(&self) -> impl Iterator<Item = (&str, KeywordEntry)> {
        self.entries.iter().map(|(word, entry)| (word.as_str(), *entry))
    }

    /// Distinct kinds, shallowest level first.
    ///
    /// Several keywords may share a kind; each kind is reported at its first
    /// occurrence in level order. Ties keep definition order.
    pub fn kinds_by_level(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.entries
            .values()
            .sorted_by_key(|entry| entry.level)
            .map(|entry| entry.kind)
            .unique()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Errors that can occur when loading a keyword taxonomy
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Unsupported taxonomy format: {path} (expected .toml, .yaml or .yml)", path = .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Keyword taxonomy is empty")]
    Empty,

    #[error("Keyword taxonomy has no '{0}' entry")]
    MissingEntry(TokenKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_taxonomy_loads() {
        let taxonomy = KeywordTaxonomy::builtin().unwrap();
        assert_eq!(
            taxonomy.get("มาตรา"),
            Some(KeywordEntry::new(TokenKind::Article, 6))
        );
        assert_eq!(taxonomy.law_title().kind, TokenKind::LawTitle);
        assert!(taxonomy.get("ไม่มี").is_none());
    }

    #[test]
    fn test_kinds_by_level_are_unique_and_ordered() {
        let taxonomy = KeywordTaxonomy::builtin().unwrap();
        let kinds: Vec<TokenKind> = taxonomy.kinds_by_level().collect();

        let division = kinds.iter().position(|k| *k == TokenKind::Division).unwrap();
        let chapter = kinds.iter().position(|k| *k == TokenKind::Chapter).unwrap();
        let article = kinds.iter().position(|k| *k == TokenKind::Article).unwrap();
        assert!(division < chapter && chapter < article);
        assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Division).count(), 1);
    }

    #[test]
    fn test_yaml_accepts_token_field() {
        let yaml = r#"
law_title:
  token: law_title
  level: 0
law_footer:
  token: law_footer
  level: 0
extra:
  token: extra
  level: 4
"มาตรา":
  token: article
  level: 4
"#;
        let taxonomy = KeywordTaxonomy::from_yaml_str(yaml).unwrap();
        assert_eq!(taxonomy.get("มาตรา").unwrap().kind, TokenKind::Article);
        assert_eq!(taxonomy.len(), 4);
    }

    #[test]
    fn test_empty_taxonomy_is_fatal() {
        let result = KeywordTaxonomy::new(Vec::<(String, KeywordEntry)>::new());
        assert!(matches!(result, Err(TaxonomyError::Empty)));
    }

    #[test]
    fn test_missing_required_entry() {
        let result = KeywordTaxonomy::new([
            ("law_title", KeywordEntry::new(TokenKind::LawTitle, 0)),
            ("extra", KeywordEntry::new(TokenKind::Extra, 3)),
        ]);
        assert!(matches!(
            result,
            Err(TaxonomyError::MissingEntry(TokenKind::LawFooter))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(&path, "{}").unwrap();

        let result = KeywordTaxonomy::load(&path);
        assert!(matches!(result, Err(TaxonomyError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.toml");
        std::fs::write(
            &path,
            r#"
law_title = { kind = "law_title", level = 0 }
law_footer = { kind = "law_footer", level = 0 }
extra = { kind = "extra", level = 3 }
"ภาค" = { kind = "division", level = 1 }
"#,
        )
        .unwrap();

        let taxonomy = KeywordTaxonomy::load(&path).unwrap();
        assert_eq!(taxonomy.get("ภาค").unwrap().level, 1);
    }
}
