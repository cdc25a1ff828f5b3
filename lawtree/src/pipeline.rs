//! Document conversion pipeline
//!
//! Converting a document runs in two stages:
//! 1. **Parsing**: load the paragraph feed and fold it into a tree and table
//! 2. **Export**: write the tree as `<title>.json` and the table as `<title>.csv`
//!
//! A manifest runs both stages for each of its documents. Every document owns
//! its parser, so documents are converted in parallel when the `parallel`
//! feature is enabled.

use crate::keywords::{KeywordTaxonomy, TaxonomyError};
use crate::law_model::ParsedLaw;
use crate::manifest::{DocumentEntry, DocumentManifest, ManifestError};
use crate::paragraph::{load_paragraphs, FeedError};
use crate::parser::{LawParser, ParserOptions};
use itertools::Itertools;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stage 1: Parse one document's paragraph feed
///
/// # Parameters
/// * `title` - Document title, exactly as its centered title paragraph reads
/// * `feed` - Path to the paragraph feed (`.jsonl`, `.json` or `.csv`)
/// * `taxonomy` - Keyword taxonomy
/// * `options` - Per-document parser options
///
/// # Returns
/// * `Ok(ParsedLaw)` - Finished tree and ordered article table
/// * `Err(ConvertError)` - Error loading the feed
pub fn convert_document(
    title: &str,
    feed: &Path,
    taxonomy: &KeywordTaxonomy,
    options: ParserOptions,
) -> Result<ParsedLaw, ConvertError> {
    let paragraphs = load_paragraphs(feed)?;
    log::info!(
        "Parsing '{}' ({} paragraphs from {})",
        title,
        paragraphs.len(),
        feed.display()
    );

    let mut parser = LawParser::with_options(title, taxonomy, options);
    parser.feed(paragraphs);
    Ok(parser.conclude())
}

/// Files written for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Stage 2: Write the tree and table of a parsed document
///
/// # Parameters
/// * `parsed` - Result of [`convert_document`]
/// * `out_dir` - Output directory, created if missing
///
/// # Returns
/// * `Ok(OutputFiles)` - Paths of the JSON tree and the CSV table
/// * `Err(ConvertError)` - Error creating the directory or writing either file
pub fn write_outputs(parsed: &ParsedLaw, out_dir: &Path) -> Result<OutputFiles, ConvertError> {
    fs::create_dir_all(out_dir).map_err(|e| ConvertError::IoError(out_dir.to_path_buf(), e))?;

    let stem = output_stem(&parsed.tree.title);
    let files = OutputFiles {
        json: out_dir.join(format!("{stem}.json")),
        csv: out_dir.join(format!("{stem}.csv")),
    };

    let json = parsed.tree.to_json_pretty()?;
    fs::write(&files.json, json).map_err(|e| ConvertError::IoError(files.json.clone(), e))?;

    let file =
        fs::File::create(&files.csv).map_err(|e| ConvertError::IoError(files.csv.clone(), e))?;
    parsed
        .table
        .write_csv(BufWriter::new(file))
        .map_err(|e| ConvertError::CsvError(files.csv.clone(), e))?;

    log::info!(
        "Wrote {} and {}",
        files.json.display(),
        files.csv.display()
    );
    Ok(files)
}

/// File stem for a document's outputs; path separators become underscores
pub fn output_stem(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// Outcome of converting one manifest document
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub title: String,
    pub rows: usize,
    pub files: OutputFiles,
}

/// Pick the taxonomy for a batch run
///
/// # Parameters
/// * `explicit` - Taxonomy path given on the command line; takes precedence
/// * `manifest` - Manifest whose `keywords` entry is used otherwise
/// * `base_dir` - Directory the manifest's relative paths resolve against
///
/// # Returns
/// The loaded taxonomy, or the built-in one when neither source names a file
pub fn resolve_taxonomy(
    explicit: Option<&Path>,
    manifest: &DocumentManifest,
    base_dir: &Path,
) -> Result<KeywordTaxonomy, TaxonomyError> {
    match (explicit, &manifest.keywords) {
        (Some(path), _) => KeywordTaxonomy::load(path),
        (None, Some(relative)) => KeywordTaxonomy::load(base_dir.join(relative)),
        (None, None) => KeywordTaxonomy::builtin(),
    }
}

/// Convert every document of a manifest
///
/// # Parameters
/// * `manifest` - Documents to convert
/// * `base_dir` - Directory the manifest's feed paths resolve against
/// * `taxonomy` - Keyword taxonomy shared by all documents
/// * `out_dir` - Output directory for every document
/// * `only` - Restrict the run to the document with this title
///
/// # Returns
/// * `Ok(Vec<ConvertReport>)` - One report per converted document, in manifest order
/// * `Err(ConvertError)` - `only` names no document, two documents would write
///   the same output files, or a document failed
pub fn run_manifest(
    manifest: &DocumentManifest,
    base_dir: &Path,
    taxonomy: &KeywordTaxonomy,
    out_dir: &Path,
    only: Option<&str>,
) -> Result<Vec<ConvertReport>, ConvertError> {
    let documents: Vec<&DocumentEntry> = match only {
        Some(title) => vec![manifest
            .document(title)
            .ok_or_else(|| ConvertError::UnknownDocument(title.to_string()))?],
        None => manifest.documents.iter().collect(),
    };

    if documents.is_empty() {
        log::warn!("Manifest lists no documents");
    }

    if let Some(stem) = documents
        .iter()
        .map(|doc| output_stem(&doc.title))
        .duplicates()
        .next()
    {
        return Err(ConvertError::DuplicateOutput(stem));
    }

    #[cfg(feature = "parallel")]
    let reports: Result<Vec<_>, _> = documents
        .par_iter()
        .map(|doc| run_document(doc, base_dir, taxonomy, out_dir))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports: Result<Vec<_>, _> = documents
        .iter()
        .map(|doc| run_document(doc, base_dir, taxonomy, out_dir))
        .collect();

    reports
}

/// Load a manifest file and convert its documents
///
/// Feed and taxonomy paths in the manifest resolve against its directory.
pub fn run_manifest_file(
    manifest_path: &Path,
    keywords: Option<&Path>,
    out_dir: &Path,
    only: Option<&str>,
) -> Result<Vec<ConvertReport>, ConvertError> {
    let manifest = DocumentManifest::load(manifest_path)
        .map_err(|e| ConvertError::ManifestError(manifest_path.to_path_buf(), e))?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let taxonomy = resolve_taxonomy(keywords, &manifest, base_dir)?;

    run_manifest(&manifest, base_dir, &taxonomy, out_dir, only)
}

fn run_document(
    doc: &DocumentEntry,
    base_dir: &Path,
    taxonomy: &KeywordTaxonomy,
    out_dir: &Path,
) -> Result<ConvertReport, ConvertError> {
    let feed = base_dir.join(&doc.paragraphs);
    let parsed = convert_document(&doc.title, &feed, taxonomy, doc.parser_options())?;
    let files = write_outputs(&parsed, out_dir)?;

    Ok(ConvertReport {
        title: doc.title.clone(),
        rows: parsed.table.len(),
        files,
    })
}

/// Errors that can occur while converting documents
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    FeedError(#[from] FeedError),

    #[error(transparent)]
    TaxonomyError(#[from] TaxonomyError),

    #[error("Failed to load manifest {path}: {source}", path = .0.display(), source = .1)]
    ManifestError(PathBuf, #[source] ManifestError),

    #[error("No document titled '{0}' in the manifest")]
    UnknownDocument(String),

    #[error("Several documents would be written to '{0}.json' and '{0}.csv'")]
    DuplicateOutput(String),

    #[error("IO error writing {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error writing {path}: {source}", path = .0.display(), source = .1)]
    CsvError(PathBuf, #[source] csv::Error),
}
