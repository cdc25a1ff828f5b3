//! lawtree - structure extraction for Thai legal codes
//!
//! A CLI tool that converts the paragraphs of a legal code into a nested
//! JSON tree and a CSV table with one row per article.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use lawtree::law_model::{column_order, TokenKind, TEXT_COLUMN};
use lawtree::pipeline;
use lawtree::{Alignment, KeywordTaxonomy, ParserOptions};
use std::path::Path;

/// Main entry point for the lawtree CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            feed,
            title,
            keywords,
            out,
            placeholder,
            center,
            verbose,
        } => {
            init_logging(verbose);
            let options = convert_options(placeholder, center);
            handle_convert_command(&feed, &title, keywords.as_deref(), &out, options)?;
        }

        Commands::Batch {
            manifest,
            keywords,
            out,
            only,
            verbose,
        } => {
            init_logging(verbose);
            handle_batch_command(&manifest, keywords.as_deref(), &out, only.as_deref())?;
        }

        Commands::Columns { keywords } => {
            handle_columns_command(keywords.as_deref())?;
        }
    }

    Ok(())
}

/// Initialize logging; `--verbose` raises the level to info
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn convert_options(placeholder: Option<String>, center: Vec<String>) -> ParserOptions {
    let mut options = ParserOptions::default();
    if let Some(placeholder) = placeholder {
        options.newline_placeholder = placeholder;
    }
    options.alignment_overrides = center
        .into_iter()
        .map(|text| (text, Alignment::Center))
        .collect();
    options
}

fn load_taxonomy(keywords: Option<&Path>) -> Result<KeywordTaxonomy> {
    match keywords {
        Some(path) => KeywordTaxonomy::load(path)
            .with_context(|| format!("Failed to load keyword taxonomy {}", path.display())),
        None => KeywordTaxonomy::builtin().context("Built-in keyword taxonomy is invalid"),
    }
}

/// Handle the convert command
fn handle_convert_command(
    feed: &Path,
    title: &str,
    keywords: Option<&Path>,
    out: &Path,
    options: ParserOptions,
) -> Result<()> {
    let taxonomy = load_taxonomy(keywords)?;

    println!("Converting '{}'...", title);
    println!("Feed: {}", feed.display());

    let parsed = pipeline::convert_document(title, feed, &taxonomy, options)
        .with_context(|| format!("Failed to convert {}", feed.display()))?;
    let files = pipeline::write_outputs(&parsed, out)
        .with_context(|| format!("Failed to write outputs to {}", out.display()))?;

    println!("✓ {} articles", parsed.table.len());
    println!("✓ Tree written to {}", files.json.display());
    println!("✓ Table written to {}", files.csv.display());

    Ok(())
}

/// Handle the batch command
fn handle_batch_command(
    manifest: &Path,
    keywords: Option<&Path>,
    out: &Path,
    only: Option<&str>,
) -> Result<()> {
    println!("Converting documents from {}...", manifest.display());

    let reports = pipeline::run_manifest_file(manifest, keywords, out, only)
        .with_context(|| format!("Batch conversion of {} failed", manifest.display()))?;

    for report in &reports {
        println!(
            "✓ {} ({} articles) -> {}",
            report.title,
            report.rows,
            report.files.json.display()
        );
    }
    println!("\nConverted {} documents into {}", reports.len(), out.display());

    Ok(())
}

/// Handle the columns command
fn handle_columns_command(keywords: Option<&Path>) -> Result<()> {
    let taxonomy = load_taxonomy(keywords)?;

    println!("Keywords:");
    for (word, entry) in taxonomy.entries() {
        println!("  {:<28} {:<18} level {}", word, entry.kind.as_str(), entry.level);
    }

    // Every kind that can appear as a column, in table order
    let names: Vec<String> = TokenKind::ALL
        .iter()
        .filter(|kind| kind.is_sequential())
        .flat_map(|kind| [kind.as_str().to_string(), kind.name_column()])
        .chain([TEXT_COLUMN.to_string()])
        .collect();
    let present: Vec<&str> = names.iter().map(String::as_str).collect();
    let columns = column_order(&present, &taxonomy);

    println!("\nTable columns:");
    println!("  {}", columns.join(", "));

    Ok(())
}
