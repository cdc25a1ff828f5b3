//! Command-line interface definitions for lawtree

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the lawtree application
#[derive(Parser)]
#[command(name = "lawtree")]
#[command(version)]
#[command(about = "Extract the structure of Thai legal codes", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for lawtree
#[derive(Subcommand)]
pub enum Commands {
    /// Convert one paragraph feed into a JSON tree and a CSV article table
    Convert {
        /// Paragraph feed (.jsonl, .json or .csv)
        #[arg(value_name = "FEED")]
        feed: PathBuf,

        /// Document title, exactly as its centered title paragraph reads
        #[arg(short, long)]
        title: String,

        /// Keyword taxonomy file (.toml or .yaml); defaults to the built-in one
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// Replacement for newlines in the table's text column
        #[arg(short, long)]
        placeholder: Option<String>,

        /// Treat paragraphs with exactly this text as centered (repeatable)
        #[arg(long, value_name = "TEXT")]
        center: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert every document listed in a manifest
    Batch {
        /// Manifest file
        #[arg(value_name = "MANIFEST", default_value = "lawtree.toml")]
        manifest: PathBuf,

        /// Keyword taxonomy file; overrides the manifest's `keywords` entry
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// Only convert the document with this title
        #[arg(long, value_name = "TITLE")]
        only: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the taxonomy's keywords and the table column order
    Columns {
        /// Keyword taxonomy file; defaults to the built-in one
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },
}
