//! lawtree - structure extraction for Thai legal codes
//!
//! Converts the ordered paragraphs of a legal code into a nested tree of its
//! structural units (divisions, chapters, sections, articles, footers) and a
//! flat table with one row per article.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod keywords;
pub mod law_model;
pub mod manifest;
pub mod paragraph;
pub mod parser;
pub mod pipeline;

pub use keywords::{KeywordEntry, KeywordTaxonomy, TaxonomyError};
pub use law_model::{LawTree, OrderedTable, ParsedLaw, TokenKind};
pub use paragraph::{Alignment, Paragraph};
pub use parser::{LawParser, ParserOptions};
