//! Output model of a parsed legal code
//!
//! This module defines the nested tree produced by folding structural units
//! into their parents and the flat article table built alongside it.

use serde::Serialize;

// Submodules
mod heading_key;
mod node;
mod table;
mod token;

// Re-export public types
pub use heading_key::{article_number, normalize_key, raw_key};
pub use node::{Child, Node, SequentialCollection, Slot, TextNode, TitledNode};
pub use table::{
    column_order, flatten_text, ArticleTable, OrderedTable, TableRow, ARTICLE_COLUMN,
    DEFAULT_NEWLINE_PLACEHOLDER, TEXT_COLUMN,
};
pub use token::TokenKind;

/// Finished tree of one document
///
/// Serializes as `{"title": ..., "body": {...}, ...}`: the document title
/// followed by everything folded into the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LawTree {
    /// Document title supplied when parsing started
    pub title: String,

    /// Content folded into the root frame
    #[serde(flatten)]
    pub content: TitledNode,
}

impl LawTree {
    /// The folded `law_title` content, if the title heading was seen
    pub fn body(&self) -> Option<&Node> {
        match self.content.children.get(&Slot::Body)? {
            Child::Unique(node) => Some(node),
            Child::Sequence(_) => None,
        }
    }

    /// Render the tree as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of parsing one document
#[derive(Debug, Clone)]
pub struct ParsedLaw {
    pub tree: LawTree,
    pub table: OrderedTable,
}
