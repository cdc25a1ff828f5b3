//! Structural token kinds recognized in a legal code

use serde::{Deserialize, Serialize};

/// Kind of structural unit a heading keyword introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// The document title; its content becomes the tree's `body`
    LawTitle,
    /// Right-aligned trailing text of the whole document
    LawFooter,
    /// Explicit body marker
    Body,
    /// Transitory/final provisions block
    Provision,
    /// Trailing text of a provision block
    ProvisionFooter,
    /// Table of contents
    Index,
    /// Free text that precedes the structural body
    BodyHeader,
    Division,
    Subdivision,
    Chapter,
    Section,
    /// Numbered article, the leaf unit of legal text
    Article,
    /// Anonymous untitled text block inside the body
    Extra,
}

impl TokenKind {
    /// All kinds, in declaration order
    pub const ALL: [TokenKind; 13] = [
        TokenKind::LawTitle,
        TokenKind::LawFooter,
        TokenKind::Body,
        TokenKind::Provision,
        TokenKind::ProvisionFooter,
        TokenKind::Index,
        TokenKind::BodyHeader,
        TokenKind::Division,
        TokenKind::Subdivision,
        TokenKind::Chapter,
        TokenKind::Section,
        TokenKind::Article,
        TokenKind::Extra,
    ];

    /// Name used for this kind in taxonomy files, tree output and table columns
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::LawTitle => "law_title",
            TokenKind::LawFooter => "law_footer",
            TokenKind::Body => "body",
            TokenKind::Provision => "provision",
            TokenKind::ProvisionFooter => "provision_footer",
            TokenKind::Index => "index",
            TokenKind::BodyHeader => "body_header",
            TokenKind::Division => "division",
            TokenKind::Subdivision => "subdivision",
            TokenKind::Chapter => "chapter",
            TokenKind::Section => "section",
            TokenKind::Article => "article",
            TokenKind::Extra => "extra",
        }
    }

    /// Look up a kind by its snake_case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Kinds whose next centered paragraph is their title
    pub fn is_titled(self) -> bool {
        matches!(
            self,
            TokenKind::Index
                | TokenKind::Division
                | TokenKind::Subdivision
                | TokenKind::Chapter
                | TokenKind::Section
        )
    }

    /// Kinds that are valid children inside the law body
    pub fn is_body(self) -> bool {
        matches!(
            self,
            TokenKind::Division
                | TokenKind::Subdivision
                | TokenKind::Chapter
                | TokenKind::Section
                | TokenKind::Article
                | TokenKind::Extra
        )
    }

    /// Kinds that only ever accumulate text
    pub fn is_leaf_text(self) -> bool {
        matches!(
            self,
            TokenKind::Article | TokenKind::LawFooter | TokenKind::ProvisionFooter
        )
    }

    /// Kinds stored under a normalized key next to same-kind siblings.
    ///
    /// Everything else is unique within its parent.
    pub fn is_sequential(self) -> bool {
        !matches!(
            self,
            TokenKind::LawTitle | TokenKind::LawFooter | TokenKind::ProvisionFooter
        )
    }

    /// Column name holding the bound title of this kind in the article table
    pub fn name_column(self) -> String {
        format!("{}_name", self.as_str())
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
