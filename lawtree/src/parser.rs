//! Paragraph classifier and folding state machine
//!
//! Paragraphs are fed one at a time, in document order. Each one either binds
//! the title of the open unit, opens a new unit, or appends text to the open
//! unit. Opening a unit first folds every open unit at the same or a deeper
//! level into its parent, so the stack always nests strictly shallower frames
//! below deeper ones.
//!
//! Assumptions about the input:
//! 1. Headings start with a keyword from the taxonomy.
//! 2. Titled kinds have their title centered in the next paragraph.
//! 3. The law body starts with the document title, centered and untitled.
//! 4. Leaf-text kinds never have a title or children.
//! 5. A centered paragraph inside the body that matches no keyword is an
//!    anonymous `extra` unit.
//! 6. A unit repeating an already folded key is an editorial remark and is
//!    dropped.

mod frame;

pub use frame::{Frame, FrameStack, ROOT_LEVEL};

use crate::keywords::{KeywordEntry, KeywordTaxonomy};
use crate::law_model::{
    flatten_text, normalize_key, raw_key, ArticleTable, LawTree, Node, ParsedLaw, Slot,
    TableRow, TokenKind, ARTICLE_COLUMN, DEFAULT_NEWLINE_PLACEHOLDER, TEXT_COLUMN,
};
use crate::paragraph::{Alignment, Paragraph};
use indexmap::IndexMap;

/// Per-document parsing options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Replacement for newlines in the table's `text` column
    pub newline_placeholder: String,

    /// Alignment to use for paragraphs whose trimmed text matches exactly,
    /// regardless of what the feed declared
    pub alignment_overrides: IndexMap<String, Alignment>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            newline_placeholder: DEFAULT_NEWLINE_PLACEHOLDER.to_string(),
            alignment_overrides: IndexMap::new(),
        }
    }
}

/// Parser state for converting one document's paragraphs into a tree
pub struct LawParser<'a> {
    /// Document title; also acts as the `law_title` heading keyword
    title: String,

    taxonomy: &'a KeywordTaxonomy,

    options: ParserOptions,

    /// Open structural units
    stack: FrameStack,

    /// Article rows collected so far
    table: ArticleTable,
}

impl<'a> LawParser<'a> {
    /// Create a parser with default options
    ///
    /// # Parameters
    /// * `title` - Document title, as it appears in its centered title paragraph
    /// * `taxonomy` - Keyword taxonomy shared by all documents
    pub fn new(title: impl Into<String>, taxonomy: &'a KeywordTaxonomy) -> Self {
        Self::with_options(title, taxonomy, ParserOptions::default())
    }

    /// Create a parser with document-specific options
    pub fn with_options(
        title: impl Into<String>,
        taxonomy: &'a KeywordTaxonomy,
        options: ParserOptions,
    ) -> Self {
        Self {
            title: title.into(),
            taxonomy,
            options,
            stack: FrameStack::new(),
            table: ArticleTable::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Open frames, root included
    pub fn stack(&self) -> &FrameStack {
        &self.stack
    }

    /// Article rows accepted so far
    pub fn table(&self) -> &ArticleTable {
        &self.table
    }

    /// Parse every paragraph of a feed, in order
    pub fn feed<I>(&mut self, paragraphs: I)
    where
        I: IntoIterator<Item = Paragraph>,
    {
        for paragraph in paragraphs {
            self.parse_paragraph(&paragraph.text, paragraph.alignment);
        }
    }

    /// Classify one paragraph and update the stack
    ///
    /// # Parameters
    /// * `text` - Raw paragraph text; blank paragraphs are ignored
    /// * `alignment` - Alignment declared by the source, subject to overrides
    pub fn parse_paragraph(&mut self, text: &str, alignment: Alignment) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let alignment = self
            .options
            .alignment_overrides
            .get(text)
            .copied()
            .unwrap_or(alignment);

        match alignment {
            Alignment::Center => self.parse_centered(text),
            Alignment::Right => self.parse_right_aligned(text),
            Alignment::None => self.parse_unaligned(text),
        }
    }

    /// Centered paragraphs are titles or headings
    fn parse_centered(&mut self, text: &str) {
        let top_kind = self.stack.top_kind();

        // An open titled unit takes the paragraph as its title
        if top_kind.is_some_and(TokenKind::is_titled) && self.stack.top_content().title().is_none()
        {
            self.stack.top_content_mut().titled_mut().title = Some(text.to_string());
            return;
        }

        let entry = self
            .keyword_for(text)
            .or_else(|| top_kind.is_some_and(TokenKind::is_body).then(|| self.taxonomy.extra()));

        match entry {
            Some(entry) => {
                self.fold_to_level(entry.level);
                self.open_heading(entry, text);
            }
            None => self.add_text_to_parent(text),
        }
    }

    /// Right-aligned paragraphs belong to the law footer
    fn parse_right_aligned(&mut self, text: &str) {
        if self.stack.top_kind() == Some(TokenKind::LawFooter) {
            self.add_text_to_parent(text);
            return;
        }

        self.fold_to_level(0);
        let footer = self.taxonomy.law_footer();
        self.stack.push(Frame::new(
            TokenKind::LawFooter,
            footer.level,
            None,
            Node::for_kind(TokenKind::LawFooter, Some(text)),
        ));
    }

    /// Unaligned paragraphs start articles or continue the open unit
    fn parse_unaligned(&mut self, text: &str) {
        match self.parse_article(text) {
            Some(article) => {
                self.fold_to_level(article.level);
                self.stack.push(article);
            }
            None => self.add_text_to_parent(text),
        }
    }

    /// Detect an article heading such as "มาตรา 12 ข้อความ"
    ///
    /// # Returns
    /// * `Some(Frame)` - A new article frame keyed by the first two words
    /// * `None` - Fewer than two words, or the first word is not an article keyword
    pub fn parse_article(&self, text: &str) -> Option<Frame> {
        let mut words = text.split_whitespace();
        let keyword = words.next()?;
        words.next()?;

        let entry = self.lookup(keyword)?;
        if entry.kind != TokenKind::Article {
            return None;
        }

        Some(Frame::new(
            TokenKind::Article,
            entry.level,
            Some(raw_key(text)),
            Node::for_kind(TokenKind::Article, Some(text)),
        ))
    }

    /// Resolve the keyword of a heading paragraph
    fn keyword_for(&self, text: &str) -> Option<KeywordEntry> {
        if text == self.title {
            return Some(self.taxonomy.law_title());
        }
        self.lookup(text.split_whitespace().next()?)
    }

    /// Look up a single word, with the document title aliased to `law_title`
    fn lookup(&self, word: &str) -> Option<KeywordEntry> {
        if word == self.title {
            Some(self.taxonomy.law_title())
        } else {
            self.taxonomy.get(word)
        }
    }

    /// Push a frame for a centered heading
    ///
    /// Leaf-text kinds start with the heading as their first line. So does
    /// `extra`, unlike the other non-leaf kinds: its heading is the only text
    /// an anonymous block has.
    fn open_heading(&mut self, entry: KeywordEntry, text: &str) {
        let kind = entry.kind;
        let key = kind.is_sequential().then(|| raw_key(text));
        let seed = (kind.is_leaf_text() || kind == TokenKind::Extra).then_some(text);

        log::trace!("Opening {} at level {}: {}", kind, entry.level, text);
        self.stack
            .push(Frame::new(kind, entry.level, key, Node::for_kind(kind, seed)));
    }

    /// Fold until the top frame is strictly shallower than `level`
    fn fold_to_level(&mut self, level: i32) {
        while self.stack.top_level() >= level {
            if !self.fold() {
                break;
            }
        }
    }

    /// Pop the top frame and merge its content into the new top
    ///
    /// # Returns
    /// * `true` - A frame was folded
    /// * `false` - Only the root is open; nothing to fold
    fn fold(&mut self) -> bool {
        let Some(top) = self.stack.pop() else {
            return false;
        };
        let kind = top.kind;

        let Some(raw) = top.key else {
            self.stack
                .top_content_mut()
                .titled_mut()
                .set_unique(Slot::of(kind), top.content);
            return true;
        };

        let key = normalize_key(&raw);
        let article_text = (kind == TokenKind::Article)
            .then(|| top.content.text().unwrap_or_default().to_string());

        let inserted = self
            .stack
            .top_content_mut()
            .titled_mut()
            .insert_sequential(kind, key.clone(), top.content);

        if !inserted {
            log::debug!("Dropping repeated {} '{}' ({})", kind, key, raw);
        } else if let Some(text) = article_text {
            self.add_article_to_table(&key, &text);
        }
        true
    }

    /// Append a line to the top frame's text
    fn add_text_to_parent(&mut self, text: &str) {
        self.stack.top_content_mut().append_line(text);
    }

    /// Build the ancestor part of a table row from the open frames
    ///
    /// # Returns
    /// * `Some(TableRow)` - Keys and titles of every frame above `law_title`
    /// * `None` - No `law_title` frame is open
    fn ancestor_row(&self) -> Option<TableRow> {
        let mut frames = self
            .stack
            .open_frames()
            .iter()
            .skip_while(|frame| frame.kind != TokenKind::LawTitle);
        frames.next()?;

        let mut row = TableRow::new();
        for frame in frames {
            if let Some(raw) = &frame.key {
                row.set(frame.kind.as_str(), normalize_key(raw));
            }
            if let Some(title) = frame.content.title() {
                row.set(frame.kind.name_column(), title);
            }
        }
        Some(row)
    }

    /// Record a freshly folded article in the table
    fn add_article_to_table(&mut self, key: &str, text: &str) {
        let Some(mut row) = self.ancestor_row() else {
            log::warn!("Article '{}' completed outside the law body; no table row", key);
            return;
        };

        row.set(ARTICLE_COLUMN, key);
        row.set(
            TEXT_COLUMN,
            flatten_text(text, &self.options.newline_placeholder),
        );
        self.table.push(row);
    }

    /// Fold every open frame and return the finished tree and table
    pub fn conclude(mut self) -> ParsedLaw {
        while self.stack.top_level() != ROOT_LEVEL {
            if !self.fold() {
                break;
            }
        }

        let content = self.stack.into_top_content().into_titled();
        log::debug!(
            "Concluded '{}' with {} table rows",
            self.title,
            self.table.len()
        );

        ParsedLaw {
            tree: LawTree {
                title: self.title,
                content,
            },
            table: self.table.into_ordered(self.taxonomy),
        }
    }
}
