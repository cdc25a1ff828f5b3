//! Tree node payloads
//!
//! A frame's content is one of two shapes, chosen by its [`TokenKind`]:
//! titled nodes that may carry a title, free text and children, and text
//! nodes that only accumulate lines. Children live in slots keyed by kind;
//! a slot holds either a single unique node or a collection of same-kind
//! siblings keyed by their normalized heading key.

use super::token::TokenKind;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Content of one structural unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Node that can hold a title, text and children
    Titled(TitledNode),
    /// Node that only holds accumulated text
    Text(TextNode),
}

/// Node that can hold a title, free text and nested children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitledNode {
    /// Title bound from the centered paragraph that followed the heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Newline-terminated text lines that matched no heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child slots in insertion order
    #[serde(flatten)]
    pub children: IndexMap<Slot, Child>,
}

/// Leaf node holding only newline-terminated text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub text: String,
}

/// Where a child is stored inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The folded `law_title` content
    Body,
    /// Children of the given kind
    Kind(TokenKind),
}

impl Slot {
    /// Slot a folded unit of `kind` is stored in.
    ///
    /// `law_title` content and `body` units share the `body` slot.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::LawTitle | TokenKind::Body => Slot::Body,
            kind => Slot::Kind(kind),
        }
    }

    /// Map `Kind(Body)` onto `Body` so each output name has one slot
    pub fn canonical(self) -> Self {
        match self {
            Slot::Kind(TokenKind::Body) => Slot::Body,
            slot => slot,
        }
    }

    /// Output name of the slot
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Body => "body",
            Slot::Kind(kind) => kind.as_str(),
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Content of a child slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Child {
    /// Only one instance is expected per parent; a later one replaces it
    Unique(Node),
    /// Same-kind siblings keyed by normalized heading key
    Sequence(SequentialCollection),
}

/// Same-kind siblings in document order, first write wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SequentialCollection {
    by_key: IndexMap<String, Node>,
}

impl SequentialCollection {
    /// Insert `node` under `key` unless the key is already taken
    ///
    /// # Returns
    /// * `true` - The node was stored
    /// * `false` - A sibling with the same key exists; `node` was discarded
    pub fn insert_new(&mut self, key: String, node: Node) -> bool {
        if self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(key, node);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.by_key.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl Node {
    /// Create the empty payload for a freshly opened unit of `kind`
    ///
    /// # Parameters
    /// * `kind` - Kind of the unit
    /// * `seed` - Optional first text line (stored newline-terminated)
    pub fn for_kind(kind: TokenKind, seed: Option<&str>) -> Self {
        let text = seed.map(|line| format!("{line}\n"));
        if kind.is_leaf_text() {
            Node::Text(TextNode {
                text: text.unwrap_or_default(),
            })
        } else {
            Node::Titled(TitledNode {
                text,
                ..TitledNode::default()
            })
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Node::Titled(node) => node.title.as_deref(),
            Node::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Titled(node) => node.text.as_deref(),
            Node::Text(node) => Some(&node.text),
        }
    }

    /// Append one line of text, terminated by a newline
    pub fn append_line(&mut self, line: &str) {
        let text = match self {
            Node::Titled(node) => node.text.get_or_insert_with(String::new),
            Node::Text(node) => &mut node.text,
        };
        text.push_str(line);
        text.push('\n');
    }

    /// Access the node as a titled node, promoting a text node if needed.
    ///
    /// Promotion keeps the accumulated text. It only happens when a taxonomy
    /// places some kind below a leaf-text kind.
    pub fn titled_mut(&mut self) -> &mut TitledNode {
        if let Node::Text(node) = self {
            log::warn!("Promoting text node to hold children: {:?}", node.text);
            let text = std::mem::take(&mut node.text);
            *self = Node::Titled(TitledNode {
                text: Some(text),
                ..TitledNode::default()
            });
        }
        match self {
            Node::Titled(node) => node,
            Node::Text(_) => unreachable!("text node was promoted above"),
        }
    }

    /// Convert into a titled node, keeping any accumulated text
    pub fn into_titled(self) -> TitledNode {
        match self {
            Node::Titled(node) => node,
            Node::Text(node) => TitledNode {
                text: Some(node.text),
                ..TitledNode::default()
            },
        }
    }

    /// Look up a child slot (titled nodes only)
    pub fn child(&self, slot: Slot) -> Option<&Child> {
        match self {
            Node::Titled(node) => node.children.get(&slot.canonical()),
            Node::Text(_) => None,
        }
    }

    /// Look up a keyed sibling of `kind` under this node
    pub fn keyed_child(&self, kind: TokenKind, key: &str) -> Option<&Node> {
        match self.child(Slot::of(kind))? {
            Child::Sequence(collection) => collection.get(key),
            Child::Unique(_) => None,
        }
    }
}

impl TitledNode {
    /// Store a unique child, replacing whatever the slot held before
    pub fn set_unique(&mut self, slot: Slot, node: Node) {
        let slot = slot.canonical();
        if let Some(Child::Sequence(collection)) = self.children.get(&slot) {
            log::warn!(
                "Unique '{}' child replaces {} keyed sibling(s)",
                slot.as_str(),
                collection.len()
            );
        }
        self.children.insert(slot, Child::Unique(node));
    }

    /// Store a keyed child of `kind`, keeping an existing sibling with the same key
    ///
    /// A unique child already holding the slot is kept as well.
    ///
    /// # Returns
    /// * `true` - The node was stored
    /// * `false` - The key or the whole slot was taken and `node` was discarded
    pub fn insert_sequential(&mut self, kind: TokenKind, key: String, node: Node) -> bool {
        let slot = Slot::of(kind);
        let collection = self
            .children
            .entry(slot)
            .or_insert_with(|| Child::Sequence(SequentialCollection::default()));

        match collection {
            Child::Sequence(collection) => collection.insert_new(key, node),
            Child::Unique(_) => {
                log::warn!(
                    "Dropping {kind} '{key}': slot '{}' already holds a unique child",
                    slot.as_str()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_kinds_get_text_nodes() {
        let article = Node::for_kind(TokenKind::Article, Some("มาตรา 1 ข้อความ"));
        assert_eq!(article.text(), Some("มาตรา 1 ข้อความ\n"));
        assert!(matches!(article, Node::Text(_)));

        let chapter = Node::for_kind(TokenKind::Chapter, None);
        assert!(matches!(chapter, Node::Titled(_)));
        assert_eq!(chapter.text(), None);
    }

    #[test]
    fn test_append_line_creates_text() {
        let mut node = Node::for_kind(TokenKind::Division, None);
        node.append_line("first");
        node.append_line("second");
        assert_eq!(node.text(), Some("first\nsecond\n"));
    }

    #[test]
    fn test_first_keyed_sibling_wins() {
        let mut parent = TitledNode::default();
        assert!(parent.insert_sequential(
            TokenKind::Article,
            "1".to_string(),
            Node::for_kind(TokenKind::Article, Some("first")),
        ));
        assert!(!parent.insert_sequential(
            TokenKind::Article,
            "1".to_string(),
            Node::for_kind(TokenKind::Article, Some("remark")),
        ));

        let parent = Node::Titled(parent);
        let kept = parent.keyed_child(TokenKind::Article, "1").unwrap();
        assert_eq!(kept.text(), Some("first\n"));
    }

    #[test]
    fn test_promotion_keeps_text() {
        let mut node = Node::for_kind(TokenKind::LawFooter, Some("footer"));
        node.titled_mut()
            .set_unique(Slot::Kind(TokenKind::Extra), Node::for_kind(TokenKind::Extra, None));
        assert_eq!(node.text(), Some("footer\n"));
        assert!(node.child(Slot::Kind(TokenKind::Extra)).is_some());
    }

    #[test]
    fn test_body_kind_shares_the_body_slot() {
        // Arrange: law_title content already folded into the root
        let mut root = TitledNode::default();
        root.set_unique(Slot::Body, Node::for_kind(TokenKind::LawTitle, Some("คำปรารภ")));

        // Act
        let inserted = root.insert_sequential(
            TokenKind::Body,
            "บท".to_string(),
            Node::for_kind(TokenKind::Body, None),
        );

        // Assert: one "body" key, still holding the law_title content
        assert!(!inserted);
        assert_eq!(root.children.len(), 1);
        let json = serde_json::to_string(&Node::Titled(root)).unwrap();
        assert_eq!(json.matches("\"body\"").count(), 1);
        assert!(json.contains("คำปรารภ"));
    }

    #[test]
    fn test_kind_body_slot_is_canonical() {
        assert_eq!(Slot::of(TokenKind::LawTitle), Slot::Body);
        assert_eq!(Slot::Kind(TokenKind::Body).canonical(), Slot::Body);

        let mut root = TitledNode::default();
        root.set_unique(Slot::Kind(TokenKind::Body), Node::for_kind(TokenKind::Body, None));
        root.set_unique(Slot::Body, Node::for_kind(TokenKind::LawTitle, None));
        assert_eq!(root.children.len(), 1);
        assert!(Node::Titled(root).child(Slot::Kind(TokenKind::Body)).is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let mut division = TitledNode {
            title: Some("บทบัญญัติทั่วไป".to_string()),
            ..TitledNode::default()
        };
        division.insert_sequential(
            TokenKind::Article,
            "1".to_string(),
            Node::for_kind(TokenKind::Article, Some("มาตรา 1")),
        );
        let mut body = TitledNode::default();
        body.insert_sequential(TokenKind::Division, "1".to_string(), Node::Titled(division));

        let value = serde_json::to_value(Node::Titled(body)).unwrap();
        assert_eq!(
            value,
            json!({
                "division": {
                    "1": {
                        "title": "บทบัญญัติทั่วไป",
                        "article": { "1": { "text": "มาตรา 1\n" } }
                    }
                }
            })
        );
    }
}
