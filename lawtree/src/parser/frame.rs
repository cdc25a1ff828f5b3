//! Open structural units awaiting completion

use crate::law_model::{Node, TitledNode, TokenKind};

/// Level of the synthetic root frame
pub const ROOT_LEVEL: i32 = -1;

/// One open structural unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: TokenKind,
    pub level: i32,
    /// Raw heading key, present for sequential kinds only
    pub key: Option<String>,
    pub content: Node,
}

impl Frame {
    pub fn new(kind: TokenKind, level: i32, key: Option<String>, content: Node) -> Self {
        Self {
            kind,
            level,
            key,
            content,
        }
    }
}

/// Stack of open frames above a synthetic root.
///
/// The root is held apart from the open frames so the stack can never be
/// emptied while parsing.
#[derive(Debug, Clone)]
pub struct FrameStack {
    root: Node,
    open: Vec<Frame>,
}

impl Default for FrameStack {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStack {
    pub fn new() -> Self {
        Self {
            root: Node::Titled(TitledNode::default()),
            open: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.open.push(frame);
    }

    /// Pop the topmost open frame; the root is never popped
    pub fn pop(&mut self) -> Option<Frame> {
        self.open.pop()
    }

    /// Topmost open frame, `None` when only the root is left
    pub fn top(&self) -> Option<&Frame> {
        self.open.last()
    }

    /// Kind of the top frame, `None` for the root
    pub fn top_kind(&self) -> Option<TokenKind> {
        self.top().map(|frame| frame.kind)
    }

    pub fn top_level(&self) -> i32 {
        self.top().map_or(ROOT_LEVEL, |frame| frame.level)
    }

    /// Content of the top frame, or of the root
    pub fn top_content(&self) -> &Node {
        self.top().map_or(&self.root, |frame| &frame.content)
    }

    pub fn top_content_mut(&mut self) -> &mut Node {
        match self.open.last_mut() {
            Some(frame) => &mut frame.content,
            None => &mut self.root,
        }
    }

    /// Open frames from the bottom up, root excluded
    pub fn open_frames(&self) -> &[Frame] {
        &self.open
    }

    /// Number of frames including the root
    pub fn depth(&self) -> usize {
        self.open.len() + 1
    }

    /// Take the content of the topmost remaining frame.
    ///
    /// Normally only the root is left. If folding stopped at another
    /// root-level frame, that frame's content is returned and everything
    /// underneath it is discarded.
    pub fn into_top_content(mut self) -> Node {
        match self.open.pop() {
            Some(frame) => {
                log::warn!(
                    "Concluding at a root-level {} frame; discarding {} frame(s) below it",
                    frame.kind,
                    self.open.len() + 1
                );
                frame.content
            }
            None => self.root,
        }
    }
}
