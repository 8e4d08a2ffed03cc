use std::fmt;

use crate::error::ParseError;
use crate::kind::{Detail, Field, NodeKind};
use crate::lexer::tokenize;
use crate::line_index::{LineCol, LineIndex};
use crate::parser::Parser;
use crate::text::TextRange;
use crate::token::{Token, TokenKind};

/// Index of a node in its [`Tree`]'s arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
    pub detail: Detail,
    /// Children in source order, each tagged with the slot it occupies.
    pub children: Vec<(Field, NodeId)>,
}

/// A parsed file. Owns the source text, the node arena and the tokens.
#[derive(Debug, Clone)]
pub struct Tree {
    source: String,
    nodes: Vec<Node>,
    tokens: Vec<Token>,
    root: NodeId,
    line_index: LineIndex,
}

impl Tree {
    pub fn parse(source: impl Into<String>) -> Result<Tree, ParseError> {
        let source = source.into();
        let tokens = tokenize(&source)?;
        let (nodes, root) = Parser::new(&source, &tokens).parse_program()?;
        let line_index = LineIndex::new(&source);
        Ok(Tree { source, nodes, tokens, root, line_index })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the file uses `import` declarations.
    pub fn is_module(&self) -> bool {
        self.root()
            .fields(Field::Body)
            .any(|stmt| stmt.kind() == NodeKind::ImportDeclaration)
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        self.line_index.line_col(&self.source, offset)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens lying entirely within `range`, trivia included.
    pub fn tokens_in(&self, range: TextRange) -> &[Token] {
        let start = self.tokens.partition_point(|t| t.range.start() < range.start());
        let end = self.tokens.partition_point(|t| t.range.end() <= range.end());
        if start >= end { &[] } else { &self.tokens[start..end] }
    }

    /// First non-trivia token within `range`.
    pub fn first_token(&self, range: TextRange) -> Option<&Token> {
        self.tokens_in(range)
            .iter()
            .find(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
    }

    /// Last non-trivia token within `range`.
    pub fn last_token(&self, range: TextRange) -> Option<&Token> {
        self.tokens_in(range)
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
    }

    /// Last non-trivia token ending at or before `offset`.
    pub fn token_before(&self, offset: usize) -> Option<&Token> {
        let end = self.tokens.partition_point(|t| t.range.end() <= offset);
        self.tokens[..end].iter().rev().find(|t| !t.kind.is_trivia())
    }

    pub fn comments(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.kind.is_comment())
    }

    /// Depth-first walk yielding an enter and an exit event per node.
    pub fn walk(&self) -> Walk<'_> {
        Walk { tree: self, stack: vec![(self.root, false)] }
    }
}

/// A borrowed handle on a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    fn data(&self) -> &'t Node {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    pub fn detail(&self) -> Detail {
        self.data().detail
    }

    pub fn text(&self) -> &'t str {
        let range = self.range();
        &self.tree.source[range.start()..range.end()]
    }

    /// The name of an `Identifier`.
    pub fn name(&self) -> Option<&'t str> {
        (self.kind() == NodeKind::Identifier).then(|| self.text())
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// The slot this node occupies in its parent.
    pub fn parent_field(&self) -> Option<Field> {
        let parent = self.parent()?;
        parent
            .data()
            .children
            .iter()
            .find(|(_, child)| *child == self.id)
            .map(|(field, _)| *field)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        let tree = self.tree;
        self.data().children.iter().map(move |(_, id)| tree.node(*id))
    }

    /// First child in `field`.
    pub fn field(&self, field: Field) -> Option<NodeRef<'t>> {
        self.fields(field).next()
    }

    /// All children in `field`, in source order.
    pub fn fields(&self, field: Field) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(move |(_, id)| tree.node(*id))
    }

    /// Whether `self` is `other` or one of its descendants.
    pub fn is_within(&self, other: NodeRef<'_>) -> bool {
        self.id == other.id || self.ancestors().any(|a| a.id == other.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind(), self.range())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent<'t> {
    Enter(NodeRef<'t>),
    Exit(NodeRef<'t>),
}

/// Iterative pre/post-order traversal, see [`Tree::walk`].
pub struct Walk<'t> {
    tree: &'t Tree,
    stack: Vec<(NodeId, bool)>,
}

impl<'t> Iterator for Walk<'t> {
    type Item = WalkEvent<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, exiting) = self.stack.pop()?;
        let node = self.tree.node(id);
        if exiting {
            return Some(WalkEvent::Exit(node));
        }
        self.stack.push((id, true));
        self.stack
            .extend(node.data().children.iter().rev().map(|(_, child)| (*child, false)));
        Some(WalkEvent::Enter(node))
    }
}
