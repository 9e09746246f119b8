//! Narrow view of a concrete syntax tree.
//!
//! The extractor and renderer only see [`SyntaxNode`]; [`TsNode`] adapts
//! tree-sitter to it.

use tree_sitter::{LanguageError, Node, Parser, Tree};

use super::languages::LanguageConfig;

/// The operations the summarizer needs from a syntax tree node.
pub trait SyntaxNode: Copy {
    fn kind(&self) -> &str;

    fn start_byte(&self) -> usize;

    fn end_byte(&self) -> usize;

    /// Child addressed by a grammar field name such as `name` or `declarator`.
    fn child_by_field(&self, field: &str) -> Option<Self>;

    fn named_children(&self) -> Vec<Self>;

    /// First named child of the given kind.
    fn child_of_kind(&self, kind: &str) -> Option<Self> {
        self.named_children().into_iter().find(|c| c.kind() == kind)
    }

    /// Named descendants whose kind is in `kinds`, in pre-order, at most
    /// `limit` of them. The node itself is not included.
    fn descendants_of_kinds(&self, kinds: &[&str], limit: usize) -> Vec<Self> {
        let mut found = Vec::new();
        if kinds.is_empty() || limit == 0 {
            return found;
        }
        let mut stack: Vec<Self> = self.named_children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if kinds.contains(&node.kind()) {
                found.push(node);
                if found.len() >= limit {
                    break;
                }
            }
            stack.extend(node.named_children().into_iter().rev());
        }
        found
    }

    /// Source text covered by the node, if the range is valid for `source`.
    fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start_byte()..self.end_byte())
    }
}

/// A tree-sitter node seen through [`SyntaxNode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsNode<'t>(pub Node<'t>);

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.0.kind()
    }

    fn start_byte(&self) -> usize {
        self.0.start_byte()
    }

    fn end_byte(&self) -> usize {
        self.0.end_byte()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.0.child_by_field_name(field).map(TsNode)
    }

    fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.0.walk();
        self.0.named_children(&mut cursor).map(TsNode).collect()
    }

    fn descendants_of_kinds(&self, kinds: &[&str], limit: usize) -> Vec<Self> {
        let mut found = Vec::new();
        if kinds.is_empty() || limit == 0 {
            return found;
        }

        let mut cursor = self.0.walk();
        if !cursor.goto_first_child() {
            return found;
        }
        loop {
            let node = cursor.node();
            if node.is_named() && kinds.contains(&node.kind()) {
                found.push(TsNode(node));
                if found.len() >= limit {
                    return found;
                }
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() || cursor.node() == self.0 {
                    return found;
                }
            }
        }
    }
}

/// Source text, its language, and the tree parsed from it (if any).
///
/// Lives only for the summarization of one file.
pub struct ParsedFile<'s> {
    pub source: &'s str,
    pub language: &'s LanguageConfig,
    tree: Option<Tree>,
}

impl<'s> ParsedFile<'s> {
    pub fn parse(
        source: &'s str,
        language: &'s LanguageConfig,
        grammar: &tree_sitter::Language,
    ) -> Result<Self, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(grammar)?;
        // tree-sitter recovers from syntax errors; `None` only means the
        // parser gave up entirely.
        let tree = parser.parse(source, None);
        Ok(Self {
            source,
            language,
            tree,
        })
    }

    pub fn without_tree(source: &'s str, language: &'s LanguageConfig) -> Self {
        Self {
            source,
            language,
            tree: None,
        }
    }

    pub fn root(&self) -> Option<TsNode<'_>> {
        self.tree.as_ref().map(|t| TsNode(t.root_node()))
    }
}
