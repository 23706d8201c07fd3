pub mod metadata;
pub mod node;
pub mod parser;
pub mod style;

use crate::node::BlockNode;
use crate::parser::ParseError;

/// A parsed page-builder export.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Top-level blocks from `data.blocks`. The first one is the document root.
    pub blocks: Vec<BlockNode>,
    /// Warnings collected while reading the block tree.
    pub diagnostics: Vec<ParseError>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Layout {
    /// The block rendered as `<html>`, if the export has any blocks at all.
    pub fn root(&self) -> Option<&BlockNode> {
        self.blocks.first()
    }
}
