use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The export contained no top-level block to use as the document root.
    NoRootBlock,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoRootBlock => {
                write!(f, "no root block: the layout has no entries in data.blocks")
            }
        }
    }
}

impl std::error::Error for RenderError {}
