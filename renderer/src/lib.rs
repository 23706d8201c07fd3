pub mod attributes;
pub mod compiler;
pub mod context;
pub mod error;
pub mod style;

pub use compiler::DocumentCompiler;
pub use context::CompileContext;
pub use error::RenderError;

use blocks::Layout;
use blocks::metadata::LiveMetadata;

/// Compile a parsed layout into a single static HTML document.
///
/// The first top-level block is the document root; the rest are ignored.
pub fn compile_layout(layout: &Layout, metadata: &LiveMetadata) -> Result<String, RenderError> {
    let root = layout.root().ok_or(RenderError::NoRootBlock)?;
    Ok(DocumentCompiler::new(metadata).compile_document(root))
}
