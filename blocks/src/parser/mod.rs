pub mod error;
mod tree;

pub use error::ParseError;

use serde::Deserialize;
use serde_json::Value;

use crate::Layout;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse a builder export into a Layout.
    ///
    /// Only malformed JSON and a non-object document are fatal. Everything
    /// else about the tree degrades to defaults and is reported as a warning.
    pub fn parse(&self) -> Result<Layout, Vec<ParseError>> {
        let document = self
            .read_document()
            .map_err(|e| vec![self.syntax_error(&e)])?;

        let Value::Object(top) = &document else {
            return Err(vec![ParseError::error(
                "layout export must be a JSON object",
                Some(0..self.source.len()),
                self.file_id,
            )
            .with_note("expected `{ \"data\": { \"blocks\": [...] } }`")]);
        };

        let (blocks, diagnostics) = tree::read_blocks(top, self.file_id);
        log::debug!(
            "parsed {} top-level block(s) with {} warning(s)",
            blocks.len(),
            diagnostics.len()
        );

        Ok(Layout {
            blocks,
            diagnostics,
            source_id: self.file_id,
        })
    }

    /// Exports nest one object and one `children` array per block level, so
    /// serde_json's default depth limit would reject ordinary deep trees.
    fn read_document(&self) -> Result<Value, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(&self.source);
        de.disable_recursion_limit();
        let document = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(document)
    }

    fn syntax_error(&self, error: &serde_json::Error) -> ParseError {
        let offset = line_column_to_offset(&self.source, error.line(), error.column());
        let end = (offset + 1).min(self.source.len());
        ParseError::error(
            format!("invalid JSON: {}", error),
            Some(offset..end),
            self.file_id,
        )
    }
}

/// Convert a 1-based line/column pair (as reported by serde_json) to a byte offset.
fn line_column_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    (line_start + column.saturating_sub(1)).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_from_line_and_column() {
        let source = "{\n  \"a\": ,\n}";
        assert_eq!(line_column_to_offset(source, 1, 1), 0);
        assert_eq!(line_column_to_offset(source, 2, 3), 4);
        assert_eq!(line_column_to_offset(source, 9, 9), source.len());
    }

    #[test]
    fn syntax_error_points_into_source() {
        let source = "{\n  \"data\": ,\n}".to_string();
        let errors = Parser::new(source.clone(), 0).parse().unwrap_err();
        assert_eq!(errors.len(), 1);
        let span = errors[0].span.clone().expect("syntax errors carry a span");
        assert!(span.start >= source.find(':').unwrap());
        assert!(!errors[0].is_warning());
    }

    #[test]
    fn trailing_characters_are_a_syntax_error() {
        let errors = Parser::new("{} x".to_string(), 0).parse().unwrap_err();
        assert!(errors[0].message.starts_with("invalid JSON"));
    }

    #[test]
    fn deeply_nested_blocks_parse() {
        const DEPTH: usize = 200;
        let mut source = String::from(r#"{"data":{"blocks":["#);
        for _ in 0..DEPTH {
            source.push_str(r#"{"tagName":"div","children":["#);
        }
        for _ in 0..DEPTH {
            source.push_str("]}");
        }
        source.push_str("]}}");

        let layout = Parser::new(source, 0).parse().expect("deep trees are valid");
        assert!(layout.diagnostics.is_empty());

        let mut depth = 0;
        let mut node = layout.root();
        while let Some(current) = node {
            depth += 1;
            node = current.children.first();
        }
        assert_eq!(depth, DEPTH);
    }

    #[test]
    fn non_object_document_is_fatal() {
        let errors = Parser::new("[1, 2]".to_string(), 3).parse().unwrap_err();
        assert_eq!(errors[0].file_id, 3);
        assert!(errors[0].message.contains("JSON object"));
    }
}
