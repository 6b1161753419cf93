//! An opinionated formatter for santa-lang.
//!
//! Source text is lexed and parsed, the AST is lowered into a document IR,
//! and the IR is rendered within a 100-column budget:
//!
//! ```text
//! source → Lexer → Parser → AST → Builder → Doc → Printer → formatted source
//! ```
//!
//! Formatting is deterministic and idempotent, preserves comments and blank
//! lines, and takes no configuration.

pub mod ast;
pub mod builder;
pub mod doc;
pub mod lexer;
pub mod parser;
pub mod printer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0}")]
    Lex(#[from] lexer::LexerError),
    #[error("{0}")]
    Parse(#[from] parser::ParseError),
}

/// Format santa-lang source into its canonical form.
///
/// Empty (or whitespace-only) input produces empty output; any other
/// successful output ends with exactly one newline.
///
/// # Example
///
/// ```
/// let formatted = santa_fmt::format("let x=1+2").unwrap();
/// assert_eq!(formatted, "let x = 1 + 2\n");
/// ```
pub fn format(source: &str) -> Result<String, FormatError> {
    let mut lexer = lexer::Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = parser::Parser::new(tokens);
    let program = parser.parse()?;
    let document = builder::build_program(&program);
    Ok(printer::print(&document))
}

/// Whether the source is already in canonical form.
pub fn is_formatted(source: &str) -> Result<bool, FormatError> {
    Ok(format(source)? == source)
}
