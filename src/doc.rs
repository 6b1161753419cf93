//! Document IR for formatting in the Wadler-Lindig style.
//!
//! The builder lowers the AST into this representation, which captures
//! formatting intent (groups, indentation, line breaks) without committing to
//! a layout. The printer decides at each `Group` boundary whether to render
//! flat (on one line) or broken (with line breaks and indentation).

use crate::printer::INDENT_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub enum Doc {
    /// Produces no output.
    Nil,
    /// Literal text emitted verbatim; printed width is its byte length.
    Text(String),
    /// A space in flat mode; a newline + current indent in break mode.
    Line,
    /// Always a newline + current indent, regardless of mode.
    HardLine,
    /// Always a newline with no indent, for truly empty separator lines.
    BlankLine,
    /// A sequence of documents rendered in order.
    Concat(Vec<Doc>),
    /// Try to render the child flat; break if it exceeds the remaining width.
    Group(Box<Doc>),
    /// Increase indentation by the given amount while rendering the child.
    Nest(usize, Box<Doc>),
    /// Emit the first child in break mode, the second in flat mode.
    IfBreak(Box<Doc>, Box<Doc>),
}

// ── Construction helpers ────────────────────────────────────────────────

pub fn nil() -> Doc {
    Doc::Nil
}

pub fn text(s: impl Into<String>) -> Doc {
    Doc::Text(s.into())
}

pub fn line() -> Doc {
    Doc::Line
}

pub fn hard_line() -> Doc {
    Doc::HardLine
}

pub fn blank_line() -> Doc {
    Doc::BlankLine
}

pub fn concat(parts: Vec<Doc>) -> Doc {
    Doc::Concat(parts)
}

pub fn group(inner: Doc) -> Doc {
    Doc::Group(Box::new(inner))
}

pub fn nest(indent: usize, inner: Doc) -> Doc {
    Doc::Nest(indent, Box::new(inner))
}

pub fn if_break(broken: Doc, flat: Doc) -> Doc {
    Doc::IfBreak(Box::new(broken), Box::new(flat))
}

/// Nothing in flat mode, a newline + indent in break mode.
pub fn soft_line() -> Doc {
    if_break(hard_line(), nil())
}

/// Interleave `sep` between the given documents.
pub fn join(parts: Vec<Doc>, sep: Doc) -> Doc {
    let mut joined = Vec::with_capacity(parts.len() * 2);
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            joined.push(sep.clone());
        }
        joined.push(part);
    }
    Doc::Concat(joined)
}

/// A delimited, comma-separated group: everything on one line when it fits,
/// one element per line (indented inside the open bracket) when it does not.
pub fn bracketed(open: &str, elems: Vec<Doc>, close: &str, trailing_comma: bool) -> Doc {
    if elems.is_empty() {
        return text(format!("{}{}", open, close));
    }
    let sep = if_break(concat(vec![text(","), hard_line()]), text(", "));
    let trailing = if trailing_comma {
        if_break(text(","), nil())
    } else {
        nil()
    };
    group(concat(vec![
        text(open),
        nest(
            INDENT_SIZE,
            concat(vec![soft_line(), join(elems, sep), trailing]),
        ),
        soft_line(),
        text(close),
    ]))
}
