//! Width-aware rendering of a [`Doc`] tree.
//!
//! The printer walks the document with an explicit work stack, deciding at
//! each `Group` boundary whether the contents fit flat on the remainder of
//! the current line. Everything else inherits the enclosing mode.

use crate::doc::Doc;

/// Maximum line width before groups break.
pub const LINE_WIDTH: usize = 100;
/// Spaces per indentation level.
pub const INDENT_SIZE: usize = 2;

/// Indentation is sliced out of a fixed blank buffer; pathological nesting
/// clamps to the buffer length rather than allocating.
const INDENT_BUFFER: &str = "                                                                                                                                ";

/// Safety cap on the fit-check work stack.
const MAX_FIT_STACK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

struct PrintItem<'a> {
    indent: usize,
    mode: Mode,
    doc: &'a Doc,
}

/// Render a document to a string.
///
/// The root renders in break mode: a `Line` at the top level is a newline,
/// and only `Group` nodes opt subtrees into flat rendering.
pub fn print(doc: &Doc) -> String {
    let mut out = String::new();
    let mut col: usize = 0;
    let mut stack: Vec<PrintItem> = vec![PrintItem {
        indent: 0,
        mode: Mode::Break,
        doc,
    }];

    while let Some(item) = stack.pop() {
        match item.doc {
            Doc::Nil => {}

            Doc::Text(s) => {
                out.push_str(s);
                // Literal newlines only occur inside multi-line string
                // literals; the column restarts after the last one.
                col = match s.rfind('\n') {
                    Some(i) => s.len() - i - 1,
                    None => col + s.len(),
                };
            }

            Doc::Line => match item.mode {
                Mode::Flat => {
                    out.push(' ');
                    col += 1;
                }
                Mode::Break => {
                    push_newline(&mut out, &mut col, item.indent);
                }
            },

            Doc::HardLine => {
                push_newline(&mut out, &mut col, item.indent);
            }

            Doc::BlankLine => {
                out.push('\n');
                col = 0;
            }

            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(PrintItem {
                        indent: item.indent,
                        mode: item.mode,
                        doc: part,
                    });
                }
            }

            Doc::Nest(n, inner) => {
                stack.push(PrintItem {
                    indent: item.indent + n,
                    mode: item.mode,
                    doc: inner,
                });
            }

            Doc::IfBreak(broken, flat) => {
                let chosen = match item.mode {
                    Mode::Flat => flat,
                    Mode::Break => broken,
                };
                stack.push(PrintItem {
                    indent: item.indent,
                    mode: item.mode,
                    doc: chosen,
                });
            }

            Doc::Group(inner) => {
                let mode = match item.mode {
                    // Once flat, the whole subtree stays flat.
                    Mode::Flat => Mode::Flat,
                    Mode::Break => {
                        if fits(inner, LINE_WIDTH.saturating_sub(col)) {
                            Mode::Flat
                        } else {
                            Mode::Break
                        }
                    }
                };
                stack.push(PrintItem {
                    indent: item.indent,
                    mode,
                    doc: inner,
                });
            }
        }
    }

    out
}

fn push_newline(out: &mut String, col: &mut usize, indent: usize) {
    out.push('\n');
    let clamped = indent.min(INDENT_BUFFER.len());
    out.push_str(&INDENT_BUFFER[..clamped]);
    *col = clamped;
}

/// Would `doc`, rendered flat, fit within `budget` columns?
///
/// Walks the subtree as if rendered flat, summing widths, and bails out on
/// the first overflow, on any hard or blank line, and when the work stack
/// exceeds its safety cap.
fn fits(doc: &Doc, budget: usize) -> bool {
    let mut remaining = budget;
    let mut stack: Vec<&Doc> = vec![doc];

    while let Some(d) = stack.pop() {
        if stack.len() > MAX_FIT_STACK {
            return false;
        }
        match d {
            Doc::Nil => {}
            Doc::Text(s) => {
                if s.contains('\n') || s.len() > remaining {
                    return false;
                }
                remaining -= s.len();
            }
            Doc::Line => {
                if remaining == 0 {
                    return false;
                }
                remaining -= 1;
            }
            Doc::HardLine | Doc::BlankLine => return false,
            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push(part);
                }
            }
            Doc::Nest(_, inner) => stack.push(inner),
            Doc::Group(inner) => stack.push(inner),
            Doc::IfBreak(_, flat) => stack.push(flat),
        }
    }

    true
}
