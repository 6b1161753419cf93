//! AST-to-Doc translation: every formatting rule lives here.
//!
//! Statements and blocks are handled in this module; expression layout is in
//! [`expr`]. The builder produces a [`Doc`] tree that the printer renders;
//! all inline-vs-break decisions are encoded as groups, so the printer stays
//! policy-free.

use crate::ast::*;
use crate::doc::{self, Doc};
use crate::printer::INDENT_SIZE;

mod expr;

/// Build the document for a whole program. Top-level statements are always
/// separated by a blank line, and a non-empty program ends with a newline.
pub fn build_program(program: &Program) -> Doc {
    if program.is_empty() {
        return doc::nil();
    }

    let mut parts = Vec::new();
    for (i, stmt) in program.iter().enumerate() {
        if i > 0 {
            parts.push(doc::hard_line());
            parts.push(doc::hard_line());
        }
        parts.push(build_statement(stmt, true));
        push_trailing_comment(&mut parts, stmt);
    }
    parts.push(doc::hard_line());

    doc::concat(parts)
}

fn build_statement(stmt: &Statement, top_level: bool) -> Doc {
    match &stmt.kind {
        StatementKind::Comment(text) => doc::text(text.clone()),
        StatementKind::Expression(e) => expr::build_expression(e),
        StatementKind::Return(e) => {
            doc::concat(vec![doc::text("return "), expr::build_expression(e)])
        }
        StatementKind::Break(e) => {
            doc::concat(vec![doc::text("break "), expr::build_expression(e)])
        }
        StatementKind::Block(stmts) => block_doc(stmts),
        StatementKind::Section {
            name,
            attributes,
            body,
        } => build_section(name, attributes, body, top_level),
    }
}

/// `@attr` lines, then `name:` followed by either an inline expression or a
/// braced body. `part_one`/`part_two` at the top level are always braced.
fn build_section(name: &str, attributes: &[String], body: &Program, top_level: bool) -> Doc {
    let mut parts = Vec::new();
    for attr in attributes {
        parts.push(doc::text(format!("@{}", attr)));
        parts.push(doc::hard_line());
    }
    parts.push(doc::text(format!("{}: ", name)));

    let forced_braces = top_level && (name == "part_one" || name == "part_two");
    if !forced_braces && body.len() == 1 {
        if let StatementKind::Expression(e) = &body[0].kind {
            if !contains_block_lambda(e) {
                parts.push(expr::build_expression(e));
                push_trailing_comment(&mut parts, &body[0]);
                return doc::concat(parts);
            }
        }
    }

    parts.push(block_doc(body));
    doc::concat(parts)
}

/// A braced, hard-broken block: `{`, statements indented one level, `}`.
pub(crate) fn block_doc(stmts: &[Statement]) -> Doc {
    if stmts.is_empty() {
        return doc::text("{}");
    }
    doc::concat(vec![
        doc::text("{"),
        doc::nest(
            INDENT_SIZE,
            doc::concat(vec![doc::hard_line(), build_block_statements(stmts)]),
        ),
        doc::hard_line(),
        doc::text("}"),
    ])
}

/// Statements inside a block, joined by newlines. A blank line separates a
/// statement when the source had one, and before the block's implicit
/// return; the statement before an implicit return also gains a semicolon.
fn build_block_statements(stmts: &[Statement]) -> Doc {
    let blank_at = blank_before_index(stmts);
    let semicolon_at = semicolon_index(stmts);

    let mut parts = Vec::new();
    for (i, stmt) in stmts.iter().enumerate() {
        if i > 0 {
            if stmt.preceded_by_blank_line || blank_at == Some(i) {
                parts.push(doc::blank_line());
            }
            parts.push(doc::hard_line());
        }
        parts.push(build_statement(stmt, false));
        if semicolon_at == Some(i) {
            parts.push(doc::text(";"));
        }
        push_trailing_comment(&mut parts, stmt);
    }

    doc::concat(parts)
}

fn push_trailing_comment(parts: &mut Vec<Doc>, stmt: &Statement) {
    if let Some(comment) = &stmt.trailing_comment {
        parts.push(doc::text(format!(" {}", comment)));
    }
}

fn last_non_comment(stmts: &[Statement]) -> Option<usize> {
    stmts
        .iter()
        .rposition(|s| !matches!(s.kind, StatementKind::Comment(_)))
}

fn is_binding(expr: &Expression) -> bool {
    matches!(expr, Expression::Let { .. } | Expression::Assign { .. })
}

/// Index of the statement a blank line must precede: the block's implicit
/// return, or a final `return`/`break` whose value spans multiple lines.
fn blank_before_index(stmts: &[Statement]) -> Option<usize> {
    let idx = last_non_comment(stmts)?;
    if idx == 0 {
        return None;
    }
    match &stmts[idx].kind {
        StatementKind::Expression(e) if !is_binding(e) => Some(idx),
        StatementKind::Return(e) | StatementKind::Break(e) if is_multiline_expression(e) => {
            Some(idx)
        }
        _ => None,
    }
}

/// When a block ends in an implicit return, the preceding non-comment
/// statement carries a semicolon so the implicit return survives re-parsing.
fn semicolon_index(stmts: &[Statement]) -> Option<usize> {
    let idx = last_non_comment(stmts)?;
    match &stmts[idx].kind {
        StatementKind::Expression(e) if !is_binding(e) => {}
        _ => return None,
    }
    stmts[..idx]
        .iter()
        .rposition(|s| !matches!(s.kind, StatementKind::Comment(_)))
}

// ── Shape predicates ────────────────────────────────────────────────────

/// A lambda body that is anything other than a single expression statement.
pub(crate) fn is_multi_statement_block(body: &Statement) -> bool {
    match &body.kind {
        StatementKind::Block(stmts) => {
            !(stmts.len() == 1 && matches!(stmts[0].kind, StatementKind::Expression(_)))
        }
        _ => false,
    }
}

/// An expression whose rendering always spans multiple lines: forced pipe
/// chains, match expressions, and multi-statement lambdas.
pub(crate) fn is_multiline_expression(expr: &Expression) -> bool {
    match expr {
        Expression::FunctionThread { functions, .. } => functions.len() >= 2,
        Expression::FunctionComposition(functions) => functions.len() >= 2,
        Expression::Match { .. } => true,
        Expression::Function { body, .. } => is_multi_statement_block(body),
        _ => false,
    }
}

/// A match-case body that can render as `{ expr }` on one line.
pub(crate) fn is_simple_body(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Expression(e) => !contains_block_lambda(e),
        StatementKind::Block(stmts) if stmts.len() == 1 => {
            stmts[0].trailing_comment.is_none() && is_simple_body(&stmts[0])
        }
        _ => false,
    }
}

/// Whether an expression contains a lambda with a multi-statement body
/// anywhere inside it. Such an expression can never render on one line.
pub(crate) fn contains_block_lambda(expr: &Expression) -> bool {
    match expr {
        Expression::Function { body, .. } => {
            is_multi_statement_block(body) || statement_contains_block_lambda(body)
        }
        Expression::Let { pattern, value, .. } => {
            contains_block_lambda(pattern) || contains_block_lambda(value)
        }
        Expression::Assign { target, value } => {
            contains_block_lambda(target) || contains_block_lambda(value)
        }
        Expression::List(items)
        | Expression::Set(items)
        | Expression::ListPattern(items)
        | Expression::DictionaryPattern(items)
        | Expression::FunctionComposition(items) => items.iter().any(contains_block_lambda),
        Expression::Dictionary(entries) => entries
            .iter()
            .any(|(k, v)| contains_block_lambda(k) || contains_block_lambda(v)),
        Expression::ExclusiveRange { from, to } | Expression::InclusiveRange { from, to } => {
            contains_block_lambda(from) || contains_block_lambda(to)
        }
        Expression::UnboundedRange { from } => contains_block_lambda(from),
        Expression::Call {
            function,
            arguments,
        } => contains_block_lambda(function) || arguments.iter().any(contains_block_lambda),
        Expression::Prefix { right, .. } => contains_block_lambda(right),
        Expression::Infix { left, right, .. } => {
            contains_block_lambda(left) || contains_block_lambda(right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            contains_block_lambda(condition)
                || statement_contains_block_lambda(consequence)
                || alternative
                    .as_deref()
                    .map(statement_contains_block_lambda)
                    .unwrap_or(false)
        }
        Expression::Match { subject, cases } => {
            contains_block_lambda(subject)
                || cases.iter().any(|case| {
                    contains_block_lambda(&case.pattern)
                        || case.guard.as_ref().map(contains_block_lambda).unwrap_or(false)
                        || statement_contains_block_lambda(&case.body)
                })
        }
        Expression::FunctionThread { initial, functions } => {
            contains_block_lambda(initial) || functions.iter().any(contains_block_lambda)
        }
        Expression::Index { left, index } => {
            contains_block_lambda(left) || contains_block_lambda(index)
        }
        Expression::Spread(inner) => contains_block_lambda(inner),
        Expression::DictionaryEntryPattern { key, value } => {
            contains_block_lambda(key) || contains_block_lambda(value)
        }
        Expression::Integer(_)
        | Expression::Decimal(_)
        | Expression::Str(_)
        | Expression::Boolean(_)
        | Expression::Nil
        | Expression::Placeholder
        | Expression::Identifier(_)
        | Expression::RestIdentifier(_)
        | Expression::OperatorRef(_) => false,
    }
}

fn statement_contains_block_lambda(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Expression(e)
        | StatementKind::Return(e)
        | StatementKind::Break(e) => contains_block_lambda(e),
        StatementKind::Block(stmts) => stmts.iter().any(statement_contains_block_lambda),
        StatementKind::Section { body, .. } => body.iter().any(statement_contains_block_lambda),
        StatementKind::Comment(_) => false,
    }
}
