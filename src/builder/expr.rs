use crate::ast::*;
use crate::doc::{self, Doc};
use crate::printer::INDENT_SIZE;

// Printed precedence levels, weakest binding first.
const AND_OR: u8 = 1;
const EQUALS: u8 = 2;
const LESS_GREATER: u8 = 3;
const COMPOSITION: u8 = 4;
const SUM: u8 = 5;
const PRODUCT: u8 = 6;

fn infix_precedence(op: &InfixOp) -> u8 {
    match op {
        InfixOp::And | InfixOp::Or => AND_OR,
        InfixOp::Eq | InfixOp::NotEq => EQUALS,
        InfixOp::Lt | InfixOp::LtEq | InfixOp::Gt | InfixOp::GtEq => LESS_GREATER,
        InfixOp::Add | InfixOp::Sub => SUM,
        InfixOp::Mul | InfixOp::Div | InfixOp::Mod | InfixOp::Call(_) => PRODUCT,
    }
}

/// The precedence of an expression's printed head, or `None` for atoms that
/// never need parentheses around them.
fn printed_precedence(expr: &Expression) -> Option<u8> {
    match expr {
        Expression::Infix { operator, .. } => Some(infix_precedence(operator)),
        Expression::FunctionThread { .. }
        | Expression::FunctionComposition(_)
        | Expression::ExclusiveRange { .. }
        | Expression::InclusiveRange { .. }
        | Expression::UnboundedRange { .. } => Some(COMPOSITION),
        _ => None,
    }
}

fn parenthesized(inner: Doc) -> Doc {
    doc::concat(vec![doc::text("("), inner, doc::text(")")])
}

/// An infix operand, parenthesized when its head binds weaker than the
/// parent operator. The right side also parenthesizes at equal precedence,
/// preserving the grouping of inputs like `a - (b - c)`.
fn operand(expr: &Expression, parent: u8, is_right: bool) -> Doc {
    let inner = build_expression(expr);
    match printed_precedence(expr) {
        Some(p) if (is_right && p <= parent) || (!is_right && p < parent) => parenthesized(inner),
        _ => inner,
    }
}

/// The target of a call or index, parenthesized when printing it bare would
/// re-parse with different structure.
fn postfix_target(expr: &Expression) -> Doc {
    let inner = build_expression(expr);
    if printed_precedence(expr).is_some() || matches!(expr, Expression::Function { .. }) {
        parenthesized(inner)
    } else {
        inner
    }
}

fn block_statements(stmt: &Statement) -> &[Statement] {
    match &stmt.kind {
        StatementKind::Block(stmts) => stmts,
        _ => std::slice::from_ref(stmt),
    }
}

pub(super) fn build_expression(expr: &Expression) -> Doc {
    match expr {
        Expression::Integer(raw) | Expression::Decimal(raw) => doc::text(raw.clone()),
        Expression::Str(content) => doc::text(string_literal(content)),
        Expression::Boolean(b) => doc::text(if *b { "true" } else { "false" }),
        Expression::Nil => doc::text("nil"),
        Expression::Placeholder => doc::text("_"),
        Expression::Identifier(name) => doc::text(name.clone()),
        Expression::RestIdentifier(name) => doc::text(format!("..{}", name)),
        Expression::OperatorRef(symbol) => doc::text(symbol.clone()),
        Expression::Spread(inner) => {
            doc::concat(vec![doc::text(".."), build_expression(inner)])
        }

        Expression::Let {
            pattern,
            value,
            mutable,
        } => doc::concat(vec![
            doc::text(if *mutable { "let mut " } else { "let " }),
            build_expression(pattern),
            doc::text(" = "),
            build_expression(value),
        ]),
        Expression::Assign { target, value } => doc::concat(vec![
            build_expression(target),
            doc::text(" = "),
            build_expression(value),
        ]),

        Expression::List(items) => {
            doc::bracketed("[", items.iter().map(build_expression).collect(), "]", false)
        }
        Expression::Set(items) => {
            doc::bracketed("{", items.iter().map(build_expression).collect(), "}", false)
        }
        Expression::Dictionary(entries) => doc::bracketed(
            "#{",
            entries
                .iter()
                .map(|(key, value)| dictionary_entry(key, value))
                .collect(),
            "}",
            false,
        ),

        Expression::ExclusiveRange { from, to } => doc::concat(vec![
            operand(from, COMPOSITION, false),
            doc::text(".."),
            operand(to, COMPOSITION, true),
        ]),
        Expression::InclusiveRange { from, to } => doc::concat(vec![
            operand(from, COMPOSITION, false),
            doc::text("..="),
            operand(to, COMPOSITION, true),
        ]),
        Expression::UnboundedRange { from } => {
            doc::concat(vec![operand(from, COMPOSITION, false), doc::text("..")])
        }

        Expression::Function { parameters, body } => build_function(parameters, body, false),
        Expression::Call {
            function,
            arguments,
        } => build_call(function, arguments),

        Expression::Prefix { operator, right } => {
            let needs_parens = matches!(
                **right,
                Expression::Infix { .. }
                    | Expression::FunctionThread { .. }
                    | Expression::FunctionComposition(_)
            );
            let right_doc = build_expression(right);
            doc::concat(vec![
                doc::text(operator.symbol()),
                if needs_parens {
                    parenthesized(right_doc)
                } else {
                    right_doc
                },
            ])
        }
        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let p = infix_precedence(operator);
            doc::group(doc::concat(vec![
                operand(left, p, false),
                doc::text(format!(" {} ", operator.symbol())),
                operand(right, p, true),
            ]))
        }

        Expression::If {
            condition,
            consequence,
            alternative,
        } => build_if(condition, consequence, alternative.as_deref()),
        Expression::Match { subject, cases } => build_match(subject, cases),

        Expression::FunctionThread { initial, functions } => {
            build_function_thread(initial, functions)
        }
        Expression::FunctionComposition(functions) => build_function_composition(functions),

        Expression::Index { left, index } => doc::concat(vec![
            postfix_target(left),
            doc::text("["),
            build_expression(index),
            doc::text("]"),
        ]),

        Expression::ListPattern(items) => doc::concat(vec![
            doc::text("["),
            doc::join(
                items.iter().map(build_expression).collect(),
                doc::text(", "),
            ),
            doc::text("]"),
        ]),
        Expression::DictionaryPattern(items) => doc::concat(vec![
            doc::text("#{"),
            doc::join(
                items.iter().map(build_expression).collect(),
                doc::text(", "),
            ),
            doc::text("}"),
        ]),
        Expression::DictionaryEntryPattern { key, value } => doc::concat(vec![
            build_expression(key),
            doc::text(": "),
            build_expression(value),
        ]),
    }
}

/// An entry whose string key names the identifier it binds collapses to the
/// shorthand form: `"foo": foo` prints as `foo`.
fn dictionary_entry(key: &Expression, value: &Expression) -> Doc {
    if let (Expression::Str(k), Expression::Identifier(name)) = (key, value) {
        if k == name {
            return doc::text(name.clone());
        }
    }
    doc::concat(vec![
        build_expression(key),
        doc::text(": "),
        build_expression(value),
    ])
}

/// A lambda body that must keep its braces when inlined: set and dictionary
/// literals would be ambiguous, and chains read better in a block.
fn body_keeps_braces(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Set(_)
            | Expression::Dictionary(_)
            | Expression::FunctionThread { .. }
            | Expression::FunctionComposition(_)
    )
}

fn build_function(parameters: &[Expression], body: &Statement, force_block: bool) -> Doc {
    let params: Vec<Doc> = parameters.iter().map(build_expression).collect();
    let header = doc::concat(vec![
        doc::text("|"),
        doc::join(params, doc::text(", ")),
        doc::text("|"),
    ]);
    let stmts = block_statements(body);

    if !force_block {
        if let [stmt] = stmts {
            if stmt.trailing_comment.is_none() {
                if let StatementKind::Expression(e) = &stmt.kind {
                    if !body_keeps_braces(e) {
                        return doc::concat(vec![header, doc::text(" "), build_expression(e)]);
                    }
                }
            }
        }
    }

    doc::concat(vec![header, doc::text(" "), super::block_doc(stmts)])
}

/// A call. When the last argument is a lambda, the trailing-closure form
/// `f(args) |x| { ... }` competes with the plain inline call; a
/// multi-statement lambda takes the trailing form unconditionally.
fn build_call(function: &Expression, arguments: &[Expression]) -> Doc {
    let function_doc = postfix_target(function);

    if let Some(Expression::Function { parameters, body }) = arguments.last() {
        let preceding = &arguments[..arguments.len() - 1];
        let lambda_block = build_function(parameters, body, true);

        let mut trailing = vec![function_doc.clone()];
        if !preceding.is_empty() {
            trailing.push(doc::bracketed(
                "(",
                preceding.iter().map(build_expression).collect(),
                ")",
                false,
            ));
        }
        trailing.push(doc::text(" "));
        trailing.push(lambda_block);
        let trailing = doc::concat(trailing);

        if super::is_multi_statement_block(body) {
            return trailing;
        }

        let inline = doc::concat(vec![
            function_doc,
            doc::bracketed(
                "(",
                arguments.iter().map(build_expression).collect(),
                ")",
                false,
            ),
        ]);
        return doc::group(doc::if_break(trailing, inline));
    }

    doc::concat(vec![
        function_doc,
        doc::bracketed(
            "(",
            arguments.iter().map(build_expression).collect(),
            ")",
            false,
        ),
    ])
}

fn build_function_thread(initial: &Expression, functions: &[Expression]) -> Doc {
    let initial_doc = build_expression(initial);

    if let [f] = functions {
        if let Expression::Call { arguments, .. } = f {
            if matches!(arguments.last(), Some(Expression::Function { .. })) {
                // The trailing-closure group controls the layout; the pipe
                // operator itself stays inline.
                return doc::concat(vec![initial_doc, doc::text(" |> "), build_expression(f)]);
            }
        }
        return doc::group(doc::concat(vec![
            initial_doc,
            doc::nest(
                INDENT_SIZE,
                doc::concat(vec![doc::line(), doc::text("|> "), build_expression(f)]),
            ),
        ]));
    }

    // Two or more pipes always break, one per line.
    let mut chain = Vec::new();
    for (i, f) in functions.iter().enumerate() {
        chain.push(doc::hard_line());
        chain.push(doc::text("|> "));
        chain.push(match f {
            Expression::Function { parameters, body } => {
                build_function(parameters, body, i + 1 != functions.len())
            }
            _ => build_expression(f),
        });
    }
    doc::concat(vec![
        initial_doc,
        doc::nest(INDENT_SIZE, doc::concat(chain)),
    ])
}

fn build_function_composition(functions: &[Expression]) -> Doc {
    let first = match functions.first() {
        Some(f) => build_expression(f),
        None => return doc::nil(),
    };
    let mut rest = Vec::new();
    for f in &functions[1..] {
        rest.push(doc::line());
        rest.push(doc::text(">> "));
        rest.push(build_expression(f));
    }
    doc::group(doc::concat(vec![
        first,
        doc::nest(INDENT_SIZE, doc::concat(rest)),
    ]))
}

fn build_if(
    condition: &Expression,
    consequence: &Statement,
    alternative: Option<&Statement>,
) -> Doc {
    let cond = build_expression(condition);
    let cons_stmts = block_statements(consequence);
    let alt_stmts = alternative.map(block_statements);

    let mut multiline = vec![
        doc::text("if "),
        cond.clone(),
        doc::text(" "),
        super::block_doc(cons_stmts),
    ];
    if let Some(alt) = alt_stmts {
        multiline.push(doc::text(" else "));
        multiline.push(super::block_doc(alt));
    }
    let multiline = doc::concat(multiline);

    let cons_inline = inline_body(cons_stmts);
    let alt_inline = match alt_stmts {
        None => Some(None),
        Some(stmts) => inline_body(stmts).map(Some),
    };
    if let (Some(cons_doc), Some(alt_doc)) = (cons_inline, alt_inline) {
        let mut inline = vec![
            doc::text("if "),
            cond,
            doc::text(" { "),
            cons_doc,
            doc::text(" }"),
        ];
        if let Some(alt_doc) = alt_doc {
            inline.push(doc::text(" else { "));
            inline.push(alt_doc);
            inline.push(doc::text(" }"));
        }
        return doc::group(doc::if_break(multiline, doc::concat(inline)));
    }

    multiline
}

/// The body of an inline `if`: a single expression statement, unwrapped.
fn inline_body(stmts: &[Statement]) -> Option<Doc> {
    if let [stmt] = stmts {
        if stmt.trailing_comment.is_none() {
            if let StatementKind::Expression(e) = &stmt.kind {
                return Some(build_expression(e));
            }
        }
    }
    None
}

fn build_match(subject: &Expression, cases: &[MatchCase]) -> Doc {
    let mut parts = vec![
        doc::text("match "),
        build_expression(subject),
        doc::text(" "),
    ];
    if cases.is_empty() {
        parts.push(doc::text("{}"));
        return doc::concat(parts);
    }

    parts.push(doc::text("{"));
    let mut body = Vec::new();
    for case in cases {
        body.push(doc::hard_line());
        body.push(build_match_case(case));
    }
    parts.push(doc::nest(INDENT_SIZE, doc::concat(body)));
    parts.push(doc::hard_line());
    parts.push(doc::text("}"));
    doc::concat(parts)
}

fn build_match_case(case: &MatchCase) -> Doc {
    let mut parts = vec![build_expression(&case.pattern)];
    if let Some(guard) = &case.guard {
        parts.push(doc::text(" if "));
        parts.push(build_expression(guard));
    }
    parts.push(doc::text(" "));

    let stmts = block_statements(&case.body);
    if super::is_simple_body(&case.body) {
        if let StatementKind::Expression(e) = &stmts[0].kind {
            parts.push(doc::text("{ "));
            parts.push(build_expression(e));
            parts.push(doc::text(" }"));
        }
    } else {
        parts.push(super::block_doc(stmts));
    }

    if let Some(comment) = &case.trailing_comment {
        parts.push(doc::text(format!(" {}", comment)));
    }
    doc::concat(parts)
}

/// Quote and escape a string literal, as one `Text` node.
///
/// Content with more than three embedded newlines, or longer than fifty
/// bytes, keeps its newlines literal; everything else escapes them as `\n`.
fn string_literal(content: &str) -> String {
    let newlines = content.matches('\n').count();
    let literal_newlines = newlines > 3 || content.len() > 50;

    let mut out = String::with_capacity(content.len() + 2);
    out.push('"');
    for ch in content.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' if literal_newlines => out.push('\n'),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
