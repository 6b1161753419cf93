/// Spec tests for the document algebra and printer, through the public API.
///
/// The laws here are behavioural: two documents are equivalent when they
/// render to the same string under the same conditions.
use santa_fmt::doc::*;
use santa_fmt::printer::{print, LINE_WIDTH};

// ---------------------------------------------------------------------------
// Rendering basics
// ---------------------------------------------------------------------------

#[test]
fn text_renders_verbatim() {
    assert_eq!(print(&text("let")), "let");
}

#[test]
fn nil_renders_nothing() {
    assert_eq!(print(&concat(vec![text("a"), nil(), text("b")])), "ab");
}

#[test]
fn line_is_a_newline_outside_any_group() {
    // The root renders in break mode.
    assert_eq!(print(&concat(vec![text("a"), line(), text("b")])), "a\nb");
}

#[test]
fn line_is_a_space_inside_a_fitting_group() {
    let doc = group(concat(vec![text("a"), line(), text("b")]));
    assert_eq!(print(&doc), "a b");
}

#[test]
fn join_interleaves_the_separator() {
    let doc = join(vec![text("a"), text("b"), text("c")], text(", "));
    assert_eq!(print(&doc), "a, b, c");
}

// ---------------------------------------------------------------------------
// Bracketed groups
// ---------------------------------------------------------------------------

#[test]
fn bracketed_flat_uses_comma_space() {
    let doc = bracketed("[", vec![text("1"), text("2"), text("3")], "]", false);
    assert_eq!(print(&doc), "[1, 2, 3]");
}

#[test]
fn bracketed_empty_is_the_bare_pair() {
    assert_eq!(print(&bracketed("[", vec![], "]", false)), "[]");
    assert_eq!(print(&bracketed("#{", vec![], "}", true)), "#{}");
}

#[test]
fn bracketed_broken_is_one_element_per_line() {
    let wide = "w".repeat(60);
    let doc = bracketed("[", vec![text(wide.clone()), text(wide.clone())], "]", false);
    assert_eq!(print(&doc), format!("[\n  {},\n  {}\n]", wide, wide));
}

#[test]
fn bracketed_trailing_comma_only_when_broken() {
    let wide = "w".repeat(60);
    let broken = bracketed("[", vec![text(wide.clone()), text(wide.clone())], "]", true);
    assert_eq!(print(&broken), format!("[\n  {},\n  {},\n]", wide, wide));

    let flat = bracketed("[", vec![text("1"), text("2")], "]", true);
    assert_eq!(print(&flat), "[1, 2]");
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

#[test]
fn concat_identity() {
    let d = concat(vec![text("x"), line(), text("y")]);
    assert_eq!(print(&concat(vec![nil(), d.clone()])), print(&d));
    assert_eq!(print(&concat(vec![d.clone()])), print(&d));
}

#[test]
fn group_idempotence() {
    let fitting = concat(vec![text("a"), line(), text("b")]);
    assert_eq!(print(&group(group(fitting.clone()))), print(&group(fitting)));

    let overflowing = concat(vec![text("a".repeat(80)), line(), text("b".repeat(80))]);
    assert_eq!(
        print(&group(group(overflowing.clone()))),
        print(&group(overflowing))
    );
}

#[test]
fn nest_additivity() {
    let d = concat(vec![hard_line(), text("x")]);
    assert_eq!(print(&nest(2, nest(3, d.clone()))), print(&nest(5, d)));
}

#[test]
fn if_break_absorption() {
    // Flat mode renders the flat branch directly.
    let in_flat = group(if_break(text("B"), text("F")));
    assert_eq!(print(&in_flat), print(&group(text("F"))));

    // Break mode renders the broken branch directly.
    let forced = concat(vec![if_break(text("B"), text("F")), hard_line(), text("x")]);
    let direct = concat(vec![text("B"), hard_line(), text("x")]);
    assert_eq!(print(&forced), print(&direct));
}

#[test]
fn soft_line_vanishes_flat_and_breaks_otherwise() {
    let flat = group(concat(vec![text("a"), soft_line(), text("b")]));
    assert_eq!(print(&flat), "ab");

    assert_eq!(
        print(&concat(vec![text("a"), soft_line(), text("b")])),
        "a\nb"
    );
}

// ---------------------------------------------------------------------------
// Fit boundaries
// ---------------------------------------------------------------------------

#[test]
fn group_at_exact_width_stays_flat() {
    for k in 0..3 {
        let body = "x".repeat(LINE_WIDTH - 2 - k);
        let doc = group(concat(vec![text("a"), line(), text(body.clone())]));
        assert_eq!(print(&doc), format!("a {}", body), "k = {}", k);
    }
}

#[test]
fn group_past_width_breaks() {
    let body = "x".repeat(LINE_WIDTH);
    let doc = group(concat(vec![text("a"), line(), text(body.clone())]));
    assert_eq!(print(&doc), format!("a\n{}", body));
}

#[test]
fn group_considers_the_current_column() {
    // The same group breaks or not depending on where the line already is.
    let body = concat(vec![text("y".repeat(60)), line(), text("z".repeat(30))]);
    let at_origin = group(body.clone());
    assert_eq!(print(&at_origin).lines().count(), 1);

    let pushed = concat(vec![text("x".repeat(20)), group(body)]);
    assert_eq!(print(&pushed).lines().count(), 2);
}
