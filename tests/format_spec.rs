/// End-to-end spec tests for the formatter.
///
/// Each test formats a source snippet and asserts the exact canonical
/// output. The corpus at the bottom re-checks the global invariants
/// (idempotence, trailing newline, no trailing whitespace) over every
/// snippet used here.
use santa_fmt::{format, is_formatted};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fmt(src: &str) -> String {
    format(src).expect("format failed")
}

fn assert_idempotent(src: &str) {
    let once = fmt(src);
    assert_eq!(fmt(&once), once, "not idempotent for {:?}", src);
}

// ---------------------------------------------------------------------------
// Spacing and literals
// ---------------------------------------------------------------------------

#[test]
fn binding_and_operator_spacing() {
    assert_eq!(fmt("let x=1+2"), "let x = 1 + 2\n");
}

#[test]
fn collection_spacing() {
    assert_eq!(fmt("[1,2,3]"), "[1, 2, 3]\n");
}

#[test]
fn empty_collections() {
    assert_eq!(fmt("[]"), "[]\n");
    assert_eq!(fmt("{}"), "{}\n");
    assert_eq!(fmt("#{}"), "#{}\n");
}

#[test]
fn integer_underscores_survive() {
    assert_eq!(fmt("let n = 1_000_000"), "let n = 1_000_000\n");
}

#[test]
fn nil_and_placeholder() {
    assert_eq!(fmt("let x = nil"), "let x = nil\n");
    assert_eq!(fmt("map(_, f)"), "map(_, f)\n");
}

#[test]
fn ranges_have_no_spaces() {
    assert_eq!(fmt("1..5"), "1..5\n");
    assert_eq!(fmt("1..=5"), "1..=5\n");
    assert_eq!(fmt("xs[1..]"), "xs[1..]\n");
}

#[test]
fn index_has_no_spaces() {
    assert_eq!(fmt("m[\"key\"]"), "m[\"key\"]\n");
}

#[test]
fn spread_and_rest_spacing() {
    assert_eq!(fmt("[..xs, 1]"), "[..xs, 1]\n");
    assert_eq!(fmt("let [head, ..tail] = xs"), "let [head, ..tail] = xs\n");
}

// ---------------------------------------------------------------------------
// Operator precedence and parentheses
// ---------------------------------------------------------------------------

#[test]
fn right_grouping_is_preserved() {
    assert_eq!(fmt("a - (b - c)"), "a - (b - c)\n");
    assert_eq!(fmt("a + (b + c)"), "a + (b + c)\n");
}

#[test]
fn redundant_left_parens_are_dropped() {
    assert_eq!(fmt("(a + b) + c"), "a + b + c\n");
}

#[test]
fn weaker_head_keeps_parens() {
    assert_eq!(fmt("(a + b) * c"), "(a + b) * c\n");
    assert_eq!(fmt("a * b + c"), "a * b + c\n");
}

#[test]
fn logic_needs_no_parens() {
    assert_eq!(fmt("a == b && c < d"), "a == b && c < d\n");
}

#[test]
fn prefix_wraps_weaker_operand() {
    assert_eq!(fmt("!(a && b)"), "!(a && b)\n");
    assert_eq!(fmt("!ready"), "!ready\n");
    assert_eq!(fmt("-(a + b)"), "-(a + b)\n");
    assert_eq!(fmt("-x + 1"), "-x + 1\n");
}

#[test]
fn backtick_call_spacing() {
    assert_eq!(fmt("a`max`b"), "a `max` b\n");
}

#[test]
fn operator_ref() {
    assert_eq!(fmt("reduce(+)"), "reduce(+)\n");
}

// ---------------------------------------------------------------------------
// Dictionaries
// ---------------------------------------------------------------------------

#[test]
fn dictionary_shorthand_rewriting() {
    assert_eq!(fmt("#{\"foo\":foo,\"bar\":bar}"), "#{foo, bar}\n");
}

#[test]
fn dictionary_mixed_entries() {
    assert_eq!(
        fmt("#{\"foo\":foo,\"total\":1+2}"),
        "#{foo, \"total\": 1 + 2}\n"
    );
}

// ---------------------------------------------------------------------------
// Lambdas
// ---------------------------------------------------------------------------

#[test]
fn single_expression_lambda_inlines() {
    assert_eq!(fmt("|x|x+1"), "|x| x + 1\n");
}

#[test]
fn set_literal_body_keeps_braces() {
    assert_eq!(fmt("|x| { {x, 1} }"), "|x| {\n  {x, 1}\n}\n");
}

#[test]
fn pipe_body_keeps_braces() {
    assert_eq!(
        fmt("|x| { x |> inc |> double }"),
        "|x| {\n  x\n    |> inc\n    |> double\n}\n"
    );
}

#[test]
fn pattern_parameters() {
    assert_eq!(fmt("|[a, b], _| a + b"), "|[a, b], _| a + b\n");
}

// ---------------------------------------------------------------------------
// Calls and trailing closures
// ---------------------------------------------------------------------------

#[test]
fn short_lambda_argument_stays_inline() {
    assert_eq!(
        fmt("reduce(0, |acc, x| acc + x)"),
        "reduce(0, |acc, x| acc + x)\n"
    );
}

#[test]
fn long_lambda_argument_moves_to_trailing_position() {
    let src = "accumulate_daily_totals(extremely_long_collection_name, |measurement| measurement * conversion_factor + baseline_adjustment)";
    assert_eq!(
        fmt(src),
        "accumulate_daily_totals(extremely_long_collection_name) |measurement| {\n  measurement * conversion_factor + baseline_adjustment\n}\n"
    );
}

#[test]
fn multi_statement_lambda_always_trails() {
    assert_eq!(
        fmt("each(queue) |item| { let x = item * 2 push(results, x) }"),
        "each(queue) |item| {\n  let x = item * 2;\n\n  push(results, x)\n}\n"
    );
}

#[test]
fn sole_lambda_argument_drops_the_parens() {
    assert_eq!(
        fmt("each |item| { log(item) emit(item) }"),
        "each |item| {\n  log(item);\n\n  emit(item)\n}\n"
    );
}

// ---------------------------------------------------------------------------
// Pipe chains and composition
// ---------------------------------------------------------------------------

#[test]
fn long_pipe_chain_breaks_one_per_line() {
    assert_eq!(
        fmt("input |> lines |> filter(is_nice?) |> size"),
        "input\n  |> lines\n  |> filter(is_nice?)\n  |> size\n"
    );
}

#[test]
fn single_pipe_stays_inline_when_it_fits() {
    assert_eq!(fmt("value |> transform"), "value |> transform\n");
}

#[test]
fn single_pipe_with_trailing_closure_keeps_the_pipe_inline() {
    assert_eq!(fmt("xs |> map |x| x * 2"), "xs |> map(|x| x * 2)\n");
}

#[test]
fn composition_inline_when_it_fits() {
    assert_eq!(
        fmt("let add_then_double = inc >> double"),
        "let add_then_double = inc >> double\n"
    );
}

#[test]
fn composition_breaks_when_it_overflows() {
    let src = "let pipeline = parse_the_raw_measurement_input >> normalise_measurement_units >> accumulate_daily_totals";
    assert_eq!(
        fmt(src),
        "let pipeline = parse_the_raw_measurement_input\n  >> normalise_measurement_units\n  >> accumulate_daily_totals\n"
    );
}

// ---------------------------------------------------------------------------
// If / else
// ---------------------------------------------------------------------------

#[test]
fn short_if_else_inlines() {
    assert_eq!(
        fmt("if x>0 {\"pos\"} else {\"neg\"}"),
        "if x > 0 { \"pos\" } else { \"neg\" }\n"
    );
}

#[test]
fn long_if_else_breaks() {
    let src = "if count > threshold { \"above the configured threshold\" } else { \"below or at the configured threshold\" }";
    assert_eq!(
        fmt(src),
        "if count > threshold {\n  \"above the configured threshold\"\n} else {\n  \"below or at the configured threshold\"\n}\n"
    );
}

#[test]
fn if_without_else() {
    assert_eq!(fmt("if ready { go() }"), "if ready { go() }\n");
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

#[test]
fn match_cases_one_per_line() {
    assert_eq!(
        fmt("match x { 1 { \"one\" } _ { \"other\" } }"),
        "match x {\n  1 { \"one\" }\n  _ { \"other\" }\n}\n"
    );
}

#[test]
fn match_guard_and_list_pattern() {
    assert_eq!(
        fmt("match xs { [x, ..rest] if x > 0 { x } _ { 0 } }"),
        "match xs {\n  [x, ..rest] if x > 0 { x }\n  _ { 0 }\n}\n"
    );
}

#[test]
fn complex_match_body_breaks() {
    assert_eq!(
        fmt("match x { 1 { let y = 2 y } _ { 0 } }"),
        "match x {\n  1 {\n    let y = 2;\n\n    y\n  }\n  _ { 0 }\n}\n"
    );
}

#[test]
fn match_as_a_binding_value() {
    assert_eq!(
        fmt("let result = match x { 1 { \"one\" } _ { \"other\" } }"),
        "let result = match x {\n  1 { \"one\" }\n  _ { \"other\" }\n}\n"
    );
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[test]
fn puzzle_sections_keep_braces() {
    assert_eq!(fmt("part_one: { 2 }"), "part_one: {\n  2\n}\n");
    assert_eq!(fmt("part_two: { 0 }"), "part_two: {\n  0\n}\n");
}

#[test]
fn inline_puzzle_section_gains_braces() {
    assert_eq!(fmt("part_one: 2"), "part_one: {\n  2\n}\n");
}

#[test]
fn other_single_expression_sections_inline() {
    assert_eq!(fmt("input: read(\"aoc://2015/1\")"), "input: read(\"aoc://2015/1\")\n");
    assert_eq!(fmt("double: { 2 }"), "double: 2\n");
}

#[test]
fn section_attributes_precede_the_header() {
    assert_eq!(fmt("@slow\npart_two: { 0 }"), "@slow\npart_two: {\n  0\n}\n");
}

#[test]
fn nested_test_sections_inline_their_parts() {
    assert_eq!(
        fmt("test: {\n  input: \"abc\"\n\n  part_one: 6\n}"),
        "test: {\n  input: \"abc\"\n\n  part_one: 6\n}\n"
    );
}

#[test]
fn top_level_statements_always_blank_separated() {
    assert_eq!(fmt("let a = 1\nlet b = 2"), "let a = 1\n\nlet b = 2\n");
    assert_eq!(
        fmt("let a = 1\n\n\n\n\nlet b = 2"),
        "let a = 1\n\nlet b = 2\n"
    );
}

// ---------------------------------------------------------------------------
// Blocks: semicolons and blank lines
// ---------------------------------------------------------------------------

#[test]
fn implicit_return_gets_a_blank_line_and_semicolon() {
    assert_eq!(
        fmt("part_one: { let x = 1 x + 1 }"),
        "part_one: {\n  let x = 1;\n\n  x + 1\n}\n"
    );
}

#[test]
fn single_statement_block_needs_no_separator() {
    assert_eq!(fmt("part_one: { compute() }"), "part_one: {\n  compute()\n}\n");
}

#[test]
fn source_blank_lines_are_preserved_in_blocks() {
    assert_eq!(
        fmt("part_one: {\nlet a = 1\n\n\n\nlet b = 2\nb\n}"),
        "part_one: {\n  let a = 1\n\n  let b = 2;\n\n  b\n}\n"
    );
}

#[test]
fn short_final_return_needs_no_blank_line() {
    assert_eq!(
        fmt("part_one: { let acc = go() return acc }"),
        "part_one: {\n  let acc = go()\n  return acc\n}\n"
    );
}

#[test]
fn multiline_final_return_gets_a_blank_line() {
    assert_eq!(
        fmt("part_one: { let acc = go() return acc |> sum |> trim }"),
        "part_one: {\n  let acc = go()\n\n  return acc\n    |> sum\n    |> trim\n}\n"
    );
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[test]
fn standalone_and_trailing_comments_survive() {
    assert_eq!(
        fmt("// header\n\nlet x = 1 // trailing"),
        "// header\n\nlet x = 1 // trailing\n"
    );
}

#[test]
fn comment_before_implicit_return() {
    assert_eq!(
        fmt("part_one: { // setup\nlet a = 1\na }"),
        "part_one: {\n  // setup\n  let a = 1;\n\n  a\n}\n"
    );
}

#[test]
fn comment_only_file() {
    assert_eq!(fmt("// a\n// b"), "// a\n\n// b\n");
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

#[test]
fn short_strings_escape_their_newlines() {
    assert_eq!(fmt("\"a\nb\""), "\"a\\nb\"\n");
    assert_eq!(fmt(r#""say \"hi\"""#), "\"say \\\"hi\\\"\"\n");
    assert_eq!(fmt(r#""tab\there""#), "\"tab\\there\"\n");
}

#[test]
fn three_newlines_still_escape() {
    assert_eq!(fmt("\"a\nb\nc\nd\""), "\"a\\nb\\nc\\nd\"\n");
}

#[test]
fn four_newlines_switch_to_literal_mode() {
    assert_eq!(fmt("\"a\nb\nc\nd\ne\""), "\"a\nb\nc\nd\ne\"\n");
}

#[test]
fn long_strings_switch_to_literal_mode() {
    let long = format!("{}\n{}", "a".repeat(25), "b".repeat(25));
    let short = format!("{}\n{}", "a".repeat(24), "b".repeat(25));
    assert_eq!(
        fmt(&format!("\"{}\"", long)),
        format!("\"{}\"\n", long)
    );
    assert_eq!(
        fmt(&format!("\"{}\"", short)),
        format!("\"{}\\n{}\"\n", "a".repeat(24), "b".repeat(25))
    );
}

#[test]
fn multiline_string_section_round_trips() {
    assert_idempotent("input: \"a\nb\nc\nd\ne\"");
}

// ---------------------------------------------------------------------------
// Width boundaries
// ---------------------------------------------------------------------------

#[test]
fn list_at_exactly_line_width_stays_flat() {
    let flat = format!("[{}, {}]", "a".repeat(48), "b".repeat(48));
    assert_eq!(fmt(&flat), format!("{}\n", flat));
}

#[test]
fn list_one_past_line_width_breaks() {
    let a = "a".repeat(49);
    let b = "b".repeat(48);
    assert_eq!(
        fmt(&format!("[{}, {}]", a, b)),
        format!("[\n  {},\n  {}\n]\n", a, b)
    );
}

#[test]
fn long_list_breaks_one_element_per_line() {
    let src = "[first_long_element_name, second_long_element_name, third_long_element_name, fourth_long_element_name]";
    assert_eq!(
        fmt(src),
        "[\n  first_long_element_name,\n  second_long_element_name,\n  third_long_element_name,\n  fourth_long_element_name\n]\n"
    );
}

// ---------------------------------------------------------------------------
// Library surface
// ---------------------------------------------------------------------------

#[test]
fn empty_input_formats_to_empty_output() {
    assert_eq!(fmt(""), "");
    assert_eq!(fmt("   \n\n  "), "");
}

#[test]
fn is_formatted_matches_format() {
    assert!(is_formatted("let x = 1 + 2\n").unwrap());
    assert!(!is_formatted("let x=1+2").unwrap());
}

#[test]
fn parse_errors_surface() {
    assert!(format("let = 5").is_err());
    assert!(format("(1 + 2").is_err());
}

// ---------------------------------------------------------------------------
// Global invariants over the corpus
// ---------------------------------------------------------------------------

const CORPUS: &[&str] = &[
    "let x=1+2",
    "[1,2,3]",
    "|x|x+1",
    "#{\"foo\":foo,\"bar\":bar}",
    "input |> lines |> filter(is_nice?) |> size",
    "a - (b - c)",
    "part_one: { 2 }",
    "part_one: { let x = 1 x + 1 }",
    "part_one: { let acc = go() return acc |> sum |> trim }",
    "each(queue) |item| { let x = item * 2 push(results, x) }",
    "xs |> map |x| x * 2",
    "match x { 1 { let y = 2 y } _ { 0 } }",
    "if x>0 {\"pos\"} else {\"neg\"}",
    "if count > threshold { \"above the configured threshold\" } else { \"below or at the configured threshold\" }",
    "@slow\npart_two: { 0 }",
    "test: {\n  input: \"abc\"\n\n  part_one: 6\n}",
    "// header\n\nlet x = 1 // trailing",
    "part_one: { // setup\nlet a = 1\na }",
    "\"a\nb\nc\nd\ne\"",
    "let #{name, \"age\": age} = person",
    "let [a, ..rest] = xs",
    "|x| { x |> inc |> double }",
    "|x| { {x, 1} }",
    "reduce(0, |acc, x| acc + x)",
    "let pipeline = parse_the_raw_measurement_input >> normalise_measurement_units >> accumulate_daily_totals",
    "m[\"k\"] = 5",
    "1..5",
    "xs[1..]",
    "a`max`b",
    "reduce(+)",
];

#[test]
fn formatting_is_idempotent_over_the_corpus() {
    for src in CORPUS {
        assert_idempotent(src);
    }
}

#[test]
fn output_ends_with_exactly_one_newline() {
    for src in CORPUS {
        let out = fmt(src);
        assert!(out.ends_with('\n'), "missing newline for {:?}", src);
        assert!(!out.ends_with("\n\n"), "double newline for {:?}", src);
    }
}

#[test]
fn no_line_has_trailing_whitespace() {
    for src in CORPUS {
        let out = fmt(src);
        for (i, line) in out.lines().enumerate() {
            assert!(
                !line.ends_with(' ') && !line.ends_with('\t'),
                "line {} of {:?} has trailing whitespace: {:?}",
                i + 1,
                src,
                line
            );
        }
    }
}

#[test]
fn formatted_output_is_reported_as_formatted() {
    for src in CORPUS {
        let out = fmt(src);
        assert!(
            is_formatted(&out).unwrap(),
            "formatted output not stable for {:?}",
            src
        );
    }
}
