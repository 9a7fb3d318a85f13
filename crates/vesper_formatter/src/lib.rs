//! The Vesper pretty printer.
//!
//! Formatting is two stages: [`build_token_stream`] walks a syntax tree
//! and flattens it into a stream of printer directives, and
//! [`print_token_stream`] runs the classic two-pass wrapping algorithm
//! over that stream. [`format_tree`] composes the two.

use thiserror::Error;

use vesper_syntax::SyntaxNode;

mod builder;
mod options;
mod printer;
mod tokens;

pub use crate::builder::build_token_stream;
pub use crate::options::{FormatOptions, IndentStyle, LineEnding, LineWidth};
pub use crate::printer::print_token_stream;
pub use crate::tokens::{display_token_stream, FormatToken, GroupKind};

/// An internal invariant violation. These indicate a bug in the stream
/// builder, not in the input; the driver reports them as internal-error
/// diagnostics and gives up on the file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unbalanced groups in the formatting token stream")]
    UnbalancedGroups,
}

/// Pretty-print a syntax tree.
///
/// The tree's tokens must carry unique indices; trees coming out of a
/// rewrite pass need [`SyntaxNode::reindex`] first.
pub fn format_tree(root: &SyntaxNode, options: &FormatOptions) -> Result<String, FormatError> {
    let stream = build_token_stream(root, options)?;
    print_token_stream(&stream, options)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use vesper_parser::parse;

    use super::{format_tree, FormatOptions, IndentStyle, LineEnding, LineWidth};

    fn format(source: &str) -> String {
        format_with(source, &FormatOptions::default())
    }

    fn format_with(source: &str, options: &FormatOptions) -> String {
        let parsed = parse(source).unwrap();
        format_tree(&parsed.root, options).unwrap()
    }

    #[test]
    fn normalizes_spacing_in_bindings() {
        assert_eq!(format("let x=1"), "let x = 1\n");
        assert_eq!(format("let   x   =   1"), "let x = 1\n");
    }

    #[test]
    fn annotated_binding() {
        assert_eq!(format("let a:Int = zero"), "let a: Int = zero\n");
    }

    #[test]
    fn if_statement_layout() {
        assert_eq!(format("if a { b() }"), "if a {\n  b()\n}\n");
    }

    #[test]
    fn if_else_chain() {
        assert_eq!(
            format("if a { b() } else if c { d() } else { e() }"),
            "if a {\n  b()\n} else if c {\n  d()\n} else {\n  e()\n}\n"
        );
    }

    #[test]
    fn empty_function_body_stays_tight() {
        assert_eq!(format("public func f() {}"), "public func f() {}\n");
    }

    #[test]
    fn function_with_parameters_and_return() {
        assert_eq!(
            format("func add(a:Int,b:Int)->Int{return a+b}"),
            "func add(a: Int, b: Int) -> Int {\n  return a + b\n}\n"
        );
    }

    #[test]
    fn arguments_explode_when_too_wide() {
        let options = FormatOptions {
            line_width: LineWidth::new(45),
            line_break_before_each_argument: true,
            ..FormatOptions::default()
        };
        let formatted = format_with(
            r#"myFunc(var1: 123, var2: "abc", var3: Bool, var4: (1, 2, 3))"#,
            &options,
        );
        assert_eq!(
            formatted,
            indoc! {r#"
                myFunc(
                  var1: 123,
                  var2: "abc",
                  var3: Bool,
                  var4: (1, 2, 3)
                )
            "#}
        );
    }

    #[test]
    fn fitting_arguments_stay_inline() {
        assert_eq!(
            format(r#"myFunc(var1: 123, var2: "abc")"#),
            "myFunc(var1: 123, var2: \"abc\")\n"
        );
    }

    #[test]
    fn blank_lines_are_preserved_up_to_the_cap() {
        assert_eq!(
            format("let x = 1\n\n\n\nlet y = 2"),
            "let x = 1\n\nlet y = 2\n"
        );
    }

    #[test]
    fn blank_lines_are_dropped_when_not_respecting_them() {
        let options = FormatOptions {
            respects_existing_line_breaks: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            format_with("let x = 1\n\n\nlet y = 2", &options),
            "let x = 1\nlet y = 2\n"
        );
    }

    #[test]
    fn comments_are_preserved() {
        assert_eq!(
            format("// intro\nlet x = 1"),
            "// intro\nlet x = 1\n"
        );
    }

    #[test]
    fn doc_comment_block_stays_attached() {
        assert_eq!(
            format("/// A.\n/// B.\npublic func f() {}"),
            "/// A.\n/// B.\npublic func f() {}\n"
        );
    }

    #[test]
    fn trailing_comment_stays_attached() {
        assert_eq!(format("let x = 1 // note"), "let x = 1 // note\n");
    }

    #[test]
    fn trailing_closure_call() {
        assert_eq!(
            format("items.map { x in x + 1 }"),
            "items.map { x in x + 1 }\n"
        );
    }

    #[test]
    fn multi_statement_closure_breaks() {
        assert_eq!(
            format("run { a()\n b() }"),
            "run {\n  a()\n  b()\n}\n"
        );
    }

    #[test]
    fn for_in_with_where() {
        assert_eq!(
            format("for x in xs where x > 0 { use(x) }"),
            "for x in xs where x > 0 {\n  use(x)\n}\n"
        );
    }

    #[test]
    fn guard_statement() {
        assert_eq!(
            format("guard ready else { return }"),
            "guard ready else {\n  return\n}\n"
        );
    }

    #[test]
    fn nested_types_round_trip() {
        assert_eq!(
            format("let m: [String: [Int]] = empty"),
            "let m: [String: [Int]] = empty\n"
        );
    }

    #[test]
    fn enum_layout() {
        assert_eq!(
            format("enum Shape { case circle(Double)\ncase square }"),
            "enum Shape {\n  case circle(Double)\n  case square\n}\n"
        );
    }

    #[test]
    fn tab_indentation() {
        let options = FormatOptions {
            indent_style: IndentStyle::Tab,
            ..FormatOptions::default()
        };
        assert_eq!(format_with("if a { b() }", &options), "if a {\n\tb()\n}\n");
    }

    #[test]
    fn crlf_line_endings() {
        let options = FormatOptions {
            line_ending: LineEnding::Crlf,
            ..FormatOptions::default()
        };
        assert_eq!(format_with("let x = 1", &options), "let x = 1\r\n");
    }

    #[test]
    fn formatting_is_idempotent() {
        let sources = [
            "let x=1",
            "if a { b() } else { c() }",
            "/// Doc.\npublic func f(a: Int) -> Int { return a }",
            "for x in xs where x > 0 { use(x) }\n\nlet y = 2",
            "items.map { x in x + 1 }",
        ];
        for source in sources {
            let once = format(source);
            let twice = format(&once);
            assert_eq!(once, twice, "formatting {source:?} is not idempotent");
        }
    }

    #[test]
    fn token_text_is_preserved() {
        let source = "struct S { func f(a: Int) -> Int { return a + 1 } }";
        let formatted = format(source);
        let original_tokens: Vec<String> = parse(source)
            .unwrap()
            .root
            .tokens()
            .map(|token| token.text.clone())
            .collect();
        let formatted_tokens: Vec<String> = parse(&formatted)
            .unwrap()
            .root
            .tokens()
            .map(|token| token.text.clone())
            .collect();
        assert_eq!(original_tokens, formatted_tokens);
    }
}
