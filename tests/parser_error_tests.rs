use miette::Diagnostic;
use printscript::error::{LexErrorKind, ParseErrorKind};
use printscript::{Error, Version, parse_source};
use rstest::rstest;

fn parse_error(source: &str) -> printscript::ParseError {
    match parse_source(source, Version::V1_1) {
        Err(Error::Parse(e)) => e,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn missing_semicolon_reports_unfinished_statement() {
    let source = include_str!("../fixtures/error_missing_semicolon.ps");
    let err = parse_error(source);
    assert_eq!(err.kind, ParseErrorKind::UnfinishedStatement);
    assert!(
        err.to_string().contains("line 1 and column 0"),
        "error should point at the unfinished statement: {err}"
    );
}

#[rstest]
#[case("let x: number = ;", ParseErrorKind::MissingValue)]
#[case("x = 1 +;", ParseErrorKind::MissingOperand)]
#[case("println((1 + 2);", ParseErrorKind::UnclosedParenthesis)]
#[case("println(1 2);", ParseErrorKind::UnexpectedToken)]
#[case("5;", ParseErrorKind::InvalidStatement)]
#[case("let : number;", ParseErrorKind::MalformedStatement)]
#[case("println(1); }", ParseErrorKind::UnexpectedToken)]
fn parse_errors_are_classified(#[case] source: &str, #[case] kind: ParseErrorKind) {
    assert_eq!(parse_error(source).kind, kind);
}

#[test]
fn parse_errors_render_with_source() {
    let err = parse_error("let x: number = 1;\nx = 2 *;");
    let diag: &dyn Diagnostic = &err;
    assert!(diag.source_code().is_some());
    assert_eq!(diag.labels().map(|labels| labels.count()), Some(1));
}

#[rstest]
#[case("let x: number = 1 # 2;", Version::V1_1, LexErrorKind::Unmatched, "#")]
#[case("const x: number = 1;", Version::V1_0, LexErrorKind::Unsupported, "const")]
#[case("if (a) { println(a); }", Version::V1_0, LexErrorKind::Unsupported, "if")]
fn lex_errors_stop_before_parsing(
    #[case] source: &str,
    #[case] version: Version,
    #[case] kind: LexErrorKind,
    #[case] text: &str,
) {
    match parse_source(source, version) {
        Err(Error::Lex(e)) => {
            assert_eq!(e.kind, kind);
            assert_eq!(e.text, text);
        }
        other => panic!("expected a lex error, got {other:?}"),
    }
}
