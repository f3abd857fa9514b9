use pretty_assertions::assert_eq;
use yaml_editor_core_scanner::{ScanError, Scanner, ScannerConfig, Token, TokenKind};

fn describe(text: &str) -> Vec<String> {
    Scanner::new(text)
        .map(|result| match result {
            Ok(token) => format!(
                "{}@{}:{}-{}:{}",
                token.kind.name(),
                token.start.line,
                token.start.column,
                token.end.line,
                token.end.column
            ),
            Err(error) => format!("Error@{}:{}", error.start.line, error.start.column),
        })
        .collect()
}

#[test]
fn test_nested_block_document_positions() {
    let text = "\
root:
  child:
    - one
    - two
  other: x
";
    assert_eq!(
        describe(text),
        vec![
            "StreamStart@1:1-1:1",
            "BlockMappingStart@1:1-1:1",
            "Key@1:1-1:1",
            "Scalar@1:1-1:5",
            "Value@1:5-1:6",
            "BlockMappingStart@2:3-2:3",
            "Key@2:3-2:3",
            "Scalar@2:3-2:8",
            "Value@2:8-2:9",
            "BlockSequenceStart@3:5-3:5",
            "BlockEntry@3:5-3:6",
            "Scalar@3:7-3:10",
            "BlockEntry@4:5-4:6",
            "Scalar@4:7-4:10",
            "BlockEnd@5:3-5:3",
            "Key@5:3-5:3",
            "Scalar@5:3-5:8",
            "Value@5:8-5:9",
            "Scalar@5:10-5:11",
            "BlockEnd@6:1-6:1",
            "BlockEnd@6:1-6:1",
            "StreamEnd@6:1-6:1",
        ]
    );
}

#[test]
fn test_indentless_sequence_under_mapping_key() {
    // A sequence at the same column as its key does not open a new indentation level.
    let names: Vec<_> = Scanner::new("a:\n- x\nb: y\n")
        .filter_map(Result::ok)
        .map(|token| token.kind.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "StreamStart",
            "BlockMappingStart",
            "Key",
            "Scalar",
            "Value",
            "BlockEntry",
            "Scalar",
            "Key",
            "Scalar",
            "Value",
            "Scalar",
            "BlockEnd",
            "StreamEnd",
        ]
    );
}

#[test]
fn test_every_error_is_followed_by_progress() {
    let text = "a: [1, 2\nb: @oops\n  - c: \"x\\q\"\n%BAD\n'open\n";
    let mut scanner = Scanner::new(text);
    let mut last_end = 0;
    let mut errors = Vec::<ScanError>::new();
    let mut saw_stream_end = false;

    for _ in 0..1000 {
        match scanner.next_token() {
            Ok(Some(token)) => {
                assert!(token.start.index >= last_end, "token out of order: {token:?}");
                last_end = token.end.index;
                saw_stream_end |= token.kind == TokenKind::StreamEnd;
            }
            Ok(None) => break,
            Err(error) => {
                assert!(error.start.index >= last_end, "error out of order: {error:?}");
                assert!(error.end.index >= error.start.index);
                last_end = error.end.index;
                errors.push(error);
            }
        }
    }

    assert!(saw_stream_end);
    assert!(!errors.is_empty());
    assert_eq!(scanner.next_token(), Ok(None));
}

#[test]
fn test_skip_comments_config() {
    let tokens: Vec<Token> = Scanner::with_config(
        "# heading\nkey: value # note\n",
        ScannerConfig::default().with_skip_comments(true),
    )
    .filter_map(Result::ok)
    .collect();

    assert!(
        tokens
            .iter()
            .all(|token| !matches!(token.kind, TokenKind::Comment { .. }))
    );
    assert_eq!(tokens.len(), 8);
}

#[test]
fn test_document_markers_close_open_blocks() {
    let names: Vec<_> = Scanner::new("a:\n  b: 1\n---\nc\n")
        .filter_map(Result::ok)
        .map(|token| token.kind.name())
        .collect();
    let document_start = names.iter().position(|name| *name == "DocumentStart").unwrap();
    assert_eq!(&names[document_start - 2..document_start], &["BlockEnd", "BlockEnd"]);
}
