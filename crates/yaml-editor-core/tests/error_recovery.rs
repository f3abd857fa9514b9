use pretty_assertions::assert_eq;
use yaml_editor_core::{
    Region, Scanner, Token, TokenBuffer, TokenBufferConfig, TokenKind, extract_regions,
    sort_regions,
};

fn document_with_broken_header(sections: usize) -> String {
    let mut text = String::from("broken: \"unterminated\n");
    for i in 0..sections {
        text.push_str(&format!("key_{i}:\n  - a\n  - b\n  - c\n  - d\n"));
    }
    text
}

fn scalar_values(tokens: &[Token]) -> Vec<&str> {
    tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Scalar { value, .. } => Some(value.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_unterminated_quote_followed_by_fifty_valid_lines() {
    let text = document_with_broken_header(10);
    assert_eq!(text.lines().count(), 51);

    let mut buffer = TokenBuffer::new(1, Scanner::new(&text));
    let tokens: Vec<Token> = buffer.all_tokens().collect();

    let invalid: Vec<&Token> = tokens.iter().filter(|token| token.is_invalid()).collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(
        invalid[0].kind,
        TokenKind::Invalid("found unterminated quoted scalar".into())
    );
    assert_eq!((invalid[0].start.line, invalid[0].start.column), (1, 9));
    assert_eq!(invalid[0].end.line, 1);

    let values = scalar_values(&tokens);
    assert_eq!(values.len(), 1 + 10 * 5);
    assert_eq!(values[0], "broken");
    assert_eq!(&values[1..6], &["key_0", "a", "b", "c", "d"]);
    assert_eq!(values[values.len() - 5], "key_9");

    assert!(matches!(
        tokens.last().map(|token| &token.kind),
        Some(TokenKind::StreamEnd)
    ));

    let mut regions = extract_regions(&tokens);
    sort_regions(&mut regions);
    assert_eq!(regions.len(), 10);
    for (i, region) in regions.iter().enumerate() {
        let first_item_line = 3 + i * 5;
        assert_eq!(region.start.line, first_item_line);
        assert_eq!(region.end.line, first_item_line + 4);
    }
}

#[test]
fn test_range_query_after_the_bad_span_sees_valid_tokens() {
    let text = document_with_broken_header(10);
    let mut buffer = TokenBuffer::new(1, Scanner::new(&text));

    let offset = text.find("key_5").unwrap();
    let kinds: Vec<&str> = buffer
        .tokens_overlapping(offset, offset + 4)
        .map(|token| token.kind.name())
        .collect();

    assert!(kinds.contains(&"Scalar"));
    assert!(!kinds.contains(&"Invalid"));
    assert_eq!(buffer.error_count(), 1);
    assert!(!buffer.is_exhausted());
}

#[test]
fn test_garbage_document_stops_at_the_error_budget() {
    let text = "@\n".repeat(150);
    let mut buffer = TokenBuffer::new(3, Scanner::new(&text));

    let tokens: Vec<Token> = buffer.all_tokens().collect();
    let invalid = tokens.iter().filter(|token| token.is_invalid()).count();

    assert_eq!(invalid, 100);
    assert_eq!(buffer.error_count(), 100);
    assert!(buffer.is_exhausted());
    assert!(!tokens.iter().any(|token| token.kind == TokenKind::StreamEnd));

    // Past the budget the stream just ends; nothing beyond line 100 is tokenized.
    let last_line = tokens.iter().map(|token| token.end.line).max();
    assert_eq!(last_line, Some(100));
    assert_eq!(buffer.tokens_overlapping(250, 299).count(), 0);
}

#[test]
fn test_smaller_budget_is_honored() {
    let text = "@\n".repeat(20);
    let mut buffer = TokenBuffer::with_config(
        1,
        Scanner::new(&text),
        TokenBufferConfig::default().with_error_budget(5),
    );
    assert_eq!(buffer.all_tokens().filter(Token::is_invalid).count(), 5);
}

#[test]
fn test_malformed_blocks_still_close_at_stream_end() {
    let text = "a:\n  b:\n    - [x, y\n    - 'z\n";
    let mut buffer = TokenBuffer::new(1, Scanner::new(text));
    let tokens: Vec<Token> = buffer.all_tokens().collect();

    let regions: Vec<Region> = extract_regions(&tokens);
    assert!(regions.iter().all(|region| region.start.line < region.end.line));
    assert!(
        tokens
            .windows(2)
            .all(|pair| pair[0].start.index <= pair[1].start.index)
    );
}
