use kpp_ir::TokenKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::LexErrorKind;

fn kinds(source: &str) -> Vec<TokenKind> {
    let list = lex(source).unwrap();
    list.iter().filter_map(|id| list.kind(id)).collect()
}

fn significant(source: &str) -> Vec<(TokenKind, String)> {
    let list = lex(source).unwrap();
    list.iter()
        .filter(|&id| list.kind(id).is_some_and(|k| !k.is_trivia()))
        .map(|id| (list.kind(id).unwrap(), list.text(id).to_string()))
        .collect()
}

#[test]
fn classifies_a_kernel_signature() {
    use TokenKind::*;
    assert_eq!(
        kinds("kernel void k(Texture2Dn<float> tex) { }"),
        vec![
            Symbol, Whitespace, Symbol, Whitespace, Symbol, LParen, Symbol, Less, Symbol, Greater,
            Whitespace, Symbol, RParen, Whitespace, LBrace, Whitespace, RBrace,
        ]
    );
}

#[test]
fn pairs_win_over_singles() {
    let toks = significant("a->b <= c >> 2 && d++");
    let ops: Vec<TokenKind> = toks.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        ops,
        vec![
            TokenKind::Symbol,
            TokenKind::Arrow,
            TokenKind::Symbol,
            TokenKind::LessEq,
            TokenKind::Symbol,
            TokenKind::Shr,
            TokenKind::Number,
            TokenKind::AndAnd,
            TokenKind::Symbol,
            TokenKind::PlusPlus,
        ]
    );
}

#[test]
fn keywords_and_hashes() {
    let list = lex("typedef struct S S;").unwrap();
    let ids: Vec<_> = list
        .iter()
        .filter(|&id| list.kind(id) != Some(TokenKind::Whitespace))
        .collect();
    assert_eq!(list.kind(ids[0]), Some(TokenKind::Typedef));
    assert_eq!(list.kind(ids[1]), Some(TokenKind::Struct));
    assert_eq!(list.hash(ids[2]), list.hash(ids[3]));
    assert_eq!(list.hash(ids[4]), None);
}

#[test]
fn strings_and_comments_are_single_tokens() {
    let source = r#"x = "a \" b"; // trailing"#;
    let toks = significant(source);
    assert_eq!(toks.len(), 4);
    assert_eq!(toks[2], (TokenKind::String, r#""a \" b""#.to_string()));

    let list = lex(source).unwrap();
    let last = list.tail().unwrap();
    assert_eq!(list.kind(last), Some(TokenKind::Comment));
    assert_eq!(list.text(last), "// trailing");
}

#[test]
fn numbers_are_boundaries_only() {
    let toks = significant("1.5e-3f .5 0x1F 10u");
    let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(texts, vec!["1.5e-3f", ".5", "0x1F", "10u"]);
    assert!(toks.iter().all(|(k, _)| *k == TokenKind::Number));
}

#[test]
fn lines_are_tracked() {
    let list = lex("a\n/* two\nlines */ b\r\nc").unwrap();
    let lines: Vec<(String, u32)> = list
        .iter()
        .filter(|&id| list.kind(id) == Some(TokenKind::Symbol))
        .map(|id| (list.text(id).to_string(), list.line(id)))
        .collect();
    assert_eq!(
        lines,
        vec![("a".into(), 1), ("b".into(), 3), ("c".into(), 4)]
    );
}

#[test]
fn illegal_character_is_reported_with_line() {
    let err = lex("int a;\nint $b;").unwrap_err();
    assert_eq!(err, LexError::new(2, LexErrorKind::IllegalCharacter('$')));
}

#[test]
fn unterminated_constructs() {
    assert_eq!(
        lex("x\n\"abc").unwrap_err(),
        LexError::new(2, LexErrorKind::UnterminatedString)
    );
    assert_eq!(
        lex("/* never closed").unwrap_err(),
        LexError::new(1, LexErrorKind::UnterminatedComment)
    );
}

#[test]
fn error_state_is_sticky() {
    let source = "a @ b";
    let buffer = SourceBuffer::new(source);
    let mut list = TokenList::new(source);
    let mut lexer = Lexer::new(&buffer);

    let mut produced = 0;
    while lexer.next_token(&mut list).is_some() {
        produced += 1;
    }
    assert_eq!(produced, 2);
    assert!(lexer.is_finished());
    assert_eq!(
        lexer.error().map(|e| e.kind.clone()),
        Some(LexErrorKind::IllegalCharacter('@'))
    );
    assert_eq!(lexer.next_token(&mut list), None);
    assert_eq!(list.len(), 2);
}

#[test]
fn natural_end_has_no_error() {
    let source = "a";
    let buffer = SourceBuffer::new(source);
    let mut list = TokenList::new(source);
    let mut lexer = Lexer::new(&buffer);
    assert!(lexer.next_token(&mut list).is_some());
    assert_eq!(lexer.next_token(&mut list), None);
    assert!(lexer.error().is_none());
}

#[test]
fn empty_source_is_empty_list() {
    let list = lex("").unwrap();
    assert!(list.is_empty());
}

proptest! {
    /// Concatenated token text reproduces the input.
    #[test]
    fn relex_reproduces_source(source in "[a-zA-Z0-9_ \t\n(){}<>;,=+*/.#\"-]{0,200}") {
        if let Ok(list) = lex(&source) {
            prop_assert_eq!(list.to_text(), source);
        }
    }

    /// Relexing the emitted text yields the same kinds.
    #[test]
    fn relex_is_idempotent(source in "[a-z0-9 \n(){};=<>]{0,120}") {
        let first = lex(&source).unwrap();
        let text = first.to_text();
        let second = lex(&text).unwrap();
        let a: Vec<_> = first.iter().map(|id| first.kind(id)).collect();
        let b: Vec<_> = second.iter().map(|id| second.kind(id)).collect();
        prop_assert_eq!(a, b);
    }
}
