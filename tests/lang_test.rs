use basicd::lang::token::{Bracket, Delim, Lexeme, Operator, Token, Word};
use basicd::lang::{ErrorCode, Line};
use pretty_assertions::assert_eq;

fn text(s: &str) -> Lexeme {
    Lexeme::Text(s.into())
}

#[test]
fn test_line_round_trips_through_listing_form() {
    let line = Line::new("10  FOR I=1  TO 9 STEP 2");
    assert_eq!(line.number(), 10);
    assert_eq!(line.to_string(), "10 for I=1 to 9 step 2");
    assert_eq!(Line::new("?a;b").to_string(), "print a;b");
}

#[test]
fn test_tokens_of_a_line() {
    let tokens = Line::new("20 if a[i]<>0 then gosub 100").tokens().unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::new(Lexeme::Word(Word::If), Delim::Space),
            Token::new(text("a"), Delim::Open(Bracket::Square)),
            Token::new(text("i"), Delim::Close(Bracket::Square)),
            Token::new(Lexeme::Empty, Delim::Op(Operator::NotEqual)),
            Token::new(text("0"), Delim::Space),
            Token::new(Lexeme::Word(Word::Then), Delim::Space),
            Token::new(Lexeme::Word(Word::Gosub), Delim::Space),
            Token::new(text("100"), Delim::End),
        ]
    );
}

#[test]
fn test_too_many_tokens() {
    let s = format!("print {}", vec!["1"; 40].join(","));
    assert_eq!(
        Line::new(&s).tokens().unwrap_err().code(),
        ErrorCode::TooManyTokens
    );
}
