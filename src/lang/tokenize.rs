use super::lex::is_ident_char;
use super::token::{Bracket, Code, Delim, Lexeme, Operator, Token, Word};
use super::{Error, MAX_TOKENS};

type Result<T> = std::result::Result<T, Error>;

enum Pending {
    None,
    Text(String),
    Str(String),
}

struct Tokenizer {
    tokens: Vec<Token>,
    pending: Pending,
    spaced: bool,
    last: Delim,
}

impl Tokenizer {
    fn has_pending(&self) -> bool {
        !matches!(self.pending, Pending::None)
    }

    fn emit(&mut self, delim: Delim) -> Result<()> {
        let lexeme = match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::None => Lexeme::Empty,
            Pending::Text(s) => Lexeme::Text(s.into()),
            Pending::Str(s) => Lexeme::Str(s.into()),
        };
        self.push(Token::new(lexeme, delim))
    }

    fn push(&mut self, token: Token) -> Result<()> {
        if self.tokens.len() >= MAX_TOKENS {
            return Err(error!(TooManyTokens));
        }
        self.last = token.delim;
        self.spaced = false;
        self.tokens.push(token);
        Ok(())
    }

    fn push_char(&mut self, c: char) -> Result<()> {
        let separate = match self.pending {
            Pending::None => false,
            Pending::Text(_) => self.spaced,
            Pending::Str(_) => true,
        };
        if separate {
            self.emit(Delim::Space)?;
        }
        match &mut self.pending {
            Pending::Text(s) => s.push(c),
            _ => self.pending = Pending::Text(c.to_string()),
        }
        Ok(())
    }

    /// `+` and `-` start a number at the beginning of an operand
    /// and continue one after an exponent marker.
    fn is_sign(&self) -> bool {
        match &self.pending {
            Pending::None => !matches!(self.last, Delim::Close(_)),
            Pending::Text(s) if !self.spaced => {
                let mut rev = s.chars().rev();
                matches!(rev.next(), Some('e') | Some('E'))
                    && rev.next().map_or(false, |c| c.is_ascii_digit())
                    && s.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            }
            _ => false,
        }
    }
}

/// Splits a compacted line into (lexeme, delimiter) pairs.
pub fn tokenize(codes: &[Code]) -> Result<Vec<Token>> {
    let mut t = Tokenizer {
        tokens: Vec::with_capacity(MAX_TOKENS),
        pending: Pending::None,
        spaced: false,
        last: Delim::End,
    };
    let mut iter = codes.iter().peekable();
    while let Some(code) = iter.next() {
        match *code {
            Code::Word(word) => {
                if t.has_pending() {
                    t.emit(Delim::Space)?;
                }
                let delim = match iter.peek() {
                    Some(Code::Char('(')) => {
                        iter.next();
                        Delim::Open(Bracket::Paren)
                    }
                    Some(Code::Char(':')) => {
                        iter.next();
                        Delim::Colon
                    }
                    Some(Code::Char(' ')) => {
                        iter.next();
                        Delim::Space
                    }
                    None => Delim::End,
                    _ => Delim::Space,
                };
                if word == Word::Rem {
                    t.push(Token::new(Lexeme::Word(word), Delim::End))?;
                    return Ok(t.tokens);
                }
                t.push(Token::new(Lexeme::Word(word), delim))?;
            }
            Code::Op(op) => t.emit(Delim::Op(op))?,
            Code::Char('"') => {
                if t.has_pending() {
                    t.emit(Delim::Space)?;
                }
                let mut s = String::new();
                while let Some(code) = iter.next() {
                    match code {
                        Code::Char('\\') if iter.peek() == Some(&&Code::Char('"')) => {
                            iter.next();
                            s.push('"');
                        }
                        Code::Char('"') => break,
                        code => s.push_str(&code.to_string()),
                    }
                }
                t.pending = Pending::Str(s);
            }
            Code::Char('\'') => break,
            Code::Char(c @ '+') | Code::Char(c @ '-') => {
                if t.is_sign() {
                    t.push_char(c)?;
                } else if c == '+' {
                    t.emit(Delim::Op(Operator::Plus))?;
                } else {
                    t.emit(Delim::Op(Operator::Minus))?;
                }
            }
            Code::Char(c) => {
                if let Some(delim) = Delim::from_char(c) {
                    t.emit(delim)?;
                } else if is_ident_char(c) {
                    t.push_char(c)?;
                } else if t.has_pending() {
                    t.spaced = true;
                }
            }
        }
    }
    if t.has_pending() || t.tokens.last().map_or(true, |tok| tok.delim != Delim::End) {
        t.emit(Delim::End)?;
    }
    Ok(t.tokens)
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        let (_, codes) = lex(s);
        tokenize(&codes).unwrap()
    }

    fn text(s: &str) -> Lexeme {
        Lexeme::Text(s.into())
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            tokens("a = b*2"),
            vec![
                Token::new(text("a"), Delim::Op(Operator::Equal)),
                Token::new(text("b"), Delim::Op(Operator::Multiply)),
                Token::new(text("2"), Delim::End),
            ]
        );
    }

    #[test]
    fn test_keyword_delimiters() {
        let t = tokens("print(1):cls:goto 10");
        assert_eq!(t[0], Token::new(Lexeme::Word(Word::Print), Delim::Open(Bracket::Paren)));
        assert_eq!(t[1], Token::new(text("1"), Delim::Close(Bracket::Paren)));
        assert_eq!(t[2], Token::new(Lexeme::Empty, Delim::Colon));
        assert_eq!(t[3], Token::new(Lexeme::Word(Word::Cls), Delim::Colon));
        assert_eq!(t[4], Token::new(Lexeme::Word(Word::Goto), Delim::Space));
        assert_eq!(t[5], Token::new(text("10"), Delim::End));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_signs() {
        let t = tokens("x=-1-2*(-3)+1e-2");
        assert_eq!(t[0], Token::new(text("x"), Delim::Op(Operator::Equal)));
        assert_eq!(t[1], Token::new(text("-1"), Delim::Op(Operator::Minus)));
        assert_eq!(t[2], Token::new(text("2"), Delim::Op(Operator::Multiply)));
        assert_eq!(t[3], Token::new(Lexeme::Empty, Delim::Open(Bracket::Paren)));
        assert_eq!(t[4], Token::new(text("-3"), Delim::Close(Bracket::Paren)));
        assert_eq!(t[5], Token::new(Lexeme::Empty, Delim::Op(Operator::Plus)));
        assert_eq!(t[6], Token::new(text("1e-2"), Delim::End));
    }

    #[test]
    fn test_space_separates() {
        let t = tokens("for i=1 to 9");
        assert_eq!(t[2], Token::new(text("1"), Delim::Space));
        assert_eq!(t[3], Token::new(Lexeme::Word(Word::To), Delim::Space));
        assert_eq!(t[4], Token::new(text("9"), Delim::End));
    }

    #[test]
    fn test_strings() {
        let t = tokens(r#"print "a \"b\" c";"#);
        assert_eq!(t[1], Token::new(Lexeme::Str("a \"b\" c".into()), Delim::Semicolon));
        assert_eq!(t[2], Token::new(Lexeme::Empty, Delim::End));
    }

    #[test]
    fn test_comments() {
        assert_eq!(tokens("' nothing"), vec![Token::new(Lexeme::Empty, Delim::End)]);
        assert_eq!(
            tokens("rem a b c d"),
            vec![Token::new(Lexeme::Word(Word::Rem), Delim::End)]
        );
    }

    #[test]
    fn test_capacity() {
        let ok = format!("?{}", vec!["1"; 31].join(","));
        assert_eq!(tokens(&ok).len(), 32);
        let s = format!("?{}", vec!["1"; 32].join(","));
        let (_, codes) = lex(&s);
        assert_eq!(
            tokenize(&codes).unwrap_err().code(),
            crate::lang::ErrorCode::TooManyTokens
        );
    }
}
