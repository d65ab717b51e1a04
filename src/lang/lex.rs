use super::token::{Code, Operator, Word};
use super::LineNumber;

/// Characters that end a word. Keywords are only recognized between these.
const DELIMITERS: &str = "=<>!%^&*()[]-+|\\,./;:";

/// Splits off the line number and compacts the body: keywords and
/// multi-character operators become single codes, runs of blanks
/// collapse, quoted text and comments pass through untouched.
pub fn lex(s: &str) -> (Option<LineNumber>, Vec<Code>) {
    let s = s.trim_start();
    let digits = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits > 0 {
        if let Ok(number) = s[..digits].parse::<LineNumber>() {
            return (Some(number), compact(&s[digits..]));
        }
    }
    (None, compact(s))
}

fn compact(body: &str) -> Vec<Code> {
    let mut codes: Vec<Code> = Vec::with_capacity(body.len());
    let mut word = String::new();
    let mut chars = body.trim_start().chars().peekable();
    while let Some(c) = chars.next() {
        let before = codes.len();
        match c {
            '\r' | '\n' => break,
            '"' => {
                flush(&mut word, &mut codes);
                codes.push(Code::Char('"'));
                let mut escaped = false;
                for q in chars.by_ref() {
                    codes.push(Code::Char(q));
                    if q == '"' && !escaped {
                        break;
                    }
                    escaped = q == '\\';
                }
            }
            '\'' => {
                flush(&mut word, &mut codes);
                codes.push(Code::Char('\''));
                codes.extend(chars.by_ref().map(Code::Char));
            }
            '?' if word.is_empty() && statement_start(&codes) => {
                codes.push(Code::Word(Word::Print))
            }
            '<' | '>' => {
                flush(&mut word, &mut codes);
                let pair = match (c, chars.peek()) {
                    ('>', Some('=')) => Some(Operator::GreaterEqual),
                    ('<', Some('=')) => Some(Operator::LessEqual),
                    ('<', Some('>')) => Some(Operator::NotEqual),
                    ('<', Some('<')) => Some(Operator::ShiftLeft),
                    ('>', Some('>')) => Some(Operator::ShiftRight),
                    _ => None,
                };
                match pair {
                    Some(op) => {
                        chars.next();
                        codes.push(Code::Op(op));
                    }
                    None => codes.push(Code::Char(c)),
                }
            }
            ' ' | '\t' => {
                flush(&mut word, &mut codes);
                while let Some(' ') | Some('\t') = chars.peek() {
                    chars.next();
                }
                match codes.last() {
                    Some(code) if is_word_like(code) => {}
                    _ => codes.push(Code::Char(' ')),
                }
            }
            c if DELIMITERS.contains(c) => {
                flush(&mut word, &mut codes);
                codes.push(Code::Char(c));
            }
            c => word.push(c),
        }
        if codes[before..].contains(&Code::Word(Word::Rem)) {
            let rest: String = chars.by_ref().collect();
            codes.extend(rest.trim_start().chars().map(Code::Char));
        }
    }
    flush(&mut word, &mut codes);
    while let Some(Code::Char(' ')) = codes.last() {
        codes.pop();
    }
    codes
}

fn flush(word: &mut String, codes: &mut Vec<Code>) {
    if word.is_empty() {
        return;
    }
    match Code::from_name(word) {
        Some(code) => codes.push(code),
        None => codes.extend(word.chars().map(Code::Char)),
    }
    word.clear();
}

/// Nothing but blanks since the line start, a `:` or THEN.
fn statement_start(codes: &[Code]) -> bool {
    match codes.iter().rev().find(|code| **code != Code::Char(' ')) {
        None | Some(Code::Char(':')) | Some(Code::Word(Word::Then)) => true,
        _ => false,
    }
}

fn is_word_like(code: &Code) -> bool {
    match code {
        Code::Word(_) => true,
        Code::Op(op) => op.name().starts_with(|c: char| c.is_ascii_alphabetic()),
        Code::Char(_) => false,
    }
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "._$#?".contains(c)
}

/// Expands codes back to canonical source text.
pub fn expand(codes: &[Code]) -> String {
    let mut s = String::with_capacity(codes.len() * 2);
    let mut iter = codes.iter().peekable();
    let mut quoted = false;
    let mut escaped = false;
    while let Some(code) = iter.next() {
        match code {
            Code::Char(c) => {
                s.push(*c);
                if quoted {
                    quoted = !(*c == '"' && !escaped);
                    escaped = *c == '\\';
                } else if *c == '"' {
                    quoted = true;
                } else if *c == '\'' {
                    s.extend(iter.map(|c| c.to_string()));
                    break;
                }
            }
            code if is_word_like(code) => {
                if s.ends_with(is_ident_char) {
                    s.push(' ');
                }
                s.push_str(&code.to_string());
                match iter.peek() {
                    None | Some(Code::Char('(')) | Some(Code::Char(':')) => {}
                    Some(Code::Char(' ')) if *code != Code::Word(Word::Rem) => {}
                    _ => s.push(' '),
                }
            }
            code => s.push_str(&code.to_string()),
        }
    }
    s
}
