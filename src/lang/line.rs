use super::lex::{expand, lex};
use super::token::{Code, Token};
use super::{tokenize, Error, LineNumber};

/// ## A compacted source line

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: LineNumber,
    codes: Vec<Code>,
}

impl Line {
    pub fn new(s: &str) -> Line {
        let (number, codes) = lex(s);
        Line {
            number: number.unwrap_or(0),
            codes,
        }
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    pub fn is_direct(&self) -> bool {
        self.number == 0
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    pub fn tokens(&self) -> Result<Vec<Token>, Error> {
        tokenize(&self.codes)
    }

    /// Body with keywords spelled out.
    pub fn text(&self) -> String {
        expand(&self.codes)
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_direct() {
            write!(f, "{}", self.text())
        } else {
            write!(f, "{} {}", self.number, self.text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_text() {
        let line = Line::new("100 IF X THEN ?\"ok\"");
        assert_eq!(line.number(), 100);
        assert_eq!(line.to_string(), "100 if X then print \"ok\"");
    }

    #[test]
    fn test_blank_body() {
        let line = Line::new("20   ");
        assert_eq!(line.number(), 20);
        assert!(line.is_empty());
        assert!(Line::new("print").is_direct());
    }
}
