use std::collections::HashMap;
use std::rc::Rc;

thread_local!(
    static NAME_TO_CODE: HashMap<&'static str, Code> = Word::ALL
        .iter()
        .filter(|w| !w.name().is_empty())
        .map(|w| (w.name(), Code::Word(*w)))
        .chain(
            Operator::COMPACT
                .iter()
                .map(|op| (op.name(), Code::Op(*op))),
        )
        .collect();
);

/// One element of a preprocessed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Code {
    Char(char),
    Word(Word),
    Op(Operator),
}

impl Code {
    /// Reserved words and multi-character operators. Case is ignored.
    pub fn from_name(s: &str) -> Option<Code> {
        let lower = s.to_ascii_lowercase();
        NAME_TO_CODE.with(|map| map.get(lower.as_str()).copied())
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Code::Char(c) => write!(f, "{}", c),
            Code::Word(w) => write!(f, "{}", w),
            Code::Op(op) => write!(f, "{}", op),
        }
    }
}

/// Statement and function opcodes, in dispatch table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Word {
    Rem,
    If,
    Then,
    Goto,
    Gosub,
    Return,
    For,
    To,
    Step,
    Next,
    Stop,
    Run,
    Cont,
    List,
    New,
    Clear,
    Load,
    Save,
    Print,
    Input,
    Pause,
    Sleep,
    Cls,
    Plot,
    Draw,
    Rect,
    Circle,
    Let,
    Dim,
    Def,
    Sys,
    Peek,
    Poke,
    At,
    Ink,
    Paper,
    ValStr,
    HexStr,
    Int,
    Byte,
    Word,
    Abs,
    Sin,
    Cos,
    Tan,
    Atn,
    Sqr,
    Rnd,
    Log,
    Deg,
    Rad,
    Min,
    Max,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Inkey,
    Array,
    DefFn,
}

impl Word {
    pub const ALL: [Word; 61] = [
        Word::Rem,
        Word::If,
        Word::Then,
        Word::Goto,
        Word::Gosub,
        Word::Return,
        Word::For,
        Word::To,
        Word::Step,
        Word::Next,
        Word::Stop,
        Word::Run,
        Word::Cont,
        Word::List,
        Word::New,
        Word::Clear,
        Word::Load,
        Word::Save,
        Word::Print,
        Word::Input,
        Word::Pause,
        Word::Sleep,
        Word::Cls,
        Word::Plot,
        Word::Draw,
        Word::Rect,
        Word::Circle,
        Word::Let,
        Word::Dim,
        Word::Def,
        Word::Sys,
        Word::Peek,
        Word::Poke,
        Word::At,
        Word::Ink,
        Word::Paper,
        Word::ValStr,
        Word::HexStr,
        Word::Int,
        Word::Byte,
        Word::Word,
        Word::Abs,
        Word::Sin,
        Word::Cos,
        Word::Tan,
        Word::Atn,
        Word::Sqr,
        Word::Rnd,
        Word::Log,
        Word::Deg,
        Word::Rad,
        Word::Min,
        Word::Max,
        Word::BitAnd,
        Word::BitOr,
        Word::BitXor,
        Word::ShiftLeft,
        Word::ShiftRight,
        Word::Inkey,
        Word::Array,
        Word::DefFn,
    ];

    /// Source spelling. The synthetic array and user function
    /// opcodes have none and can't be typed.
    pub fn name(&self) -> &'static str {
        match self {
            Word::Rem => "rem",
            Word::If => "if",
            Word::Then => "then",
            Word::Goto => "goto",
            Word::Gosub => "gosub",
            Word::Return => "return",
            Word::For => "for",
            Word::To => "to",
            Word::Step => "step",
            Word::Next => "next",
            Word::Stop => "stop",
            Word::Run => "run",
            Word::Cont => "cont",
            Word::List => "list",
            Word::New => "new",
            Word::Clear => "clear",
            Word::Load => "load",
            Word::Save => "save",
            Word::Print => "print",
            Word::Input => "input",
            Word::Pause => "pause",
            Word::Sleep => "sleep",
            Word::Cls => "cls",
            Word::Plot => "plot",
            Word::Draw => "draw",
            Word::Rect => "rect",
            Word::Circle => "circle",
            Word::Let => "let",
            Word::Dim => "dim",
            Word::Def => "def",
            Word::Sys => "sys",
            Word::Peek => "peek",
            Word::Poke => "poke",
            Word::At => "at",
            Word::Ink => "ink",
            Word::Paper => "paper",
            Word::ValStr => "val$",
            Word::HexStr => "hex$",
            Word::Int => "int",
            Word::Byte => "byte",
            Word::Word => "word",
            Word::Abs => "abs",
            Word::Sin => "sin",
            Word::Cos => "cos",
            Word::Tan => "tan",
            Word::Atn => "atn",
            Word::Sqr => "sqr",
            Word::Rnd => "rnd",
            Word::Log => "log",
            Word::Deg => "deg",
            Word::Rad => "rad",
            Word::Min => "min",
            Word::Max => "max",
            Word::BitAnd => "and#",
            Word::BitOr => "or#",
            Word::BitXor => "xor#",
            Word::ShiftLeft => "sl#",
            Word::ShiftRight => "sr#",
            Word::Inkey => "inkey",
            Word::Array | Word::DefFn => "",
        }
    }

    /// Statement-starting opcodes. These also end an expression.
    pub fn is_primary(&self) -> bool {
        *self < Word::Peek
    }

    /// Functions that pop their first operand before dispatch.
    pub fn takes_operand(&self) -> bool {
        !self.is_primary() && *self < Word::Inkey
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Power,
    Multiply,
    Divide,
    Modulus,
    Plus,
    Minus,
    Negate,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    ShiftLeft,
    ShiftRight,
}

impl Operator {
    /// Operators the preprocessor folds into a single code.
    pub const COMPACT: [Operator; 8] = [
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::NotEqual,
        Operator::ShiftLeft,
        Operator::ShiftRight,
        Operator::And,
        Operator::Or,
        Operator::Not,
    ];

    pub fn from_char(c: char) -> Option<Operator> {
        use Operator::*;
        match c {
            '^' => Some(Power),
            '*' => Some(Multiply),
            '/' => Some(Divide),
            '%' => Some(Modulus),
            '+' => Some(Plus),
            '-' => Some(Minus),
            '=' => Some(Equal),
            '<' => Some(Less),
            '>' => Some(Greater),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        use Operator::*;
        match self {
            Power => "^",
            Multiply => "*",
            Divide => "/",
            Modulus => "%",
            Plus => "+",
            Minus | Negate => "-",
            Equal => "=",
            NotEqual => "<>",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Not => "not",
            And => "and",
            Or => "or",
            ShiftLeft => "<<",
            ShiftRight => ">>",
        }
    }

    pub fn precedence(&self) -> i8 {
        use Operator::*;
        match self {
            Power => 6,
            Multiply | Divide | Modulus | Negate => 5,
            Plus | Minus => 4,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => 3,
            Not => 2,
            And | Or | ShiftLeft | ShiftRight => 1,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Not | Operator::Negate)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Paren,
    Square,
}

/// What ended a lexeme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delim {
    End,
    Space,
    Comma,
    Colon,
    Semicolon,
    Open(Bracket),
    Close(Bracket),
    Op(Operator),
}

impl Delim {
    pub fn from_char(c: char) -> Option<Delim> {
        match c {
            ',' => Some(Delim::Comma),
            ':' => Some(Delim::Colon),
            ';' => Some(Delim::Semicolon),
            '(' => Some(Delim::Open(Bracket::Paren)),
            '[' => Some(Delim::Open(Bracket::Square)),
            ')' => Some(Delim::Close(Bracket::Paren)),
            ']' => Some(Delim::Close(Bracket::Square)),
            _ => Operator::from_char(c).map(Delim::Op),
        }
    }

    /// End of line, `:` or `;`.
    pub fn ends_statement(&self) -> bool {
        matches!(self, Delim::End | Delim::Colon | Delim::Semicolon)
    }
}

impl std::fmt::Display for Delim {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Delim::End => Ok(()),
            Delim::Space => write!(f, " "),
            Delim::Comma => write!(f, ","),
            Delim::Colon => write!(f, ":"),
            Delim::Semicolon => write!(f, ";"),
            Delim::Open(Bracket::Paren) => write!(f, "("),
            Delim::Open(Bracket::Square) => write!(f, "["),
            Delim::Close(Bracket::Paren) => write!(f, ")"),
            Delim::Close(Bracket::Square) => write!(f, "]"),
            Delim::Op(op) => write!(f, "{}", op),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Empty,
    Word(Word),
    /// Quoted text, quotes removed.
    Str(Rc<str>),
    /// Number literal or variable name.
    Text(Rc<str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: Lexeme,
    pub delim: Delim,
}

impl Token {
    pub fn new(lexeme: Lexeme, delim: Delim) -> Token {
        Token { lexeme, delim }
    }

    pub fn word(&self) -> Option<Word> {
        match self.lexeme {
            Lexeme::Word(w) => Some(w),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.lexeme {
            Lexeme::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Code::from_name("PRINT"), Some(Code::Word(Word::Print)));
        assert_eq!(Code::from_name("val$"), Some(Code::Word(Word::ValStr)));
        assert_eq!(Code::from_name("and#"), Some(Code::Word(Word::BitAnd)));
        assert_eq!(Code::from_name("and"), Some(Code::Op(Operator::And)));
        assert_eq!(Code::from_name("<>"), Some(Code::Op(Operator::NotEqual)));
        assert_eq!(Code::from_name("array"), None);
        assert_eq!(Code::from_name("x"), None);
    }

    #[test]
    fn test_classes() {
        assert!(Word::Sys.is_primary());
        assert!(!Word::Peek.is_primary());
        assert!(Word::Max.takes_operand());
        assert!(!Word::Inkey.takes_operand());
        assert!(!Word::Array.takes_operand());
    }
}
