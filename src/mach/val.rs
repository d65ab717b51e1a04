use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Values on the RPN queue

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    None,
    Bool(bool),
    Byte(u8),
    Word(u16),
    Integer(i32),
    Float(f32),
    String(Rc<str>),
    Array(Rc<str>),
    DefFn(Rc<str>),
}

impl Default for Val {
    fn default() -> Val {
        Val::None
    }
}

impl Val {
    pub fn is_none(&self) -> bool {
        matches!(self, Val::None)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Val::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        use Val::*;
        matches!(self, Bool(_) | Byte(_) | Word(_) | Integer(_) | Float(_))
    }

    pub fn as_float(&self) -> Option<f32> {
        use Val::*;
        match self {
            Float(f) => Some(*f),
            _ => self.as_integer().map(|n| n as f32),
        }
    }

    /// Floats truncate toward zero.
    pub fn as_integer(&self) -> Option<i32> {
        use Val::*;
        match self {
            Bool(b) => Some(*b as i32),
            Byte(n) => Some(*n as i32),
            Word(n) => Some(*n as i32),
            Integer(n) => Some(*n),
            Float(f) => Some(*f as i32),
            _ => Option::None,
        }
    }

    pub fn numeric(&self) -> Result<f32> {
        match self {
            Val::None => Err(error!(MissingOperand)),
            val => val.as_float().ok_or_else(|| error!(TypeMismatch)),
        }
    }

    pub fn integer(&self) -> Result<i32> {
        match self {
            Val::None => Err(error!(MissingOperand)),
            val => val.as_integer().ok_or_else(|| error!(TypeMismatch)),
        }
    }

    /// Conditions accept anything numeric.
    pub fn is_true(&self) -> Result<bool> {
        Ok(self.numeric()? != 0.0)
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            None => Ok(()),
            Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Byte(n) => write!(f, "{}", n),
            Word(n) => write!(f, "{}", n),
            Integer(n) => write!(f, "{}", n),
            Float(n) => write!(f, "{}", format_float(*n)),
            String(s) => write!(f, "{}", s),
            Array(s) | DefFn(s) => write!(f, "{}", s),
        }
    }
}

/// Three decimals at most, trailing zeros dropped.
pub fn format_float(n: f32) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let mut s = format!("{:.3}", n);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Scans a C style integer: optional sign, then `0x` hex, `0b` binary,
/// leading `0` octal or decimal. Returns the value and the bytes used.
fn scan_integer(s: &str) -> (i32, usize) {
    let bytes = s.as_bytes();
    let (negative, mut start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let rest = &bytes[start..];
    let radix = if rest.len() > 2 && rest[0] == b'0' && (rest[1] | 0x20) == b'x' {
        start += 2;
        16
    } else if rest.len() > 2 && rest[0] == b'0' && (rest[1] | 0x20) == b'b' {
        start += 2;
        2
    } else if rest.len() > 1 && rest[0] == b'0' {
        start += 1;
        8
    } else {
        10
    };
    let len = bytes[start..]
        .iter()
        .take_while(|b| (**b as char).is_digit(radix))
        .count();
    if len == 0 {
        return match radix {
            10 => (0, 0),
            _ => (0, start.min(s.len())),
        };
    }
    let value = match u64::from_str_radix(&s[start..start + len], radix) {
        Ok(n) if negative => (n as u32 as i32).wrapping_neg(),
        Ok(n) => n as u32 as i32,
        Err(_) if negative => i32::MIN,
        Err(_) => i32::MAX,
    };
    (value, start + len)
}

/// Like `strtol`: leading garbage-free prefix, zero when there is none.
pub fn integer_prefix(s: &str) -> i32 {
    scan_integer(s.trim()).0
}

/// Like `atof`.
pub fn float_prefix(s: &str) -> f32 {
    let s = s.trim();
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || "+-.eE".contains(*c))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    (1..=end)
        .rev()
        .find_map(|n| s[..n].parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Numeric literal as typed in source. `None` for anything not shaped
/// like a number.
pub fn parse_literal(s: &str) -> Option<Val> {
    let body = s.trim_start_matches(|c| c == '-' || c == '+');
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let hex = body.len() > 1 && body.as_bytes()[1] | 0x20 == b'x';
    if !hex && s.contains(|c| c == '.' || c == 'e' || c == 'E') {
        Some(Val::Float(float_prefix(s)))
    } else {
        Some(Val::Integer(scan_integer(s).0))
    }
}

/// Conversion used by INT, BYTE and WORD on strings: a `b` marks binary.
pub fn parse_convert(s: &str) -> i32 {
    match s.find('b') {
        Some(i) => {
            let digits: String = s[i + 1..]
                .chars()
                .take_while(|c| *c == '0' || *c == '1')
                .collect();
            u32::from_str_radix(&digits, 2).map_or(0, |n| n as i32)
        }
        None => integer_prefix(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(2.0), "2");
        assert_eq!(format_float(-1.25), "-1.25");
        assert_eq!(format_float(3.14159), "3.142");
        assert_eq!(format_float(-0.0001), "0");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_literal("42"), Some(Val::Integer(42)));
        assert_eq!(parse_literal("-7"), Some(Val::Integer(-7)));
        assert_eq!(parse_literal("0x1F"), Some(Val::Integer(31)));
        assert_eq!(parse_literal("0xE5"), Some(Val::Integer(229)));
        assert_eq!(parse_literal("0b101"), Some(Val::Integer(5)));
        assert_eq!(parse_literal("017"), Some(Val::Integer(15)));
        assert_eq!(parse_literal("0"), Some(Val::Integer(0)));
        assert_eq!(parse_literal("1.5"), Some(Val::Float(1.5)));
        assert_eq!(parse_literal(".25"), Some(Val::Float(0.25)));
        assert_eq!(parse_literal("1e2"), Some(Val::Float(100.0)));
        assert_eq!(parse_literal("x1"), None);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(integer_prefix(" 12abc"), 12);
        assert_eq!(integer_prefix("junk"), 0);
        assert_eq!(float_prefix("2.5volts"), 2.5);
        assert_eq!(float_prefix("1e"), 1.0);
        assert_eq!(parse_convert("b1010"), 10);
        assert_eq!(parse_convert("0b11"), 3);
        assert_eq!(parse_convert("0x10"), 16);
    }

    #[test]
    fn test_oversized_integers_saturate() {
        assert_eq!(
            parse_literal("99999999999999999999"),
            Some(Val::Integer(i32::MAX))
        );
        assert_eq!(integer_prefix("-99999999999999999999"), i32::MIN);
        assert_eq!(integer_prefix("-5"), -5);
    }
}
