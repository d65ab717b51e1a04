use super::{Val, STRING_LEN};
use crate::error;
use crate::lang::token::Operator;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Operator arithmetic
///
/// Operands are promoted to float when either one is a float,
/// otherwise integer arithmetic wraps and a byte or word left
/// operand narrows the result back to its width.

pub struct Operation {}

impl Operation {
    pub fn unary(op: Operator, val: Val) -> Result<Val> {
        use Val::*;
        match op {
            Operator::Not => match val {
                None => Err(error!(MissingOperand)),
                String(_) | Array(_) | DefFn(_) => Err(error!(TypeMismatch)),
                val => Ok(Bool(!val.is_true()?)),
            },
            Operator::Negate => match val {
                None => Err(error!(MissingOperand)),
                Bool(b) => Ok(Integer(-(b as i32))),
                Byte(n) => Ok(Byte(n.wrapping_neg())),
                Word(n) => Ok(Word(n.wrapping_neg())),
                Integer(n) => Ok(Integer(n.wrapping_neg())),
                Float(n) => Ok(Float(-n)),
                String(_) | Array(_) | DefFn(_) => Err(error!(TypeMismatch)),
            },
            _ => Err(error!(UnknownOp)),
        }
    }

    pub fn binary(op: Operator, lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (&lhs, &rhs) {
            (None, _) | (_, None) => Err(error!(MissingOperand)),
            (Array(_), _) | (_, Array(_)) | (DefFn(_), _) | (_, DefFn(_)) => {
                Err(error!(TypeMismatch))
            }
            (String(l), String(r)) => Operation::string(op, l, r),
            (String(_), _) | (_, String(_)) => Err(error!(TypeMismatch)),
            (Float(_), _) | (_, Float(_)) => {
                let (l, r) = (lhs.numeric()?, rhs.numeric()?);
                Operation::float(op, l, r)
            }
            _ => {
                let (l, r) = (lhs.integer()?, rhs.integer()?);
                let val = Operation::integer(op, l, r)?;
                Ok(match (&lhs, val) {
                    (Byte(_), Integer(n)) => Byte(n as u8),
                    (Word(_), Integer(n)) => Word(n as u16),
                    (_, val) => val,
                })
            }
        }
    }

    fn string(op: Operator, lhs: &str, rhs: &str) -> Result<Val> {
        match op {
            Operator::Plus => {
                if lhs.len() + rhs.len() > STRING_LEN - 2 {
                    return Err(error!(StringLength));
                }
                let mut s = String::with_capacity(lhs.len() + rhs.len());
                s.push_str(lhs);
                s.push_str(rhs);
                Ok(Val::String(s.into()))
            }
            Operator::Equal => Ok(Val::Bool(lhs == rhs)),
            Operator::NotEqual => Ok(Val::Bool(lhs != rhs)),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn float(op: Operator, l: f32, r: f32) -> Result<Val> {
        use Operator::*;
        use Val::*;
        match op {
            Plus => Ok(Float(l + r)),
            Minus => Ok(Float(l - r)),
            Multiply => Ok(Float(l * r)),
            Divide | Modulus if r == 0.0 => Err(error!(DivZero)),
            Divide => Ok(Float(l / r)),
            Modulus => Ok(Float(l % r)),
            Power => Ok(Float(l.powf(r))),
            Equal => Ok(Bool(l == r)),
            NotEqual => Ok(Bool(l != r)),
            Less => Ok(Bool(l < r)),
            LessEqual => Ok(Bool(l <= r)),
            Greater => Ok(Bool(l > r)),
            GreaterEqual => Ok(Bool(l >= r)),
            And => Ok(Bool(l != 0.0 && r != 0.0)),
            Or => Ok(Bool(l != 0.0 || r != 0.0)),
            ShiftLeft | ShiftRight => Operation::integer(op, l as i32, r as i32),
            Not | Negate => Err(error!(UnknownOp)),
        }
    }

    fn integer(op: Operator, l: i32, r: i32) -> Result<Val> {
        use Operator::*;
        use Val::*;
        match op {
            Plus => Ok(Integer(l.wrapping_add(r))),
            Minus => Ok(Integer(l.wrapping_sub(r))),
            Multiply => Ok(Integer(l.wrapping_mul(r))),
            Divide | Modulus if r == 0 => Err(error!(DivZero)),
            Divide => Ok(Integer(l.wrapping_div(r))),
            Modulus => Ok(Integer(l.wrapping_rem(r))),
            Power => Ok(Integer((l as f64).powf(r as f64) as i32)),
            Equal => Ok(Bool(l == r)),
            NotEqual => Ok(Bool(l != r)),
            Less => Ok(Bool(l < r)),
            LessEqual => Ok(Bool(l <= r)),
            Greater => Ok(Bool(l > r)),
            GreaterEqual => Ok(Bool(l >= r)),
            And => Ok(Bool(l != 0 && r != 0)),
            Or => Ok(Bool(l != 0 || r != 0)),
            ShiftLeft => Ok(Integer(l.wrapping_shl(r as u32))),
            ShiftRight => Ok(Integer(l.wrapping_shr(r as u32))),
            Not | Negate => Err(error!(UnknownOp)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn bin(op: Operator, l: Val, r: Val) -> Val {
        Operation::binary(op, l, r).unwrap()
    }

    fn code(op: Operator, l: Val, r: Val) -> ErrorCode {
        Operation::binary(op, l, r).unwrap_err().code()
    }

    #[test]
    fn test_promotion() {
        use Val::*;
        assert_eq!(bin(Operator::Divide, Integer(1), Integer(2)), Integer(0));
        assert_eq!(bin(Operator::Divide, Float(1.0), Integer(2)), Float(0.5));
        assert_eq!(bin(Operator::Plus, Integer(2), Float(0.5)), Float(2.5));
        assert_eq!(bin(Operator::Modulus, Float(7.5), Integer(2)), Float(1.5));
        assert_eq!(bin(Operator::Power, Integer(2), Integer(10)), Integer(1024));
    }

    #[test]
    fn test_narrowing() {
        use Val::*;
        assert_eq!(bin(Operator::Plus, Byte(250), Integer(10)), Byte(4));
        assert_eq!(bin(Operator::Minus, Word(0), Integer(1)), Word(65535));
        assert_eq!(bin(Operator::Plus, Integer(250), Byte(10)), Integer(260));
        assert_eq!(bin(Operator::Less, Byte(1), Integer(2)), Bool(true));
    }

    #[test]
    fn test_strings() {
        use Val::*;
        assert_eq!(
            bin(Operator::Plus, String("ab".into()), String("cd".into())),
            String("abcd".into())
        );
        assert_eq!(
            bin(Operator::Equal, String("ab".into()), String("ab".into())),
            Bool(true)
        );
        assert_eq!(
            code(Operator::Minus, String("a".into()), String("b".into())),
            ErrorCode::TypeMismatch
        );
        assert_eq!(
            code(Operator::Plus, String("a".into()), Integer(1)),
            ErrorCode::TypeMismatch
        );
        let long: std::string::String = "x".repeat(100);
        assert_eq!(
            code(Operator::Plus, String(long.as_str().into()), String(long.as_str().into())),
            ErrorCode::StringLength
        );
    }

    #[test]
    fn test_errors() {
        use Val::*;
        assert_eq!(code(Operator::Divide, Integer(1), Integer(0)), ErrorCode::DivZero);
        assert_eq!(code(Operator::Modulus, Float(1.0), Integer(0)), ErrorCode::DivZero);
        assert_eq!(code(Operator::Plus, None, Integer(1)), ErrorCode::MissingOperand);
        assert_eq!(
            code(Operator::Plus, Array("a".into()), Integer(1)),
            ErrorCode::TypeMismatch
        );
    }

    #[test]
    fn test_unary() {
        use Val::*;
        assert_eq!(Operation::unary(Operator::Not, Integer(0)).unwrap(), Bool(true));
        assert_eq!(Operation::unary(Operator::Negate, Float(2.0)).unwrap(), Float(-2.0));
        assert_eq!(Operation::unary(Operator::Negate, Bool(true)).unwrap(), Integer(-1));
        assert_eq!(
            Operation::unary(Operator::Negate, String("x".into()))
                .unwrap_err()
                .code(),
            ErrorCode::TypeMismatch
        );
    }
}
