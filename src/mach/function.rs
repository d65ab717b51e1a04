use super::val::parse_convert;
use super::{Runtime, Val, MEMORY_LEN};
use crate::error;
use crate::lang::token::Word;
use crate::lang::Error;
use rand::Rng;
use std::ops::RangeInclusive;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Calls receive only the arguments inside their own brackets.

pub struct Function {}

impl Function {
    pub fn arity(word: Word) -> RangeInclusive<usize> {
        match word {
            Word::Inkey => 0..=0,
            Word::Poke
            | Word::At
            | Word::Min
            | Word::Max
            | Word::BitAnd
            | Word::BitOr
            | Word::BitXor
            | Word::ShiftLeft
            | Word::ShiftRight => 2..=2,
            Word::Word => 1..=2,
            _ => 1..=1,
        }
    }

    fn check(word: Word, args: &[Val]) -> Result<()> {
        let arity = Function::arity(word);
        if args.len() < *arity.start() {
            return Err(error!(FewArguments));
        }
        if args.len() > *arity.end() {
            return Err(error!(ManyArguments));
        }
        Ok(())
    }

    /// Functions that only look at their arguments.
    pub fn pure(word: Word, args: &[Val]) -> Result<Val> {
        Function::check(word, args)?;
        let val = match args.first() {
            Some(val) => val,
            None => return Err(error!(UnknownFunc)),
        };
        match word {
            Word::ValStr => match val {
                Val::None => Err(error!(MissingOperand)),
                val => Ok(Val::String(val.to_string().into())),
            },
            Word::HexStr => {
                let s = match val {
                    Val::Byte(n) => format!("{:>2x}", n),
                    Val::Word(n) => format!("{:>4x}", n),
                    val => format!("{:>8x}", val.integer()? as u32),
                };
                Ok(Val::String(s.into()))
            }
            Word::Int => Ok(Val::Integer(Function::convert(val)?)),
            Word::Byte => Ok(Val::Byte(Function::convert(val)? as u8)),
            Word::Word => match args {
                [Val::Byte(msb), Val::Byte(lsb)] => {
                    Ok(Val::Word((*msb as u16) << 8 | *lsb as u16))
                }
                [_, _] => Err(error!(TypeMismatch)),
                _ => Ok(Val::Word(Function::convert(val)? as u16)),
            },
            Word::Abs => match val {
                Val::Float(n) => Ok(Val::Float(n.abs())),
                val => Ok(Val::Integer(val.integer()?.wrapping_abs())),
            },
            Word::Sin => Ok(Val::Float(val.numeric()?.sin())),
            Word::Cos => Ok(Val::Float(val.numeric()?.cos())),
            Word::Tan => Ok(Val::Float(val.numeric()?.tan())),
            Word::Atn => Ok(Val::Float(val.numeric()?.atan())),
            Word::Sqr => Ok(Val::Float(val.numeric()?.sqrt())),
            Word::Log => Ok(Val::Float(val.numeric()?.ln())),
            Word::Deg => Ok(Val::Float(val.numeric()?.to_degrees())),
            Word::Rad => Ok(Val::Float(val.numeric()?.to_radians())),
            Word::Min | Word::Max => {
                let (a, b) = (&args[0], &args[1]);
                let less = a.numeric()? < b.numeric()?;
                Ok(if less == (word == Word::Min) {
                    a.clone()
                } else {
                    b.clone()
                })
            }
            Word::BitAnd | Word::BitOr | Word::BitXor | Word::ShiftLeft | Word::ShiftRight => {
                let (a, b) = (args[0].integer()?, args[1].integer()?);
                Ok(Val::Integer(match word {
                    Word::BitAnd => a & b,
                    Word::BitOr => a | b,
                    Word::BitXor => a ^ b,
                    Word::ShiftLeft => a.wrapping_shl(b as u32),
                    _ => a.wrapping_shr(b as u32),
                }))
            }
            _ => Err(error!(UnknownFunc)),
        }
    }

    /// Strings convert with `b` marking binary digits.
    fn convert(val: &Val) -> Result<i32> {
        match val {
            Val::String(s) => Ok(parse_convert(s)),
            val => val.integer(),
        }
    }
}

impl Runtime {
    /// Dispatches a call and leaves its result, if any, on the queue.
    pub(super) fn call(&mut self, word: Word, mut args: Vec<Val>) -> Result<()> {
        let val = match word {
            Word::Array => {
                let name = match args.first() {
                    Some(Val::Array(name)) => name.clone(),
                    _ => return Err(error!(TypeMismatch)),
                };
                self.var.array_get(&name, &args[1..])?
            }
            Word::DefFn => {
                let name = match args.first() {
                    Some(Val::DefFn(name)) => name.clone(),
                    _ => return Err(error!(TypeMismatch)),
                };
                args.remove(0);
                return self.enter_body(&name, args);
            }
            word => {
                if word.is_primary() {
                    return Err(error!(UnknownFunc));
                }
                if word.takes_operand() && args.is_empty() {
                    return Err(error!(MissingOperand));
                }
                Function::check(word, &args)?;
                self.function(word, &args)?
            }
        };
        if !val.is_none() {
            self.ctx.queue.push(val)?;
        }
        Ok(())
    }

    fn function(&mut self, word: Word, args: &[Val]) -> Result<Val> {
        match word {
            Word::Peek => {
                let addr = self.address(&args[0], 4)?;
                let mut bytes = [0; 4];
                bytes.copy_from_slice(&self.memory[addr..addr + 4]);
                Ok(Val::Integer(u32::from_le_bytes(bytes) as i32))
            }
            Word::Poke => {
                let val = &args[1];
                let bytes = match val {
                    Val::Byte(n) => vec![*n],
                    Val::Word(n) => n.to_le_bytes().to_vec(),
                    Val::Float(f) => (*f as u32).to_le_bytes().to_vec(),
                    val => val.integer()?.to_le_bytes().to_vec(),
                };
                let addr = self.address(&args[0], bytes.len())?;
                self.memory[addr..addr + bytes.len()].copy_from_slice(&bytes);
                Ok(Val::None)
            }
            Word::At => {
                let col = Runtime::colour(&args[0])?;
                let row = Runtime::colour(&args[1])?;
                if col == 0 || row == 0 || !self.host.at(col, row) {
                    return Err(error!(VarOutOfRange));
                }
                Ok(Val::None)
            }
            Word::Ink | Word::Paper => {
                let colour = Runtime::colour(&args[0])?;
                let raw = matches!(args[0], Val::Byte(_));
                if word == Word::Ink {
                    self.host.ink(colour, raw);
                } else {
                    self.host.paper(colour, raw);
                }
                Ok(Val::None)
            }
            Word::Rnd => {
                let n = args[0].integer()?;
                if n <= 0 {
                    return Ok(Val::Float(0.0));
                }
                Ok(Val::Float(self.rng.gen_range(0..n) as f32))
            }
            Word::Inkey => Ok(Val::Byte(self.host.read_key().unwrap_or(0))),
            word => Function::pure(word, args),
        }
    }

    fn address(&self, val: &Val, len: usize) -> Result<usize> {
        let addr = val.integer()?;
        if addr < 0 || addr as usize + len > MEMORY_LEN {
            return Err(error!(VarOutOfRange));
        }
        Ok(addr as usize)
    }

    /// Non-negative numeric parameter for the screen.
    pub(super) fn colour(val: &Val) -> Result<u32> {
        let n = val.integer()?;
        if n < 0 {
            return Err(error!(VarOutOfRange));
        }
        Ok(n as u32)
    }
}
