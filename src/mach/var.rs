use super::val::{float_prefix, integer_prefix};
use super::{Val, DEFFN_MAX_ARGS, MEMORY_LEN, VAR_MAX_COUNT, VAR_NAME_LEN};
use crate::error;
use crate::lang::token::Token;
use crate::lang::{Error, Position};
use std::collections::BTreeMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// One flat namespace. A variable is created by its first assignment
/// or declaration and lives until CLEAR or NEW.

#[derive(Debug, Default)]
pub struct Var {
    vars: BTreeMap<Rc<str>, Variable>,
}

/// Type of a variable, fixed by its name when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Float,
    String,
    Byte,
    Word,
    Integer,
    /// User function parameters take whatever they are given.
    Any,
}

impl Kind {
    /// `$` string, `_` or `.b` byte, `.w` word, `.i` integer, else float.
    /// Single letter names are always float.
    pub fn of(name: &str) -> Kind {
        if name.len() < 2 {
            Kind::Float
        } else if name.ends_with('$') {
            Kind::String
        } else if name.ends_with('_') || name.ends_with(".b") {
            Kind::Byte
        } else if name.ends_with(".w") {
            Kind::Word
        } else if name.ends_with(".i") {
            Kind::Integer
        } else {
            Kind::Float
        }
    }

    pub fn zero(self) -> Val {
        match self {
            Kind::Float | Kind::Any => Val::Float(0.0),
            Kind::String => Val::String("".into()),
            Kind::Byte => Val::Byte(0),
            Kind::Word => Val::Word(0),
            Kind::Integer => Val::Integer(0),
        }
    }

    /// Assignment conversion.
    pub fn convert(self, val: Val) -> Result<Val> {
        match (self, val) {
            (_, Val::None) => Err(error!(MissingOperand)),
            (_, Val::Array(_)) | (_, Val::DefFn(_)) => Err(error!(TypeMismatch)),
            (Kind::Any, val) => Ok(val),
            (Kind::String, val @ Val::String(_)) => Ok(val),
            (Kind::String, _) | (_, Val::String(_)) => Err(error!(TypeMismatch)),
            (Kind::Float, val) => Ok(Val::Float(val.numeric()?)),
            (Kind::Integer, val) => Ok(Val::Integer(val.integer()?)),
            (Kind::Word, val) => Ok(Val::Word(val.integer()? as u16)),
            (Kind::Byte, val) => Ok(Val::Byte(val.integer()? as u8)),
        }
    }

    /// Conversion of text typed at INPUT or returned by SYS.
    pub fn parse(self, s: &str) -> Val {
        match self {
            Kind::Float => Val::Float(float_prefix(s)),
            Kind::Integer => Val::Integer(integer_prefix(s)),
            Kind::Word => Val::Word(integer_prefix(s) as u16),
            Kind::Byte => Val::Byte(integer_prefix(s) as u8),
            Kind::String | Kind::Any => Val::String(s.into()),
        }
    }
}

/// FOR/NEXT bookkeeping owned by the loop variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub limit: f32,
    pub step: f32,
    pub resume: Position,
}

#[derive(Debug)]
struct Variable {
    kind: Kind,
    slot: Slot,
}

#[derive(Debug)]
enum Slot {
    Scalar(Val),
    Loop {
        value: f32,
        desc: Box<Loop>,
        active: bool,
    },
    Array(Array),
    DefFn(DefFn),
}

#[derive(Debug)]
struct DefFn {
    argc: usize,
    body: Rc<[Token]>,
}

/// Row major storage. String arrays have one dimension and
/// a fixed width per element.
#[derive(Debug)]
struct Array {
    rows: usize,
    cols: usize,
    width: usize,
    data: Vec<Val>,
}

impl Array {
    fn index(&self, kind: Kind, idx: &[Val]) -> Result<usize> {
        let dims = if self.cols > 0 && kind != Kind::String {
            vec![self.rows, self.cols]
        } else {
            vec![self.rows]
        };
        if idx.len() != dims.len() {
            return Err(error!(ArrayDimension));
        }
        let mut flat = 0;
        for (val, dim) in idx.iter().zip(dims) {
            let i = val.integer()?;
            if i < 0 || i as usize >= dim {
                return Err(error!(ArrayOutOfRange));
            }
            flat = flat * dim + i as usize;
        }
        Ok(flat)
    }

    fn get(&self, kind: Kind, idx: &[Val]) -> Result<Val> {
        let flat = self.index(kind, idx)?;
        Ok(match &self.data[flat] {
            Val::Byte(n) => Val::Integer(*n as i32),
            Val::Word(n) => Val::Integer(*n as i32),
            val => val.clone(),
        })
    }

    fn store(&mut self, kind: Kind, flat: usize, val: Val) -> Result<()> {
        if flat >= self.data.len() {
            return Err(error!(ArrayOutOfRange));
        }
        self.data[flat] = match kind.convert(val)? {
            Val::String(s) if s.chars().count() > self.width => {
                Val::String(s.chars().take(self.width).collect::<String>().into())
            }
            val => val,
        };
        Ok(())
    }
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<Kind> {
        self.vars.get(name).map(|var| var.kind)
    }

    /// Name of the variable bound to a user function parameter.
    pub fn param_name(function: &str, index: usize) -> String {
        format!("{}{}", function, index)
    }

    fn add(&mut self, name: &str, kind: Kind, slot: Slot) -> Result<&mut Variable> {
        if name.len() >= VAR_NAME_LEN {
            return Err(error!(StringLength));
        }
        if self.vars.len() >= VAR_MAX_COUNT {
            return Err(error!(MemOut));
        }
        Ok(self
            .vars
            .entry(name.into())
            .or_insert(Variable { kind, slot }))
    }

    fn entry(&mut self, name: &str) -> Result<&mut Variable> {
        if !self.vars.contains_key(name) {
            let kind = Kind::of(name);
            self.add(name, kind, Slot::Scalar(kind.zero()))?;
        }
        self.vars.get_mut(name).ok_or_else(|| error!(UnknownVar))
    }

    /// Arrays and user functions come back as references.
    pub fn fetch(&self, name: &str) -> Option<Val> {
        self.vars
            .get_key_value(name)
            .map(|(key, var)| match &var.slot {
                Slot::Scalar(val) => val.clone(),
                Slot::Loop { value, .. } => Val::Float(*value),
                Slot::Array(_) => Val::Array(key.clone()),
                Slot::DefFn(_) => Val::DefFn(key.clone()),
            })
    }

    pub fn store(&mut self, name: &str, val: Val) -> Result<()> {
        let var = self.entry(name)?;
        let val = var.kind.convert(val)?;
        match &mut var.slot {
            Slot::Scalar(slot) => *slot = val,
            Slot::Loop { value, .. } => *value = val.numeric()?,
            Slot::Array(_) | Slot::DefFn(_) => return Err(error!(TypeMismatch)),
        }
        Ok(())
    }

    /// Turns a float variable into a running loop.
    pub fn for_loop(&mut self, name: &str, start: f32, desc: Loop) -> Result<()> {
        let var = self.entry(name)?;
        if var.kind != Kind::Float {
            return Err(error!(TypeMismatch));
        }
        match &mut var.slot {
            slot @ Slot::Scalar(_) => {
                *slot = Slot::Loop {
                    value: start,
                    desc: Box::new(desc),
                    active: true,
                }
            }
            Slot::Loop {
                value,
                desc: current,
                active,
            } => {
                *value = start;
                **current = desc;
                *active = true;
            }
            Slot::Array(_) | Slot::DefFn(_) => return Err(error!(TypeMismatch)),
        }
        Ok(())
    }

    /// Steps a loop. Returns where to resume while the loop runs.
    pub fn next_loop(&mut self, name: &str) -> Result<Option<Position>> {
        match self.vars.get_mut(name).map(|var| &mut var.slot) {
            Some(Slot::Loop {
                value,
                desc,
                active,
            }) if *active => {
                *value += desc.step;
                let more = (desc.step > 0.0 && *value <= desc.limit)
                    || (desc.step < 0.0 && *value >= desc.limit);
                if more {
                    Ok(Some(desc.resume))
                } else {
                    *active = false;
                    Ok(None)
                }
            }
            _ => Err(error!(IncompleteFor)),
        }
    }

    /// `cols` of zero makes a one dimensional array. For string
    /// arrays `cols` is the element width.
    pub fn dim(&mut self, name: &str, rows: usize, cols: usize) -> Result<()> {
        if self.vars.contains_key(name) {
            return Err(error!(ArrayRedefine));
        }
        let kind = Kind::of(name);
        if rows == 0 || (kind == Kind::String && cols == 0) {
            return Err(error!(ArrayDimension));
        }
        let array = if kind == Kind::String {
            if rows.saturating_mul(cols) > MEMORY_LEN {
                return Err(error!(MemOut));
            }
            Array {
                rows,
                cols: 0,
                width: cols,
                data: vec![kind.zero(); rows],
            }
        } else {
            let len = rows.saturating_mul(cols.max(1));
            if len > MEMORY_LEN {
                return Err(error!(MemOut));
            }
            Array {
                rows,
                cols,
                width: 0,
                data: vec![kind.zero(); len],
            }
        };
        self.add(name, kind, Slot::Array(array))?;
        Ok(())
    }

    pub fn array_get(&self, name: &str, idx: &[Val]) -> Result<Val> {
        match self.vars.get(name) {
            Some(Variable {
                kind,
                slot: Slot::Array(array),
            }) => array.get(*kind, idx),
            Some(_) => Err(error!(TypeMismatch)),
            None => Err(error!(UnknownVar)),
        }
    }

    /// Stores consecutive elements starting at `idx`, or at the
    /// first element when no index is given.
    pub fn array_set(&mut self, name: &str, idx: &[Val], values: Vec<Val>) -> Result<()> {
        match self.vars.get_mut(name) {
            Some(Variable {
                kind,
                slot: Slot::Array(array),
            }) => {
                let mut flat = if idx.is_empty() {
                    0
                } else {
                    array.index(*kind, idx)?
                };
                for val in values {
                    array.store(*kind, flat, val)?;
                    flat += 1;
                }
                Ok(())
            }
            Some(_) => Err(error!(TypeMismatch)),
            None => Err(error!(UnknownVar)),
        }
    }

    /// Registers a user function and its parameter variables.
    pub fn define(&mut self, name: &str, params: usize, body: Rc<[Token]>) -> Result<()> {
        if params >= DEFFN_MAX_ARGS {
            return Err(error!(DefFnArguments));
        }
        if self.vars.contains_key(name) {
            return Err(error!(DefFnRedefine));
        }
        for index in 0..params {
            if self.vars.contains_key(Var::param_name(name, index).as_str()) {
                return Err(error!(VarRedefine));
            }
        }
        let argc = params;
        self.add(name, Kind::of(name), Slot::DefFn(DefFn { argc, body }))?;
        for index in 0..params {
            let param = Var::param_name(name, index);
            self.add(&param, Kind::Any, Slot::Scalar(Kind::Any.zero()))?;
        }
        Ok(())
    }

    /// Binds call arguments to the parameter variables and hands
    /// back the body to evaluate.
    pub fn bind(&mut self, name: &str, args: Vec<Val>) -> Result<Rc<[Token]>> {
        let (argc, body) = match self.vars.get(name) {
            Some(Variable {
                slot: Slot::DefFn(f),
                ..
            }) => (f.argc, f.body.clone()),
            Some(_) => return Err(error!(TypeMismatch)),
            None => return Err(error!(UnknownFunc)),
        };
        if args.len() < argc {
            return Err(error!(FewArguments));
        }
        if args.len() > argc {
            return Err(error!(ManyArguments));
        }
        for (index, val) in args.into_iter().enumerate() {
            self.store(&Var::param_name(name, index), val)?;
        }
        Ok(body)
    }
}
