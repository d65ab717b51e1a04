use super::rpn::Pending;
use super::val::parse_literal;
use super::{Operation, Runtime, Val};
use crate::error;
use crate::lang::token::{Bracket, Delim, Lexeme, Operator, Word};
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Expression evaluation
///
/// Reads tokens from the current position, leaving the values on the
/// queue. Stops at the end of the statement or at a statement word
/// such as THEN, TO or STEP, which stays current for the caller.

impl Runtime {
    /// `lead` is the delimiter of the statement word, so `print(1)`
    /// starts inside the bracket.
    pub(super) fn eval(&mut self, lead: Delim) -> Result<()> {
        self.evaluate(lead, false)
    }

    /// Evaluates up to the bracket that closes first and steps past it.
    pub(super) fn eval_bracketed(&mut self, lead: Delim) -> Result<()> {
        self.evaluate(lead, true)
    }

    /// Evaluates one value. Nothing at all is a missing operand.
    pub(super) fn eval_value(&mut self, lead: Delim) -> Result<Val> {
        self.eval(lead)?;
        let mut vals = self.ctx.drain();
        match vals.len() {
            0 => Err(error!(MissingOperand)),
            1 => Ok(vals.pop().unwrap_or_default()),
            _ => Err(error!(ManyArguments)),
        }
    }

    fn evaluate(&mut self, lead: Delim, bracketed: bool) -> Result<()> {
        self.ctx.purge();
        if let Delim::Open(bracket) = lead {
            self.ctx.stack.push(Pending::Open(bracket))?;
            self.ctx.lists.open();
        }
        loop {
            let token = match self.ctx.lists.token() {
                Some(token) => token.clone(),
                None => {
                    if self.leave_body()? {
                        continue;
                    }
                    break;
                }
            };
            let level = self.ctx.lists.level();
            let mut delimited = true;
            match &token.lexeme {
                Lexeme::Word(word) if word.is_primary() => {
                    if self.leave_body()? {
                        continue;
                    }
                    break;
                }
                Lexeme::Word(word) => {
                    let floor = self.ctx.queue.len();
                    self.ctx.stack.push(Pending::Call(*word, floor))?;
                }
                Lexeme::Str(s) => self.ctx.queue.push(Val::String(s.clone()))?,
                Lexeme::Text(s) => delimited = self.operand(s, token.delim)?,
                Lexeme::Empty => {}
            }
            if delimited {
                match token.delim {
                    delim if delim.ends_statement() => {
                        if self.leave_body()? {
                            continue;
                        }
                        break;
                    }
                    Delim::Space => {}
                    Delim::Comma => self.comma()?,
                    Delim::Open(bracket) => {
                        self.ctx.stack.push(Pending::Open(bracket))?;
                        self.ctx.lists.open();
                    }
                    Delim::Close(bracket) => {
                        self.close(bracket)?;
                        if bracketed && level == self.ctx.lists.level() && self.ctx.lists.depth() == 0
                        {
                            self.ctx.lists.advance();
                            break;
                        }
                    }
                    Delim::Op(op) => self.operator(op)?,
                    _ => {}
                }
            }
            if level == self.ctx.lists.level() {
                self.ctx.lists.advance();
            }
        }
        if self.ctx.lists.depth() != 0 {
            return Err(error!(ParMismatch));
        }
        while let Some(pending) = self.ctx.stack.last().copied() {
            self.ctx.stack.pop()?;
            self.reduce(pending)?;
        }
        Ok(())
    }

    /// Pushes a literal or a variable. Arrays and user functions open
    /// their bracket here, so the delimiter is already dealt with
    /// when this returns false.
    fn operand(&mut self, text: &str, delim: Delim) -> Result<bool> {
        if let Some(val) = parse_literal(text) {
            self.ctx.queue.push(val)?;
            return Ok(true);
        }
        let (negate, name) = match text.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if name.is_empty() {
            if negate {
                self.ctx.stack.push(Pending::Op(Operator::Negate))?;
            }
            return Ok(true);
        }
        match self.var.fetch(name) {
            None => Err(error!(UnknownVar)),
            Some(val @ Val::Array(_)) => self.subscript(Word::Array, Bracket::Square, val, negate, delim),
            Some(val @ Val::DefFn(_)) => self.subscript(Word::DefFn, Bracket::Paren, val, negate, delim),
            Some(val) => {
                let val = if negate {
                    Operation::unary(Operator::Negate, val)?
                } else {
                    val
                };
                self.ctx.queue.push(val)?;
                Ok(true)
            }
        }
    }

    fn subscript(
        &mut self,
        word: Word,
        bracket: Bracket,
        val: Val,
        negate: bool,
        delim: Delim,
    ) -> Result<bool> {
        if delim != Delim::Open(bracket) {
            return Err(error!(ParMismatch));
        }
        if negate {
            self.ctx.stack.push(Pending::Op(Operator::Negate))?;
        }
        let floor = self.ctx.queue.len();
        self.ctx.stack.push(Pending::Call(word, floor))?;
        self.ctx.stack.push(Pending::Open(bracket))?;
        self.ctx.queue.push(val)?;
        self.ctx.lists.open();
        Ok(false)
    }

    /// Inside brackets a comma finishes one argument. Outside it
    /// finishes one value of a list.
    fn comma(&mut self) -> Result<()> {
        let inside = self.ctx.lists.depth() > 0;
        while let Some(pending) = self.ctx.stack.last().copied() {
            match pending {
                Pending::Open(_) if inside => return Ok(()),
                Pending::Frame => break,
                Pending::Open(_) => return Err(error!(ParMismatch)),
                _ => {
                    self.ctx.stack.pop()?;
                    self.reduce(pending)?;
                }
            }
        }
        if inside {
            return Err(error!(ParMismatch));
        }
        Ok(())
    }

    fn close(&mut self, bracket: Bracket) -> Result<()> {
        self.ctx.lists.close()?;
        loop {
            match self.ctx.stack.last().copied() {
                Some(Pending::Open(open)) => {
                    self.ctx.stack.pop()?;
                    if open != bracket {
                        return Err(error!(ParMismatch));
                    }
                    break;
                }
                Some(Pending::Frame) | None => return Err(error!(ParMismatch)),
                Some(pending) => {
                    self.ctx.stack.pop()?;
                    self.reduce(pending)?;
                }
            }
        }
        if let Some(call @ Pending::Call(..)) = self.ctx.stack.last().copied() {
            self.ctx.stack.pop()?;
            self.reduce(call)?;
        }
        Ok(())
    }

    /// `^` binds to the right and prefix operators wait for their
    /// operand, so neither reduces what is already pending.
    fn operator(&mut self, op: Operator) -> Result<()> {
        if op != Operator::Power && !op.is_unary() {
            while let Some(pending) = self.ctx.stack.last().copied() {
                if pending.precedence() < op.precedence() {
                    break;
                }
                self.ctx.stack.pop()?;
                self.reduce(pending)?;
            }
        }
        self.ctx.stack.push(Pending::Op(op))
    }

    fn reduce(&mut self, pending: Pending) -> Result<()> {
        match pending {
            Pending::Op(op) if op.is_unary() => {
                let val = self.ctx.queue.pop().unwrap_or_default();
                let val = Operation::unary(op, val)?;
                self.ctx.queue.push(val)
            }
            Pending::Op(op) => {
                let rhs = self.ctx.queue.pop().unwrap_or_default();
                let lhs = self.ctx.queue.pop().unwrap_or_default();
                let val = Operation::binary(op, lhs, rhs)?;
                self.ctx.queue.push(val)
            }
            Pending::Call(word, floor) => {
                let args = self.ctx.queue.split_off(floor);
                self.call(word, args)
            }
            Pending::Open(_) | Pending::Frame => Err(error!(ParMismatch)),
        }
    }

    /// Finishes a user function body and returns to the caller's
    /// token after the call. False when no body is being evaluated.
    fn leave_body(&mut self) -> Result<bool> {
        if self.ctx.lists.level() == 0 {
            return Ok(false);
        }
        if self.ctx.lists.depth() != 0 {
            return Err(error!(ParMismatch));
        }
        loop {
            match self.ctx.stack.pop() {
                Ok(Pending::Frame) => break,
                Ok(Pending::Open(_)) | Err(_) => return Err(error!(ParMismatch)),
                Ok(pending) => self.reduce(pending)?,
            }
        }
        self.ctx.lists.leave()?;
        self.ctx.lists.advance();
        Ok(true)
    }

    /// Runs a user function: binds its arguments and switches to its
    /// body. The caller's pending operators sit below the frame.
    pub(super) fn enter_body(&mut self, name: &str, args: Vec<Val>) -> Result<()> {
        let body = self.var.bind(name, args)?;
        self.ctx.stack.push(Pending::Frame)?;
        self.ctx.lists.enter(body)
    }
}
