use super::runtime::{State, Status};
use super::{Kind, Loop, Runtime, Val, Var, DEFAULT_FILE_NAME, DEFFN_MAX_ARGS};
use crate::error;
use crate::lang::token::{Bracket, Delim, Lexeme, Operator, Token, Word};
use crate::lang::{Error, LineNumber, Position};
use std::rc::Rc;
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

/// ## Statements
///
/// A handler starts with the token after its keyword current and the
/// keyword's delimiter as `lead`. It returns with the token that
/// ended the statement current.

/// End of line or `:` right after the keyword.
pub(super) fn has_args(lead: Delim) -> bool {
    !matches!(lead, Delim::End | Delim::Colon)
}

impl Runtime {
    /// Executes the statements of the current line.
    pub(super) fn line_eval(&mut self) -> Result<Status> {
        loop {
            let token = match self.ctx.lists.token() {
                Some(token) => token.clone(),
                None => return Ok(Status::Ok),
            };
            match (&token.lexeme, token.delim) {
                (Lexeme::Empty, Delim::End) => return Ok(Status::Skip),
                (Lexeme::Empty, Delim::Colon) => {}
                (Lexeme::Text(_), Delim::Op(Operator::Equal))
                | (Lexeme::Text(_), Delim::Open(Bracket::Square)) => {
                    self.assign()?;
                }
                (Lexeme::Text(name), _) => match self.var.fetch(name) {
                    Some(Val::DefFn(_)) => self.print_results()?,
                    _ => return Err(error!(UnknownFunc)),
                },
                (Lexeme::Word(word), delim) if word.is_primary() => {
                    if delim != Delim::Colon {
                        self.ctx.lists.advance();
                    }
                    let status = self.statement(*word, delim)?;
                    if status != Status::Ok {
                        return Ok(status);
                    }
                }
                (Lexeme::Word(_), _) => self.print_results()?,
                _ => return Err(error!(UnknownFunc)),
            }
            match self.ctx.lists.delim() {
                Delim::Semicolon => return Err(error!(InvalidDelimiter)),
                Delim::Colon => {
                    self.cursor.statement = self.cursor.statement.saturating_add(1);
                }
                _ if self.ctx.lists.word() == Some(Word::Then) => {}
                _ => return Ok(Status::Ok),
            }
            self.ctx.lists.advance();
        }
    }

    /// A function called as a statement prints each value it leaves.
    fn print_results(&mut self) -> Result<()> {
        self.eval(Delim::Space)?;
        for val in self.ctx.drain() {
            self.host.put_str(&format!("{}\n", val));
        }
        Ok(())
    }

    fn statement(&mut self, word: Word, lead: Delim) -> Result<Status> {
        match word {
            Word::Rem => Ok(Status::Skip),
            Word::If => self.r#if(lead),
            Word::Then => Ok(Status::Ok),
            Word::Goto => self.goto(lead),
            Word::Gosub => self.gosub(lead),
            Word::Return => self.r#return(),
            Word::For => self.r#for(lead),
            Word::To | Word::Step => Err(error!(IncompleteFor)),
            Word::Next => self.next(lead),
            Word::Stop => Ok(Status::Stop),
            Word::Run => self.run_from(lead),
            Word::Cont => self.cont(),
            Word::List => self.list(lead),
            Word::New => self.new_program(),
            Word::Clear => self.clear(),
            Word::Load => self.load(lead),
            Word::Save => self.save(lead),
            Word::Print => self.print(lead),
            Word::Input => self.input(lead),
            Word::Pause => self.pause(),
            Word::Sleep => self.sleep(lead),
            Word::Cls => {
                self.host.cls();
                Ok(Status::Ok)
            }
            Word::Plot => self.plot(lead),
            Word::Draw => self.draw(lead),
            Word::Rect => self.rect(lead),
            Word::Circle => self.circle(lead),
            Word::Let => {
                if !has_args(lead) {
                    return Err(error!(MissingOperand));
                }
                self.assign()
            }
            Word::Dim => self.dim(lead),
            Word::Def => self.def(lead),
            Word::Sys => self.sys(lead),
            _ => Err(error!(UnknownFunc)),
        }
    }

    fn r#if(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let condition = self.eval_value(lead)?.is_true()?;
        if self.ctx.lists.word() != Some(Word::Then) {
            return Err(error!(NoThen));
        }
        Ok(if condition { Status::Ok } else { Status::Skip })
    }

    /// The target must be a program line. The immediate line is not one.
    fn line_number(&mut self, lead: Delim) -> Result<LineNumber> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let n = self.eval_value(lead)?.integer()?;
        if n < 0 || n > LineNumber::max_value() as i32 {
            return Err(error!(InvalidLine));
        }
        let n = n as LineNumber;
        if !self.listing.contains(n) {
            return Err(error!(InvalidLine));
        }
        Ok(n)
    }

    fn goto(&mut self, lead: Delim) -> Result<Status> {
        let line = self.line_number(lead)?;
        self.target = Position::new(line, 0);
        Ok(Status::Jump)
    }

    fn gosub(&mut self, lead: Delim) -> Result<Status> {
        let line = self.line_number(lead)?;
        let back = self.return_point();
        self.gosub.push(back)?;
        debug!(line, %back, "gosub");
        self.target = Position::new(line, 0);
        Ok(Status::Jump)
    }

    fn r#return(&mut self) -> Result<Status> {
        self.target = self.gosub.pop()?;
        debug!(to = %self.target, "return");
        Ok(Status::Jump)
    }

    fn r#for(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let name = self.target_name()?;
        if self.ctx.lists.delim() != Delim::Op(Operator::Equal) {
            return Err(error!(MissingOperator));
        }
        let kind = self.var.kind(&name).unwrap_or_else(|| Kind::of(&name));
        if kind != Kind::Float {
            return Err(error!(TypeMismatch));
        }
        self.ctx.lists.advance();
        let start = self.eval_value(Delim::Space)?.numeric()?;
        if self.ctx.lists.word() != Some(Word::To) {
            return Err(error!(IncompleteFor));
        }
        self.ctx.lists.advance();
        let limit = self.eval_value(Delim::Space)?.numeric()?;
        let step = if self.ctx.lists.word() == Some(Word::Step) {
            self.ctx.lists.advance();
            self.eval_value(Delim::Space)?.numeric()?
        } else if start < limit {
            1.0
        } else {
            -1.0
        };
        let resume = self.return_point();
        self.var.for_loop(&name, start, Loop { limit, step, resume })?;
        Ok(Status::Ok)
    }

    fn next(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(IncompleteFor));
        }
        let name = match self.ctx.lists.token().and_then(Token::text) {
            Some(name) => name.to_string(),
            None => return Err(error!(IncompleteFor)),
        };
        match self.var.next_loop(&name)? {
            Some(resume) => {
                self.target = resume;
                Ok(Status::Jump)
            }
            None => Ok(Status::Ok),
        }
    }

    fn run_from(&mut self, lead: Delim) -> Result<Status> {
        let from = if has_args(lead) {
            self.eval_value(lead)?.integer()?
        } else {
            0
        };
        self.start(from)?;
        Ok(Status::Cont)
    }

    fn cont(&mut self) -> Result<Status> {
        if self.resume() {
            Ok(Status::Cont)
        } else {
            Ok(Status::Ok)
        }
    }

    fn list(&mut self, lead: Delim) -> Result<Status> {
        let (start, count) = if has_args(lead) {
            self.eval(lead)?;
            match self.ctx.drain().as_slice() {
                [] => (0, 0),
                [start] => (start.integer()?, 0),
                [start, count] => (start.integer()?, count.integer()?),
                _ => return Err(error!(ManyArguments)),
            }
        } else {
            (0, 0)
        };
        if start < 0 || count < 0 || start > LineNumber::max_value() as i32 {
            return Err(error!(InvalidLine));
        }
        let text = self.listing.list(start as LineNumber, count as usize);
        self.host.put_str(&text);
        Ok(Status::Ok)
    }

    /// Forgets the program first, then everything it made.
    fn new_program(&mut self) -> Result<Status> {
        debug!("new");
        self.listing.clear();
        self.cursor.next = None;
        self.var.clear();
        self.gosub.clear();
        self.cont = None;
        self.cursor.state = State::New;
        Ok(Status::Ok)
    }

    fn clear(&mut self) -> Result<Status> {
        debug!("clear");
        self.var.clear();
        self.gosub.clear();
        Ok(Status::Ok)
    }

    fn file_name(&mut self, lead: Delim) -> Result<String> {
        if !has_args(lead) {
            return Ok(DEFAULT_FILE_NAME.to_string());
        }
        self.eval(lead)?;
        match self.ctx.drain().as_slice() {
            [] => Ok(DEFAULT_FILE_NAME.to_string()),
            [Val::String(s)] if s.is_empty() => Ok(DEFAULT_FILE_NAME.to_string()),
            [Val::String(s)] => Ok(s.to_string()),
            [Val::None] => Err(error!(FewArguments)),
            [_] => Err(error!(TypeMismatch)),
            _ => Err(error!(ManyArguments)),
        }
    }

    fn load(&mut self, lead: Delim) -> Result<Status> {
        let name = self.file_name(lead)?;
        let text = self
            .host
            .load(&name)
            .map_err(|_| error!(FileNotFound))?;
        let count = self.listing.load_str(&text)?;
        debug!(%name, count, "load");
        Ok(Status::Ok)
    }

    fn save(&mut self, lead: Delim) -> Result<Status> {
        let name = self.file_name(lead)?;
        let text = self.listing.save_string();
        self.host
            .save(&name, &text)
            .map_err(|_| error!(FileCantOpen))?;
        debug!(%name, "save");
        Ok(Status::Ok)
    }

    /// Values separated by `,` go on separate lines, `;` joins them.
    /// A trailing `;` keeps the cursor on the line.
    fn print(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            self.host.put_char('\n');
            return Ok(Status::Ok);
        }
        let mut lead = lead;
        loop {
            self.eval(lead)?;
            lead = Delim::Space;
            let text = self
                .ctx
                .drain()
                .iter()
                .map(Val::to_string)
                .collect::<Vec<String>>()
                .join("\n");
            self.host.put_str(&text);
            if self.ctx.lists.delim() != Delim::Semicolon {
                self.host.put_char('\n');
                break;
            }
            self.ctx.lists.advance();
            match self.ctx.lists.token() {
                None => break,
                Some(Token {
                    lexeme: Lexeme::Empty,
                    delim: Delim::End,
                })
                | Some(Token {
                    lexeme: Lexeme::Empty,
                    delim: Delim::Colon,
                }) => break,
                Some(_) => {}
            }
        }
        Ok(Status::Ok)
    }

    /// Functions and prompt text come before the variables. The
    /// prompt is shown once, before the first read.
    fn input(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let mut prompt = String::new();
        loop {
            let token = match self.ctx.lists.token() {
                Some(token) => token.clone(),
                None => return Err(error!(MissingOperand)),
            };
            match &token.lexeme {
                Lexeme::Word(word) if !word.is_primary() => self.eval_bracketed(Delim::Space)?,
                Lexeme::Str(s) => {
                    prompt.push_str(s);
                    self.ctx.lists.advance();
                }
                Lexeme::Text(name) => {
                    let kind = self.var.kind(name).unwrap_or_else(|| Kind::of(name));
                    let line = self
                        .host
                        .read_line(&std::mem::take(&mut prompt))
                        .unwrap_or_default();
                    let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
                    self.var.store(name, kind.parse(line))?;
                    if token.delim != Delim::Comma {
                        return Ok(Status::Ok);
                    }
                    self.ctx.lists.advance();
                }
                Lexeme::Word(_) => return Err(error!(ReservedName)),
                Lexeme::Empty => return Err(error!(MissingOperand)),
            }
        }
    }

    fn pause(&mut self) -> Result<Status> {
        if self.host.wait_key().is_none() {
            self.interrupted = true;
        }
        Ok(Status::Ok)
    }

    fn sleep(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(FewArguments));
        }
        let ms = Runtime::colour(&self.eval_value(lead)?)?;
        self.host.sleep(ms);
        Ok(Status::Ok)
    }

    /// Name of the variable a statement writes to.
    fn target_name(&self) -> Result<Rc<str>> {
        match self.ctx.lists.token().map(|t| &t.lexeme) {
            Some(Lexeme::Text(name)) => Ok(name.clone()),
            Some(Lexeme::Word(_)) => Err(error!(ReservedName)),
            _ => Err(error!(MissingOperand)),
        }
    }

    fn assign(&mut self) -> Result<Status> {
        let name = self.target_name()?;
        match self.ctx.lists.delim() {
            Delim::Open(Bracket::Square) => return self.array_assign(&name),
            Delim::Op(Operator::Equal) => {}
            _ => return Err(error!(MissingOperator)),
        }
        self.ctx.lists.advance();
        let val = self.eval_value(Delim::Space)?;
        self.var.store(&name, val)?;
        Ok(Status::Ok)
    }

    /// The token after a closing bracket must be a bare `=`.
    fn expect_equal(&mut self) -> Result<()> {
        match self.ctx.lists.token() {
            Some(Token {
                lexeme: Lexeme::Empty,
                delim: Delim::Op(Operator::Equal),
            }) => {
                self.ctx.lists.advance();
                Ok(())
            }
            _ => Err(error!(MissingEqual)),
        }
    }

    /// `a[i] = v, ...` stores consecutive elements from `i`.
    fn array_assign(&mut self, name: &str) -> Result<Status> {
        self.ctx.lists.advance();
        self.eval_bracketed(Delim::Open(Bracket::Square))?;
        let idx = self.ctx.drain();
        self.expect_equal()?;
        self.eval(Delim::Space)?;
        let values = self.ctx.drain();
        if values.is_empty() {
            return Err(error!(MissingOperand));
        }
        self.var.array_set(name, &idx, values)?;
        Ok(Status::Ok)
    }

    /// `dim a[rows[, cols]] [= v, ...]`. String arrays take the
    /// element width as the second size.
    fn dim(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let name = self.target_name()?;
        if self.ctx.lists.delim() != Delim::Open(Bracket::Square) {
            return Err(error!(ParMismatch));
        }
        if self.var.contains(&name) {
            return Err(error!(ArrayRedefine));
        }
        self.ctx.lists.advance();
        self.eval_bracketed(Delim::Open(Bracket::Square))?;
        let size = |val: &Val| -> Result<usize> {
            match val.integer()? {
                n if n < 0 => Err(error!(ArrayDimension)),
                n => Ok(n as usize),
            }
        };
        let (rows, cols) = match self.ctx.drain().as_slice() {
            [rows] => (size(rows)?, 0),
            [rows, cols] => (size(rows)?, size(cols)?),
            _ => return Err(error!(ArrayDimension)),
        };
        self.var.dim(&name, rows, cols)?;
        if let Some(Token {
            lexeme: Lexeme::Empty,
            delim: Delim::Op(Operator::Equal),
        }) = self.ctx.lists.token()
        {
            self.ctx.lists.advance();
            self.eval(Delim::Space)?;
            let values = self.ctx.drain();
            self.var.array_set(&name, &[], values)?;
        }
        Ok(Status::Ok)
    }

    /// `def f(a, b) = expr`. Parameters become the variables `f0`,
    /// `f1`... and the body is kept with its names rewritten.
    fn def(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(MissingOperand));
        }
        let fn_prefix = matches!(
            self.ctx.lists.token(),
            Some(Token {
                lexeme: Lexeme::Text(word),
                delim: Delim::Space,
            }) if word.eq_ignore_ascii_case("fn")
        );
        if fn_prefix {
            self.ctx.lists.advance();
        }
        let name = self.target_name()?;
        if self.ctx.lists.delim() != Delim::Open(Bracket::Paren) {
            return Err(error!(ParMismatch));
        }
        if self.var.contains(&name) {
            return Err(error!(DefFnRedefine));
        }
        let mut params: Vec<Rc<str>> = Vec::new();
        loop {
            self.ctx.lists.advance();
            let token = match self.ctx.lists.token() {
                Some(token) => token.clone(),
                None => return Err(error!(ParMismatch)),
            };
            match token.lexeme {
                Lexeme::Text(param) => params.push(param),
                Lexeme::Empty => {}
                _ => return Err(error!(ReservedName)),
            }
            match token.delim {
                Delim::Comma => {}
                Delim::Close(Bracket::Paren) => break,
                _ => return Err(error!(ParMismatch)),
            }
        }
        if params.len() >= DEFFN_MAX_ARGS {
            return Err(error!(DefFnArguments));
        }
        self.ctx.lists.advance();
        match self.ctx.lists.token() {
            Some(Token {
                lexeme: Lexeme::Empty,
                delim: Delim::Op(Operator::Equal),
            }) => {}
            _ => return Err(error!(MissingEqual)),
        }
        let tokens = self.ctx.lists.tokens();
        let start = self.ctx.lists.ptr() + 1;
        let mut body = Vec::new();
        for token in tokens.iter().skip(start) {
            let mut token = token.clone();
            if let Lexeme::Text(text) = &token.lexeme {
                if let Some(renamed) = rename_param(text, &name, &params) {
                    token.lexeme = Lexeme::Text(renamed.into());
                }
            }
            let last = token.delim.ends_statement();
            body.push(token);
            if last {
                break;
            }
        }
        if body.is_empty() {
            return Err(error!(MissingOperand));
        }
        self.ctx.lists.set_ptr(start + body.len() - 1);
        self.var.define(&name, params.len(), body.into())?;
        debug!(%name, params = params.len(), "def");
        Ok(Status::Ok)
    }

    /// `sys "command" [, "var", ...]` hands the command to the host
    /// and spreads the words of the reply over the named variables.
    fn sys(&mut self, lead: Delim) -> Result<Status> {
        if !has_args(lead) {
            return Err(error!(FewArguments));
        }
        self.eval(lead)?;
        let mut args = self.ctx.drain().into_iter();
        let command = match args.next() {
            Some(Val::String(command)) => command,
            Some(Val::None) | None => return Err(error!(FewArguments)),
            Some(_) => return Err(error!(TypeMismatch)),
        };
        let names = args
            .map(|val| match val {
                Val::String(name) => Ok(name),
                _ => Err(error!(TypeMismatch)),
            })
            .collect::<Result<Vec<Rc<str>>>>()?;
        let mut out = String::new();
        if !self.host.system(&command, &mut out) || out.contains("E:") {
            self.host.put_str(&out);
            self.host.put_char('\n');
            return Err(error!(SyscallError));
        }
        let mut words = out
            .split(|c| c == ',' || c == ' ' || c == '\n' || c == '\r')
            .filter(|s| !s.is_empty())
            .peekable();
        if words.peek().map_or(false, |w| w.ends_with(':')) {
            words.next();
        }
        for name in names {
            let kind = match self.var.kind(&name) {
                Some(kind) => kind,
                None => return Err(error!(UnknownVar)),
            };
            let word = match words.next() {
                Some(word) => word,
                None => return Err(error!(ManyArguments)),
            };
            self.var.store(&name, kind.parse(word))?;
        }
        Ok(Status::Ok)
    }
}

/// Parameter references inside a body, signs included.
fn rename_param(text: &str, function: &str, params: &[Rc<str>]) -> Option<String> {
    let (sign, bare) = match text.chars().next() {
        Some(c @ '-') | Some(c @ '+') => (c.to_string(), &text[1..]),
        _ => (String::new(), text),
    };
    params
        .iter()
        .position(|p| &**p == bare)
        .map(|index| format!("{}{}", sign, Var::param_name(function, index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_param() {
        let params: Vec<Rc<str>> = vec!["x".into(), "y".into()];
        assert_eq!(rename_param("y", "f", &params), Some("f1".to_string()));
        assert_eq!(rename_param("-x", "f", &params), Some("-f0".to_string()));
        assert_eq!(rename_param("z", "f", &params), None);
        assert_eq!(rename_param("2", "f", &params), None);
    }

    #[test]
    fn test_has_args() {
        assert!(!has_args(Delim::End));
        assert!(!has_args(Delim::Colon));
        assert!(has_args(Delim::Space));
        assert!(has_args(Delim::Open(Bracket::Paren)));
    }
}
