use super::rpn::Context;
use super::{Capture, Host, Listing, Silent, Stack, Var, GOSUB_DEPTH, MAX_LINE_LEN, MEMORY_LEN};
use crate::error;
use crate::lang::{Error, ErrorCode, Line, LineNumber, Position};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// ## Program execution
///
/// The runtime owns the program, the variables and the evaluation
/// context. A host supplies every device effect. `execute` runs a
/// bounded number of lines and reports back with an `Event`.

pub struct Runtime {
    pub(super) listing: Listing,
    pub(super) var: Var,
    pub(super) ctx: Context,
    pub(super) cursor: Cursor,
    pc: Option<LineNumber>,
    /// Statement to start at when `pc` is executed.
    statement: u8,
    pub(super) target: Position,
    pub(super) cont: Option<Position>,
    pub(super) gosub: Stack<Position>,
    pub(super) host: Box<dyn Host>,
    pub(super) memory: Vec<u8>,
    pub(super) last_point: (u32, u32),
    pub(super) rng: StdRng,
    pub(super) interrupted: bool,
}

/// Events are returned from `execute`.
#[derive(Debug, PartialEq)]
pub enum Event {
    /// Cycle budget used up. Call `execute` again.
    Running,
    /// Nothing to execute.
    Stopped,
    Error(Error),
    /// Interrupted. CONT resumes.
    Break(Position),
    /// STOP statement.
    Halt(Position),
    /// The program ran off its last line.
    Done(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    New,
    Running,
    Broken,
    Done,
}

/// Where execution is and where it goes when the line finishes.
#[derive(Debug)]
pub(super) struct Cursor {
    pub line: LineNumber,
    pub next: Option<LineNumber>,
    pub statement: u8,
    pub state: State,
}

/// What a statement asks of the line loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Status {
    Ok,
    /// Ignore the rest of the line.
    Skip,
    /// Continue at `target`.
    Jump,
    /// The statement already set up the next line.
    Cont,
    Stop,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Box::new(Silent))
    }
}

impl Runtime {
    pub fn new(host: Box<dyn Host>) -> Runtime {
        Runtime {
            listing: Listing::default(),
            var: Var::new(),
            ctx: Context::default(),
            cursor: Cursor {
                line: 0,
                next: None,
                statement: 0,
                state: State::New,
            },
            pc: None,
            statement: 0,
            target: Position::default(),
            cont: None,
            gosub: Stack::new(
                GOSUB_DEPTH,
                ErrorCode::GosubOverflow,
                ErrorCode::ReturnNoGosub,
            ),
            host,
            memory: vec![0; MEMORY_LEN],
            last_point: (0, 0),
            rng: StdRng::from_entropy(),
            interrupted: false,
        }
    }

    /// A runtime writing to a `Capture` the caller keeps a handle on.
    pub fn with_capture() -> (Runtime, Capture) {
        let capture = Capture::new();
        (Runtime::new(Box::new(capture.clone())), capture)
    }

    /// Numbered lines edit the program, a bare number deletes.
    /// Anything else runs on the next `execute`. Returns false for
    /// input worth forgetting.
    pub fn enter(&mut self, s: &str) -> bool {
        let s = match s.char_indices().nth(MAX_LINE_LEN) {
            Some((idx, _)) => &s[..idx],
            None => s,
        };
        let line = Line::new(s);
        if line.is_direct() {
            if line.is_empty() {
                return false;
            }
            self.listing.insert(line);
            self.pc = Some(0);
            self.statement = 0;
        } else if line.is_empty() {
            debug!(line = line.number(), "delete");
            self.listing.remove(line.number());
        } else {
            debug!(line = line.number(), "edit");
            self.listing.insert(line);
        }
        true
    }

    /// Requests a break. Honored before the next program line.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Merges program text. Returns the number of lines read.
    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        self.listing.load_str(text)
    }

    pub fn save_string(&self) -> String {
        self.listing.save_string()
    }

    /// Starts the stored program at the first line from `from`.
    pub fn run(&mut self, from: LineNumber) -> Result<()> {
        self.start(from as i32)
    }

    pub(super) fn start(&mut self, from: i32) -> Result<()> {
        if self.cursor.state == State::Running {
            return Err(error!(RunError));
        }
        if from < 0 || from > LineNumber::max_value() as i32 {
            return Err(error!(InvalidLine));
        }
        self.pc = self.listing.first_from(from as LineNumber);
        if from > 0 && self.pc.is_none() {
            return Err(error!(InvalidLine));
        }
        debug!(from, "run");
        self.statement = 0;
        self.gosub.clear();
        self.cont = None;
        self.cursor.next = self.pc;
        self.cursor.state = State::Running;
        Ok(())
    }

    pub(super) fn resume(&mut self) -> bool {
        match self.cont.take() {
            Some(position) if self.cursor.state == State::Broken => {
                debug!(%position, "cont");
                self.pc = Some(position.line);
                self.statement = position.statement;
                self.cursor.next = self.pc;
                self.cursor.state = State::Running;
                true
            }
            _ => false,
        }
    }

    pub(super) fn position(&self) -> Position {
        Position::new(self.cursor.line, self.cursor.statement)
    }

    /// Returns to the statement after the current one.
    pub(super) fn return_point(&self) -> Position {
        if self.ctx.lists.delim() == crate::lang::token::Delim::Colon {
            return Position::new(self.cursor.line, self.cursor.statement.saturating_add(1));
        }
        match self.cursor.next {
            Some(next) => Position::new(next, 0),
            None => Position::new(self.cursor.line, self.cursor.statement.saturating_add(1)),
        }
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        for _ in 0..cycles {
            let number = match self.pc {
                Some(number) => number,
                None => return self.finish(),
            };
            if std::mem::take(&mut self.interrupted) && self.cursor.state == State::Running {
                let position = Position::new(number, self.statement);
                debug!(%position, "break");
                self.cont = Some(position);
                self.cursor.state = State::Broken;
                self.pc = None;
                return Event::Break(position);
            }
            match self.step(number) {
                Ok(None) => {}
                Ok(Some(event)) => return event,
                Err(error) => {
                    let error = error.in_position(self.position());
                    debug!(%error, "error");
                    if self.cursor.state == State::Running {
                        self.cursor.state = State::Done;
                    }
                    self.pc = None;
                    return Event::Error(error);
                }
            }
        }
        match self.pc {
            Some(_) => Event::Running,
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> Event {
        if self.cursor.state == State::Running {
            self.cursor.state = State::Done;
            Event::Done(self.position())
        } else {
            Event::Stopped
        }
    }

    fn step(&mut self, number: LineNumber) -> Result<Option<Event>> {
        let line = match self.listing.get(number) {
            Some(line) => line,
            None => {
                self.cursor.statement = 0;
                return Err(error!(InvalidLine, Position::new(number, 0)));
            }
        };
        let tokens = line.tokens().map_err(|e| e.in_position(Position::new(number, 0)))?;
        let next = self.listing.next_after(number);
        self.ctx.lists.reset(tokens);
        let statement = std::mem::take(&mut self.statement);
        for _ in 0..statement {
            if !self.ctx.lists.skip_statement() {
                self.pc = next;
                return Ok(None);
            }
        }
        self.cursor.line = number;
        self.cursor.next = next;
        self.cursor.statement = statement;
        if number != 0 {
            self.cursor.state = State::Running;
        }
        trace!(line = number, statement, "execute");
        match self.line_eval()? {
            Status::Ok | Status::Skip => self.pc = self.cursor.next,
            Status::Jump => {
                debug!(to = %self.target, "jump");
                self.pc = Some(self.target.line);
                self.statement = self.target.statement;
            }
            Status::Cont => {}
            Status::Stop => {
                let position = self.position();
                debug!(%position, "stop");
                self.cont = self.cursor.next.map(|next| Position::new(next, 0));
                if self.cursor.state == State::Running {
                    self.cursor.state = State::Broken;
                }
                self.pc = None;
                return Ok(Some(Event::Halt(position)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_edits_listing() {
        let mut r = Runtime::default();
        assert!(r.enter("10 print 1"));
        assert!(r.enter("20 print 2"));
        assert!(r.enter("10"));
        assert!(!r.enter("   "));
        assert_eq!(r.save_string(), "20 print 2\n");
        assert_eq!(r.execute(10), Event::Stopped);
    }

    #[test]
    fn test_run_twice_is_an_error() {
        let mut r = Runtime::default();
        r.enter("10 goto 10");
        r.run(0).unwrap();
        assert_eq!(r.execute(5), Event::Running);
        assert_eq!(r.run(0).unwrap_err().code(), ErrorCode::RunError);
        r.interrupt();
        assert_eq!(r.execute(5), Event::Break(Position::new(10, 0)));
    }

    #[test]
    fn test_run_missing_line() {
        let mut r = Runtime::default();
        r.enter("10 print 1");
        assert_eq!(r.run(20).unwrap_err().code(), ErrorCode::InvalidLine);
        assert!(r.run(5).is_ok());
        assert_eq!(r.execute(5), Event::Done(Position::new(10, 0)));
    }
}
