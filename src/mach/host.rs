use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

/// ## Everything the engine asks of the device
///
/// Every method has a default so a host only implements what it has.
/// Coordinates and colours arrive already checked to be non-negative.

pub trait Host {
    fn put_char(&mut self, _c: char) {}

    fn put_str(&mut self, s: &str) {
        for c in s.chars() {
            self.put_char(c);
        }
    }

    /// One line for INPUT. `None` when there is no input device.
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        None
    }

    /// Key waiting in the buffer, without blocking.
    fn read_key(&mut self) -> Option<u8> {
        None
    }

    /// Blocks for a key. `None` means the wait was broken off.
    fn wait_key(&mut self) -> Option<u8> {
        Some(0)
    }

    fn sleep(&mut self, _ms: u32) {}

    fn cls(&mut self) {}

    /// Moves the text cursor, 1-based. False when off screen.
    fn at(&mut self, _col: u32, _row: u32) -> bool {
        true
    }

    fn ink(&mut self, _colour: u32, _raw: bool) {}

    fn paper(&mut self, _colour: u32, _raw: bool) {}

    fn plot(&mut self, _x: u32, _y: u32, _xor: bool) {}

    fn draw(&mut self, _from: (u32, u32), _to: (u32, u32), _xor: bool) {}

    #[allow(clippy::too_many_arguments)]
    fn rect(&mut self, _x: u32, _y: u32, _w: u32, _h: u32, _fill: bool, _xor: bool) {}

    fn circle(&mut self, _x: u32, _y: u32, _r: u32, _fill: bool, _xor: bool) {}

    /// Runs a SYS command, writing the response text to `out`.
    fn system(&mut self, _command: &str, _out: &mut String) -> bool {
        false
    }

    fn load(&mut self, name: &str) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn save(&mut self, _name: &str, _text: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "no storage"))
    }
}

/// Discards output, has no input.
#[derive(Debug, Default)]
pub struct Silent;

impl Host for Silent {}

#[derive(Debug, Default)]
struct State {
    output: String,
    input: VecDeque<String>,
    keys: VecDeque<u8>,
    files: HashMap<String, String>,
    responses: HashMap<String, String>,
    calls: Vec<String>,
}

/// In-memory host. Clones share state, so one copy can be given to
/// the runtime while another scripts input and inspects output.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    state: Rc<RefCell<State>>,
}

impl Capture {
    pub fn new() -> Capture {
        Capture::default()
    }

    pub fn output(&self) -> String {
        self.state.borrow().output.clone()
    }

    pub fn take_output(&self) -> String {
        std::mem::take(&mut self.state.borrow_mut().output)
    }

    pub fn push_input(&self, line: &str) {
        self.state.borrow_mut().input.push_back(line.to_string());
    }

    pub fn push_key(&self, key: u8) {
        self.state.borrow_mut().keys.push_back(key);
    }

    pub fn set_file(&self, name: &str, text: &str) {
        self.state
            .borrow_mut()
            .files
            .insert(name.to_string(), text.to_string());
    }

    pub fn file(&self, name: &str) -> Option<String> {
        self.state.borrow().files.get(name).cloned()
    }

    /// Canned response for a SYS command.
    pub fn respond(&self, command: &str, response: &str) {
        self.state
            .borrow_mut()
            .responses
            .insert(command.to_string(), response.to_string());
    }

    /// Screen and timing requests in the order they were made.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn log(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Host for Capture {
    fn put_char(&mut self, c: char) {
        self.state.borrow_mut().output.push(c);
    }

    fn put_str(&mut self, s: &str) {
        self.state.borrow_mut().output.push_str(s);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.output.push_str(prompt);
        state.input.pop_front()
    }

    fn read_key(&mut self) -> Option<u8> {
        self.state.borrow_mut().keys.pop_front()
    }

    fn wait_key(&mut self) -> Option<u8> {
        Some(self.state.borrow_mut().keys.pop_front().unwrap_or(0))
    }

    fn sleep(&mut self, ms: u32) {
        self.log(format!("sleep {}", ms));
    }

    fn cls(&mut self) {
        self.log("cls".to_string());
    }

    fn at(&mut self, col: u32, row: u32) -> bool {
        self.log(format!("at {} {}", col, row));
        col <= 80 && row <= 25
    }

    fn ink(&mut self, colour: u32, raw: bool) {
        self.log(format!("ink {} {}", colour, raw));
    }

    fn paper(&mut self, colour: u32, raw: bool) {
        self.log(format!("paper {} {}", colour, raw));
    }

    fn plot(&mut self, x: u32, y: u32, xor: bool) {
        self.log(format!("plot {} {} {}", x, y, xor));
    }

    fn draw(&mut self, from: (u32, u32), to: (u32, u32), xor: bool) {
        self.log(format!(
            "draw {} {} {} {} {}",
            from.0, from.1, to.0, to.1, xor
        ));
    }

    fn rect(&mut self, x: u32, y: u32, w: u32, h: u32, fill: bool, xor: bool) {
        self.log(format!("rect {} {} {} {} {} {}", x, y, w, h, fill, xor));
    }

    fn circle(&mut self, x: u32, y: u32, r: u32, fill: bool, xor: bool) {
        self.log(format!("circle {} {} {} {} {}", x, y, r, fill, xor));
    }

    fn system(&mut self, command: &str, out: &mut String) -> bool {
        self.log(format!("sys {}", command));
        match self.state.borrow().responses.get(command) {
            Some(response) => {
                out.push_str(response);
                true
            }
            None => false,
        }
    }

    fn load(&mut self, name: &str) -> io::Result<String> {
        self.file(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn save(&mut self, name: &str, text: &str) -> io::Result<()> {
        self.set_file(name, text);
        Ok(())
    }
}
