extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
extern crate mortal;
use crate::Cli;
use ansi_term::Style;
use basicd::mach::{Event, Host, Runtime};
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal};
use mortal::{Color, Key, PrepareConfig};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub fn main(cli: Cli) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        warn!(%error, "no break handler");
    }
    if let Err(error) = main_loop(cli, interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(cli: Cli, interrupted: Arc<AtomicBool>) -> io::Result<()> {
    let command = Arc::new(Interface::new("BASIC")?);
    let term = Term::new(command.clone(), interrupted.clone())?;
    let mut runtime = Runtime::new(Box::new(term));
    let mut print_ready = true;

    if let Some(path) = &cli.file {
        let loaded = std::fs::read_to_string(path)
            .map_err(|error| error.to_string())
            .and_then(|text| runtime.load_str(&text).map_err(|error| error.to_string()));
        match loaded {
            Ok(_) if cli.run => {
                if let Err(error) = runtime.run(0) {
                    report(&command, &error.to_string())?;
                }
            }
            Ok(_) => {}
            Err(error) => report(&command, &format!("{}: {}", path.display(), error))?,
        }
    }

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(cli.cycles) {
            Event::Running => {}
            Event::Stopped => {
                if print_ready {
                    print_ready = false;
                    command.write_fmt(format_args!("READY.\n"))?;
                }
                match command.read_line()? {
                    ReadResult::Input(string) => {
                        if runtime.enter(&string) {
                            command.add_history_unique(string);
                        }
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                }
            }
            Event::Error(error) => {
                report(&command, &error.to_string())?;
                print_ready = true;
            }
            Event::Break(position) => {
                report(&command, &format!("Break in {}", position))?;
                print_ready = true;
            }
            Event::Halt(position) => {
                command.write_fmt(format_args!("Stopped in {}\n", position))?;
                print_ready = true;
            }
            Event::Done(_) => print_ready = true,
        }
    }
    Ok(())
}

fn report(interface: &Interface<DefaultTerminal>, message: &str) -> io::Result<()> {
    interface.write_fmt(format_args!("{}\n", Style::new().bold().paint(message)))
}

/// The terminal as a device. Text goes through linefeed, raw keys,
/// colours and the cursor through mortal. There is no graphics.
struct Term {
    output: Arc<Interface<DefaultTerminal>>,
    input: Interface<DefaultTerminal>,
    screen: Option<mortal::Terminal>,
    interrupted: Arc<AtomicBool>,
}

impl Term {
    fn new(output: Arc<Interface<DefaultTerminal>>, interrupted: Arc<AtomicBool>) -> io::Result<Term> {
        let input = Interface::new("INPUT")?;
        input.set_report_signal(Signal::Interrupt, true);
        let screen = match mortal::Terminal::new() {
            Ok(screen) => Some(screen),
            Err(error) => {
                warn!(%error, "no raw terminal");
                None
            }
        };
        Ok(Term {
            output,
            input,
            screen,
            interrupted,
        })
    }

    fn key(&self, timeout: Option<Duration>) -> io::Result<Option<Key>> {
        let screen = match &self.screen {
            Some(screen) => screen,
            None => return Ok(None),
        };
        let state = screen.prepare(PrepareConfig::default())?;
        let event = screen.read_event(timeout);
        screen.restore(state)?;
        match event? {
            Some(mortal::Event::Key(key)) => Ok(Some(key)),
            _ => Ok(None),
        }
    }

    fn colour(colour: u32) -> Color {
        match colour % 8 {
            0 => Color::Black,
            1 => Color::Blue,
            2 => Color::Red,
            3 => Color::Magenta,
            4 => Color::Green,
            5 => Color::Cyan,
            6 => Color::Yellow,
            _ => Color::White,
        }
    }

    fn check(result: io::Result<()>) {
        if let Err(error) = result {
            warn!(%error, "terminal");
        }
    }
}

fn key_code(key: Key) -> Option<u8> {
    match key {
        Key::Char(c) if c.is_ascii() => Some(c as u8),
        Key::Ctrl(c) if c.is_ascii() => Some(c as u8 & 0x1f),
        Key::Enter => Some(13),
        Key::Escape => Some(27),
        Key::Backspace => Some(8),
        Key::Tab => Some(9),
        _ => None,
    }
}

impl Host for Term {
    fn put_char(&mut self, c: char) {
        Term::check(self.output.write_fmt(format_args!("{}", c)));
    }

    fn put_str(&mut self, s: &str) {
        Term::check(self.output.write_fmt(format_args!("{}", s)));
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        Term::check(self.input.set_prompt(prompt));
        match self.input.read_line() {
            Ok(ReadResult::Input(line)) => Some(line),
            Ok(ReadResult::Signal(Signal::Interrupt)) => {
                self.interrupted.store(true, Ordering::SeqCst);
                None
            }
            Ok(_) => None,
            Err(error) => {
                warn!(%error, "input");
                None
            }
        }
    }

    fn read_key(&mut self) -> Option<u8> {
        match self.key(Some(Duration::from_millis(0))) {
            Ok(key) => key.and_then(key_code),
            Err(error) => {
                warn!(%error, "inkey");
                None
            }
        }
    }

    fn wait_key(&mut self) -> Option<u8> {
        if self.screen.is_none() {
            return Some(0);
        }
        loop {
            match self.key(None) {
                Ok(Some(Key::Ctrl('c'))) => return None,
                Ok(Some(key)) => {
                    if let Some(code) = key_code(key) {
                        return Some(code);
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(%error, "pause");
                    return None;
                }
            }
        }
    }

    fn sleep(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn cls(&mut self) {
        if let Some(screen) = &self.screen {
            Term::check(screen.clear_screen());
        }
    }

    fn at(&mut self, col: u32, row: u32) -> bool {
        let screen = match &self.screen {
            Some(screen) => screen,
            None => return false,
        };
        match screen.size() {
            Ok(size) if (col as usize) <= size.columns && (row as usize) <= size.lines => {
                Term::check(self.output.write_fmt(format_args!("\x1b[{};{}H", row, col)));
                true
            }
            _ => false,
        }
    }

    fn ink(&mut self, colour: u32, _raw: bool) {
        if let Some(screen) = &self.screen {
            Term::check(screen.set_fg(Term::colour(colour)));
        }
    }

    fn paper(&mut self, colour: u32, _raw: bool) {
        if let Some(screen) = &self.screen {
            Term::check(screen.set_bg(Term::colour(colour)));
        }
    }

    fn load(&mut self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(name)
    }

    fn save(&mut self, name: &str, text: &str) -> io::Result<()> {
        std::fs::write(name, text)
    }
}
