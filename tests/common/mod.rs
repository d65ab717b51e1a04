#![allow(dead_code)]
use basicd::mach::{Capture, Event, Runtime};

/// Runs until the machine goes idle and returns everything it printed,
/// with events written out the way the terminal reports them.
pub fn exec(runtime: &mut Runtime, capture: &Capture) -> String {
    exec_n(runtime, capture, 5000)
}

pub fn exec_n(runtime: &mut Runtime, capture: &Capture, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        s.push_str(&capture.take_output());
        match &event {
            Event::Stopped | Event::Done(_) => break,
            Event::Error(error) => s.push_str(&format!("{}\n", error)),
            Event::Break(position) => s.push_str(&format!("Break in {}\n", position)),
            Event::Halt(position) => s.push_str(&format!("Stopped in {}\n", position)),
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
        }
        prev_running = event == Event::Running;
    }
    s
}

/// Enters every line of `program`, runs it and returns the output.
pub fn run(program: &str) -> String {
    let (mut r, c) = Runtime::with_capture();
    for line in program.lines() {
        r.enter(line);
    }
    r.enter("run");
    exec(&mut r, &c)
}
