/*!
## Rust Machine Module

This Rust module stores a BASIC program, evaluates expressions
through an RPN queue and operator stack, and executes statements
line by line on behalf of a host.

*/

pub use crate::lang::{MAX_LINE_LEN, MAX_TOKENS};

/// Values an expression may leave on the queue.
pub const QUEUE_LEN: usize = 32;
/// Pending operators and brackets.
pub const STACK_LEN: usize = 32;
/// Nested user function bodies.
pub const TOKEN_LIST_DEPTH: usize = 8;
pub const GOSUB_DEPTH: usize = 16;
/// Variable names are shorter than this.
pub const VAR_NAME_LEN: usize = 16;
pub const VAR_MAX_COUNT: usize = 64;
/// User functions take fewer parameters than this.
pub const DEFFN_MAX_ARGS: usize = 4;
pub const STRING_LEN: usize = 128;
/// Scratch memory for PEEK and POKE.
pub const MEMORY_LEN: usize = 65536;
pub const DEFAULT_FILE_NAME: &str = "prog.bas";

mod eval;
mod function;
mod host;
mod listing;
mod operation;
mod rpn;
mod runtime;
mod screen;
mod stack;
mod statement;
mod val;
mod var;

pub use host::{Capture, Host, Silent};
pub use listing::Listing;
pub use operation::Operation;
pub use runtime::{Event, Runtime};
pub use stack::Stack;
pub use val::{format_float, Val};
pub use var::{Kind, Loop, Var};
