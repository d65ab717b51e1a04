//! # basicd
//!
//! A resident BASIC for single-board devices.
//!
//! Program lines are compacted when entered and tokenized when they
//! run. Expressions go through a shunting-yard evaluator with a
//! bounded queue and operator stack. Statements talk to the device
//! through the [`mach::Host`] trait.
//!
//! ```
//! use basicd::mach::{Event, Runtime};
//!
//! let (mut runtime, capture) = Runtime::with_capture();
//! runtime.enter("10 for i=1 to 3:print i;:next i");
//! runtime.enter("run");
//! while let Event::Running = runtime.execute(1000) {}
//! assert_eq!(capture.output(), "123");
//! ```

pub mod lang;
pub mod mach;
