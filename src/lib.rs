//! # Introduction
//!
//! `intcode` is a small virtual machine that executes programs encoded as a
//! flat sequence of integers.  A machine owns its memory image, program
//! counter, relative base, input queue and output buffer; callers drive it
//! like a coroutine by running it until it either halts or suspends for lack
//! of input, feeding more input, and running it again.
//!
//! ## Execution pipeline
//!
//! ```text
//! Program text → Parser → Interpreter ⇄ caller (feed / run / drain_output)
//! ```
//!
//! 1. [`parser`] turns a comma-separated line into a program image.
//! 2. [`interpreter`] decodes and executes instructions, suspending on input
//!    starvation.
//! 3. [`memory`] is the growable memory image: dense near the program,
//!    sparse far beyond it, zero wherever nothing was written.  Every cell
//!    holds an unbounded signed integer ([`Word`]).
//! 4. [`ascii`] implements the text convention used by conversational
//!    programs.
//! 5. [`network`] wires several independent machines together (amplifier
//!    chains, packet-switched networks).
//!
//! ## Instruction set
//!
//! Add, multiply, input, output, jump-if-true, jump-if-false, less-than,
//! equals, adjust-relative-base and halt, with position, immediate and
//! relative parameter modes.

/// Compile-time removable execution tracing. No-op unless built with `--features trace`.
#[macro_export]
macro_rules! trace_log {
    ($($t:tt)*) => {
        #[cfg(feature = "trace")]
        eprintln!($($t)*);
    };
}

pub mod ascii;
pub mod interpreter;
pub mod memory;
pub mod network;
pub mod parser;

pub use interpreter::engine::{Interpreter, Status};
pub use interpreter::errors::RuntimeError;
pub use memory::Word;
pub use parser::{parse_program, ParseError};
