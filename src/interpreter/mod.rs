//! Intcode execution engine
//!
//! This module provides the machine itself:
//! - [`engine`]: the [`engine::Interpreter`] and its [`engine::Status`]
//! - [`instruction`]: opcode and parameter-mode decoding
//! - [`errors`]: fatal runtime error types
//! - [`constants`]: memory layout and network constants
//!
//! # Execution Model
//!
//! `run` executes instructions until the machine halts or reaches an input
//! instruction with an empty queue.  In the latter case the program counter
//! stays on the input instruction, so after the caller feeds more values the
//! next `run` retries exactly that read: no value is skipped or read twice.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod instruction;
