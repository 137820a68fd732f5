//! Runtime error types for the Intcode machine
//!
//! This module defines [`RuntimeError`], which represents every fault that can
//! stop execution (as opposed to parse errors or input starvation, which is a
//! normal suspension and not an error).
//!
//! All runtime errors are fatal: the faulting instruction has no effect, and
//! running the machine again reproduces the same error.

use crate::memory::Word;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Instruction word whose low two digits name no known opcode
    #[error("unknown opcode {opcode} (instruction word {word}) at pc {pc}")]
    UnknownOpcode { opcode: u32, word: Word, pc: usize },

    /// Parameter mode digit outside position/immediate/relative
    #[error("invalid mode {mode} for parameter {param} of instruction word {word} at pc {pc}")]
    InvalidParameterMode {
        mode: u32,
        param: usize,
        word: Word,
        pc: usize,
    },

    /// Immediate mode used for a parameter that is written to
    #[error("{mnemonic} at pc {pc} uses immediate mode for write target (parameter {param})")]
    ImmediateWriteTarget {
        mnemonic: &'static str,
        param: usize,
        pc: usize,
    },

    /// Operand, write target or jump target resolved to a negative address
    #[error("negative address {address} at pc {pc}")]
    NegativeAddress { address: Word, pc: usize },

    /// Operand, write target or jump target too large to be an address
    #[error("address {address} out of range at pc {pc}")]
    AddressOutOfRange { address: Word, pc: usize },
}

impl RuntimeError {
    /// Program counter of the faulting instruction
    pub fn pc(&self) -> usize {
        match self {
            RuntimeError::UnknownOpcode { pc, .. } => *pc,
            RuntimeError::InvalidParameterMode { pc, .. } => *pc,
            RuntimeError::ImmediateWriteTarget { pc, .. } => *pc,
            RuntimeError::NegativeAddress { pc, .. } => *pc,
            RuntimeError::AddressOutOfRange { pc, .. } => *pc,
        }
    }
}
