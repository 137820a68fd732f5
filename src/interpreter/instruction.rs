//! Instruction decoding
//!
//! An instruction word packs an opcode in its two low decimal digits and one
//! parameter mode per operand in the digits above:
//!
//! ```text
//!   word = 1002
//!          ││└┴─ opcode 02 (multiply)
//!          │└─── mode of parameter 1: 0 (position)
//!          └──── mode of parameter 2: 1 (immediate)
//!                mode of parameter 3: 0 (implicit leading zero)
//! ```

use crate::interpreter::constants::DECODE_MODULUS;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Word;
use num_integer::Integer;
use num_traits::ToPrimitive;

/// Largest operand count of any opcode
pub const MAX_PARAMS: usize = 3;

/// Operation selected by the low two digits of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustRelativeBase,
    Halt,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Multiply,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        let opcode = match code {
            1 => Opcode::Add,
            2 => Opcode::Multiply,
            3 => Opcode::Input,
            4 => Opcode::Output,
            5 => Opcode::JumpIfTrue,
            6 => Opcode::JumpIfFalse,
            7 => Opcode::LessThan,
            8 => Opcode::Equals,
            9 => Opcode::AdjustRelativeBase,
            99 => Opcode::Halt,
            _ => return None,
        };
        Some(opcode)
    }

    pub fn code(self) -> u32 {
        match self {
            Opcode::Add => 1,
            Opcode::Multiply => 2,
            Opcode::Input => 3,
            Opcode::Output => 4,
            Opcode::JumpIfTrue => 5,
            Opcode::JumpIfFalse => 6,
            Opcode::LessThan => 7,
            Opcode::Equals => 8,
            Opcode::AdjustRelativeBase => 9,
            Opcode::Halt => 99,
        }
    }

    /// Number of operands following the instruction word
    pub fn arity(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Halt => 0,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Multiply => "mul",
            Opcode::Input => "in",
            Opcode::Output => "out",
            Opcode::JumpIfTrue => "jnz",
            Opcode::JumpIfFalse => "jz",
            Opcode::LessThan => "lt",
            Opcode::Equals => "eq",
            Opcode::AdjustRelativeBase => "arb",
            Opcode::Halt => "halt",
        }
    }
}

/// Addressing mode of a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamMode {
    /// Operand is an address
    #[default]
    Position,
    /// Operand is the value itself
    Immediate,
    /// Operand is an offset from the relative base
    Relative,
}

impl ParamMode {
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            0 => Some(ParamMode::Position),
            1 => Some(ParamMode::Immediate),
            2 => Some(ParamMode::Relative),
            _ => None,
        }
    }
}

/// A decoded instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Modes for parameters 1..=3; entries past the opcode's arity are `Position`
    pub modes: [ParamMode; MAX_PARAMS],
}

impl Instruction {
    /// Decode `word`, found at `pc`
    ///
    /// Only the mode digits of operands the opcode actually takes are checked.
    pub fn decode(word: &Word, pc: usize) -> Result<Self, RuntimeError> {
        // Floor remainder by a positive modulus is the Euclidean one
        let low = word
            .mod_floor(&Word::from(DECODE_MODULUS))
            .to_u32()
            .unwrap_or_default();

        let code = low % 100;
        let opcode = Opcode::from_code(code).ok_or_else(|| RuntimeError::UnknownOpcode {
            opcode: code,
            word: word.clone(),
            pc,
        })?;

        let mut modes = [ParamMode::Position; MAX_PARAMS];
        let mut digits = low / 100;
        for (index, mode) in modes.iter_mut().enumerate().take(opcode.arity()) {
            let digit = digits % 10;
            *mode = ParamMode::from_digit(digit).ok_or_else(|| {
                RuntimeError::InvalidParameterMode {
                    mode: digit,
                    param: index + 1,
                    word: word.clone(),
                    pc,
                }
            })?;
            digits /= 10;
        }

        Ok(Instruction { opcode, modes })
    }

    /// Mode of 1-indexed parameter `param`
    pub fn mode(&self, param: usize) -> ParamMode {
        self.modes[param - 1]
    }

    /// Words occupied by the instruction and its operands
    pub fn width(&self) -> usize {
        1 + self.opcode.arity()
    }
}
