// Execution engine for the Intcode machine

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::instruction::{Instruction, Opcode, ParamMode};
use crate::memory::{Memory, Word};
use crate::parser::{parse_program, ParseError};
use num_traits::{Signed, ToPrimitive, Zero};
use std::collections::VecDeque;
use std::fmt;

/// Observable execution state of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Ready to execute the instruction at the program counter
    Running,
    /// Suspended on an input instruction with an empty queue; the same
    /// instruction is retried on the next run
    AwaitingInput,
    /// Executed a halt instruction; nothing runs afterwards
    Halted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => write!(f, "running"),
            Status::AwaitingInput => write!(f, "awaiting input"),
            Status::Halted => write!(f, "halted"),
        }
    }
}

/// An Intcode machine
///
/// Cloning a machine produces a fully independent instance: memory, queues
/// and registers are all deep-copied.
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Memory image, initialised from the program
    memory: Memory,

    /// Address of the next instruction to decode
    pc: usize,

    /// Offset added to relative-mode operands
    relative_base: Word,

    /// Pending input, consumed front first
    input: VecDeque<Word>,

    /// Values written by output instructions, until the caller drains them
    output: Vec<Word>,

    status: Status,

    /// Instructions executed so far (a suspended read does not count)
    steps: u64,
}

impl Interpreter {
    /// Create a machine from a program image and initial input
    ///
    /// Both accept anything convertible into a [`Word`], so plain integer
    /// slices work as well as parsed programs.
    pub fn new<W, I>(program: &[W], initial_input: I) -> Self
    where
        W: Clone + Into<Word>,
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        Interpreter {
            memory: Memory::new(program),
            pc: 0,
            relative_base: Word::zero(),
            input: initial_input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            status: Status::Running,
            steps: 0,
        }
    }

    /// Create a machine with an empty input queue
    pub fn with_program<W>(program: &[W]) -> Self
    where
        W: Clone + Into<Word>,
    {
        Self::new(program, std::iter::empty::<Word>())
    }

    /// Parse comma-separated program text and create a machine from it
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        let program = parse_program(source)?;
        Ok(Self::with_program(&program))
    }

    /// Run until the machine halts or starves for input
    ///
    /// Running a halted machine is a no-op that reports [`Status::Halted`].
    pub fn run(&mut self) -> Result<Status, RuntimeError> {
        loop {
            match self.step()? {
                Status::Running => continue,
                status => return Ok(status),
            }
        }
    }

    /// Execute a single instruction
    ///
    /// On error the machine is left exactly as it was before the instruction.
    pub fn step(&mut self) -> Result<Status, RuntimeError> {
        if self.status == Status::Halted {
            return Ok(Status::Halted);
        }

        let pc = self.pc;
        let instr = Instruction::decode(&self.memory.read(pc), pc)?;
        trace_log!(
            "[intcode] pc={} {} {:?} rb={}",
            pc,
            instr.opcode.mnemonic(),
            &instr.modes[..instr.opcode.arity()],
            self.relative_base
        );

        let next_pc = pc.saturating_add(instr.width());
        match instr.opcode {
            Opcode::Add => {
                let (a, b) = (self.operand(&instr, 1)?, self.operand(&instr, 2)?);
                let dest = self.write_target(&instr, 3)?;
                self.memory.write(dest, a + b);
                self.pc = next_pc;
            }

            Opcode::Multiply => {
                let (a, b) = (self.operand(&instr, 1)?, self.operand(&instr, 2)?);
                let dest = self.write_target(&instr, 3)?;
                self.memory.write(dest, a * b);
                self.pc = next_pc;
            }

            Opcode::Input => {
                // Resolve the target first so a fault never consumes input
                let dest = self.write_target(&instr, 1)?;
                match self.input.pop_front() {
                    Some(value) => {
                        self.memory.write(dest, value);
                        self.pc = next_pc;
                    }
                    None => {
                        trace_log!("[intcode] pc={} suspended awaiting input", pc);
                        self.status = Status::AwaitingInput;
                        return Ok(self.status);
                    }
                }
            }

            Opcode::Output => {
                let value = self.operand(&instr, 1)?;
                self.output.push(value);
                self.pc = next_pc;
            }

            Opcode::JumpIfTrue | Opcode::JumpIfFalse => {
                let condition = self.operand(&instr, 1)?;
                let target = self.operand(&instr, 2)?;
                let taken = !condition.is_zero() == (instr.opcode == Opcode::JumpIfTrue);
                self.pc = if taken {
                    self.address(&target)?
                } else {
                    next_pc
                };
            }

            Opcode::LessThan | Opcode::Equals => {
                let (a, b) = (self.operand(&instr, 1)?, self.operand(&instr, 2)?);
                let holds = match instr.opcode {
                    Opcode::LessThan => a < b,
                    _ => a == b,
                };
                let dest = self.write_target(&instr, 3)?;
                self.memory.write(dest, Word::from(u8::from(holds)));
                self.pc = next_pc;
            }

            Opcode::AdjustRelativeBase => {
                let delta = self.operand(&instr, 1)?;
                self.relative_base += delta;
                self.pc = next_pc;
            }

            Opcode::Halt => {
                trace_log!("[intcode] pc={} halted after {} steps", pc, self.steps + 1);
                self.steps += 1;
                self.status = Status::Halted;
                return Ok(self.status);
            }
        }

        self.steps += 1;
        self.status = Status::Running;
        Ok(self.status)
    }

    /// Value of 1-indexed operand `param` of the instruction at the program counter
    fn operand(&self, instr: &Instruction, param: usize) -> Result<Word, RuntimeError> {
        let raw = self.memory.read(self.pc.saturating_add(param));
        match instr.mode(param) {
            ParamMode::Position => Ok(self.memory.read(self.address(&raw)?)),
            ParamMode::Immediate => Ok(raw),
            ParamMode::Relative => Ok(self.memory.read(self.relative_address(raw)?)),
        }
    }

    /// Address written by 1-indexed operand `param`
    fn write_target(&self, instr: &Instruction, param: usize) -> Result<usize, RuntimeError> {
        let raw = self.memory.read(self.pc.saturating_add(param));
        match instr.mode(param) {
            ParamMode::Position => self.address(&raw),
            ParamMode::Relative => self.relative_address(raw),
            // An immediate input target names the address literally, same as position
            ParamMode::Immediate if instr.opcode == Opcode::Input => self.address(&raw),
            ParamMode::Immediate => Err(RuntimeError::ImmediateWriteTarget {
                mnemonic: instr.opcode.mnemonic(),
                param,
                pc: self.pc,
            }),
        }
    }

    fn relative_address(&self, offset: Word) -> Result<usize, RuntimeError> {
        self.address(&(offset + &self.relative_base))
    }

    fn address(&self, value: &Word) -> Result<usize, RuntimeError> {
        value.to_usize().ok_or_else(|| {
            let address = value.clone();
            if value.is_negative() {
                RuntimeError::NegativeAddress { address, pc: self.pc }
            } else {
                RuntimeError::AddressOutOfRange { address, pc: self.pc }
            }
        })
    }

    // === INPUT / OUTPUT ===

    /// Append values to the input queue and clear an awaiting-input suspension
    ///
    /// The suspension is cleared even when `values` is empty; the next run
    /// then retries the read and suspends again.  A halted machine stays halted.
    pub fn feed<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        self.input.extend(values.into_iter().map(Into::into));
        if self.status == Status::AwaitingInput {
            self.status = Status::Running;
        }
    }

    /// Append a single input value
    pub fn push_input(&mut self, value: impl Into<Word>) {
        self.feed([value.into()]);
    }

    /// Number of queued input values not yet consumed
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Everything output since the buffer was last drained
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// Most recent output value, if any
    pub fn last_output(&self) -> Option<&Word> {
        self.output.last()
    }

    /// Take the output buffer, leaving it empty
    pub fn drain_output(&mut self) -> Vec<Word> {
        std::mem::take(&mut self.output)
    }

    /// Take up to `count` of the oldest output values, leaving the rest buffered
    pub fn take_output(&mut self, count: usize) -> Vec<Word> {
        let count = count.min(self.output.len());
        self.output.drain(..count).collect()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    // === STATE ===

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.status == Status::AwaitingInput
    }

    /// Read a memory word
    pub fn peek(&self, addr: usize) -> Word {
        self.memory.read(addr)
    }

    /// Overwrite a memory word, e.g. to patch a program before running it
    pub fn poke(&mut self, addr: usize, value: impl Into<Word>) {
        self.memory.write(addr, value.into());
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn relative_base(&self) -> &Word {
        &self.relative_base
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
