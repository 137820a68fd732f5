// Chains of machines passing a signal along

use super::NetworkError;
use crate::interpreter::engine::Interpreter;
use crate::memory::Word;

/// Copies of one program, each seeded with its own phase value
///
/// Each stage's output becomes the next stage's input.  In a feedback ring
/// the last stage's output is routed back into the first.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Interpreter>,
}

impl Pipeline {
    /// Build one stage per phase; each stage gets an independent copy of `program`
    pub fn new<W, P>(program: &[W], phases: &[P]) -> Result<Self, NetworkError>
    where
        W: Clone + Into<Word>,
        P: Clone + Into<Word>,
    {
        if phases.is_empty() {
            return Err(NetworkError::EmptyPipeline);
        }
        let stages = phases
            .iter()
            .map(|phase| Interpreter::new(program, [phase.clone()]))
            .collect();
        Ok(Pipeline { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Interpreter] {
        &self.stages
    }

    /// Pass `signal` through every stage once and return the last stage's output
    pub fn run_chain(&mut self, signal: impl Into<Word>) -> Result<Word, NetworkError> {
        let mut signal = signal.into();
        for (stage, machine) in self.stages.iter_mut().enumerate() {
            machine.push_input(signal);
            machine
                .run()
                .map_err(|source| NetworkError::Machine { node: stage, source })?;
            signal = machine
                .drain_output()
                .pop()
                .ok_or(NetworkError::MissingOutput { stage })?;
            trace_log!("[pipeline] stage {} -> {}", stage, signal);
        }
        Ok(signal)
    }

    /// Run the stages as a ring until the last stage halts
    ///
    /// Returns the last value the final stage produced.
    pub fn run_feedback(&mut self, signal: impl Into<Word>) -> Result<Word, NetworkError> {
        let last = self.stages.len() - 1;
        let mut signals = vec![signal.into()];
        let mut final_signal = None;

        loop {
            let mut progressed = false;
            for (stage, machine) in self.stages.iter_mut().enumerate() {
                machine.feed(signals.drain(..));
                machine
                    .run()
                    .map_err(|source| NetworkError::Machine { node: stage, source })?;
                signals = machine.drain_output();
                progressed |= !signals.is_empty();
                if stage == last {
                    if let Some(value) = signals.last() {
                        final_signal = Some(value.clone());
                    }
                }
            }

            if self.stages[last].is_halted() {
                return final_signal.ok_or(NetworkError::MissingOutput { stage: last });
            }
            if !progressed {
                return Err(NetworkError::Deadlock);
            }
        }
    }
}
