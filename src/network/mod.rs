//! Orchestration of several independent machines
//!
//! Machines never share state; everything here moves values from one
//! machine's output buffer into another machine's input queue between
//! `run` calls:
//! - [`pipeline`]: a chain of copies of one program, optionally closed into a
//!   feedback ring
//! - [`switch`]: a packet-switched network where every node addresses
//!   `(destination, x, y)` packets to its peers

pub mod pipeline;
pub mod switch;

pub use pipeline::Pipeline;
pub use switch::{Packet, PacketNetwork, TickReport};

use crate::interpreter::errors::RuntimeError;
use thiserror::Error;

/// Errors raised while coordinating machines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// A machine faulted
    #[error("machine {node} faulted: {source}")]
    Machine {
        node: usize,
        #[source]
        source: RuntimeError,
    },

    #[error("pipeline needs at least one stage")]
    EmptyPipeline,

    /// A pipeline stage stopped without producing a signal
    #[error("stage {stage} produced no output")]
    MissingOutput { stage: usize },

    /// Every live machine is waiting for input and none is coming
    #[error("pipeline deadlocked: no stage produced output")]
    Deadlock,

    #[error("no node at address {address} (network has {size} nodes)")]
    UnknownAddress { address: usize, size: usize },
}
