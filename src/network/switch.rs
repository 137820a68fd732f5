// Packet-switched network of machines

use super::NetworkError;
use crate::interpreter::constants::{IDLE_INPUT, PACKET_WORDS};
use crate::interpreter::engine::Interpreter;
use crate::memory::Word;
use num_traits::ToPrimitive;
use std::collections::VecDeque;

/// Payload of a packet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    pub x: Word,
    pub y: Word,
}

impl Packet {
    pub fn new(x: impl Into<Word>, y: impl Into<Word>) -> Self {
        Packet {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// What happened during one [`PacketNetwork::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Packets emitted by all nodes
    pub sent: usize,
    /// Nodes that had no packet to receive and were fed the idle value
    pub idle: usize,
    pub nodes: usize,
}

impl TickReport {
    /// True when no node received or sent anything
    pub fn is_quiet(&self) -> bool {
        self.sent == 0 && self.idle == self.nodes
    }
}

/// A network of machines running the same program
///
/// Node `i` boots with its own address `i` as input.  Each node emits
/// packets as `(destination, x, y)` output triples; destinations inside the
/// network are queued for that node, anything else lands in the external
/// outbox for the caller to handle.
#[derive(Debug, Clone)]
pub struct PacketNetwork {
    nodes: Vec<Interpreter>,
    queues: Vec<VecDeque<Packet>>,
    external: Vec<(Word, Packet)>,
}

impl PacketNetwork {
    pub fn new<W>(program: &[W], size: usize) -> Self
    where
        W: Clone + Into<Word>,
    {
        let nodes = (0..size)
            .map(|address| Interpreter::new(program, [Word::from(address)]))
            .collect();
        PacketNetwork {
            nodes,
            queues: vec![VecDeque::new(); size],
            external: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, address: usize) -> Option<&Interpreter> {
        self.nodes.get(address)
    }

    /// Packets waiting for `address`
    pub fn queued(&self, address: usize) -> usize {
        self.queues.get(address).map_or(0, VecDeque::len)
    }

    /// True when no packet is waiting for any node
    pub fn is_idle(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    /// Inject a packet for a node, e.g. from outside the network
    pub fn send(&mut self, address: usize, packet: Packet) -> Result<(), NetworkError> {
        let size = self.nodes.len();
        let queue = self
            .queues
            .get_mut(address)
            .ok_or(NetworkError::UnknownAddress { address, size })?;
        queue.push_back(packet);
        Ok(())
    }

    /// Take every packet addressed outside the network, oldest first
    pub fn take_external(&mut self) -> Vec<(Word, Packet)> {
        std::mem::take(&mut self.external)
    }

    /// Deliver one packet (or the idle value) to every node, run each node
    /// until it suspends, then route what it sent
    ///
    /// Packets sent during a tick are delivered on a later tick.
    pub fn tick(&mut self) -> Result<TickReport, NetworkError> {
        let mut report = TickReport {
            nodes: self.nodes.len(),
            ..TickReport::default()
        };
        let incoming: Vec<Option<Packet>> =
            self.queues.iter_mut().map(VecDeque::pop_front).collect();

        for (address, packet) in incoming.into_iter().enumerate() {
            let sent = {
                let node = &mut self.nodes[address];
                match packet {
                    Some(packet) => node.feed([packet.x, packet.y]),
                    None => {
                        node.push_input(IDLE_INPUT);
                        report.idle += 1;
                    }
                }
                node.run()
                    .map_err(|source| NetworkError::Machine { node: address, source })?;

                // A partially written packet stays buffered until complete
                let complete = node.output().len() / PACKET_WORDS * PACKET_WORDS;
                node.take_output(complete)
            };

            let mut words = sent.into_iter();
            while let (Some(destination), Some(x), Some(y)) =
                (words.next(), words.next(), words.next())
            {
                let packet = Packet { x, y };
                trace_log!("[network] {} -> {}: {:?}", address, destination, packet);
                self.route(destination, packet);
                report.sent += 1;
            }
        }

        Ok(report)
    }

    fn route(&mut self, destination: Word, packet: Packet) {
        match destination.to_usize() {
            Some(address) if address < self.queues.len() => self.queues[address].push_back(packet),
            _ => self.external.push((destination, packet)),
        }
    }
}
