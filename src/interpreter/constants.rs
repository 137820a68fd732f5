// Constants for the Intcode machine

/// Writes landing within this many words past the end of the dense memory
/// region extend it; writes further out go to the sparse map.
pub const DENSE_GROWTH_WINDOW: usize = 4096;

/// Value fed to a network node that has no packet waiting
pub const IDLE_INPUT: i64 = -1;

/// Instruction words are decoded from their value modulo this: two opcode
/// digits and one mode digit per operand
pub const DECODE_MODULUS: u32 = 100_000;

/// Number of words in a network packet: destination, x, y
pub const PACKET_WORDS: usize = 3;
