//! ASCII text convention
//!
//! Conversational programs exchange text one character per word: input
//! characters are fed as their code points, and output words in `0..=127` are
//! read back as characters.  Anything outside that range (typically a final
//! numeric answer after a transcript) is kept aside as a plain number.

use crate::memory::Word;
use num_traits::ToPrimitive;

/// Output split into its text and non-ASCII values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiOutput {
    pub text: String,
    pub non_ascii: Vec<Word>,
}

/// Encode text as one word per character
pub fn encode(text: &str) -> Vec<Word> {
    text.chars().map(|c| Word::from(u32::from(c))).collect()
}

/// Encode a line of text followed by a newline
pub fn encode_line(line: &str) -> Vec<Word> {
    let mut words = encode(line);
    words.push(Word::from(b'\n'));
    words
}

/// Decode output words, setting aside anything that is not ASCII
pub fn decode(words: &[Word]) -> AsciiOutput {
    let mut decoded = AsciiOutput::default();
    for word in words {
        match word.to_u8() {
            Some(byte) if byte.is_ascii() => decoded.text.push(char::from(byte)),
            _ => decoded.non_ascii.push(word.clone()),
        }
    }
    decoded
}
