//! Program text parsing
//!
//! A program is a single line of comma-separated signed decimal integers,
//! giving the initial memory image in address order from 0:
//!
//! ```text
//! 1,9,10,3,2,3,11,0,99,30,40,50
//! ```
//!
//! Whitespace around tokens (including a trailing newline) is ignored, as is a
//! single trailing comma.

use crate::memory::Word;
use num_bigint::ParseBigIntError;
use thiserror::Error;

/// Errors produced while reading program text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("program text is empty")]
    Empty,

    #[error("invalid integer {token:?} at position {index}")]
    InvalidInteger {
        index: usize,
        token: String,
        #[source]
        source: ParseBigIntError,
    },
}

/// Parse comma-separated program text into a program image
pub fn parse_program(source: &str) -> Result<Vec<Word>, ParseError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(ParseError::Empty);
    }

    let source = source.strip_suffix(',').unwrap_or(source);
    source
        .split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token
                .parse::<Word>()
                .map_err(|source| ParseError::InvalidInteger {
                    index,
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}
