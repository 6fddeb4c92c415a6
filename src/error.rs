//! Error taxonomy
//!
//! Errors fall in three groups with different propagation rules:
//!
//! - [`Error::NoMatch`] is a recoverable parse failure. Branching
//!   combinators ([`choice`][crate::combinator::choice],
//!   [`ordered_choice`][crate::combinator::ordered_choice],
//!   [`opt`][crate::combinator::opt], [`many0`][crate::combinator::many0])
//!   catch it by pruning the failed branch; surfacing it to
//!   [`Consumer::run`][crate::Consumer::run] turns it into an `Err`.
//! - [`Error::Seek`] and [`Error::SeekRel`] are driver protocol signals, not
//!   failures. A consumer stops with one of them to ask its producer to
//!   reposition the source; a seek-capable producer obeys and resumes the
//!   consumer, a plain one surfaces the stop unchanged. Combinators never
//!   interpret them.
//! - [`Error::Sink`] reports a failed write from the
//!   [`write_to`][crate::token::write_to] consumer; the unwritten tail is
//!   returned as leftover alongside the stop.
//!
//! Two conditions are deliberately *not* errors but panics: an
//! `ordered_choice` that cannot commit within the lookahead it was given
//! (the accepted language would depend on chunk boundaries), and feeding a
//! chunk of the wrong level (bit vs byte) or wrong bit order to a parser.
//! Both are programmer mistakes, not properties of the input.

use std::io;
use std::sync::Arc;

/// The error carried by a stopped [`Consumer`][crate::Consumer].
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A parser did not recognize the input.
    #[error("{expected}: no match")]
    NoMatch {
        /// What the failing parser was looking for.
        expected: String,
    },
    /// Request to reposition the source to an absolute offset; negative
    /// counts from the end (`-1` is the last byte).
    #[error("tried to seek (to position {0:#x})")]
    Seek(i64),
    /// Request to reposition the source relative to the current position.
    #[error("tried to seek (by {0} bytes)")]
    SeekRel(i64),
    /// The sink of a [`write_to`][crate::token::write_to] consumer failed.
    #[error("sink error: {0}")]
    Sink(#[source] Arc<io::Error>),
}

impl Error {
    /// Shorthand for [`Error::NoMatch`].
    pub fn no_match(expected: impl Into<String>) -> Error {
        Error::NoMatch {
            expected: expected.into(),
        }
    }

    /// Is this a recoverable parse failure?
    pub fn is_no_match(&self) -> bool {
        matches!(self, Error::NoMatch { .. })
    }

    /// The seek this error requests, if it is a seek signal.
    pub fn seek_target(&self) -> Option<io::SeekFrom> {
        match *self {
            Error::Seek(offset) if offset < 0 => Some(io::SeekFrom::End(offset)),
            Error::Seek(offset) => Some(io::SeekFrom::Start(offset as u64)),
            Error::SeekRel(offset) => Some(io::SeekFrom::Current(offset)),
            Error::NoMatch { .. } | Error::Sink(_) => None,
        }
    }
}
