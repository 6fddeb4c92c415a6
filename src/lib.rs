//! # thresh, parsing streams chunk by chunk
//!
//! thresh is an incremental parsing library built around three composable
//! pieces:
//!
//! - a [`Consumer`]: a suspended parse that accepts input in
//!   arbitrary-sized chunks, suspends when it needs more, and composes
//!   sequentially through a monadic [`bind`][Consumer::bind] that threads
//!   leftover input across parser boundaries;
//! - a [`Producer`][producer::Producer]: a driver that pulls chunks from a
//!   byte source and feeds them to a consumer, handling out-of-band
//!   requests such as seeks;
//! - a [`Transducer`][transducer::Transducer]: a consumer-to-consumer
//!   adapter that reshapes the stream on its way to an inner consumer
//!   (split at a separator, strip a prefix, repeat a framing).
//!
//! On top of the consumer core sit token-level primitives
//! ([`token`]), byte- and bit-level numeric parsers ([`binary`]), a
//! combinator library with bounded-lookahead ordered choice
//! ([`combinator`]), and a declarative fixed-layout record filler
//! ([`binary::record`]).
//!
//! Parsers never see where chunk boundaries fall: every primitive resumes
//! cleanly after partial input, and results, consumption, and leftovers
//! are identical however the input is sliced. Consumers are plain
//! immutable values — store them, clone them, drive one copy and keep the
//! other.
//!
//! ## Example
//!
//! ```rust
//! use thresh::binary::uint;
//! use thresh::stream::{Endianness, Stream};
//!
//! // a length-prefixed big-endian integer
//! let c = uint(Endianness::Big, 1).bind(|len| uint(Endianness::Big, len as usize));
//!
//! // ... fed in chunks sliced wherever the transport liked
//! let (c, _) = c.feed(Stream::chunk(&b"\x03a"[..]));
//! let (c, leftover) = c.feed(Stream::chunk(&b"bcdefg"[..]));
//!
//! assert_eq!(c.run().unwrap(), 0x616263);
//! assert_eq!(leftover, Stream::chunk(&b"defg"[..]));
//! ```
//!
//! Driving a consumer from `std::io` and reshaping the stream on the way:
//!
//! ```rust
//! use thresh::combinator::many0;
//! use thresh::producer;
//! use thresh::token::any;
//! use thresh::transducer::break_after;
//!
//! let source = std::io::Cursor::new(b"first line\nsecond line".to_vec());
//! let first = producer::from_reader(source)
//!     .pipe(break_after("\n"))
//!     .apply(many0(any()))
//!     .run();
//! assert_eq!(first.run().unwrap(), b"first line\n".to_vec());
//! ```

#![warn(missing_docs)]
#![warn(clippy::doc_markdown)]
#![allow(clippy::type_complexity)]

pub mod action;
pub mod binary;
pub mod combinator;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod stream;
pub mod token;
pub mod transducer;

pub use crate::action::Action;
pub use crate::consumer::{Consumer, Resume};
pub use crate::error::Error;
pub use crate::stream::{Endianness, Stream};

/// Core types for glob import.
///
/// ## Example
///
/// ```rust
/// use thresh::prelude::*;
///
/// let c: Consumer<u8> = thresh::token::any();
/// let (c, _) = c.feed(Stream::chunk(&b"a"[..]));
/// assert_eq!(c.run().unwrap(), b'a');
/// ```
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::consumer::{Consumer, Resume};
    pub use crate::error::Error;
    pub use crate::producer::Producer;
    pub use crate::stream::{Endianness, Stream};
    pub use crate::transducer::Transducer;
}
