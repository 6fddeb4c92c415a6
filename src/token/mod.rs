//! Token-level primitive consumers
//!
//! Every primitive follows the same template: a [`Consumer::Cont`] whose
//! resumption suspends on [`Stream::Empty`], fails with
//! [`NoMatch`][crate::error::Error::NoMatch] on a premature [`Stream::End`],
//! and otherwise consumes a prefix of the chunk, returning the unread
//! suffix as leftover. Primitives are re-entrant after partial input: given
//! a short chunk they return a fresh `Cont` carrying the remaining
//! requirement.
//!
//! The primitives here are byte-level; feeding them a bit chunk is a
//! programmer error and panics. Bit-level parsing lives in
//! [`crate::binary::bits`].


use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use bytes::Bytes;

use crate::consumer::{Consumer, Resume};
use crate::error::Error;
use crate::stream::Stream;

/// Consume and produce the first element of the input: the next byte of a
/// byte stream, or the next bit (`0`/`1`) of a bit stream.
///
/// ## Example
///
/// ```rust
/// use thresh::stream::Stream;
/// use thresh::token::any;
///
/// let (c, rest) = any().feed(Stream::chunk(&b"xyz"[..]));
/// assert_eq!(c.run().unwrap(), b'x');
/// assert_eq!(rest, Stream::chunk(&b"yz"[..]));
/// ```
pub fn any() -> Consumer<u8> {
    Consumer::Cont(Resume::new(k_any))
}

fn k_any(s: Stream) -> (Consumer<u8>, Stream) {
    match s {
        Stream::End => (Consumer::fail(Error::no_match("end of input")), Stream::End),
        Stream::Empty => (any(), Stream::Empty),
        s => {
            let (x, rest) = s.take1();
            (Consumer::Done(x), rest)
        }
    }
}

/// Match exactly the byte `b`.
///
/// On mismatch the chunk is left unconsumed, so an alternative branch can
/// still read it.
pub fn byte(b: u8) -> Consumer<u8> {
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match(format!(
                "{:?} (unexpected end of input)",
                b as char
            ))),
            Stream::End,
        ),
        Stream::Empty => (byte(b), Stream::Empty),
        Stream::Chunk(data) => {
            if data[0] != b {
                (
                    Consumer::fail(Error::no_match(format!(
                        "{:?} (unexpected {:?})",
                        b as char, data[0] as char
                    ))),
                    Stream::Chunk(data),
                )
            } else {
                (Consumer::Done(b), Stream::chunk(data.slice(1..)))
            }
        }
        Stream::BitChunk { .. } => panic!("byte: fed a bit-level chunk"),
    }))
}

/// Match a literal byte string, producing it on success.
///
/// An empty literal succeeds immediately. On mismatch, the bytes up to the
/// mismatch are already consumed — the stream is left positioned just
/// before the first byte that differs.
pub fn literal(lit: impl Into<Bytes>) -> Consumer<Bytes> {
    let lit = lit.into();
    literal_suffix(lit.clone()).then_return(lit)
}

// matches the remaining suffix of a literal, with unit result
fn literal_suffix(lit: Bytes) -> Consumer<()> {
    if lit.is_empty() {
        return Consumer::Done(());
    }
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match(format!(
                "{:?} (unexpected end of input)",
                String::from_utf8_lossy(&lit)
            ))),
            Stream::End,
        ),
        Stream::Empty => (literal_suffix(lit.clone()), Stream::Empty),
        Stream::Chunk(data) => {
            for i in 0..lit.len() {
                if i == data.len() {
                    return (literal_suffix(lit.slice(i..)), Stream::Empty);
                }
                if data[i] != lit[i] {
                    return (
                        Consumer::fail(Error::no_match(format!(
                            "{:?} (unexpected {:?})",
                            String::from_utf8_lossy(&lit),
                            data[i] as char
                        ))),
                        Stream::chunk(data.slice(i..)),
                    );
                }
            }
            (Consumer::Done(()), Stream::chunk(data.slice(lit.len()..)))
        }
        Stream::BitChunk { .. } => panic!("literal: fed a bit-level chunk"),
    }))
}

/// Match any one byte of `set`.
pub fn one_of(set: impl Into<Bytes>) -> Consumer<u8> {
    let set = set.into();
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match("unexpected end of input")),
            Stream::End,
        ),
        Stream::Empty => (one_of(set.clone()), Stream::Empty),
        Stream::Chunk(data) => {
            if set.contains(&data[0]) {
                (Consumer::Done(data[0]), Stream::chunk(data.slice(1..)))
            } else {
                (
                    Consumer::fail(Error::no_match(format!("unexpected {:?}", data[0] as char))),
                    Stream::Chunk(data),
                )
            }
        }
        Stream::BitChunk { .. } => panic!("one_of: fed a bit-level chunk"),
    }))
}

/// Match any one byte *not* in `set`.
pub fn none_of(set: impl Into<Bytes>) -> Consumer<u8> {
    let set = set.into();
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match("unexpected end of input")),
            Stream::End,
        ),
        Stream::Empty => (none_of(set.clone()), Stream::Empty),
        Stream::Chunk(data) => {
            if set.contains(&data[0]) {
                (
                    Consumer::fail(Error::no_match(format!("unexpected {:?}", data[0] as char))),
                    Stream::Chunk(data),
                )
            } else {
                (Consumer::Done(data[0]), Stream::chunk(data.slice(1..)))
            }
        }
        Stream::BitChunk { .. } => panic!("none_of: fed a bit-level chunk"),
    }))
}

/// Consume and discard `n` bytes. `skip(0)` succeeds immediately.
pub fn skip(n: usize) -> Consumer<()> {
    if n == 0 {
        return Consumer::Done(());
    }
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match(format!(
                "skip({n}): unexpected end of input"
            ))),
            Stream::End,
        ),
        Stream::Empty => (skip(n), Stream::Empty),
        Stream::Chunk(data) => {
            let l = data.len();
            if l < n {
                (skip(n - l), Stream::Empty)
            } else {
                (Consumer::Done(()), Stream::chunk(data.slice(n..)))
            }
        }
        Stream::BitChunk { .. } => panic!("skip: fed a bit-level chunk"),
    }))
}

/// Forward every byte of the stream to `sink`, finishing with `Done(())`
/// at end of input.
///
/// The sink is owned by the consumer for its whole lifetime. Short writes
/// are retried (and `Interrupted` errors swallowed) the way
/// [`std::io::Write::write_all`] does; a write of zero bytes becomes a
/// [`WriteZero`][std::io::ErrorKind::WriteZero] error. On a sink error the
/// consumer stops with [`Error::Sink`] and returns the unwritten tail as
/// leftover. The stored resumption would retry the same sink, but the stop
/// should be treated as terminal: drivers are expected to surface the
/// error, not re-feed.
pub fn write_to<W: io::Write + 'static>(sink: W) -> Consumer<()> {
    Consumer::Cont(write_resume(Rc::new(RefCell::new(sink))))
}

fn write_resume<W: io::Write + 'static>(sink: Rc<RefCell<W>>) -> Resume<()> {
    Resume::new(move |s| match s {
        Stream::End => (Consumer::Done(()), Stream::End),
        Stream::Empty => (Consumer::Cont(write_resume(sink.clone())), Stream::Empty),
        Stream::Chunk(data) => {
            let mut data = data;
            loop {
                if data.is_empty() {
                    return (Consumer::Cont(write_resume(sink.clone())), Stream::Empty);
                }
                match sink.borrow_mut().write(&data) {
                    Ok(0) => {
                        let err = io::Error::new(
                            io::ErrorKind::WriteZero,
                            "sink accepted no bytes",
                        );
                        return (
                            Consumer::Stop(Error::Sink(Arc::new(err)), write_resume(sink.clone())),
                            Stream::Chunk(data),
                        );
                    }
                    Ok(n) => data = data.slice(n..),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        tracing::debug!(error = %e, unwritten = data.len(), "sink write failed");
                        return (
                            Consumer::Stop(Error::Sink(Arc::new(e)), write_resume(sink.clone())),
                            Stream::Chunk(data),
                        );
                    }
                }
            }
        }
        Stream::BitChunk { .. } => panic!("write_to: fed a bit-level chunk"),
    })
}
