//! Transducers: reshaping the stream between producer and consumer
//!
//! A [`Transducer`] adapts a consumer: given an *inner* consumer it returns
//! an *outer* consumer that accepts the raw stream, feeds a transformed
//! stream to the inner, and finishes as `Done(inner)` once its part of the
//! stream is over — the inner is handed back in whatever shape it is in,
//! and the caller decides how to finish it (usually via [`fuse`], which
//! [`Producer::pipe`][crate::producer::Producer::pipe] applies for you).
//!
//! ## Example
//!
//! ```rust
//! use thresh::combinator::many0;
//! use thresh::stream::Stream;
//! use thresh::token::any;
//! use thresh::transducer::break_after;
//!
//! // give the collector only the first line, keep the rest
//! let outer = break_after("\n").apply(many0(any()));
//! let (outer, rest) = outer.feed(Stream::chunk(&b"abc\ndef"[..]));
//! assert_eq!(rest, Stream::chunk(&b"def"[..]));
//! let inner = outer.run().unwrap();
//! assert_eq!(inner.run().unwrap(), b"abc\n".to_vec());
//! ```

#[cfg(test)]
mod tests;

use std::rc::Rc;

use bytes::{Bytes, BytesMut};

use crate::combinator::ordered_choice;
use crate::consumer::{Consumer, Resume};
use crate::stream::Stream;

/// A consumer-to-consumer adapter; see the [module docs][self].
pub struct Transducer<T> {
    wrap: Rc<dyn Fn(Consumer<T>) -> Consumer<Consumer<T>>>,
}

impl<T> Clone for Transducer<T> {
    fn clone(&self) -> Self {
        Transducer {
            wrap: Rc::clone(&self.wrap),
        }
    }
}

impl<T: Clone + 'static> Transducer<T> {
    /// Wrap an adapting function.
    pub fn new(f: impl Fn(Consumer<T>) -> Consumer<Consumer<T>> + 'static) -> Transducer<T> {
        Transducer { wrap: Rc::new(f) }
    }

    /// Wrap an inner consumer, producing the outer consumer.
    pub fn apply(&self, inner: Consumer<T>) -> Consumer<Consumer<T>> {
        (self.wrap)(inner)
    }

    /// Apply `self`, then `other`, threading the inner consumer through
    /// both transductions in sequence.
    pub fn append(self, other: Transducer<T>) -> Transducer<T> {
        Transducer::new(move |inner| {
            let other = other.clone();
            self.apply(inner).bind(move |it| other.apply(it))
        })
    }
}

impl<T: Clone + 'static> Consumer<Consumer<T>> {
    /// Collapse a finished transduction to a plain consumer of the inner
    /// result.
    ///
    /// When the outer consumer reaches `Done(inner)`: a stopped inner is
    /// surfaced as-is; a suspended inner is fed [`Stream::End`] once and
    /// whatever it settles to is the result.
    pub fn fuse(self) -> Consumer<T> {
        self.bind(|inner| match inner {
            stopped @ Consumer::Stop(..) => stopped,
            Consumer::Cont(k) => k.call(Stream::End).0,
            done => done,
        })
    }
}

/// The identity transducer: forwards every chunk verbatim, finishing the
/// moment the inner consumer leaves its suspended state.
pub fn pass<T: Clone + 'static>() -> Transducer<T> {
    Transducer::new(pass_outer)
}

fn pass_outer<T: Clone + 'static>(inner: Consumer<T>) -> Consumer<Consumer<T>> {
    Consumer::Cont(Resume::new(move |s| {
        let (inner, rest) = inner.clone().feed(s);
        if inner.is_cont() {
            (pass_outer(inner), rest)
        } else {
            (Consumer::Done(inner), rest)
        }
    }))
}

/// Split the stream at the first occurrence of `sep`, forwarding everything
/// up to *and including* the separator to the inner consumer, then finish,
/// returning the remainder after the separator as leftover.
///
/// A separator may straddle a chunk boundary: only the longest chunk tail
/// that is a proper prefix of `sep` is held back from the inner consumer
/// while waiting for the next chunk — the buffered window never exceeds
/// `sep.len() - 1` bytes. If the stream ends first, anything held back is
/// flushed to the inner consumer, which then sees `End`.
///
/// # Panics
///
/// Panics if `sep` is empty.
pub fn break_after<T: Clone + 'static>(sep: impl Into<Bytes>) -> Transducer<T> {
    let sep = sep.into();
    assert!(!sep.is_empty(), "break_after: empty separator");
    Transducer::new(move |inner| break_outer(sep.clone(), Bytes::new(), inner))
}

fn break_outer<T: Clone + 'static>(
    sep: Bytes,
    held: Bytes,
    inner: Consumer<T>,
) -> Consumer<Consumer<T>> {
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => {
            let mut inner = inner.clone();
            if !held.is_empty() {
                inner = inner.feed(Stream::chunk(held.clone())).0;
            }
            let (inner, _) = inner.feed(Stream::End);
            (Consumer::Done(inner), Stream::End)
        }
        Stream::Empty => (
            break_outer(sep.clone(), held.clone(), inner.clone()),
            Stream::Empty,
        ),
        Stream::Chunk(data) => {
            let mut window = BytesMut::with_capacity(held.len() + data.len());
            window.extend_from_slice(&held);
            window.extend_from_slice(&data);
            let window = window.freeze();
            match memchr::memmem::find(&window, &sep) {
                Some(at) => {
                    let cut = at + sep.len();
                    let (inner, _) = inner.clone().feed(Stream::chunk(window.slice(..cut)));
                    (Consumer::Done(inner), Stream::chunk(window.slice(cut..)))
                }
                None => {
                    let keep = tail_overlap(&window, &sep);
                    let mut inner = inner.clone();
                    if window.len() > keep {
                        let (fed, _) =
                            inner.feed(Stream::chunk(window.slice(..window.len() - keep)));
                        inner = fed;
                    }
                    (
                        break_outer(
                            sep.clone(),
                            window.slice(window.len() - keep..),
                            inner,
                        ),
                        Stream::Empty,
                    )
                }
            }
        }
        Stream::BitChunk { .. } => panic!("break_after: fed a bit-level chunk"),
    }))
}

// length of the longest suffix of `window` that is a proper prefix of `sep`
fn tail_overlap(window: &[u8], sep: &[u8]) -> usize {
    let max = (sep.len() - 1).min(window.len());
    for k in (1..=max).rev() {
        if window[window.len() - k..] == sep[..k] {
            return k;
        }
    }
    0
}

/// Run `pre` on the stream first (discarding its result), then apply `tr`.
pub fn prefix<P, T>(pre: Consumer<P>, tr: Transducer<T>) -> Transducer<T>
where
    P: Clone + 'static,
    T: Clone + 'static,
{
    Transducer::new(move |inner| pre.clone().then(tr.apply(inner)))
}

/// Apply `tr` zero or more times, threading the inner consumer through
/// each round.
///
/// Each round is an [`ordered_choice`] between "one more transduction,
/// then repeat" and "finish with the inner as it stands", so the same
/// lookahead rules apply as for any ordered choice.
pub fn repeat<T: Clone + 'static>(tr: Transducer<T>) -> Transducer<T> {
    Transducer::new(move |inner| {
        let tr = tr.clone();
        let again = tr.clone();
        ordered_choice(vec![
            tr.apply(inner.clone())
                .bind(move |it| repeat(again.clone()).apply(it)),
            Consumer::Done(inner),
        ])
    })
}

/// Apply `tr` once, then zero or more further times.
pub fn repeat1<T: Clone + 'static>(tr: Transducer<T>) -> Transducer<T> {
    tr.clone().append(repeat(tr))
}
