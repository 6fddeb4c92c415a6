//! The consumer state machine
//!
//! A [`Consumer`] is a suspended, incremental parse: a value that accepts
//! input in arbitrary-sized [`Stream`] chunks, may suspend waiting for more,
//! and eventually produces a result or stops with an [`Error`]. Consumers
//! are plain immutable values — they can be stored, cloned, discarded, or
//! driven again from the same state.
//!
//! The three shapes:
//!
//! - [`Consumer::Done`] — the parse succeeded.
//! - [`Consumer::Cont`] — more input is needed; the [`Resume`] is called
//!   with the next chunk.
//! - [`Consumer::Stop`] — stopped on an error. The resumption is *kept*, so
//!   a driver that knows how to handle the error (e.g. a seek signal, see
//!   [`crate::producer`]) can resume the consumer anyway.
//!
//! Consumers compose sequentially with [`Consumer::bind`], which threads
//! leftover input from one consumer into the next across suspensions. This
//! is the one place where unconsumed input crosses a consumer boundary;
//! every combinator in the crate is built on it.
//!
//! ## Example
//!
//! ```rust
//! use thresh::binary::uint;
//! use thresh::stream::{Endianness, Stream};
//!
//! // a length byte followed by that many bytes of payload, as an integer
//! let c = uint(Endianness::Big, 1).bind(|n| uint(Endianness::Big, n as usize));
//! let (c, leftover) = c.feed(Stream::chunk(&b"\x03abcdefg"[..]));
//! assert_eq!(c.run().unwrap(), 0x616263);
//! assert_eq!(leftover, Stream::chunk(&b"defg"[..]));
//! ```

#[cfg(test)]
mod tests;

use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::stream::Stream;

/// A resumption: the rest of a suspended parse, waiting for input.
///
/// Calling one with a chunk yields the advanced consumer and the unconsumed
/// suffix of the chunk. A resumption must uphold the leftover contract: when
/// it returns a [`Consumer::Cont`], the returned leftover is
/// [`Stream::Empty`] (the chunk was fully consumed or buffered); `Done` and
/// `Stop` may return input unconsumed.
pub struct Resume<T>(Rc<dyn Fn(Stream) -> (Consumer<T>, Stream)>);

impl<T> Clone for Resume<T> {
    fn clone(&self) -> Self {
        Resume(Rc::clone(&self.0))
    }
}

impl<T> Resume<T> {
    /// Wrap a resumption function.
    pub fn new(f: impl Fn(Stream) -> (Consumer<T>, Stream) + 'static) -> Resume<T> {
        Resume(Rc::new(f))
    }

    /// Feed one chunk to the suspended parse.
    pub fn call(&self, input: Stream) -> (Consumer<T>, Stream) {
        (self.0)(input)
    }
}

impl<T> fmt::Debug for Resume<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resume(..)")
    }
}

/// A suspended, incremental parse producing a `T`.
#[derive(Clone, Debug)]
pub enum Consumer<T> {
    /// The parse succeeded.
    Done(T),
    /// More input is needed.
    Cont(Resume<T>),
    /// Stopped on an error; the resumption is kept so a driver may choose
    /// to ignore the signal and continue feeding.
    Stop(Error, Resume<T>),
}

impl<T: 'static> Consumer<T> {
    /// A consumer that is permanently stopped: its resumption stops again
    /// with the same error, whatever it is fed.
    pub fn fail(err: Error) -> Consumer<T> {
        let again = err.clone();
        Consumer::Stop(err, Resume::new(move |s| (Consumer::fail(again.clone()), s)))
    }

    /// Advance with one chunk of input.
    ///
    /// `Done` and `Stop` consumers are left unchanged (in particular,
    /// feeding [`Stream::End`] to a terminal consumer is a no-op); a `Cont`
    /// invokes its resumption.
    pub fn feed(self, input: Stream) -> (Consumer<T>, Stream) {
        match self {
            Consumer::Cont(k) => k.call(input),
            done_or_stopped => (done_or_stopped, input),
        }
    }

    /// Retire the consumer: feed [`Stream::End`] and extract the outcome.
    ///
    /// # Panics
    ///
    /// Panics if the consumer still wants input after `End` — that is
    /// either a parser bug or an unhandled truncation, and in both cases
    /// there is no result to report.
    pub fn run(self) -> Result<T, Error> {
        let (c, _) = self.feed(Stream::End);
        match c {
            Consumer::Done(x) => Ok(x),
            Consumer::Stop(err, _) => Err(err),
            Consumer::Cont(_) => panic!("consumer still suspended after end of input"),
        }
    }

    /// Monadic sequencing: run `self` to completion, then run the consumer
    /// `f` makes from its result. Leftover input of `self` flows into that
    /// continuation; a stop of `self` propagates, with the binding kept
    /// alive through the stored resumption.
    pub fn bind<U: 'static>(self, f: impl Fn(T) -> Consumer<U> + 'static) -> Consumer<U> {
        self.bind_rc(Rc::new(f))
    }

    fn bind_rc<U: 'static>(self, f: Rc<dyn Fn(T) -> Consumer<U>>) -> Consumer<U> {
        match self {
            Consumer::Done(x) => f(x),
            Consumer::Cont(k) => Consumer::Cont(bind_resume(k, f)),
            Consumer::Stop(err, k) => Consumer::Stop(err, bind_resume(k, f)),
        }
    }

    /// Sequence, discarding the result of `self`. Equivalent to
    /// `self.bind(move |_| b)` but without re-creating `b` per call.
    pub fn then<U: Clone + 'static>(self, b: Consumer<U>) -> Consumer<U> {
        match self {
            Consumer::Done(_) => b,
            Consumer::Cont(k) => Consumer::Cont(then_resume(k, b)),
            Consumer::Stop(err, k) => Consumer::Stop(err, then_resume(k, b)),
        }
    }

    /// Run `self`, discard its result, and produce `x`.
    pub fn then_return<U: Clone + 'static>(self, x: U) -> Consumer<U> {
        self.then(Consumer::Done(x))
    }

    /// Transform the result.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Consumer<U> {
        self.bind(move |x| Consumer::Done(f(x)))
    }

    /// Discard the result.
    pub fn void(self) -> Consumer<()> {
        self.map(|_| ())
    }
}

impl<T> Consumer<T> {
    /// Has the parse succeeded?
    pub fn is_done(&self) -> bool {
        matches!(self, Consumer::Done(_))
    }

    /// Is the parse suspended, waiting for input?
    pub fn is_cont(&self) -> bool {
        matches!(self, Consumer::Cont(_))
    }

    /// Has the parse stopped on an error?
    pub fn is_stop(&self) -> bool {
        matches!(self, Consumer::Stop(..))
    }

    /// The stop error, if stopped.
    pub fn err(&self) -> Option<&Error> {
        match self {
            Consumer::Stop(err, _) => Some(err),
            _ => None,
        }
    }
}

impl Consumer<()> {
    /// Stop with `err`, but absorb it on the next feed: the resumption
    /// yields `Done(())` without consuming input.
    ///
    /// This is what makes a granted seek non-destructive: the producer
    /// repositions the source and the raised stop quietly steps aside (see
    /// [`crate::producer::seek`]).
    pub fn raise(err: Error) -> Consumer<()> {
        Consumer::Stop(err, Resume::new(|s| (Consumer::Done(()), s)))
    }
}

fn bind_resume<T: 'static, U: 'static>(
    k: Resume<T>,
    f: Rc<dyn Fn(T) -> Consumer<U>>,
) -> Resume<U> {
    Resume::new(move |s| {
        let (c, rest) = k.call(s);
        match c {
            // the sub-parse finished: its leftover flows into the continuation
            Consumer::Done(x) => f(x).feed(rest),
            suspended => (suspended.bind_rc(f.clone()), rest),
        }
    })
}

fn then_resume<T: 'static, U: Clone + 'static>(k: Resume<T>, b: Consumer<U>) -> Resume<U> {
    Resume::new(move |s| {
        let (c, rest) = k.call(s);
        match c {
            Consumer::Done(_) => b.clone().feed(rest),
            suspended => (suspended.then(b.clone()), rest),
        }
    })
}
