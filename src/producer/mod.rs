//! Producers: driving consumers from byte sources
//!
//! A [`Producer`] feeds chunks to a consumer and returns the advanced
//! consumer wrapped in a deferred [`Action`]. The canonical producers pull
//! from a [`std::io::Read`] source; [`from_bytes`] feeds a value already in
//! memory.
//!
//! The driving contracts:
//!
//! - **EOF does not feed [`Stream::End`].** The producer returns the
//!   consumer as-is; a following producer ([`Producer::append`]) may keep
//!   feeding it. Only [`Consumer::run`] retires a consumer.
//! - **Read errors feed `End` and return.** The consumer gets one chance to
//!   settle on the input it has seen; the error itself is logged, not
//!   injected into the parse.
//! - **Seeks are a protocol, not failures.** A consumer stopping with
//!   [`Error::Seek`]/[`Error::SeekRel`] asks the driver to reposition the
//!   source; [`from_seekable`] obeys and resumes the stopped consumer's
//!   continuation on the repositioned stream. [`from_reader`] treats such a
//!   stop like any other and returns it to the caller.
//!
//! ## Example
//!
//! ```rust
//! use thresh::producer;
//! use thresh::token::write_to;
//!
//! let hello = producer::from_bytes::<()>(&b"hello "[..]);
//! let world = producer::from_bytes::<()>(&b"world"[..]);
//! let out: Vec<u8> = Vec::new();
//! let c = hello.append(world).apply(write_to(out)).run();
//! assert!(c.run().is_ok());
//! ```

#[cfg(test)]
mod tests;

use std::io;

use bytes::Bytes;

use crate::action::Action;
use crate::consumer::Consumer;
use crate::error::Error;
use crate::stream::Stream;
use crate::transducer::Transducer;

/// Stop with a request to reposition the source to `pos` (absolute;
/// negative counts from the end, `-1` being the last byte).
///
/// The error is raised *absorbingly*: once a seek-capable producer has
/// repositioned the source, the next feed advances the consumer to
/// `Done(())` without consuming input, so the signal leaves no trace in
/// the parse.
pub fn seek(pos: i64) -> Consumer<()> {
    Consumer::raise(Error::Seek(pos))
}

/// Stop with a request to reposition the source relative to the current
/// position. See [`seek`].
pub fn seek_rel(delta: i64) -> Consumer<()> {
    Consumer::raise(Error::SeekRel(delta))
}

/// A driver that advances a consumer by feeding it chunks from somewhere.
pub struct Producer<T> {
    drive: Box<dyn FnOnce(Consumer<T>) -> Action<Consumer<T>>>,
}

impl<T: 'static> Producer<T> {
    /// Wrap a driving function.
    pub fn new(f: impl FnOnce(Consumer<T>) -> Action<Consumer<T>> + 'static) -> Producer<T> {
        Producer {
            drive: Box::new(f),
        }
    }

    /// Apply the producer to a consumer, yielding the deferred drive.
    pub fn apply(self, consumer: Consumer<T>) -> Action<Consumer<T>> {
        (self.drive)(consumer)
    }

    /// Run `self`, then run `other` on the resulting consumer.
    ///
    /// This is how a consumer spans multiple sources: end-of-file in the
    /// first source returns a still-live consumer, which the second
    /// producer keeps feeding.
    pub fn append(self, other: Producer<T>) -> Producer<T> {
        Producer::new(move |c| self.apply(c).bind(move |c| other.apply(c)))
    }

    /// Feed this producer's stream through a transducer on its way to the
    /// consumer.
    ///
    /// The inner consumer is wrapped in `tr`, driven, and
    /// [fused][Consumer::fuse] back to a plain consumer of the inner
    /// result.
    pub fn pipe(self, tr: Transducer<T>) -> Producer<T>
    where
        T: Clone,
    {
        Producer::new(move |inner| self.apply(tr.apply(inner).fuse()))
    }
}

/// A producer that feeds the whole value as a single chunk, then returns.
pub fn from_bytes<T: 'static>(data: impl Into<Bytes>) -> Producer<T> {
    let data = data.into();
    Producer::new(move |c| Action::new(move || c.feed(Stream::chunk(data)).0))
}

/// Drive a consumer from a pull source. Seek requests are surfaced to the
/// caller as ordinary stops.
pub fn from_reader<R, T>(source: R) -> Producer<T>
where
    R: io::Read + 'static,
    T: 'static,
{
    read_producer(Plain(source))
}

/// Drive a consumer from a seekable pull source, honoring
/// [`Error::Seek`]/[`Error::SeekRel`] stops by repositioning the source and
/// resuming the consumer.
pub fn from_seekable<R, T>(source: R) -> Producer<T>
where
    R: io::Read + io::Seek + 'static,
    T: 'static,
{
    read_producer(Seekable(source))
}

// the seam between the drive loop and the two source flavors
trait Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// `None` if this source cannot seek at all.
    fn seek_to(&mut self, pos: io::SeekFrom) -> Option<io::Result<u64>>;
}

struct Plain<R>(R);

impl<R: io::Read> Source for Plain<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn seek_to(&mut self, _pos: io::SeekFrom) -> Option<io::Result<u64>> {
        None
    }
}

struct Seekable<R>(R);

impl<R: io::Read + io::Seek> Source for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn seek_to(&mut self, pos: io::SeekFrom) -> Option<io::Result<u64>> {
        Some(self.0.seek(pos))
    }
}

const READ_BUF: usize = 1024;

fn read_producer<S: Source + 'static, T: 'static>(source: S) -> Producer<T> {
    Producer::new(move |consumer| {
        Action::new(move || {
            let mut source = source;
            let mut c = consumer;
            let mut buf = [0u8; READ_BUF];
            loop {
                // decide how (and whether) to keep feeding
                let k = match c {
                    Consumer::Done(_) => return c,
                    Consumer::Cont(ref k) => k.clone(),
                    Consumer::Stop(ref err, ref k) => {
                        let Some(target) = err.seek_target() else {
                            return c;
                        };
                        match source.seek_to(target) {
                            // not seekable: surface the stop to the caller
                            None => return c,
                            Some(Err(e)) => {
                                // feeding End to a stopped consumer is a
                                // no-op, so the stop is surfaced unchanged
                                tracing::debug!(error = %e, "seek failed");
                                return c;
                            }
                            Some(Ok(pos)) => {
                                tracing::trace!(pos, "repositioned source");
                                k.clone()
                            }
                        }
                    }
                };
                match source.read(&mut buf) {
                    // end of this source; the consumer may continue with
                    // another producer, so End is not fed here
                    Ok(0) => return c,
                    Ok(n) => {
                        tracing::trace!(bytes = n, "feeding chunk");
                        let (next, _) = k.call(Stream::chunk(Bytes::copy_from_slice(&buf[..n])));
                        c = next;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "read failed");
                        let (c, _) = c.feed(Stream::End);
                        return c;
                    }
                }
            }
        })
    })
}
