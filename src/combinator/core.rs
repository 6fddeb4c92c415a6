//! Core combinators

use std::ops::RangeInclusive;

use crate::combinator::branch::ordered_choice;
use crate::consumer::{Consumer, Resume};
use crate::error::Error;
use crate::stream::Stream;

/// Make a consumer optional, producing `None` where it would have stopped.
///
/// Equivalent to an [`ordered_choice`] between `c` and an immediate
/// `Done(None)`, and subject to the same lookahead rule: `opt` must be fed
/// enough input to decide in one piece, or it panics rather than let chunk
/// boundaries pick the answer.
///
/// ## Example
///
/// ```rust
/// use thresh::combinator::opt;
/// use thresh::stream::Stream;
/// use thresh::token::literal;
///
/// let (c, rest) = opt(literal("XYZ")).feed(Stream::chunk(&b"abc"[..]));
/// assert_eq!(c.run().unwrap(), None);
/// assert_eq!(rest, Stream::chunk(&b"abc"[..]));
/// ```
pub fn opt<T: Clone + 'static>(c: Consumer<T>) -> Consumer<Option<T>> {
    ordered_choice(vec![c.map(Some), Consumer::Done(None)])
}

/// Succeed only at end of input.
pub fn eof() -> Consumer<()> {
    Consumer::Cont(Resume::new(k_eof))
}

fn k_eof(s: Stream) -> (Consumer<()>, Stream) {
    match s {
        Stream::Empty => (eof(), Stream::Empty),
        Stream::End => (Consumer::Done(()), Stream::End),
        s => (Consumer::fail(Error::no_match("expected end of input")), s),
    }
}

/// Run `c`, then reject its result unless `pred` holds.
///
/// The rejection is a recoverable `NoMatch`, but note that `c`'s input is
/// consumed either way — there is no rewinding for alternatives that read
/// at a finer grain.
pub fn validate<T: 'static>(
    c: Consumer<T>,
    pred: impl Fn(&T) -> bool + 'static,
) -> Consumer<T> {
    c.bind(move |x| {
        if pred(&x) {
            Consumer::Done(x)
        } else {
            Consumer::fail(Error::no_match("validate"))
        }
    })
}

/// Run `c`, then reject results outside `bounds`.
///
/// ## Example
///
/// ```rust
/// use thresh::combinator::range;
/// use thresh::binary::uint;
/// use thresh::stream::{Endianness, Stream};
///
/// let c = range(uint(Endianness::Big, 1), 0x30..=0x39);
/// let (c, _) = c.feed(Stream::chunk(&b"7"[..]));
/// assert_eq!(c.run().unwrap(), 0x37);
/// ```
pub fn range<T: PartialOrd + 'static>(
    c: Consumer<T>,
    bounds: RangeInclusive<T>,
) -> Consumer<T> {
    validate(c, move |x| bounds.contains(x))
}
