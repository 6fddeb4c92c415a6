//! Parsers for binary numbers
//!
//! Byte-level unsigned integers of any width up to eight bytes, in either
//! byte order, plus width-specialized variants typed as the matching Rust
//! integer. Bit-level numbers live in [`bits`]; fixed-layout records in
//! [`record`].


pub mod bits;
pub mod record;

pub use self::bits::bits;
pub use crate::stream::Endianness;

use crate::consumer::{Consumer, Resume};
use crate::error::Error;
use crate::stream::Stream;
use crate::token::any;

/// Parse an `n`-byte unsigned integer, `n <= 8`, in the given byte order.
///
/// Short chunks accumulate: the consumer suspends mid-number and resumes
/// with the remaining bytes. End of input mid-number fails with `NoMatch`.
/// `uint(_, 0)` is an immediate zero.
///
/// ## Example
///
/// ```rust
/// use thresh::binary::uint;
/// use thresh::stream::{Endianness, Stream};
///
/// let (c, rest) = uint(Endianness::Big, 2).feed(Stream::chunk(&b"\x12\x34\x56"[..]));
/// assert_eq!(c.run().unwrap(), 0x1234);
/// assert_eq!(rest, Stream::chunk(&b"\x56"[..]));
/// ```
///
/// # Panics
///
/// Panics if `n > 8`.
pub fn uint(endian: Endianness, n: usize) -> Consumer<u64> {
    assert!(n <= 8, "uint: at most 8 bytes");
    if n == 0 {
        return Consumer::Done(0);
    }
    uint_loop(endian, n, 0, 0)
}

fn uint_loop(endian: Endianness, n: usize, acc: u64, pos: usize) -> Consumer<u64> {
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match(format!(
                "uint({n}): unexpected end of input"
            ))),
            Stream::End,
        ),
        Stream::Empty => (uint_loop(endian, n, acc, pos), Stream::Empty),
        Stream::Chunk(data) => {
            let m = (n - pos).min(data.len());
            let mut r = acc;
            let mut p = pos;
            for &b in &data[..m] {
                r = match endian {
                    Endianness::Little => r | ((b as u64) << (8 * p)),
                    Endianness::Big => (r << 8) | b as u64,
                };
                p += 1;
            }
            if p < n {
                (uint_loop(endian, n, r, p), Stream::Empty)
            } else {
                (Consumer::Done(r), Stream::chunk(data.slice(m..)))
            }
        }
        Stream::BitChunk { .. } => panic!("uint: fed a bit-level chunk"),
    }))
}

/// Parse a single byte.
pub fn u8() -> Consumer<u8> {
    any()
}

/// Parse a two-byte unsigned integer in the given byte order.
pub fn u16(endian: Endianness) -> Consumer<u16> {
    uint(endian, 2).map(|r| r as u16)
}

/// Parse a four-byte unsigned integer in the given byte order.
pub fn u32(endian: Endianness) -> Consumer<u32> {
    uint(endian, 4).map(|r| r as u32)
}

/// Parse an eight-byte unsigned integer in the given byte order.
pub fn u64(endian: Endianness) -> Consumer<u64> {
    uint(endian, 8)
}
