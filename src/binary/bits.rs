//! Bit-level numeric parsing
//!
//! [`bits`] reads an `n`-bit unsigned integer from a *bit stream*: chunks
//! constructed with [`Stream::bit_chunk`], carrying a bit order and a
//! first-byte offset. A number may begin partway through a byte, span any
//! number of whole bytes, and end partway through another; the leftover
//! chunk records how far into its first byte the parse stopped.

use crate::consumer::{Consumer, Resume};
use crate::error::Error;
use crate::stream::{Endianness, Stream};

/// Parse an `n`-bit unsigned integer, `n <= 64`, in the given bit order.
///
/// `Big` assembles bits most-significant-first (`r = (r << k) | v`);
/// `Little` places each group at its bit position (`r |= v << pos`). Short
/// chunks accumulate across suspensions. `bits(_, 0)` is an immediate zero.
///
/// ## Example
///
/// ```rust
/// use thresh::binary::bits;
/// use thresh::stream::{Endianness, Stream};
///
/// let input = Stream::bit_chunk(&b"\x12\x34\x56\x78\x9a"[..], Endianness::Big, 0);
/// let (c, rest) = bits(Endianness::Big, 12).feed(input);
/// assert_eq!(c.run().unwrap(), 0x123);
/// assert_eq!(rest, Stream::bit_chunk(&b"\x34\x56\x78\x9a"[..], Endianness::Big, 4));
/// ```
///
/// # Panics
///
/// Panics if `n > 64`, if fed a byte-level chunk, or if fed a bit chunk
/// whose bit order differs from `order` — all three are parser bugs, not
/// input properties.
pub fn bits(order: Endianness, n: u8) -> Consumer<u64> {
    assert!(n <= 64, "bits: at most 64 bits");
    if n == 0 {
        return Consumer::Done(0);
    }
    bits_loop(order, 0, 0, n)
}

fn bits_loop(order: Endianness, acc: u64, pos: u8, need: u8) -> Consumer<u64> {
    Consumer::Cont(Resume::new(move |s| match s {
        Stream::End => (
            Consumer::fail(Error::no_match(format!(
                "bits({need}): unexpected end of input"
            ))),
            Stream::End,
        ),
        Stream::Empty => (bits_loop(order, acc, pos, need), Stream::Empty),
        Stream::BitChunk {
            bytes,
            order: chunk_order,
            offset,
        } => {
            if chunk_order != order {
                panic!("bits: fed a chunk with mismatched bit order");
            }
            let mut r = acc;
            let mut p = pos;
            let mut n = need;
            let avail = 8 - offset;

            // the (possibly partial) first byte
            if n < avail {
                r = add_bits(order, r, p, bytes[0], n, offset);
                return (Consumer::Done(r), Stream::bit_chunk(bytes, order, offset + n));
            }
            r = add_first(order, r, p, bytes[0], avail, offset);
            n -= avail;
            p += avail;
            let mut data = bytes.slice(1..);

            // whole interior bytes, as needed and available
            let m = ((n / 8) as usize).min(data.len());
            for &b in &data[..m] {
                r = add_byte(order, r, p, b);
                p += 8;
            }
            n -= (m as u8) * 8;
            data = data.slice(m..);

            if n == 0 {
                return (Consumer::Done(r), Stream::bit_chunk(data, order, 0));
            }
            if data.is_empty() {
                return (bits_loop(order, r, p, n), Stream::Empty);
            }

            // the partial last byte
            r = add_last(order, r, p, data[0], n);
            (Consumer::Done(r), Stream::bit_chunk(data, order, n))
        }
        Stream::Chunk(_) => panic!("bits: fed a byte-level chunk"),
    }))
}

// n bits of b starting at bit `offset`, n < 8
fn add_bits(order: Endianness, r: u64, pos: u8, b: u8, n: u8, offset: u8) -> u64 {
    match order {
        Endianness::Little => r | ((((b >> offset) & !(0xFF << n)) as u64) << pos),
        Endianness::Big => (r << n) | ((((b << offset) as u64) << n) >> 8),
    }
}

// the whole unread remainder of the first byte (n = 8 - offset)
fn add_first(order: Endianness, r: u64, pos: u8, b: u8, n: u8, offset: u8) -> u64 {
    match order {
        Endianness::Little => r | (((b >> offset) as u64) << pos),
        Endianness::Big => (r << n) | ((((b << offset) as u64) << n) >> 8),
    }
}

fn add_byte(order: Endianness, r: u64, pos: u8, b: u8) -> u64 {
    match order {
        Endianness::Little => r | ((b as u64) << pos),
        Endianness::Big => (r << 8) | b as u64,
    }
}

// the low/high n bits of a fresh byte, n < 8
fn add_last(order: Endianness, r: u64, pos: u8, b: u8, n: u8) -> u64 {
    match order {
        Endianness::Little => r | (((b & !(0xFF << n)) as u64) << pos),
        Endianness::Big => (r << n) | (((b as u64) << n) >> 8),
    }
}
