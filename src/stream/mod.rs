//! Stream chunks
//!
//! Input reaches a [`Consumer`][crate::Consumer] as a sequence of [`Stream`]
//! values: zero or more data-carrying chunks, optionally interspersed with
//! [`Stream::Empty`] ("no data available right now"), terminated by a single
//! [`Stream::End`].
//!
//! A data chunk is either byte-level ([`Stream::Chunk`]) or bit-level
//! ([`Stream::BitChunk`]). A bit chunk carries a bit order and the number of
//! bits of its first byte that have already been consumed. Chunks are
//! immutable; consuming a prefix produces a fresh, re-sliced chunk.


use bytes::Bytes;

/// Byte order of multi-byte integers, and bit order within a byte.
///
/// For bit streams, [`Endianness::Little`] counts bit 0 as the least
/// significant bit of a byte; [`Endianness::Big`] counts bit 0 as the most
/// significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Most significant first
    Big,
    /// Least significant first
    Little,
}

/// A chunk of input, as handed to a consumer's resumption.
///
/// Invariant: a `Chunk` or `BitChunk` always carries at least one unread
/// element (one byte, or one unread bit). The constructors normalize
/// exhausted slices to [`Stream::Empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    /// Terminal marker: no further input will ever arrive.
    End,
    /// No data available now; more may follow.
    Empty,
    /// A byte-level chunk.
    Chunk(Bytes),
    /// A bit-level chunk: bytes, bit order, and the number of bits of the
    /// first byte that are already consumed (`0..8`).
    BitChunk {
        /// Backing bytes, first byte possibly partially consumed.
        bytes: Bytes,
        /// Bit order used to read bits out of each byte.
        order: Endianness,
        /// Consumed bits of the first byte.
        offset: u8,
    },
}

impl Stream {
    /// Wrap a byte slice as a chunk. An empty slice becomes [`Stream::Empty`].
    pub fn chunk(data: impl Into<Bytes>) -> Stream {
        let data = data.into();
        if data.is_empty() {
            Stream::Empty
        } else {
            Stream::Chunk(data)
        }
    }

    /// Wrap a byte slice as a bit-level chunk with the given bit order and
    /// first-byte offset. An empty slice becomes [`Stream::Empty`].
    ///
    /// # Panics
    ///
    /// Panics if `offset >= 8`.
    pub fn bit_chunk(data: impl Into<Bytes>, order: Endianness, offset: u8) -> Stream {
        assert!(offset < 8, "bit_chunk: offset must be in 0..8");
        let data = data.into();
        if data.is_empty() {
            Stream::Empty
        } else {
            Stream::BitChunk {
                bytes: data,
                order,
                offset,
            }
        }
    }

    /// Is this the terminal marker?
    pub fn is_end(&self) -> bool {
        matches!(self, Stream::End)
    }

    /// Is this the empty (but not terminal) stream?
    pub fn is_empty(&self) -> bool {
        matches!(self, Stream::Empty)
    }

    /// Count of unread elements: bytes for a byte chunk, bits for a bit
    /// chunk, zero otherwise.
    pub fn len(&self) -> usize {
        match self {
            Stream::End | Stream::Empty => 0,
            Stream::Chunk(data) => data.len(),
            Stream::BitChunk { bytes, offset, .. } => bytes.len() * 8 - *offset as usize,
        }
    }

    /// Take the first element: the first byte of a byte chunk, or the next
    /// unread bit (as `0` or `1`) of a bit chunk.
    ///
    /// # Panics
    ///
    /// Panics on [`Stream::End`] and [`Stream::Empty`].
    pub fn take1(self) -> (u8, Stream) {
        match self {
            Stream::Chunk(data) => {
                let x = data[0];
                (x, Stream::chunk(data.slice(1..)))
            }
            Stream::BitChunk {
                bytes,
                order,
                offset,
            } => {
                let x = match order {
                    Endianness::Little => (bytes[0] >> offset) & 1,
                    Endianness::Big => (bytes[0] >> (7 - offset)) & 1,
                };
                if offset >= 7 {
                    (x, Stream::bit_chunk(bytes.slice(1..), order, 0))
                } else {
                    (x, Stream::bit_chunk(bytes, order, offset + 1))
                }
            }
            Stream::End | Stream::Empty => panic!("take1: no element available"),
        }
    }

    /// Drop the first `n` bytes of a byte chunk.
    ///
    /// # Panics
    ///
    /// Panics on anything but a byte chunk with at least `n` bytes.
    pub fn advance(self, n: usize) -> Stream {
        match self {
            Stream::Chunk(data) => Stream::chunk(data.slice(n..)),
            _ => panic!("advance: byte chunk expected"),
        }
    }

    /// The unread bytes of a byte chunk.
    ///
    /// # Panics
    ///
    /// Panics on anything but a byte chunk.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Stream::Chunk(data) => data,
            _ => panic!("as_slice: byte chunk expected"),
        }
    }

    /// The backing bytes of a bit chunk (first byte possibly partially
    /// consumed).
    ///
    /// # Panics
    ///
    /// Panics on anything but a bit chunk.
    pub fn bit_bytes(&self) -> &[u8] {
        match self {
            Stream::BitChunk { bytes, .. } => bytes,
            _ => panic!("bit_bytes: bit chunk expected"),
        }
    }

    /// Consumed bits of a bit chunk's first byte, `0` for anything else.
    pub fn offset(&self) -> u8 {
        match self {
            Stream::BitChunk { offset, .. } => *offset,
            _ => 0,
        }
    }

    /// Bit order of a bit chunk.
    ///
    /// # Panics
    ///
    /// Panics on anything but a bit chunk.
    pub fn order(&self) -> Endianness {
        match self {
            Stream::BitChunk { order, .. } => *order,
            _ => panic!("order: bit chunk expected"),
        }
    }
}
