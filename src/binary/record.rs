//! Fixed-layout record filling
//!
//! A [`Layout`] describes a record of fixed-size unsigned integers, arrays
//! of them, and nested records. [`fill`] interprets a layout into a
//! [`Consumer`] that reads the record field by field and assembles a
//! [`Value`] tree mirroring the layout.
//!
//! Blank fields ([`Field::blank`]) are read as a [`skip`] of their byte
//! size; their position in the result holds the layout's zero value.
//!
//! ## Example
//!
//! ```rust
//! use thresh::binary::record::{fill, Field, Layout, Value};
//! use thresh::stream::{Endianness, Stream};
//!
//! let header = Layout::Record(vec![
//!     Field::new(Layout::U16),
//!     Field::blank(Layout::Array(3, Box::new(Layout::U8))),
//!     Field::new(Layout::U32),
//! ]);
//! assert_eq!(header.size(), 9);
//!
//! let (c, rest) = fill(Endianness::Little, &header).feed(Stream::chunk(&b"0123456789"[..]));
//! assert_eq!(
//!     c.run().unwrap(),
//!     Value::Record(vec![
//!         Value::U16(0x3130),
//!         Value::Array(vec![Value::U8(0), Value::U8(0), Value::U8(0)]),
//!         Value::U32(0x38373635),
//!     ])
//! );
//! assert_eq!(rest, Stream::chunk(&b"9"[..]));
//! ```

use crate::binary;
use crate::consumer::Consumer;
use crate::stream::Endianness;
use crate::token::skip;

/// Shape of a fixed-layout record component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// One byte.
    U8,
    /// Two bytes in the record's byte order.
    U16,
    /// Four bytes in the record's byte order.
    U32,
    /// Eight bytes in the record's byte order.
    U64,
    /// A fixed-size array of equally-shaped elements.
    Array(usize, Box<Layout>),
    /// A record of named-by-position fields.
    Record(Vec<Field>),
}

/// One field of a [`Layout::Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    layout: Layout,
    blank: bool,
}

impl Field {
    /// A field whose bytes are parsed into the result.
    pub fn new(layout: Layout) -> Field {
        Field {
            layout,
            blank: false,
        }
    }

    /// A field whose bytes are skipped; its result slot holds the layout's
    /// zero value.
    pub fn blank(layout: Layout) -> Field {
        Field {
            layout,
            blank: true,
        }
    }
}

/// A parsed record component, shaped like its [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// From [`Layout::U8`].
    U8(u8),
    /// From [`Layout::U16`].
    U16(u16),
    /// From [`Layout::U32`].
    U32(u32),
    /// From [`Layout::U64`].
    U64(u64),
    /// From [`Layout::Array`].
    Array(Vec<Value>),
    /// From [`Layout::Record`].
    Record(Vec<Value>),
}

impl Layout {
    /// Total size in bytes of a record with this layout.
    pub fn size(&self) -> usize {
        match self {
            Layout::U8 => 1,
            Layout::U16 => 2,
            Layout::U32 => 4,
            Layout::U64 => 8,
            Layout::Array(n, elem) => n * elem.size(),
            Layout::Record(fields) => fields.iter().map(|f| f.layout.size()).sum(),
        }
    }

    // all-zero value of this shape, used for blank fields
    fn zero(&self) -> Value {
        match self {
            Layout::U8 => Value::U8(0),
            Layout::U16 => Value::U16(0),
            Layout::U32 => Value::U32(0),
            Layout::U64 => Value::U64(0),
            Layout::Array(n, elem) => Value::Array(vec![elem.zero(); *n]),
            Layout::Record(fields) => {
                Value::Record(fields.iter().map(|f| f.layout.zero()).collect())
            }
        }
    }
}

/// Build a consumer that reads a record of the given layout, field by
/// field, in the given byte order.
pub fn fill(endian: Endianness, layout: &Layout) -> Consumer<Value> {
    match layout {
        Layout::U8 => binary::u8().map(Value::U8),
        Layout::U16 => binary::u16(endian).map(Value::U16),
        Layout::U32 => binary::u32(endian).map(Value::U32),
        Layout::U64 => binary::u64(endian).map(Value::U64),
        Layout::Array(n, elem) => fill_array(endian, *n, (**elem).clone(), Vec::new()),
        Layout::Record(fields) => fill_record(endian, fields.clone(), Vec::new()),
    }
}

fn fill_array(endian: Endianness, n: usize, elem: Layout, acc: Vec<Value>) -> Consumer<Value> {
    if acc.len() >= n {
        return Consumer::Done(Value::Array(acc));
    }
    let elem2 = elem.clone();
    fill(endian, &elem).bind(move |v| {
        let mut acc = acc.clone();
        acc.push(v);
        fill_array(endian, n, elem2.clone(), acc)
    })
}

fn fill_record(endian: Endianness, fields: Vec<Field>, acc: Vec<Value>) -> Consumer<Value> {
    let i = acc.len();
    if i >= fields.len() {
        return Consumer::Done(Value::Record(acc));
    }
    let field = fields[i].clone();
    let rest = fields.clone();
    if field.blank {
        skip(field.layout.size()).bind(move |_| {
            let mut acc = acc.clone();
            acc.push(field.layout.zero());
            fill_record(endian, rest.clone(), acc)
        })
    } else {
        fill(endian, &field.layout).bind(move |v| {
            let mut acc = acc.clone();
            acc.push(v);
            fill_record(endian, rest.clone(), acc)
        })
    }
}
