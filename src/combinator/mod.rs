//! Combinators over consumers
//!
//! Everything here is assembled from [`Consumer::bind`] and the two
//! alternation primitives. The repetition and optional combinators are
//! built on [`ordered_choice`] rather than [`choice`], so they have
//! predictable leftmost-match semantics.
//!
//! - Sequencing: [`seq`], [`seq_void`], the [`seq!`][crate::seq] macro
//! - Alternation: [`choice`], [`ordered_choice`]
//! - Repetition: [`many0`], [`many1`], [`skip_many0`], [`skip_many1`],
//!   [`many_end`], [`times`], [`skip_times`]
//! - Refinement: [`opt`], [`eof`], [`validate`], [`range`]


mod branch;
mod core;
mod multi;
mod sequence;

pub use self::branch::{choice, ordered_choice};
pub use self::core::{eof, opt, range, validate};
pub use self::multi::{many0, many1, many_end, skip_many0, skip_many1, skip_times, times};
pub use self::sequence::{seq, seq_void, Prepend};
