//! Repetition

use crate::combinator::branch::ordered_choice;
use crate::combinator::core::opt;
use crate::consumer::{Consumer, Resume};

/// Apply `c` zero or more times, collecting the results.
///
/// Built on [`ordered_choice`], so repetition stops at the first input the
/// element consumer rejects — and inherits the ordered choice's lookahead
/// rules: an element consumer that suspends across a chunk boundary and
/// then dies can panic the repetition (see
/// [`ordered_choice`][crate::combinator::ordered_choice]).
pub fn many0<T: Clone + 'static>(c: Consumer<T>) -> Consumer<Vec<T>> {
    many0_from(c, Vec::new())
}

/// Apply `c` one or more times, collecting the results.
pub fn many1<T: Clone + 'static>(c: Consumer<T>) -> Consumer<Vec<T>> {
    many1_from(c, Vec::new())
}

fn many0_from<T: Clone + 'static>(c: Consumer<T>, acc: Vec<T>) -> Consumer<Vec<T>> {
    ordered_choice(vec![
        many1_from(c.clone(), acc.clone()),
        Consumer::Done(acc),
    ])
}

fn many1_from<T: Clone + 'static>(c: Consumer<T>, acc: Vec<T>) -> Consumer<Vec<T>> {
    let again = c.clone();
    c.bind(move |x| {
        let mut acc = acc.clone();
        acc.push(x);
        many0_from(again.clone(), acc)
    })
}

/// Like [`many0`], discarding the results.
pub fn skip_many0<T: Clone + 'static>(c: Consumer<T>) -> Consumer<()> {
    opt(skip_many1(c)).void()
}

/// Like [`many1`], discarding the results.
pub fn skip_many1<T: Clone + 'static>(c: Consumer<T>) -> Consumer<()> {
    let again = c.clone();
    c.bind(move |_| skip_many0(again.clone()))
}

/// Apply `c` repeatedly until end of input, collecting the results.
///
/// Unlike [`many0`] this *requires* that every remaining byte is consumed
/// by a repetition of `c`: if `c` rejects mid-stream, its error propagates
/// instead of ending the repetition.
pub fn many_end<T: Clone + 'static>(c: Consumer<T>) -> Consumer<Vec<T>> {
    many_end_from(c, Vec::new())
}

fn many_end_from<T: Clone + 'static>(c: Consumer<T>, acc: Vec<T>) -> Consumer<Vec<T>> {
    Consumer::Cont(Resume::new(move |s| {
        if s.is_end() {
            return (Consumer::Done(acc.clone()), s);
        }
        many1_end_from(c.clone(), acc.clone()).feed(s)
    }))
}

fn many1_end_from<T: Clone + 'static>(c: Consumer<T>, acc: Vec<T>) -> Consumer<Vec<T>> {
    let again = c.clone();
    c.bind(move |x| {
        let mut acc = acc.clone();
        acc.push(x);
        many_end_from(again.clone(), acc)
    })
}

/// Apply `c` exactly `n` times, collecting the results.
pub fn times<T: Clone + 'static>(n: usize, c: Consumer<T>) -> Consumer<Vec<T>> {
    times_from(n, c, Vec::new())
}

fn times_from<T: Clone + 'static>(n: usize, c: Consumer<T>, acc: Vec<T>) -> Consumer<Vec<T>> {
    if n == 0 {
        return Consumer::Done(acc);
    }
    let again = c.clone();
    c.bind(move |x| {
        let mut acc = acc.clone();
        acc.push(x);
        times_from(n - 1, again.clone(), acc)
    })
}

/// Apply `c` exactly `n` times, discarding the results.
pub fn skip_times<T: Clone + 'static>(n: usize, c: Consumer<T>) -> Consumer<()> {
    if n == 0 {
        return Consumer::Done(());
    }
    let again = c.clone();
    c.bind(move |_| skip_times(n - 1, again.clone()))
}
