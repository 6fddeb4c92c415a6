//! Sequencing

use std::rc::Rc;

use crate::consumer::Consumer;

/// Run the consumers in order, collecting their results.
///
/// Short-circuits on the first stop, which propagates together with
/// whatever leftover the failing element produced. `seq(vec![])` succeeds
/// immediately with an empty collection.
///
/// For sequences of differently-typed consumers, see the [`seq!`] macro.
pub fn seq<T: Clone + 'static>(items: Vec<Consumer<T>>) -> Consumer<Vec<T>> {
    let n = items.len();
    seq_nth(Rc::new(items), 0, Vec::with_capacity(n))
}

fn seq_nth<T: Clone + 'static>(
    items: Rc<Vec<Consumer<T>>>,
    i: usize,
    acc: Vec<T>,
) -> Consumer<Vec<T>> {
    if i >= items.len() {
        return Consumer::Done(acc);
    }
    let next = items[i].clone();
    let rest = Rc::clone(&items);
    next.bind(move |x| {
        let mut acc = acc.clone();
        acc.push(x);
        seq_nth(Rc::clone(&rest), i + 1, acc)
    })
}

/// Run the consumers in order, discarding their results.
pub fn seq_void<T: Clone + 'static>(items: Vec<Consumer<T>>) -> Consumer<()> {
    items
        .into_iter()
        .rev()
        .fold(Consumer::Done(()), |tail, c| c.then(tail))
}

/// Tuple construction helper for the [`seq!`] macro.
///
/// `prepend` grows a result tuple at the front as the macro's recursion
/// unwinds; it is implemented for tails of up to seven elements, giving
/// `seq!` a maximum arity of eight.
pub trait Prepend<H>: Sized {
    /// The tuple with `H` prepended.
    type Output;
    /// Prepend `head` to the tuple.
    fn prepend(head: H, tail: Self) -> Self::Output;
}

macro_rules! impl_prepend {
    ($($name:ident)*) => {
        impl<H, $($name),*> Prepend<H> for ($($name,)*) {
            type Output = (H, $($name),*);
            #[allow(non_snake_case)]
            fn prepend(head: H, ($($name,)*): Self) -> Self::Output {
                (head, $($name),*)
            }
        }
    };
}

impl_prepend!(A);
impl_prepend!(A B);
impl_prepend!(A B C);
impl_prepend!(A B C D);
impl_prepend!(A B C D E);
impl_prepend!(A B C D E F);
impl_prepend!(A B C D E F G);

/// Sequence up to eight differently-typed consumers into a tuple.
///
/// Expands to a [`bind`][crate::Consumer::bind] chain, so leftovers thread
/// from element to element exactly as in hand-written sequencing.
///
/// ## Example
///
/// ```rust
/// use thresh::stream::Stream;
/// use thresh::token::{byte, literal};
///
/// let c = thresh::seq!(literal("hello"), byte(b' '), literal("world"));
/// let (c, rest) = c.feed(Stream::chunk(&b"hello world!"[..]));
/// let (hello, space, world) = c.run().unwrap();
/// assert_eq!(&hello[..], b"hello");
/// assert_eq!(space, b' ');
/// assert_eq!(&world[..], b"world");
/// assert_eq!(rest, Stream::chunk(&b"!"[..]));
/// ```
#[macro_export]
macro_rules! seq {
    ($a:expr $(,)?) => {
        $a.map(move |x| (x,))
    };
    ($a:expr, $($rest:expr),+ $(,)?) => {{
        let tail = $crate::seq!($($rest),+);
        $a.bind(move |head| {
            let head = head.clone();
            tail.clone().map(move |t| {
                $crate::combinator::Prepend::prepend(head.clone(), t)
            })
        })
    }};
}
