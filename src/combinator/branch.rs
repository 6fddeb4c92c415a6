//! Alternation

use crate::consumer::{Consumer, Resume};
use crate::error::Error;
use crate::stream::Stream;

/// Run all branches in parallel, committing to the first one that finishes.
///
/// Every live branch is advanced with each chunk; the first branch to reach
/// `Done` wins and its leftover is returned. Branches that stop are pruned.
/// If every branch dies, the whole choice stops with `NoMatch`.
///
/// "Parallel" is cooperative: each branch is a value advanced in turn, no
/// threads involved.
///
/// For predictable leftmost-match semantics (what the repetition and
/// optional combinators need), see [`ordered_choice`].
pub fn choice<T: Clone + 'static>(branches: Vec<Consumer<T>>) -> Consumer<T> {
    if branches.is_empty() {
        return Consumer::fail(Error::no_match("choice"));
    }
    Consumer::Cont(Resume::new(move |s| {
        let mut live = Vec::new();
        for branch in &branches {
            let (c, leftover) = branch.clone().feed(s.clone());
            match c {
                Consumer::Done(x) => return (Consumer::Done(x), leftover),
                Consumer::Cont(_) => live.push(c),
                Consumer::Stop(..) => {}
            }
        }
        (choice(live), Stream::Empty)
    }))
}

/// Run all branches in parallel, committing to the *leftmost* match.
///
/// Input cannot be rewound, so the commit decision must be made before too
/// much of the stream has been consumed. Each chunk is fed to every branch
/// in order:
///
/// - a branch that finishes while no earlier branch is still suspended is
///   committed to immediately, returning its leftover;
/// - a branch that finishes *with unconsumed input* while an earlier branch
///   is still suspended cannot be committed to yet (the earlier branch
///   might still match, and longer) — the choice keeps waiting on the
///   suspended branches, remembering that a fallback match existed;
/// - branches that stop are pruned.
///
/// # Panics
///
/// If all suspended branches die after a fallback match was given up, the
/// combinator panics: the language accepted would depend on where chunk
/// boundaries happened to fall, which is a parser bug, not a parse failure.
/// Give the choice enough lookahead (feed it the deciding bytes in one
/// chunk) to avoid this.
pub fn ordered_choice<T: Clone + 'static>(branches: Vec<Consumer<T>>) -> Consumer<T> {
    ochoice(branches, false)
}

fn ochoice<T: Clone + 'static>(branches: Vec<Consumer<T>>, committed: bool) -> Consumer<T> {
    if branches.is_empty() {
        if committed {
            // a branch matched earlier but could not be committed to while
            // other branches were suspended; now those are all dead and the
            // match is unreachable. whether this triggers depends on chunk
            // boundaries, so it must not silently become a parse failure.
            panic!("ordered_choice: insufficient lookahead to commit to a branch");
        }
        return Consumer::fail(Error::no_match("ordered_choice"));
    }
    Consumer::Cont(Resume::new(move |s| {
        let mut live: Vec<Consumer<T>> = Vec::new();
        for branch in &branches {
            let (c, leftover) = branch.clone().feed(s.clone());
            match c {
                Consumer::Done(x) => {
                    if live.is_empty() {
                        // every earlier branch has failed: leftmost match
                        return (Consumer::Done(x), leftover);
                    } else if !leftover.is_empty() && !leftover.is_end() {
                        // this branch matched and left input behind, but an
                        // earlier branch is still suspended; commit to
                        // waiting for those, dropping the fallback (see
                        // panic above).
                        return (ochoice(live, true), Stream::Empty);
                    } else {
                        // matched consuming the whole chunk; keep it as a
                        // pending result behind the suspended earlier ones
                        live.push(Consumer::Done(x));
                    }
                }
                c @ Consumer::Cont(_) => live.push(c),
                Consumer::Stop(..) => {}
            }
        }
        let leftover = if s.is_end() { Stream::End } else { Stream::Empty };
        (ochoice(live, committed), leftover)
    }))
}
