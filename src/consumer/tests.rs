use super::*;
use crate::binary::uint;
use crate::stream::Endianness::Big;

fn chunk(data: &[u8]) -> Stream {
    Stream::chunk(data.to_vec())
}

// drive a consumer through a fixed chunking and observe everything
fn observe<T: Clone + 'static>(
    mut c: Consumer<T>,
    chunks: &[&[u8]],
) -> (Result<T, Error>, Vec<Stream>) {
    let mut leftovers = Vec::new();
    for &piece in chunks {
        let (next, s) = c.feed(chunk(piece));
        c = next;
        leftovers.push(s);
    }
    (c.run(), leftovers)
}

#[test]
fn bind_threads_leftover_into_continuation() {
    let c = uint(Big, 1).bind(|n| uint(Big, n as usize));
    let (c, s) = c.feed(chunk(b"\x03abcdefg"));
    assert!(c.is_done());
    assert_eq!(s, chunk(b"defg"));
    assert_eq!(c.run().unwrap(), 0x616263);
}

#[test]
fn then_discards_first_result() {
    let c = uint(Big, 4).then(uint(Big, 4));
    let (c, s) = c.feed(chunk(b"0123456789"));
    assert!(c.is_done());
    assert_eq!(s, chunk(b"89"));
    assert_eq!(c.run().unwrap(), 0x34353637);
}

#[test]
fn then_return_substitutes_result() {
    let c = uint(Big, 2).then_return("ok");
    let (c, s) = c.feed(chunk(b"xyz"));
    assert_eq!(c.run().unwrap(), "ok");
    assert_eq!(s, chunk(b"z"));
}

#[test]
fn feed_is_identity_on_terminal_consumers() {
    let (c, s) = Consumer::Done(42u8).feed(Stream::End);
    assert!(matches!(c, Consumer::Done(42)));
    assert_eq!(s, Stream::End);

    let stopped: Consumer<u8> = Consumer::fail(Error::no_match("x"));
    let (c, s) = stopped.feed(chunk(b"abc"));
    assert!(c.is_stop());
    assert_eq!(s, chunk(b"abc"));
}

#[test]
fn empty_chunk_leaves_consumers_suspended() {
    let (c, s) = uint(Big, 2).feed(Stream::Empty);
    assert!(c.is_cont());
    assert_eq!(s, Stream::Empty);
}

#[test]
fn run_raises_stops() {
    let c: Consumer<u8> = Consumer::fail(Error::no_match("wanted"));
    assert!(matches!(c.run(), Err(Error::NoMatch { .. })));
}

#[test]
#[should_panic(expected = "suspended after end of input")]
fn run_panics_on_starved_cont() {
    // a consumer that ignores End and stays hungry is a bug
    fn stubborn() -> Consumer<u8> {
        Consumer::Cont(Resume::new(|s| (stubborn(), s)))
    }
    let _ = stubborn().run();
}

#[test]
fn raise_absorbs_on_next_feed() {
    let c = Consumer::raise(Error::Seek(2));
    assert!(c.is_stop());
    let Consumer::Stop(_, k) = c else {
        unreachable!()
    };
    let (c, s) = k.call(chunk(b"abc"));
    assert!(c.is_done());
    assert_eq!(s, chunk(b"abc"));
}

#[test]
fn fail_stays_failed() {
    let c: Consumer<u8> = Consumer::fail(Error::no_match("x"));
    let Consumer::Stop(_, k) = c else {
        unreachable!()
    };
    let (c, s) = k.call(chunk(b"abc"));
    assert!(c.is_stop());
    assert_eq!(s, chunk(b"abc"));
}

#[test]
fn bind_keeps_stop_resumption_alive() {
    // binding onto a raised stop must not lose the absorb-and-continue
    // behavior of the stored resumption
    let c = Consumer::raise(Error::Seek(0)).then(uint(Big, 1));
    let Consumer::Stop(err, k) = c else {
        unreachable!()
    };
    assert!(matches!(err, Error::Seek(0)));
    let (c, s) = k.call(chunk(b"\x07rest"));
    assert!(c.is_done());
    assert_eq!(c.run().unwrap(), 7);
    assert_eq!(s, chunk(b"rest"));
}

// monad laws, observed through behavior on a spread of chunkings

const CHUNKINGS: &[&[&[u8]]] = &[
    &[b"\x02abcd"],
    &[b"\x02", b"abcd"],
    &[b"\x02a", b"b", b"cd"],
    &[b"", b"\x02ab"],
];

fn assert_same_behavior(a: impl Fn() -> Consumer<u64>, b: impl Fn() -> Consumer<u64>) {
    for chunks in CHUNKINGS {
        let (ra, la) = observe(a(), chunks);
        let (rb, lb) = observe(b(), chunks);
        assert_eq!(ra.ok(), rb.ok(), "results differ on {chunks:?}");
        assert_eq!(la, lb, "leftovers differ on {chunks:?}");
    }
}

#[test]
fn monad_left_identity() {
    let f = |n: u64| uint(Big, n as usize);
    assert_same_behavior(
        move || Consumer::Done(2u64).bind(f),
        move || f(2),
    );
}

#[test]
fn monad_right_identity() {
    assert_same_behavior(
        || uint(Big, 2).bind(Consumer::Done),
        || uint(Big, 2),
    );
}

#[test]
fn monad_associativity() {
    let f = |n: u64| uint(Big, n as usize);
    let g = |x: u64| Consumer::Done(x + 1);
    assert_same_behavior(
        move || uint(Big, 1).bind(f).bind(g),
        move || uint(Big, 1).bind(move |x| f(x).bind(g)),
    );
}

#[test]
fn then_agrees_with_bind() {
    assert_same_behavior(
        || uint(Big, 1).then(uint(Big, 2)),
        || uint(Big, 1).bind(|_| uint(Big, 2)),
    );
}
