use super::*;
use crate::combinator::{choice, many0, skip_many1};
use crate::producer;
use crate::token::{any, byte, literal, one_of, write_to};

use std::cell::RefCell;
use std::io::{self, Cursor};
use std::rc::Rc;

fn chunk(data: &[u8]) -> Stream {
    Stream::chunk(data.to_vec())
}

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl io::Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn pass_forwards_verbatim() {
    let sink = SharedSink::default();
    let out = sink.clone();
    let driver = producer::from_reader(Cursor::new(b"hallo ".to_vec()))
        .append(producer::from_reader(Cursor::new(b"welt!\n".to_vec())));
    let outer = pass().apply(write_to(sink));
    let outer = driver.apply(outer.fuse()).run();
    assert!(outer.run().is_ok());
    assert_eq!(&*out.0.borrow(), b"hallo welt!\n");
}

#[test]
fn pipe_attaches_a_transducer_to_a_producer() {
    let sink = SharedSink::default();
    let out = sink.clone();
    let driver = producer::from_reader(Cursor::new(b"hallo ".to_vec()))
        .append(producer::from_reader(Cursor::new(b"welt!\n".to_vec())))
        .pipe(pass());
    let c = driver.apply(write_to(sink)).run();
    assert!(c.run().is_ok());
    assert_eq!(&*out.0.borrow(), b"hallo welt!\n");
}

#[test]
fn pass_finishes_when_inner_finishes() {
    let outer = pass().apply(literal("ab"));
    let (outer, s) = outer.feed(chunk(b"abcd"));
    assert!(outer.is_done(), "inner done must end the transduction");
    assert_eq!(s, chunk(b"cd"));
    let inner = outer.run().unwrap();
    assert_eq!(&inner.run().unwrap()[..], b"ab");
}

#[test]
fn break_after_splits_inclusively() {
    let outer = break_after("\n").apply(many0(any()));
    let (outer, s) = outer.feed(chunk(b"abc\ndef"));
    assert!(outer.is_done());
    assert_eq!(s, chunk(b"def"));
    let inner = outer.run().unwrap();
    assert_eq!(inner.run().unwrap(), b"abc\n".to_vec());
}

#[test]
fn break_after_buffers_across_chunks() {
    let outer = break_after("\n").apply(many0(any()));
    let (outer, s) = outer.feed(chunk(b"ab"));
    assert!(outer.is_cont());
    assert_eq!(s, Stream::Empty);
    let (outer, s) = outer.feed(chunk(b"c\ndef"));
    assert!(outer.is_done());
    assert_eq!(s, chunk(b"def"));
    let inner = outer.run().unwrap();
    assert_eq!(inner.run().unwrap(), b"abc\n".to_vec());
}

#[test]
fn break_after_handles_straddling_separators() {
    let outer = break_after("\r\n").apply(many0(any()));
    let (outer, s) = outer.feed(chunk(b"abc\r"));
    assert!(outer.is_cont());
    assert_eq!(s, Stream::Empty);
    let (outer, s) = outer.feed(chunk(b"\ndef"));
    assert!(outer.is_done());
    assert_eq!(s, chunk(b"def"));
    let inner = outer.run().unwrap();
    assert_eq!(inner.run().unwrap(), b"abc\r\n".to_vec());
}

#[test]
fn break_after_false_straddle_is_forwarded() {
    // a held-back "\r" that turns out not to start the separator still
    // reaches the inner consumer, in order
    let outer = break_after("\r\n").apply(many0(any()));
    let (outer, _) = outer.feed(chunk(b"abc\r"));
    let (outer, s) = outer.feed(chunk(b"x\r\ny"));
    assert!(outer.is_done());
    assert_eq!(s, chunk(b"y"));
    let inner = outer.run().unwrap();
    assert_eq!(inner.run().unwrap(), b"abc\rx\r\n".to_vec());
}

#[test]
fn break_after_flushes_on_end() {
    let outer = break_after("\r\n").apply(many0(any()));
    let (outer, _) = outer.feed(chunk(b"abc\r"));
    let (outer, s) = outer.feed(Stream::End);
    assert!(outer.is_done());
    assert_eq!(s, Stream::End);
    // inner got the held tail, then End
    let inner = outer.run().unwrap();
    assert!(inner.is_done());
    assert_eq!(inner.run().unwrap(), b"abc\r".to_vec());
}

// "> "-quoted lines, as a transducer pipeline
fn quote_prefix() -> crate::Consumer<()> {
    let eol = || choice(vec![byte(b'\n').void(), crate::combinator::eof()]);
    let white = one_of(" \t");
    byte(b'>').then(choice(vec![eol(), skip_many1(white)]))
}

fn quoted_line<T: Clone + 'static>() -> Transducer<T> {
    prefix(quote_prefix(), break_after("\n"))
}

fn parse<T: 'static>(c: crate::Consumer<T>, input: &str) -> T {
    producer::from_bytes(input.as_bytes().to_vec())
        .apply(c)
        .run()
        .run()
        .expect("parse should succeed")
}

#[test]
fn transducers_append() {
    let quoted = quoted_line().append(quoted_line());
    let it = quoted.apply(literal("abc\ndef\n")).fuse();
    let result = parse(it, "> abc\n> def\n");
    assert_eq!(&result[..], b"abc\ndef\n");
}

#[test]
fn repeat_applies_until_rejection() {
    let quoted = repeat(quoted_line());

    let it = quoted.apply(literal("abc\ndef\nghi\n")).fuse();
    let result = parse(it, "> abc\n>   def\n> ghi\n>> xyz");
    assert_eq!(&result[..], b"abc\ndef\nghi\n");

    // zero applications leave the inner untouched
    let it = repeat(quoted_line()).apply(many0(any())).fuse();
    let result = parse(it, "wurst");
    assert_eq!(result, Vec::<u8>::new());
}

#[test]
fn repeat1_requires_one_application() {
    let quoted = repeat1(quoted_line());
    let it = quoted.apply(literal("abc\ndef\nghi\n")).fuse();
    let result = parse(it, "> abc\n>   def\n> ghi\n>> xyz");
    assert_eq!(&result[..], b"abc\ndef\nghi\n");
}

#[test]
fn fuse_surfaces_inner_stops() {
    let outer = pass().apply(crate::token::byte(b'x'));
    let fused = outer.fuse();
    let (c, _) = fused.feed(chunk(b"y"));
    assert!(c.is_stop());
}

#[test]
fn fuse_finishes_suspended_inners() {
    // outer finishes while inner still collects; fusing ends the inner
    let outer = break_after("\n").apply(many0(any()));
    let fused = outer.fuse();
    let (c, s) = fused.feed(chunk(b"one\ntwo"));
    assert_eq!(c.run().unwrap(), b"one\n".to_vec());
    assert_eq!(s, chunk(b"two"));
}
