use super::*;
use crate::binary::uint;
use crate::consumer::Resume;
use crate::stream::Endianness::Big;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

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
fn reader_feeds_until_eof() {
    let sink = SharedSink::default();
    let out = sink.clone();
    let c = from_reader(Cursor::new(b"hallo welt!\n".to_vec()))
        .apply(crate::token::write_to(sink))
        .run();
    // EOF leaves the consumer live; retiring it is the caller's call
    assert!(c.is_cont());
    assert!(c.run().is_ok());
    assert_eq!(&*out.0.borrow(), b"hallo welt!\n");
}

#[test]
fn append_spans_sources() {
    let sink = SharedSink::default();
    let out = sink.clone();
    let a = from_reader(Cursor::new(b"hallo ".to_vec()));
    let b = from_reader(Cursor::new(b"welt".to_vec()));
    let c = from_reader(Cursor::new(b"!\n".to_vec()));
    let done = a
        .append(b)
        .append(c)
        .apply(crate::token::write_to(sink))
        .run();
    assert!(done.run().is_ok());
    assert_eq!(&*out.0.borrow(), b"hallo welt!\n");
}

#[test]
fn from_bytes_feeds_one_chunk() {
    let c = from_bytes(b"\x12\x34x".to_vec()).apply(uint(Big, 2)).run();
    assert_eq!(c.run().unwrap(), 0x1234);
}

#[test]
fn parser_state_crosses_producers() {
    // a number split across two sources
    let first = from_bytes(b"\x12".to_vec());
    let second = from_bytes(b"\x34".to_vec());
    let c = first.append(second).apply(uint(Big, 2)).run();
    assert_eq!(c.run().unwrap(), 0x1234);
}

fn seek_case(c: Consumer<u64>, expect: u64) {
    let c = from_seekable(Cursor::new(b"0123456789".to_vec()))
        .apply(c)
        .run();
    assert!(c.is_done(), "seek case should settle");
    assert_eq!(c.run().unwrap(), expect);
}

// a stop carrying a seek whose resumption is another number parse
fn stop_then_reparse(pos: i64) -> Consumer<u64> {
    let Consumer::Cont(k) = uint(Big, 4) else {
        unreachable!()
    };
    Consumer::Stop(Error::Seek(pos), k)
}

#[test]
fn seek_via_explicit_stop() {
    seek_case(uint(Big, 4).then(stop_then_reparse(3)), 0x33343536);
}

#[test]
fn seek_via_raise_before_parse() {
    seek_case(seek(2).then(uint(Big, 4)), 0x32333435);
}

#[test]
fn seek_via_raise_between_parses() {
    seek_case(uint(Big, 4).then(seek(2)).then(uint(Big, 4)), 0x32333435);
}

#[test]
fn seek_from_end() {
    seek_case(seek(-4).then(uint(Big, 4)), 0x36373839);
}

#[test]
fn seek_relative() {
    // seek_rel is relative to the *source* position, which sits at the end
    // of everything read so far, not at the parse position
    seek_case(uint(Big, 4).then(seek_rel(-8)).then(uint(Big, 4)), 0x32333435);
}

#[test]
fn non_seekable_producer_surfaces_seek_stops() {
    let c = from_reader(Cursor::new(b"0123456789".to_vec()))
        .apply(seek(3).then(uint(Big, 4)))
        .run();
    assert!(matches!(c.err(), Some(Error::Seek(3))));
}

#[test]
fn producer_returns_stopped_consumers() {
    let c = from_reader(Cursor::new(b"xyz".to_vec()))
        .apply(crate::token::byte(b'a'))
        .run();
    assert!(c.is_stop());
}

struct FlakyReader {
    hiccuped: bool,
    data: Cursor<Vec<u8>>,
}

impl io::Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.hiccuped {
            self.hiccuped = true;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
        }
        self.data.read(buf)
    }
}

#[test]
fn interrupted_reads_are_retried() {
    let source = FlakyReader {
        hiccuped: false,
        data: Cursor::new(b"\x12\x34".to_vec()),
    };
    let c = from_reader(source).apply(uint(Big, 2)).run();
    assert_eq!(c.run().unwrap(), 0x1234);
}

struct FailingReader;

impl io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "boom"))
    }
}

#[test]
fn read_errors_feed_end() {
    // the consumer settles on what it has seen; many0 of anything settles
    // to its collection so far
    let c = from_reader(FailingReader)
        .apply(crate::combinator::many0(crate::token::any()))
        .run();
    assert_eq!(c.run().unwrap(), Vec::<u8>::new());
}

#[test]
fn resume_type_is_constructible_by_hand() {
    // drivers may build stops out of borrowed resumptions; make sure the
    // public surface supports it
    let k = Resume::new(|s| (Consumer::Done(1u64), s));
    let c = Consumer::Stop(Error::no_match("placeholder"), k);
    let Consumer::Stop(_, k) = c else {
        unreachable!()
    };
    let (c, _) = k.call(Stream::Empty);
    assert_eq!(c.run().unwrap(), 1);
}
