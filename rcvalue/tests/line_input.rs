use std::io::{self, Read};

use rcvalue::prelude::*;

/// Reader yielding one byte per call and an interrupted error before each byte.
struct Stuttering<'a> {
    bytes: &'a [u8],
    interrupt: bool,
}

impl Read for Stuttering<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        match self.bytes.split_first() {
            Some((first, rest)) if !buf.is_empty() => {
                buf[0] = *first;
                self.bytes = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device gone"))
    }
}

#[test]
fn leaves_no_live_value_behind() {
    let mut heap = ValueHeap::new();
    let line = read_line(&mut heap, "typed input\nrest".as_bytes()).unwrap();
    assert_eq!(line, "typed input");

    let stats = heap.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.destroyed, 1);
    assert_eq!(stats.live, 0);
}

#[test]
fn empty_input_gives_empty_line() {
    let mut heap = ValueHeap::new();
    assert_eq!(read_line(&mut heap, io::empty()).unwrap(), "");
    assert_eq!(read_line(&mut heap, "\n".as_bytes()).unwrap(), "");
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn retries_interrupted_reads() {
    let mut heap = ValueHeap::new();
    let reader = Stuttering {
        bytes: b"slow\n",
        interrupt: false,
    };
    assert_eq!(read_line(&mut heap, reader).unwrap(), "slow");
}

#[test]
fn io_errors_propagate_and_release() {
    let mut heap = ValueHeap::new();
    assert!(matches!(read_line(&mut heap, Broken), Err(RcError::Io(_))));
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn allocation_limit_surfaces_before_reading() {
    let mut heap = ValueHeap::with_config(HeapConfig {
        max_live_values: Some(0),
        ..HeapConfig::default()
    });
    assert!(matches!(
        read_line(&mut heap, "x\n".as_bytes()),
        Err(RcError::AllocationFailed { .. })
    ));
}
