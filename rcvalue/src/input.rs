//! Line assembly from a character source.
//!
//! [`read_line`] builds a line inside a text value one character at a time, copies the result
//! out and releases the value before returning. The caller receives plain owned text and no
//! reference to the heap value survives the call.
use std::io::{self, Read};

use log::trace;
use smallvec::SmallVec;

use crate::{
    heap::{ValueHeap, ValueRef},
    utils::error::{RcError, RcResult},
};

/// Read bytes from `reader` until end of input or `\n` and return the line without its
/// terminator.
///
/// Input is decoded as UTF-8 as it arrives; each completed character is appended to a
/// temporary text value. Returns an empty string when the input is already exhausted.
pub fn read_line<R: Read>(heap: &mut ValueHeap, reader: R) -> RcResult<String> {
    let line = heap.create_text()?;
    let assembled =
        assemble(heap, line, reader).and_then(|()| Ok(heap.read(line)?.to_string()));
    // Drop our ownership on every path before reporting the outcome.
    heap.release(line)?;
    assembled
}

fn assemble<R: Read>(heap: &mut ValueHeap, line: ValueRef, reader: R) -> RcResult<()> {
    let mut pending: SmallVec<[u8; 4]> = SmallVec::new();
    let mut offset = 0usize;

    for byte in reader.bytes() {
        let byte = match byte {
            Ok(byte) => byte,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if byte == b'\n' && pending.is_empty() {
            break;
        }

        pending.push(byte);
        match std::str::from_utf8(&pending) {
            Ok(character) => {
                heap.append(line, character)?;
                offset += pending.len();
                pending.clear();
            }
            // Incomplete sequence, wait for more bytes.
            Err(err) if err.error_len().is_none() => {}
            Err(_) => return Err(RcError::InvalidInput { offset }),
        }
    }

    if !pending.is_empty() {
        return Err(RcError::InvalidInput { offset });
    }
    trace!("Assembled {} bytes into {}", offset, line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_until_newline() {
        let mut heap = ValueHeap::new();
        let mut input: &[u8] = b"first line\nsecond";
        assert_eq!(read_line(&mut heap, &mut input).unwrap(), "first line");
        assert_eq!(read_line(&mut heap, &mut input).unwrap(), "second");
        assert_eq!(read_line(&mut heap, &mut input).unwrap(), "");
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn decodes_multibyte_characters() {
        let mut heap = ValueHeap::new();
        let input = "caf\u{e9} \u{1f980}\n".as_bytes();
        assert_eq!(read_line(&mut heap, input).unwrap(), "caf\u{e9} \u{1f980}");
    }

    #[test]
    fn invalid_utf8_releases_the_line() {
        let mut heap = ValueHeap::new();
        let input: &[u8] = b"ab\xff\xfecd\n";
        assert!(matches!(
            read_line(&mut heap, input),
            Err(RcError::InvalidInput { offset: 2 })
        ));
        assert_eq!(heap.live_count(), 0);
        assert_eq!(heap.stats().destroyed, 1);
    }

    #[test]
    fn truncated_character_at_eof_is_invalid() {
        let mut heap = ValueHeap::new();
        let input: &[u8] = b"x\xe2\x82";
        assert!(matches!(
            read_line(&mut heap, input),
            Err(RcError::InvalidInput { offset: 1 })
        ));
    }
}
