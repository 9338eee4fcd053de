//! Fuzz target for frame stream decoding
//!
//! # Strategy
//!
//! - Arbitrary bytes pushed into a `FrameDecoder` in arbitrary chunk sizes
//! - The same bytes pushed into a `Connection` as one read
//!
//! # Invariants
//!
//! - Decoding NEVER panics; malformed headers return a structured error
//! - Chunking does not change the decoded frames or the first error
//! - A stream-fatal error closes the connection

#![no_main]

use arbitrary::Arbitrary;
use hexlink_core::Connection;
use hexlink_proto::{Frame, FrameDecoder, ProtocolError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    bytes: Vec<u8>,
    chunks: Vec<u8>,
}

fn decode_all(decoder: &mut FrameDecoder, out: &mut Vec<Frame>) -> Result<(), ProtocolError> {
    while let Some(frame) = decoder.next_frame()? {
        out.push(frame);
    }
    Ok(())
}

fuzz_target!(|input: Input| {
    let mut whole = FrameDecoder::new();
    whole.push(&input.bytes);
    let mut expected = Vec::new();
    let whole_result = decode_all(&mut whole, &mut expected);

    let mut chunked = FrameDecoder::new();
    let mut actual = Vec::new();
    let mut chunked_result = Ok(());
    let mut rest = input.bytes.as_slice();
    let mut sizes = input.chunks.iter().map(|&n| usize::from(n).max(1)).cycle();
    while !rest.is_empty() && chunked_result.is_ok() {
        let n = sizes.next().unwrap_or(rest.len()).min(rest.len());
        let (head, tail) = rest.split_at(n);
        chunked.push(head);
        rest = tail;
        chunked_result = decode_all(&mut chunked, &mut actual);
    }

    assert_eq!(expected, actual);
    assert_eq!(whole_result.is_err(), chunked_result.is_err());

    let mut conn = Connection::new();
    if conn.open().is_ok() && conn.receive(&input.bytes).is_err() {
        assert!(conn.is_closed());
    }
});
