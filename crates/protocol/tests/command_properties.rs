//! Property tests for command framing, checksums and path normalisation.

use std::io::Cursor;

use proptest::prelude::*;
use protocol::{
    AttributeTag, COMMAND_HEADER_LEN, CommandDecoder, CommandKind, CommandWriter, PathError,
    StreamError, StreamPath, StreamReader,
};

fn write_command(path: &[u8], offset: u64, data: &[u8]) -> Vec<u8> {
    CommandWriter::new(CommandKind::Write)
        .path(AttributeTag::Path, path)
        .u64(AttributeTag::FileOffset, offset)
        .bytes(AttributeTag::Data, data)
        .finish()
        .expect("command fits")
}

fn decode_kind(bytes: Vec<u8>) -> Result<CommandKind, StreamError> {
    let mut decoder = CommandDecoder::new();
    let mut reader = StreamReader::new(Cursor::new(bytes));
    decoder
        .read_command(&mut reader)
        .map(|decoded| decoded.command.kind())
}

fn segment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("a"),
        Just("bb"),
        Just("c.d"),
        Just("."),
        Just(".."),
        Just(""),
    ]
}

/// Stack-based model of lexical normalisation.
fn normalise(segments: &[&str]) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        match *segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }
    Some(stack.join("/"))
}

proptest! {
    /// Property: any single-bit flip in the attribute block breaks the checksum.
    #[test]
    fn attribute_bit_flip_is_detected(
        data in prop::collection::vec(any::<u8>(), 0..256),
        offset in any::<u64>(),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut bytes = write_command(b"dir/file", offset, &data);
        let payload_len = bytes.len() - COMMAND_HEADER_LEN;
        let index = COMMAND_HEADER_LEN + flip.index(payload_len);
        bytes[index] ^= 1 << bit;

        let result = decode_kind(bytes);
        prop_assert!(
            matches!(result, Err(StreamError::ChecksumMismatch { .. })),
            "unexpected result {:?}", result
        );
    }

    /// Property: flips in the command type or checksum fields are detected too.
    #[test]
    fn header_bit_flip_after_length_is_detected(
        flip in 4usize..COMMAND_HEADER_LEN,
        bit in 0u8..8,
    ) {
        let mut bytes = write_command(b"f", 0, b"payload");
        bytes[flip] ^= 1 << bit;

        let result = decode_kind(bytes);
        prop_assert!(
            matches!(result, Err(StreamError::ChecksumMismatch { .. })),
            "unexpected result {:?}", result
        );
    }

    /// Property: decoding the same bytes twice gives the same outcome.
    #[test]
    fn decoding_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let first = decode_kind(bytes.clone()).map_err(|err| err.to_string());
        let second = decode_kind(bytes).map_err(|err| err.to_string());
        prop_assert_eq!(first, second);
    }

    /// Property: normalisation matches a stack model and rejects every escape.
    #[test]
    fn stream_paths_never_escape(segments in prop::collection::vec(segment(), 0..12)) {
        let raw = segments.join("/");
        let parsed = StreamPath::parse(raw.as_bytes());

        if raw.starts_with('/') {
            prop_assert_eq!(parsed, Err(PathError::Absolute));
            return Ok(());
        }

        match normalise(&segments) {
            Some(expected) => {
                let path = parsed.expect("contained path parses");
                prop_assert_eq!(path.as_bytes(), expected.as_bytes());
                prop_assert!(path.segments().all(|segment| segment != b".."));
            }
            None => prop_assert_eq!(parsed, Err(PathError::Escapes)),
        }
    }
}

#[test]
fn valid_write_decodes_after_all_checks() {
    let bytes = write_command(b"dir/file", 4096, &[0x5A; 4096]);
    assert_eq!(decode_kind(bytes).unwrap(), CommandKind::Write);
}
