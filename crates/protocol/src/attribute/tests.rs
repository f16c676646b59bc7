use super::*;
use crate::command_kind::CommandKind;
use crate::constants::MAX_ATTRIBUTE_LEN;
use crate::error::StreamError;
use crate::path::PathError;

fn tlv(tag: u16, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + value.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value);
    out
}

fn parse(block: &[u8]) -> Result<AttributeSet<'_>, StreamError> {
    AttributeSet::parse(CommandKind::Write, block, MAX_ATTRIBUTE_LEN)
}

#[test]
fn tag_round_trips_every_value() {
    for raw in 1..=AttributeTag::MAX {
        let tag = AttributeTag::from_u16(raw).expect("known tag");
        assert_eq!(tag.as_u16(), raw);
    }
    assert_eq!(AttributeTag::from_u16(0), None);
    assert_eq!(AttributeTag::from_u16(AttributeTag::MAX + 1), None);
}

#[test]
fn empty_block_parses_to_empty_set() {
    let set = parse(&[]).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.command(), CommandKind::Write);
}

#[test]
fn attributes_are_kept_in_wire_order() {
    let mut block = tlv(AttributeTag::Path.as_u16(), b"file");
    block.extend(tlv(AttributeTag::FileOffset.as_u16(), &42u64.to_le_bytes()));
    block.extend(tlv(AttributeTag::Data.as_u16(), b"hello"));

    let set = parse(&block).unwrap();
    assert_eq!(
        set.tags(),
        [AttributeTag::Path, AttributeTag::FileOffset, AttributeTag::Data]
    );
    assert_eq!(set.get(AttributeTag::Data), Some(&b"hello"[..]));
    assert_eq!(set.u64(AttributeTag::FileOffset).unwrap(), 42);
    let pairs: Vec<_> = set.iter().map(|(tag, value)| (tag, value.len())).collect();
    assert_eq!(
        pairs,
        [
            (AttributeTag::Path, 4),
            (AttributeTag::FileOffset, 8),
            (AttributeTag::Data, 5)
        ]
    );
}

#[test]
fn zero_length_values_are_allowed() {
    let block = tlv(AttributeTag::Path.as_u16(), b"");
    let set = parse(&block).unwrap();
    assert_eq!(set.get(AttributeTag::Path), Some(&b""[..]));
}

#[test]
fn duplicate_tags_are_rejected() {
    let mut block = tlv(AttributeTag::Path.as_u16(), b"a");
    block.extend(tlv(AttributeTag::Path.as_u16(), b"b"));

    assert!(matches!(
        parse(&block),
        Err(StreamError::DuplicateAttribute {
            attribute: AttributeTag::Path,
            ..
        })
    ));
}

#[test]
fn unknown_tags_are_rejected() {
    let block = tlv(99, b"x");
    assert!(matches!(
        parse(&block),
        Err(StreamError::UnknownAttribute { tag: 99, .. })
    ));
}

#[test]
fn oversized_values_are_rejected_before_reading() {
    let block = tlv(AttributeTag::Data.as_u16(), &[0u8; 64]);
    let err = AttributeSet::parse(CommandKind::Write, &block, 32).unwrap_err();

    assert!(matches!(
        err,
        StreamError::AttributeTooLarge {
            attribute: AttributeTag::Data,
            len: 64,
            max: 32,
            ..
        }
    ));
}

#[test]
fn declared_length_past_block_end_is_an_overrun() {
    let mut block = tlv(AttributeTag::Data.as_u16(), &[7u8; 10]);
    block.truncate(block.len() - 1);

    assert!(matches!(
        parse(&block),
        Err(StreamError::AttributeOverrun {
            position: 0,
            declared: 10,
            remaining: 9,
            ..
        })
    ));
}

#[test]
fn partial_attribute_header_is_an_overrun() {
    let mut block = tlv(AttributeTag::Path.as_u16(), b"ok");
    block.extend_from_slice(&[0x0f, 0x00]);

    assert!(matches!(
        parse(&block),
        Err(StreamError::AttributeOverrun {
            position: 6,
            declared: 4,
            remaining: 2,
            ..
        })
    ));
}

#[test]
fn fixed_width_values_check_their_size() {
    let block = tlv(AttributeTag::FileOffset.as_u16(), &[1, 2, 3]);
    let set = parse(&block).unwrap();

    assert!(matches!(
        set.u64(AttributeTag::FileOffset),
        Err(StreamError::InvalidAttributeLength {
            expected: 8,
            actual: 3,
            ..
        })
    ));
}

#[test]
fn u32_accessor_range_checks() {
    let mut block = tlv(AttributeTag::Uid.as_u16(), &u64::from(u32::MAX).to_le_bytes());
    block.extend(tlv(AttributeTag::Gid.as_u16(), &(1u64 << 32).to_le_bytes()));
    let set = parse(&block).unwrap();

    assert_eq!(set.u32(AttributeTag::Uid).unwrap(), u32::MAX);
    assert!(matches!(
        set.u32(AttributeTag::Gid),
        Err(StreamError::ValueOutOfRange {
            attribute: AttributeTag::Gid,
            value: 0x1_0000_0000,
            ..
        })
    ));
}

#[test]
fn uuid_requires_sixteen_bytes() {
    let good = tlv(AttributeTag::Uuid.as_u16(), &[0xAB; 16]);
    let set = parse(&good).unwrap();
    assert_eq!(set.uuid(AttributeTag::Uuid).unwrap().as_bytes(), &[0xAB; 16]);

    let bad = tlv(AttributeTag::Uuid.as_u16(), &[0xAB; 15]);
    let set = parse(&bad).unwrap();
    assert!(matches!(
        set.uuid(AttributeTag::Uuid),
        Err(StreamError::InvalidAttributeLength { expected: 16, .. })
    ));
}

#[test]
fn timespec_rejects_out_of_range_nanoseconds() {
    let mut raw = 10u64.to_le_bytes().to_vec();
    raw.extend_from_slice(&1_000_000_000u32.to_le_bytes());
    let block = tlv(AttributeTag::Mtime.as_u16(), &raw);
    let set = parse(&block).unwrap();

    assert!(matches!(
        set.timespec(AttributeTag::Mtime),
        Err(StreamError::ValueOutOfRange {
            attribute: AttributeTag::Mtime,
            ..
        })
    ));
}

#[test]
fn path_accessor_wraps_validation_errors() {
    let block = tlv(AttributeTag::Path.as_u16(), b"../escape");
    let set = parse(&block).unwrap();

    match set.path(AttributeTag::Path) {
        Err(StreamError::InvalidPath {
            attribute, source, ..
        }) => {
            assert_eq!(attribute, AttributeTag::Path);
            assert_eq!(source, PathError::Escapes);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_values_report_the_tag() {
    let set = parse(&[]).unwrap();
    assert!(matches!(
        set.bytes(AttributeTag::Path),
        Err(StreamError::MissingAttribute {
            attribute: AttributeTag::Path,
            ..
        })
    ));
    assert_eq!(set.optional_u64(AttributeTag::Ino).unwrap(), None);
}
