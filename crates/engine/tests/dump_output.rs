//! Dump rendering of whole streams.

use engine::{DumpRenderer, decode};
use proptest::prelude::*;
use protocol::{AttributeTag, CommandKind, Timespec, Uuid};
use test_support::{StreamBuilder, sequential_uuid};

fn dump(bytes: &[u8], root: &str) -> String {
    let mut renderer = DumpRenderer::new(Vec::new());
    decode(bytes, root, &mut renderer).unwrap();
    String::from_utf8(renderer.into_inner()).unwrap()
}

#[test]
fn subvolume_line() {
    let mut stream = StreamBuilder::new();
    stream.subvol("foo", &sequential_uuid(), 5).end();

    assert_eq!(
        dump(&stream.build(), "/recv"),
        "subvol:         /recv/foo                       uuid=00010203-0405-0607-0809-0a0b0c0d0e0f transid=5\n"
    );
}

#[test]
fn small_transfer() {
    let mut stream = StreamBuilder::new();
    stream
        .subvol("vol", &Uuid::nil(), 7)
        .path_only(CommandKind::Mkfile, "o257-7-0")
        .write("o257-7-0", 0, b"hello")
        .rename("o257-7-0", "hello.txt")
        .command(CommandKind::Chown, |w| {
            w.path(AttributeTag::Path, "hello.txt")
                .u64(AttributeTag::Uid, 0)
                .u64(AttributeTag::Gid, 0);
        })
        .command(CommandKind::Chmod, |w| {
            w.path(AttributeTag::Path, "hello.txt")
                .u64(AttributeTag::Mode, 0o644);
        })
        .utimes("hello.txt", Timespec::new(0, 0).unwrap())
        .end();

    let text = dump(&stream.build(), "/r");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "mkfile:         /r/vol/o257-7-0");
    assert_eq!(
        lines[2],
        "write:          /r/vol/o257-7-0                 offset=0 len=5"
    );
    assert_eq!(
        lines[3],
        "rename:         /r/vol/o257-7-0                 dest=/r/vol/hello.txt"
    );
    assert_eq!(
        lines[4],
        "chown:          /r/vol/hello.txt                gid=0 uid=0"
    );
    assert_eq!(
        lines[5],
        "chmod:          /r/vol/hello.txt                mode=644"
    );
    assert!(lines[6].starts_with("utimes:         /r/vol/hello.txt                atime=1970-01-01T00:00:00+0000"));
}

#[test]
fn paths_with_spaces_stay_on_one_line() {
    let mut stream = StreamBuilder::new();
    stream
        .path_only(CommandKind::Mkdir, "my dir\nname")
        .end();

    assert_eq!(
        dump(&stream.build(), "/r"),
        "mkdir:          /r/my\\040dir\\012name\n"
    );
}

proptest! {
    /// Property: any xattr name and value renders as exactly one line.
    #[test]
    fn xattr_bytes_never_split_lines(
        name in proptest::collection::vec(any::<u8>(), 1..64),
        data in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut stream = StreamBuilder::new();
        stream
            .command(CommandKind::SetXattr, |w| {
                w.path(AttributeTag::Path, "f")
                    .bytes(AttributeTag::XattrName, &name)
                    .bytes(AttributeTag::XattrData, &data);
            })
            .end();

        let text = dump(&stream.build(), "/r");
        prop_assert_eq!(text.matches('\n').count(), 1);
        prop_assert!(text.is_ascii());
    }
}
