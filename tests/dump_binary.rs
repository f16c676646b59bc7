//! Process-level tests for the `sendstream-dump` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use protocol::{AttributeTag, CommandKind};
use test_support::{StreamBuilder, sequential_uuid, stream_file};

fn dump_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sendstream-dump"))
}

fn sample_stream() -> Vec<u8> {
    let mut stream = StreamBuilder::new();
    stream
        .subvol("foo", &sequential_uuid(), 5)
        .path_only(CommandKind::Mkfile, "f")
        .write("f", 0, b"hello")
        .command(CommandKind::SetXattr, |w| {
            w.path(AttributeTag::Path, "f")
                .path(AttributeTag::XattrName, "user.%s%n")
                .bytes(AttributeTag::XattrData, b"v");
        })
        .end();
    stream.build()
}

#[test]
fn help_lists_usage() {
    dump_command()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::starts_with("Usage: sendstream-dump"));
}

#[test]
fn reads_a_file_argument() {
    let file = stream_file(&sample_stream());

    dump_command()
        .args(["--root", "/recv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "subvol:         /recv/foo                       uuid=00010203-0405-0607-0809-0a0b0c0d0e0f transid=5\n",
        ))
        .stdout(predicate::str::contains("write:          /recv/foo/f"))
        .stdout(predicate::str::contains("name=user.%s%n data=v len=1"));
}

#[test]
fn reads_standard_input() {
    dump_command()
        .arg("-")
        .write_stdin(sample_stream())
        .assert()
        .success()
        .stdout(predicate::str::contains("mkfile:         ./foo/f\n"));
}

#[test]
fn corrupt_stream_exits_with_one() {
    let mut bytes = sample_stream();
    let last = bytes.len() - 1;
    bytes[last - 12] ^= 0x40;

    dump_command()
        .write_stdin(bytes)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at offset"));
}

#[test]
fn not_a_stream_exits_with_one() {
    dump_command()
        .write_stdin(b"definitely not a send stream".to_vec())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a send stream"));
}

#[test]
fn bad_option_exits_with_two() {
    dump_command()
        .arg("--no-such-option")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}
