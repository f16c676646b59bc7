//! Human-readable rendering of a send stream.
//!
//! [`DumpRenderer`] is an [`OperationHandler`] that writes one line per
//! operation: the operation title, the resolved path and the operation's
//! details as `name=value` pairs. Every line is built as a typed record and
//! rendered by a single formatter; bytes taken from the stream are escaped so
//! that an operation never spans more than one line.

mod escape;
mod record;

use std::io::Write;

use protocol::{CloneSource, CommandKind, Uuid};

use crate::handler::{FileTimes, HandlerResult, OperationHandler};
use crate::resolve::ResolvedPath;

use record::{Record, Value};

/// Writes a textual dump of every operation to `W`.
#[derive(Debug)]
pub struct DumpRenderer<W> {
    out: W,
    line: String,
}

impl<W: Write> DumpRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: String::with_capacity(256),
        }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the renderer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(
        &mut self,
        kind: CommandKind,
        path: &ResolvedPath,
        fields: &[(&'static str, Value<'_>)],
    ) -> HandlerResult {
        Record {
            title: kind.name(),
            path: path.as_path(),
            fields,
        }
        .render_into(&mut self.line);
        self.line.push('\n');
        self.out.write_all(self.line.as_bytes())?;
        Ok(())
    }
}

impl<W: Write> OperationHandler for DumpRenderer<W> {
    fn subvol(&mut self, path: &ResolvedPath, uuid: &Uuid, ctransid: u64) -> HandlerResult {
        self.emit(
            CommandKind::Subvol,
            path,
            &[
                ("uuid", Value::Uuid(uuid)),
                ("transid", Value::Unsigned(ctransid)),
            ],
        )
    }

    fn snapshot(
        &mut self,
        path: &ResolvedPath,
        uuid: &Uuid,
        ctransid: u64,
        parent_uuid: &Uuid,
        parent_ctransid: u64,
    ) -> HandlerResult {
        self.emit(
            CommandKind::Snapshot,
            path,
            &[
                ("uuid", Value::Uuid(uuid)),
                ("transid", Value::Unsigned(ctransid)),
                ("parent_uuid", Value::Uuid(parent_uuid)),
                ("parent_transid", Value::Unsigned(parent_ctransid)),
            ],
        )
    }

    fn mkfile(&mut self, path: &ResolvedPath, _ino: Option<u64>) -> HandlerResult {
        self.emit(CommandKind::Mkfile, path, &[])
    }

    fn mkdir(&mut self, path: &ResolvedPath, _ino: Option<u64>) -> HandlerResult {
        self.emit(CommandKind::Mkdir, path, &[])
    }

    fn mknod(
        &mut self,
        path: &ResolvedPath,
        mode: u32,
        rdev: u64,
        _ino: Option<u64>,
    ) -> HandlerResult {
        self.emit(
            CommandKind::Mknod,
            path,
            &[("mode", Value::Octal(mode)), ("rdev", Value::Hex(rdev))],
        )
    }

    fn mkfifo(&mut self, path: &ResolvedPath, _ino: Option<u64>) -> HandlerResult {
        self.emit(CommandKind::Mkfifo, path, &[])
    }

    fn mksock(&mut self, path: &ResolvedPath, _ino: Option<u64>) -> HandlerResult {
        self.emit(CommandKind::Mksock, path, &[])
    }

    fn symlink(&mut self, path: &ResolvedPath, target: &[u8], _ino: Option<u64>) -> HandlerResult {
        self.emit(CommandKind::Symlink, path, &[("dest", Value::Bytes(target))])
    }

    fn rename(&mut self, from: &ResolvedPath, to: &ResolvedPath) -> HandlerResult {
        self.emit(
            CommandKind::Rename,
            from,
            &[("dest", Value::Path(to.as_path()))],
        )
    }

    fn link(&mut self, path: &ResolvedPath, target: &ResolvedPath) -> HandlerResult {
        self.emit(
            CommandKind::Link,
            path,
            &[("dest", Value::Path(target.as_path()))],
        )
    }

    fn unlink(&mut self, path: &ResolvedPath) -> HandlerResult {
        self.emit(CommandKind::Unlink, path, &[])
    }

    fn rmdir(&mut self, path: &ResolvedPath) -> HandlerResult {
        self.emit(CommandKind::Rmdir, path, &[])
    }

    fn write(&mut self, path: &ResolvedPath, offset: u64, data: &[u8]) -> HandlerResult {
        self.emit(
            CommandKind::Write,
            path,
            &[
                ("offset", Value::Unsigned(offset)),
                ("len", Value::Unsigned(data.len() as u64)),
            ],
        )
    }

    fn clone_range(
        &mut self,
        path: &ResolvedPath,
        offset: u64,
        len: u64,
        source: &CloneSource,
    ) -> HandlerResult {
        let source_path = source.path.to_path_buf();
        self.emit(
            CommandKind::Clone,
            path,
            &[
                ("offset", Value::Unsigned(offset)),
                ("len", Value::Unsigned(len)),
                ("from", Value::Path(&source_path)),
                ("clone_uuid", Value::Uuid(&source.uuid)),
                ("clone_transid", Value::Unsigned(source.ctransid)),
                ("clone_offset", Value::Unsigned(source.offset)),
            ],
        )
    }

    fn set_xattr(&mut self, path: &ResolvedPath, name: &[u8], data: &[u8]) -> HandlerResult {
        self.emit(
            CommandKind::SetXattr,
            path,
            &[
                ("name", Value::Bytes(name)),
                ("data", Value::Bytes(data)),
                ("len", Value::Unsigned(data.len() as u64)),
            ],
        )
    }

    fn remove_xattr(&mut self, path: &ResolvedPath, name: &[u8]) -> HandlerResult {
        self.emit(
            CommandKind::RemoveXattr,
            path,
            &[("name", Value::Bytes(name))],
        )
    }

    fn truncate(&mut self, path: &ResolvedPath, size: u64) -> HandlerResult {
        self.emit(
            CommandKind::Truncate,
            path,
            &[("size", Value::Unsigned(size))],
        )
    }

    fn chmod(&mut self, path: &ResolvedPath, mode: u32) -> HandlerResult {
        self.emit(CommandKind::Chmod, path, &[("mode", Value::Octal(mode))])
    }

    fn chown(&mut self, path: &ResolvedPath, uid: u32, gid: u32) -> HandlerResult {
        self.emit(
            CommandKind::Chown,
            path,
            &[
                ("gid", Value::Unsigned(u64::from(gid))),
                ("uid", Value::Unsigned(u64::from(uid))),
            ],
        )
    }

    fn utimes(&mut self, path: &ResolvedPath, times: &FileTimes) -> HandlerResult {
        self.emit(
            CommandKind::Utimes,
            path,
            &[
                ("atime", Value::Time(times.atime)),
                ("mtime", Value::Time(times.mtime)),
                ("ctime", Value::Time(times.ctime)),
            ],
        )
    }

    fn update_extent(&mut self, path: &ResolvedPath, offset: u64, len: u64) -> HandlerResult {
        self.emit(
            CommandKind::UpdateExtent,
            path,
            &[
                ("offset", Value::Unsigned(offset)),
                ("len", Value::Unsigned(len)),
            ],
        )
    }
}
