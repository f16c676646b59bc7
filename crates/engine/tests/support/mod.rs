//! Handler used by the integration tests to observe dispatch.

#![allow(dead_code)]

use engine::{FileTimes, HandlerError, HandlerResult, OperationHandler, ResolvedPath};
use protocol::{CloneSource, Uuid};

/// Records every call as `"<op> <path> [details]"`.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub calls: Vec<String>,
    fail_on: Option<&'static str>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the handler fail, after recording, the first time `op` is called.
    pub fn failing_on(op: &'static str) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(op),
        }
    }

    fn record(&mut self, op: &'static str, detail: String) -> HandlerResult {
        self.calls.push(detail);
        if self.fail_on == Some(op) {
            return Err(HandlerError::new(format!("refusing {op}")));
        }
        Ok(())
    }

    pub fn ops(&self) -> Vec<&str> {
        self.calls
            .iter()
            .map(|call| call.split(' ').next().unwrap_or_default())
            .collect()
    }
}

impl OperationHandler for RecordingHandler {
    fn subvol(&mut self, path: &ResolvedPath, uuid: &Uuid, ctransid: u64) -> HandlerResult {
        self.record("subvol", format!("subvol {path} {uuid} {ctransid}"))
    }

    fn snapshot(
        &mut self,
        path: &ResolvedPath,
        uuid: &Uuid,
        ctransid: u64,
        parent_uuid: &Uuid,
        parent_ctransid: u64,
    ) -> HandlerResult {
        self.record(
            "snapshot",
            format!("snapshot {path} {uuid} {ctransid} {parent_uuid} {parent_ctransid}"),
        )
    }

    fn mkfile(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult {
        self.record("mkfile", format!("mkfile {path} {ino:?}"))
    }

    fn mkdir(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult {
        self.record("mkdir", format!("mkdir {path} {ino:?}"))
    }

    fn mknod(
        &mut self,
        path: &ResolvedPath,
        mode: u32,
        rdev: u64,
        ino: Option<u64>,
    ) -> HandlerResult {
        self.record("mknod", format!("mknod {path} {mode:o} {rdev} {ino:?}"))
    }

    fn mkfifo(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult {
        self.record("mkfifo", format!("mkfifo {path} {ino:?}"))
    }

    fn mksock(&mut self, path: &ResolvedPath, ino: Option<u64>) -> HandlerResult {
        self.record("mksock", format!("mksock {path} {ino:?}"))
    }

    fn symlink(&mut self, path: &ResolvedPath, target: &[u8], _ino: Option<u64>) -> HandlerResult {
        self.record(
            "symlink",
            format!("symlink {path} {}", String::from_utf8_lossy(target)),
        )
    }

    fn rename(&mut self, from: &ResolvedPath, to: &ResolvedPath) -> HandlerResult {
        self.record("rename", format!("rename {from} {to}"))
    }

    fn link(&mut self, path: &ResolvedPath, target: &ResolvedPath) -> HandlerResult {
        self.record("link", format!("link {path} {target}"))
    }

    fn unlink(&mut self, path: &ResolvedPath) -> HandlerResult {
        self.record("unlink", format!("unlink {path}"))
    }

    fn rmdir(&mut self, path: &ResolvedPath) -> HandlerResult {
        self.record("rmdir", format!("rmdir {path}"))
    }

    fn write(&mut self, path: &ResolvedPath, offset: u64, data: &[u8]) -> HandlerResult {
        self.record("write", format!("write {path} {offset} {}", data.len()))
    }

    fn clone_range(
        &mut self,
        path: &ResolvedPath,
        offset: u64,
        len: u64,
        source: &CloneSource,
    ) -> HandlerResult {
        self.record(
            "clone",
            format!("clone {path} {offset} {len} {}", source.path),
        )
    }

    fn set_xattr(&mut self, path: &ResolvedPath, name: &[u8], data: &[u8]) -> HandlerResult {
        self.record(
            "set_xattr",
            format!(
                "set_xattr {path} {} {}",
                String::from_utf8_lossy(name),
                data.len()
            ),
        )
    }

    fn remove_xattr(&mut self, path: &ResolvedPath, name: &[u8]) -> HandlerResult {
        self.record(
            "remove_xattr",
            format!("remove_xattr {path} {}", String::from_utf8_lossy(name)),
        )
    }

    fn truncate(&mut self, path: &ResolvedPath, size: u64) -> HandlerResult {
        self.record("truncate", format!("truncate {path} {size}"))
    }

    fn chmod(&mut self, path: &ResolvedPath, mode: u32) -> HandlerResult {
        self.record("chmod", format!("chmod {path} {mode:o}"))
    }

    fn chown(&mut self, path: &ResolvedPath, uid: u32, gid: u32) -> HandlerResult {
        self.record("chown", format!("chown {path} {uid} {gid}"))
    }

    fn utimes(&mut self, path: &ResolvedPath, times: &FileTimes) -> HandlerResult {
        self.record(
            "utimes",
            format!("utimes {path} {} {:?}", times.mtime, times.otime),
        )
    }

    fn update_extent(&mut self, path: &ResolvedPath, offset: u64, len: u64) -> HandlerResult {
        self.record("update_extent", format!("update_extent {path} {offset} {len}"))
    }
}
