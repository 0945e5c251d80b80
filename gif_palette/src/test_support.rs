//! Scripted stand-ins for the FFmpeg binary.

use crate::engine::FfmpegEngine;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

// A script still open for writing in one thread cannot be exec'd by a
// child forked from another (ETXTBSY), so scripted tests run one at a time.
static SCRIPT_LOCK: Mutex<()> = Mutex::new(());

pub fn serial() -> MutexGuard<'static, ()> {
    SCRIPT_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write `script` as an executable `ffmpeg` in `dir`.
pub fn fake_engine(dir: &TempDir, script: &str) -> FfmpegEngine {
    let path = dir.path().join("ffmpeg");
    fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    FfmpegEngine::with_binary(path)
}
