//! Common test utilities for looks-same integration tests.
//!
//! Scratch paths are per-process so parallel test binaries never collide.

#![allow(dead_code)]

pub mod generators;

use std::path::PathBuf;

/// Scratch directory for files written by a test.
///
/// # Panics
/// Panics if the directory cannot be created.
#[track_caller]
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "looks-same-tests-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("failed to create {}: {e}", dir.display()));
    dir
}
