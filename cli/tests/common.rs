//! # create-zip Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`: building a
//! `create-zip` command with a clean environment, and reading back the entries
//! of a produced archive.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One archive entry as read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEntry {
    pub name: String,
    pub is_dir: bool,
    pub compression: zip::CompressionMethod,
    pub content: Vec<u8>,
}

/// # Get create-zip Command (`create_zip_cmd`)
///
/// Returns an `assert_cmd::Command` for the compiled `create-zip` binary, running
/// in `work_dir` with the input environment variables cleared and `HOME` /
/// `XDG_CONFIG_HOME` pointed into `work_dir`, so the host environment cannot
/// leak into a test.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn create_zip_cmd(work_dir: &Path) -> Command {
    let mut cmd =
        Command::cargo_bin("create-zip").expect("Failed to find create-zip binary for testing");
    cmd.current_dir(work_dir)
        .env_remove("source_path")
        .env_remove("target_dir")
        .env_remove("RUST_LOG")
        // Keep the user-level config.toml of the host out of reach.
        .env("HOME", work_dir)
        .env("XDG_CONFIG_HOME", work_dir.join(".config"));
    cmd
}

/// Reads every entry of the archive at `path`, in archive order.
pub fn read_archive(path: &Path) -> Vec<ReadEntry> {
    let file = File::open(path).expect("archive should exist");
    let mut archive = zip::ZipArchive::new(file).expect("archive should be a valid zip");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("entry should be readable");
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .expect("entry content should decompress");
            ReadEntry {
                name: entry.name().to_string(),
                is_dir: entry.is_dir(),
                compression: entry.compression(),
                content,
            }
        })
        .collect()
}

/// Entry names of the archive at `path`, in archive order.
pub fn entry_names(path: &Path) -> Vec<String> {
    read_archive(path).into_iter().map(|e| e.name).collect()
}
