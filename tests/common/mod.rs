//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use tempfile::{tempdir, TempDir};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordtree=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

/// A scratch directory and the path of a tree file inside it.
pub fn scratch_file() -> (TempDir, PathBuf) {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.db");
    (dir, path)
}

/// Deterministic pseudo-random word list with repeats.
pub fn word_stream(len: usize, vocabulary: u64) -> Vec<String> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            format!("word{}", state % vocabulary)
        })
        .collect()
}
