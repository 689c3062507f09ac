use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use tempfile::env::temp_dir;

use crate::{storage::reader::YxdbReader, types::error::Result};

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

pub fn create_temp_yxdb_path_with_prefix(prefix: &str) -> PathBuf {
    let mut temp_path = temp_dir();
    temp_path.push(format!(
        "{}_{}_{}_{}.yxdb",
        prefix,
        process::id(),
        get_unix_timestamp_millis(),
        FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    temp_path
}

pub fn create_temp_yxdb_path() -> PathBuf {
    create_temp_yxdb_path_with_prefix("yxdb_test")
}

/// A .yxdb file in the temp directory, removed on drop.
pub struct TempYxdbFile {
    pub path: PathBuf,
}

impl TempYxdbFile {
    pub fn new(bytes: &[u8]) -> io::Result<Self> {
        Self::with_prefix("yxdb_test", bytes)
    }

    pub fn with_prefix(prefix: &str, bytes: &[u8]) -> io::Result<Self> {
        let path = create_temp_yxdb_path_with_prefix(prefix);
        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<YxdbReader> {
        YxdbReader::open(&self.path)
    }
}

impl Drop for TempYxdbFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
