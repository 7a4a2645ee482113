//! Snapshot file reader.
//!
//! Datasets are shipped as an append-only command log: a sequence of RESP
//! arrays of bulk strings, one array per command.
//!
//! ```text
//! *3\r\n$3\r\nset\r\n$9\r\nzip:30019\r\n$16\r\n33.9526,-83.7479\r\n
//! ```
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `set <key> <value>` | Insert or overwrite |
//! | `set <key> <value> ex <seconds>` | Same; the expiry is ignored |
//! | `del <key>` | Remove |
//! | `flushdb` | Remove everything loaded so far |
//!
//! Command names are case-insensitive. Replaying the log in order yields the
//! final dataset. Anything else, including a truncated trailing command,
//! makes the whole file invalid.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use crate::dataset::{DatasetSource, MemoryDataset};
use crate::error::DatasetError;

/// Replay a snapshot held in memory.
///
/// # Errors
///
/// Returns [`DatasetError::Corrupt`] with the byte offset of the first
/// invalid command.
pub fn replay(data: &[u8]) -> Result<MemoryDataset, DatasetError> {
    let mut reader = CommandReader { data, pos: 0 };
    let mut entries: HashMap<String, String> = HashMap::new();

    while reader.pos < data.len() {
        let start = reader.pos;
        let parts = reader.read_command()?;
        let Some(name) = parts.first() else {
            continue;
        };

        if name.eq_ignore_ascii_case(b"set") {
            match parts.len() {
                3 => {}
                5 if parts[3].eq_ignore_ascii_case(b"ex") => {
                    let valid_ttl = std::str::from_utf8(parts[4])
                        .ok()
                        .and_then(|s| s.parse::<u64>().ok())
                        .is_some();
                    if !valid_ttl {
                        return Err(corrupt(start, "invalid expiry in set"));
                    }
                }
                _ => return Err(corrupt(start, "wrong number of arguments for set")),
            }
            let key = utf8(parts[1], start)?;
            let value = utf8(parts[2], start)?;
            entries.insert(key, value);
        } else if name.eq_ignore_ascii_case(b"del") {
            if parts.len() != 2 {
                return Err(corrupt(start, "wrong number of arguments for del"));
            }
            entries.remove(&utf8(parts[1], start)?);
        } else if name.eq_ignore_ascii_case(b"flushdb") {
            if parts.len() != 1 {
                return Err(corrupt(start, "wrong number of arguments for flushdb"));
            }
            entries.clear();
        } else {
            return Err(corrupt(
                start,
                format!("unknown command {:?}", String::from_utf8_lossy(name)),
            ));
        }
    }

    Ok(MemoryDataset::from_map(entries))
}

/// Load and replay a snapshot file.
///
/// The file is memory-mapped for the duration of the replay and unmapped
/// before returning. An empty file is an empty dataset.
///
/// # Errors
///
/// - [`DatasetError::Open`] if the file cannot be opened or mapped
/// - [`DatasetError::Corrupt`] if the contents are not a valid command log
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<MemoryDataset, DatasetError> {
    let path = path.as_ref();
    let open_err = |source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(open_err)?;
    if file.metadata().map_err(open_err)?.len() == 0 {
        return Ok(MemoryDataset::new());
    }

    // SAFETY: the snapshot is prepared out-of-band and never written while
    // it is being served. The mapping does not outlive this function.
    let mmap = unsafe { Mmap::map(&file) }.map_err(open_err)?;

    replay(&mmap)
}

impl MemoryDataset {
    /// Build a dataset by replaying snapshot bytes. See [`replay`].
    pub fn from_snapshot(data: &[u8]) -> Result<Self, DatasetError> {
        replay(data)
    }

    /// Build a dataset by replaying a snapshot file. See [`load_file`].
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        load_file(path)
    }
}

/// File-backed [`DatasetSource`].
///
/// By default the snapshot is loaded into a fresh in-memory dataset on every
/// [`open`](DatasetSource::open), and that dataset is dropped when the lookup
/// finishes. A preloaded source replays the file once and shares the
/// immutable result across all lookups. Both go through [`load_file`], so
/// lookups behave the same either way.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
    preloaded: Option<Arc<MemoryDataset>>,
}

impl SnapshotSource {
    /// Create a source that loads `path` on every open.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            preloaded: None,
        }
    }

    /// Create a source that loads `path` once, now.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    pub fn preloaded<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        let dataset = load_file(&path)?;
        Ok(Self {
            path,
            preloaded: Some(Arc::new(dataset)),
        })
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the snapshot was loaded up front.
    pub fn is_preloaded(&self) -> bool {
        self.preloaded.is_some()
    }
}

impl DatasetSource for SnapshotSource {
    type Dataset = Arc<MemoryDataset>;

    fn open(&self) -> Result<Self::Dataset, DatasetError> {
        match &self.preloaded {
            Some(dataset) => Ok(Arc::clone(dataset)),
            None => load_file(&self.path).map(Arc::new),
        }
    }

    fn describe(&self) -> String {
        let strategy = if self.is_preloaded() {
            "preloaded"
        } else {
            "per-call"
        };
        format!("snapshot {} ({})", self.path.display(), strategy)
    }
}

fn corrupt(offset: usize, reason: impl Into<String>) -> DatasetError {
    DatasetError::Corrupt {
        offset,
        reason: reason.into(),
    }
}

fn utf8(bytes: &[u8], offset: usize) -> Result<String, DatasetError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| corrupt(offset, "invalid UTF-8"))
}

/// Cursor over RESP arrays of bulk strings.
struct CommandReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CommandReader<'a> {
    fn read_command(&mut self) -> Result<Vec<&'a [u8]>, DatasetError> {
        let count = self.read_header(b'*')?;
        let mut parts = Vec::with_capacity(count.min(8));
        for _ in 0..count {
            parts.push(self.read_bulk()?);
        }
        Ok(parts)
    }

    fn read_bulk(&mut self) -> Result<&'a [u8], DatasetError> {
        let start = self.pos;
        let len = self.read_header(b'$')?;

        // Header lengths come from the file, so `pos + len + 2` may overflow.
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| end.checked_add(2).is_some_and(|e| e <= self.data.len()))
            .ok_or_else(|| corrupt(start, "truncated bulk string"))?;
        if &self.data[end..end + 2] != b"\r\n" {
            return Err(corrupt(end, "missing bulk string terminator"));
        }

        let bytes = &self.data[self.pos..end];
        self.pos = end + 2;
        Ok(bytes)
    }

    /// Reads `<marker><decimal>\r\n` and returns the number.
    fn read_header(&mut self, marker: u8) -> Result<usize, DatasetError> {
        let start = self.pos;
        if self.data.get(start) != Some(&marker) {
            return Err(corrupt(
                start,
                format!("expected '{}'", char::from(marker)),
            ));
        }

        let rest = &self.data[start + 1..];
        let line_len = rest
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| corrupt(start, "truncated header"))?;

        let n = std::str::from_utf8(&rest[..line_len])
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| corrupt(start, "invalid length"))?;

        self.pos = start + 1 + line_len + 2;
        Ok(n)
    }
}
