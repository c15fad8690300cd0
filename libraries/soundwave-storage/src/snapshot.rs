//! redb-backed player snapshot store

use crate::error::{Result, StorageError};
use redb::{Database, TableDefinition};
use serde::de::DeserializeOwned;
use soundwave_core::{PlayerSnapshot, SnapshotStore, Track};
use std::path::{Path, PathBuf};
use tracing::debug;

const PLAYER_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("player_state");

const KEY_QUEUE: &str = "queue";
const KEY_CURRENT_INDEX: &str = "current_index";
const KEY_IS_PLAYING: &str = "is_playing";
const KEY_CURRENT_TIME: &str = "current_time_seconds";

/// Snapshot store backed by an embedded redb database
///
/// Each snapshot field lives under its own key, JSON-encoded, and a save
/// rewrites all four keys in a single write transaction so a reader never
/// sees a queue from one save paired with an index from another.
pub struct RedbSnapshotStore {
    db: Database,
    path: PathBuf,
}

impl RedbSnapshotStore {
    /// Open (or create) the database at `path`
    ///
    /// Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(&path)?;
        debug!(path = %path.display(), "Opened snapshot database");

        Ok(Self { db, path })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove every stored field
    pub fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PLAYER_STATE)?;
            for key in [KEY_QUEUE, KEY_CURRENT_INDEX, KEY_IS_PLAYING, KEY_CURRENT_TIME] {
                table.remove(key)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    fn write(&self, snapshot: &PlayerSnapshot) -> Result<()> {
        let queue = serde_json::to_vec(&snapshot.queue)?;
        let index = serde_json::to_vec(&snapshot.current_index)?;
        let playing = serde_json::to_vec(&snapshot.is_playing)?;
        let time = serde_json::to_vec(&snapshot.current_time_seconds)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PLAYER_STATE)?;
            table.insert(KEY_QUEUE, queue.as_slice())?;
            table.insert(KEY_CURRENT_INDEX, index.as_slice())?;
            table.insert(KEY_IS_PLAYING, playing.as_slice())?;
            table.insert(KEY_CURRENT_TIME, time.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    fn read(&self) -> Result<Option<PlayerSnapshot>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(PLAYER_STATE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(queue) = table.get(KEY_QUEUE)? else {
            return Ok(None);
        };
        let queue: Vec<Track> = decode(KEY_QUEUE, queue.value())?;

        // Scalar fields fall back to their defaults: an older snapshot may
        // only carry a queue.
        let current_index = match table.get(KEY_CURRENT_INDEX)? {
            Some(v) => decode(KEY_CURRENT_INDEX, v.value())?,
            None => 0,
        };
        let is_playing = match table.get(KEY_IS_PLAYING)? {
            Some(v) => decode(KEY_IS_PLAYING, v.value())?,
            None => false,
        };
        let current_time_seconds = match table.get(KEY_CURRENT_TIME)? {
            Some(v) => decode(KEY_CURRENT_TIME, v.value())?,
            None => 0,
        };

        Ok(Some(PlayerSnapshot {
            queue,
            current_index,
            is_playing,
            current_time_seconds,
        }))
    }
}

fn decode<T: DeserializeOwned>(field: &'static str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::corrupt(field, e.to_string()))
}

impl SnapshotStore for RedbSnapshotStore {
    fn load(&self) -> soundwave_core::Result<Option<PlayerSnapshot>> {
        Ok(self.read()?)
    }

    fn save(&self, snapshot: &PlayerSnapshot) -> soundwave_core::Result<()> {
        Ok(self.write(snapshot)?)
    }
}

impl std::fmt::Debug for RedbSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSnapshotStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
