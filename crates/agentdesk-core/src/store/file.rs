//! JSON snapshot store.
//!
//! The whole roster is written to a single pretty-printed JSON file. Every
//! mutation is applied to a copy of the table, written to `<path>.tmp`,
//! synced and renamed over the snapshot; only then does the in-memory table
//! change. A failed write leaves both the file and memory untouched.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::agents::{Agent, AgentProfile};
use crate::distribution::Assignment;

use super::{AgentStore, AgentTable, StoreError};

/// Store persisted to a JSON snapshot file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    table: RwLock<AgentTable>,
}

impl FileStore {
    /// Open the snapshot at `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            AgentTable::default()
        };

        tracing::info!(
            "Opened agent store at {:?} ({} agents)",
            path,
            table.agents().len()
        );

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage a change on a copy, persist it, then publish it
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut AgentTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut table = self.table.write();
        let mut staged = table.clone();
        let result = change(&mut staged)?;
        self.write_snapshot(&staged)?;
        *table = staged;
        Ok(result)
    }

    /// `<path>.tmp`, next to the snapshot
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_snapshot(&self, table: &AgentTable) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(table)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        // Leftover from an interrupted write
        let _ = fs::remove_file(&temp_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl AgentStore for FileStore {
    fn list_agents(&self) -> Result<Vec<Agent>, StoreError> {
        Ok(self.table.read().agents().to_vec())
    }

    fn get_agent(&self, id: &str) -> Result<Agent, StoreError> {
        self.table.read().get(id)
    }

    fn insert_agent(&self, agent: Agent) -> Result<Agent, StoreError> {
        self.commit(|table| table.insert(agent))
    }

    fn update_agent(&self, id: &str, profile: AgentProfile) -> Result<Agent, StoreError> {
        self.commit(|table| table.update(id, profile))
    }

    fn delete_agent(&self, id: &str) -> Result<Agent, StoreError> {
        self.commit(|table| table.delete(id))
    }

    fn replace_assignments(&self, assignment: &Assignment) -> Result<(), StoreError> {
        self.commit(|table| table.replace_assignments(assignment))
    }
}
