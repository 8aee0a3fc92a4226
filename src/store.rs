use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::migration::migrate;
use crate::task::Task;

const FILE_PREFIX: &str = "tasks-";
const FILE_EXTENSION: &str = "json";

/// One JSON file per identity under a data directory.
#[derive(Debug, Clone)]
pub struct TaskStore {
    data_dir: PathBuf,
}

impl TaskStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.data_dir.join(format!(
            "{FILE_PREFIX}{}.{FILE_EXTENSION}",
            encode_identity(identity)
        ))
    }

    /// Loads the collection for `identity`, upgrading old entries and
    /// writing the upgraded file back when anything changed.
    ///
    /// Missing or unparsable files yield an empty collection.
    pub fn load(&self, identity: &str) -> Result<Vec<Task>> {
        self.load_as_of(identity, Local::now().date_naive())
    }

    pub fn load_as_of(&self, identity: &str, today: NaiveDate) -> Result<Vec<Task>> {
        let path = self.path_for(identity);
        let Some(entries) = read_entries(&path) else {
            return Ok(Vec::new());
        };

        let migration = migrate(&entries, today);
        if migration.changed() {
            let report = migration.report;
            info!(
                path = %path.display(),
                upgraded_legacy = report.upgraded_legacy,
                renamed_key = report.renamed_key,
                backfilled_weekday = report.backfilled_weekday,
                corrected_weekday = report.corrected_weekday,
                dropped = report.dropped,
                "migrated task file"
            );
            self.save(identity, &migration.tasks)?;
        }

        debug!(path = %path.display(), count = migration.tasks.len(), "loaded tasks");
        Ok(migration.tasks)
    }

    /// Overwrites the whole file for `identity`.
    pub fn save(&self, identity: &str, tasks: &[Task]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.path_for(identity);
        fs::write(&path, serde_json::to_string_pretty(tasks)?)?;
        debug!(path = %path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// `None` means "start empty". Load never writes in that case, but the
/// first mutation of the session replaces whatever the file held.
fn read_entries(path: &Path) -> Option<Vec<Value>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(
                path = %path.display(),
                %err,
                "unreadable task file, starting empty; next save overwrites it"
            );
            return None;
        }
    };

    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Array(entries)) => Some(entries),
        Ok(_) => {
            warn!(
                path = %path.display(),
                "task file is not a JSON array, starting empty; next save overwrites it"
            );
            None
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                %err,
                "corrupt task file, starting empty; next save overwrites it"
            );
            None
        }
    }
}

/// Maps an identity to a file-name-safe token; distinct identities never
/// share a token.
pub fn encode_identity(identity: &str) -> String {
    let mut encoded = String::with_capacity(identity.len());
    for byte in identity.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
