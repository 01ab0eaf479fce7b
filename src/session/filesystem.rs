use super::storage::SessionStore;
use crate::error::{Result, UnitrackError};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

const SESSION_FILE_NAME: &str = "session.json";

/// Session store backed by a single JSON file
///
/// The file holds a flat object of key to string value, e.g.
/// `{"accessToken": "...", "refreshToken": "..."}`.
pub struct FilesystemSessionStore {
    dir: PathBuf,
    // Serialises read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FilesystemSessionStore {
    /// Store rooted at the default cache directory (`~/.cache/unitrack`)
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(default_session_dir()?))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_file(&self) -> PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        fs::read_to_string(self.session_file())
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if !self.dir.exists() {
            create_private_dir(&self.dir)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        // Unique per write so concurrent processes never share a temp file
        let tmp_file = self
            .dir
            .join(format!("{}.{}.tmp", SESSION_FILE_NAME, Uuid::new_v4()));

        let written = open_private_file(&tmp_file)
            .and_then(|mut file| file.write_all(content.as_bytes()).and_then(|_| file.sync_all()));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }

        fs::rename(&tmp_file, self.session_file())?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| UnitrackError::SessionError("session store lock poisoned".to_string()))?;

        let mut entries = self.read_entries();
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl SessionStore for FilesystemSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.session_file().exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| UnitrackError::SessionError("session store lock poisoned".to_string()))?;

        let path = self.session_file();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Tokens are credentials: owner-only on unix
#[cfg(unix)]
fn open_private_file(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// `~/.cache/unitrack`
pub fn default_session_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        UnitrackError::SessionError("could not determine home directory".to_string())
    })?;
    Ok(home.join(".cache").join("unitrack"))
}
