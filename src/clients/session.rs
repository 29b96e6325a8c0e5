// src/clients/session.rs
// Session token storage injected into the API client

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::logging::{log_info, log_warning};

/// Holds at most one session token; absence means unauthenticated.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

fn lock(slot: &Mutex<Option<String>>) -> MutexGuard<'_, Option<String>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Token kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_string())) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    fn set(&self, token: &str) -> io::Result<()> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *lock(&self.token) = None;
        Ok(())
    }
}

/// Token persisted in a file so it survives restarts.
///
/// The file is read once when the store is opened; after that the cached
/// value is authoritative and every change is written through.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    token: Mutex<Option<String>>,
}

impl FileSessionStore {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let token = match fs::read_to_string(&path) {
            Ok(content) => {
                let token = content.trim().to_string();
                if token.is_empty() { None } else { Some(token) }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        if token.is_some() {
            log_info(&format!("Loaded session token from {}", path.display()));
        }
        Ok(Self { path, token: Mutex::new(token) })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    fn set(&self, token: &str) -> io::Result<()> {
        let mut slot = lock(&self.token);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        let mut slot = lock(&self.token);
        *slot = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                log_warning(&format!("Could not remove session file {}: {e}", self.path.display()));
                Err(e)
            }
        }
    }
}
