use std::{collections::HashMap, fs, path::PathBuf};

/// Key-value backend for preference persistence.
///
/// Values are plain strings; callers are responsible for parsing them back.
/// Implementations must never fail loudly: a backend that cannot read or
/// write simply behaves as if the key were absent.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);
}

/// Storage backed by a single JSON object on disk.
///
/// The whole map is rewritten on every mutation. I/O errors are logged and
/// swallowed, leaving the in-memory copy as the source of truth for the rest
/// of the session.
pub struct FileStorage {
    entries: HashMap<String, String>,
    path: PathBuf,
}

impl FileStorage {
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("Ignoring malformed preference file {:?}: {}", path, err);
                    HashMap::new()
                }
            },
            // Usually just the first run.
            Err(_) => HashMap::new(),
        };

        Self { entries, path }
    }

    fn flush(&self) {
        let raw = match serde_json::to_string_pretty(&self.entries) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("Failed to serialize preferences: {}", err);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("Failed to create preference directory: {}", err);
                return;
            }
        }

        if let Err(err) = fs::write(&self.path, raw) {
            log::warn!("Failed to write preference file: {}", err);
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

/// Purely in-memory storage, for environments without a config directory.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Storage that remembers nothing: persistence disabled entirely.
#[derive(Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) {}

    fn remove(&mut self, _key: &str) {}
}

/// Picks the best available backend for this machine.
pub fn default_storage(app_name: &str) -> Box<dyn Storage> {
    match dirs::config_dir() {
        Some(dir) => Box::new(FileStorage::open(dir.join(app_name).join("preferences.json"))),
        None => {
            log::warn!("No config directory available, preferences will not persist");
            Box::new(MemoryStorage::default())
        }
    }
}
