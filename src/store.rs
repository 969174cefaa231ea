//! Persistent table of user-defined chat commands.
//!
//! Commands live in memory as a sorted map and are written to a TOML file
//! under a `[commands]` table whenever they change:
//!
//! ```toml
//! [commands]
//! discord = "Join us at discord.example.com"
//! hug = "{user} hugs {args}"
//! ```
//!
//! The store is an explicit object handed to the dispatcher; nothing in the
//! protocol crate knows it exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize commands: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("save task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CommandFile {
    #[serde(default)]
    commands: BTreeMap<String, String>,
}

/// User-defined commands keyed by lower-case name.
#[derive(Debug)]
pub struct CommandStore {
    path: PathBuf,
    commands: BTreeMap<String, String>,
}

impl CommandStore {
    /// An empty store that will save to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            commands: BTreeMap::new(),
        }
    }

    /// Load commands from `path`. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No command file yet, starting empty");
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let file: CommandFile = match toml::from_str(&content) {
            Ok(file) => file,
            Err(source) => return Err(StoreError::Parse { path, source }),
        };
        let commands = file
            .commands
            .into_iter()
            .map(|(name, response)| (name.to_ascii_lowercase(), response))
            .collect::<BTreeMap<_, _>>();

        info!(path = %path.display(), count = commands.len(), "Loaded custom commands");
        Ok(Self { path, commands })
    }

    /// Serialize all commands for writing once the store is unlocked.
    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let file = CommandFile {
            commands: self.commands.clone(),
        };
        Ok(Snapshot {
            path: self.path.clone(),
            content: toml::to_string_pretty(&file)?,
            count: self.commands.len(),
        })
    }

    /// File this store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Response template for `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.commands
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// True if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set the response for `name`, returning the previous one.
    pub fn insert(&mut self, name: &str, response: impl Into<String>) -> Option<String> {
        self.commands
            .insert(name.to_ascii_lowercase(), response.into())
    }

    /// Remove `name`, returning its response.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.commands.remove(&name.to_ascii_lowercase())
    }

    /// Sorted command names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if no commands are defined.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Serialized store contents, detached from the lock they were taken under.
#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
    content: String,
    count: usize,
}

impl Snapshot {
    /// Write to disk.
    ///
    /// Writes a sibling temp file first and renames it over the target, so
    /// a crash mid-write leaves the previous file intact.
    pub fn write(self) -> Result<(), StoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, &self.content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), count = self.count, "Saved custom commands");
        Ok(())
    }

    /// [`Snapshot::write`] on the blocking pool.
    pub async fn write_async(self) -> Result<(), StoreError> {
        tokio::task::spawn_blocking(move || self.write()).await?
    }
}

/// Fill `{user}` and `{args}` placeholders in a response template.
pub fn render_response(template: &str, user: &str, args: &str) -> String {
    template.replace("{user}", user).replace("{args}", args)
}
