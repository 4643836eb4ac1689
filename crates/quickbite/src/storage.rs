//! JSON snapshot of every store.
//!
//! The document keeps the key layout `accounts`, `menuItems`, `orders`, `deliveries`,
//! `activeSessionAccountId`. Writes go to a sibling temp file first and are renamed
//! over the target, so a crash mid-write leaves the previous snapshot intact. Every
//! save gets its own temp file; overlapping saves end with one complete snapshot.
use crate::model::{Account, AccountId, Delivery, MenuItem, Order};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("state file {path} is not valid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
    #[serde(default)]
    pub active_session_account_id: Option<AccountId>,
}

/// Reads the snapshot at `path`. A missing file is `Ok(None)`.
pub async fn load(path: &Path) -> Result<Option<PersistedState>, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No state file");
            return Ok(None);
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let state: PersistedState =
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        accounts = state.accounts.len(),
        orders = state.orders.len(),
        "State loaded"
    );
    Ok(Some(state))
}

pub async fn save(path: &Path, state: &PersistedState) -> Result<(), StorageError> {
    let io_err = |source: io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = serde_json::to_vec_pretty(state).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let tmp = temp_path(path);
    if let Err(e) = write_then_rename(&tmp, path, &bytes).await {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %cleanup, "Leaving stale temp file");
            }
        }
        return Err(io_err(e));
    }

    info!(path = %path.display(), bytes = bytes.len(), "State saved");
    Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, path).await
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("state");
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Password, Profile};
    use chrono::Utc;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("quickbite-{}.json", Uuid::new_v4()))
    }

    fn customer() -> Account {
        Account {
            id: AccountId::generate(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: Password::new("pw"),
            created_at: Utc::now(),
            profile: Profile::Customer { cart: Vec::new() },
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        assert_eq!(load(&scratch_path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = scratch_path();
        let account = customer();
        let state = PersistedState {
            active_session_account_id: Some(account.id),
            accounts: vec![account],
            ..Default::default()
        };

        save(&path, &state).await.unwrap();
        let loaded = load(&path).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn test_document_keys() {
        let json = serde_json::to_value(PersistedState::default()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["accounts", "activeSessionAccountId", "deliveries", "menuItems", "orders"]
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_json_error() {
        let path = scratch_path();
        std::fs::write(&path, b"{not json").unwrap();
        let err = load(&path).await.unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, StorageError::Json { .. }));
    }

    #[test]
    fn test_temp_path_is_fresh_per_save() {
        let path = Path::new("/var/lib/quickbite/state.json");
        let first = temp_path(path);
        let second = temp_path(path);
        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_saves_leave_one_whole_snapshot() {
        let path = scratch_path();
        let small = PersistedState::default();
        let large = PersistedState {
            accounts: (0..20).map(|_| customer()).collect(),
            ..Default::default()
        };

        for _ in 0..50 {
            let first = {
                let (path, state) = (path.clone(), large.clone());
                tokio::spawn(async move { save(&path, &state).await })
            };
            let second = {
                let (path, state) = (path.clone(), small.clone());
                tokio::spawn(async move { save(&path, &state).await })
            };
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            let loaded = load(&path).await.unwrap().unwrap();
            assert!(loaded == small || loaded == large);
        }

        let leftovers = std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let target = path.file_name().unwrap().to_string_lossy().into_owned();
                name.starts_with(&format!(".{target}.")) && name.ends_with(".tmp")
            })
            .count();
        let _ = std::fs::remove_file(&path);
        assert_eq!(leftovers, 0);
    }
}
