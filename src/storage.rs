use crate::errors::StoreError;
use crate::models::StoreData;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex, sync::MutexGuard};
use tracing::error;

pub const DEFAULT_DATA_PATH: &str = "data/state.json";

pub async fn load_data(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file {}: {err}", path.display());
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            StoreData::default()
        }
    }
}

/// Writes to a sibling temp file and renames it over the target, so readers
/// see either the old file or the new one.
pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = temp_path(path);
    fs::write(&tmp, payload).await?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("state.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// The data file plus its in-memory copy. All mutation goes through
/// [`LocalStore::lock`], so one read-modify-write runs at a time.
#[derive(Clone)]
pub struct LocalStore {
    path: PathBuf,
    data: Arc<Mutex<StoreData>>,
}

impl LocalStore {
    pub fn new(path: PathBuf, data: StoreData) -> Self {
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn open(path: PathBuf) -> Self {
        let data = load_data(&path).await;
        Self::new(path, data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().await
    }

    pub async fn snapshot(&self) -> StoreData {
        self.data.lock().await.clone()
    }
}

#[cfg(test)]
pub(crate) fn unique_test_path(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("doodlebucks_{label}_{}_{}.json", std::process::id(), nanos));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::LAST_CLAIM_KEY;
    use crate::models::Account;

    #[tokio::test]
    async fn missing_file_loads_empty_store() {
        let data = load_data(&unique_test_path("missing")).await;
        assert_eq!(data, StoreData::default());
    }

    #[tokio::test]
    async fn unparsable_file_loads_empty_store() {
        let path = unique_test_path("garbage");
        fs::write(&path, b"{ not json").await.unwrap();
        assert_eq!(load_data(&path).await, StoreData::default());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_data_reloads_and_leaves_no_temp_file() {
        let path = unique_test_path("persist");
        let mut data = StoreData::default();
        data.entries.insert(LAST_CLAIM_KEY.to_string(), "1000".to_string());
        data.account = Some(Account { balance: 5, streak: 1 });

        persist_data(&path, &data).await.unwrap();

        assert_eq!(load_data(&path).await, data);
        assert!(!temp_path(&path).exists());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persist_into_missing_directory_fails() {
        let mut path = unique_test_path("nodir");
        path.set_extension("d");
        let path = path.join("state.json");
        assert!(persist_data(&path, &StoreData::default()).await.is_err());
    }

    #[tokio::test]
    async fn stored_timestamp_uses_plain_string_layout() {
        let path = unique_test_path("layout");
        let mut data = StoreData::default();
        data.entries.insert(LAST_CLAIM_KEY.to_string(), "1767225600000".to_string());
        persist_data(&path, &data).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(raw["entries"][LAST_CLAIM_KEY], "1767225600000");
        let _ = fs::remove_file(&path).await;
    }
}
