use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::ExerciseCatalogItem;
use crate::selection::SelectionStore;
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

pub async fn load_selection(path: &Path) -> SelectionStore {
    match fs::read_to_string(path).await {
        Ok(raw) => SelectionStore::load(Some(&raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => SelectionStore::load(None),
        Err(err) => {
            error!("failed to read selection file: {err}");
            SelectionStore::load(None)
        }
    }
}

pub async fn persist_selection(path: &Path, selection: &SelectionStore) {
    if let Err(err) = fs::write(path, selection.serialize()).await {
        error!("failed to persist selection to {}: {err}", path.display());
    }
}

pub async fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("catalog file {} not found, starting with an empty catalog", path.display());
            return Ok(Catalog::default());
        }
        Err(err) => return Err(err.into()),
    };

    let items: Vec<ExerciseCatalogItem> = serde_json::from_slice(&bytes).map_err(AppError::internal)?;
    Ok(Catalog::new(items))
}
