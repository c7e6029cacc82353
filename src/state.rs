use crate::catalog::Catalog;
use crate::selection::SelectionStore;
use crate::submission::SubmissionDialog;
use crate::upstream::UpstreamClient;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handler state. Lock `selection` before `dialog` when both are needed.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub catalog: Arc<Catalog>,
    pub selection: Arc<Mutex<SelectionStore>>,
    pub dialog: Arc<Mutex<SubmissionDialog>>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        catalog: Catalog,
        selection: SelectionStore,
        upstream: UpstreamClient,
    ) -> Self {
        Self {
            data_path,
            catalog: Arc::new(catalog),
            selection: Arc::new(Mutex::new(selection)),
            dialog: Arc::new(Mutex::new(SubmissionDialog::default())),
            upstream,
        }
    }
}
