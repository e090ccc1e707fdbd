//! Shared handler state.

use std::path::PathBuf;

use sklad_db::Database;

/// State threaded through every axum handler. The database handle is the
/// only shared mutable resource; there is no process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Directory where generated report files are written.
    pub reports_dir: PathBuf,
}
