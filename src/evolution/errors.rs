use crate::models::{SelectionError, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SettingsError: {0}")]
    SettingsError(#[from] SettingsError),
    #[error("SelectionError: {0}")]
    SelectionError(#[from] SelectionError),
    #[error("Finished: the run has no epochs left")]
    Finished,
}
