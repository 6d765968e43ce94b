use thiserror::Error;

/// Terminal failures of a weather fetch. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("City is not found.")]
    NotFound,

    #[error("Error while fetching data: {0}")]
    Transport(String),

    #[error("{0}")]
    Validation(String),
}

impl FetchError {
    /// Flatten an anyhow chain into a transport error, keeping every cause.
    pub fn transport(err: anyhow::Error) -> Self {
        FetchError::Transport(format!("{err:#}"))
    }
}
