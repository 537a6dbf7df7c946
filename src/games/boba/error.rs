use thiserror::Error;

/// Why a purchase did not go through. Never fatal; the caller logs it and
/// the UI greys out the affordance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("no catalog entry at index {0}")]
    UnknownEntry(usize),

    #[error("insufficient funds: need {cost}, have {balance:.1}")]
    InsufficientFunds { cost: u64, balance: f64 },
}

/// Failures from the local or remote storage backends.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("local storage is unavailable")]
    StorageUnavailable,

    #[error("local storage error: {0}")]
    Storage(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("no remote store configured for signed-in user")]
    NoRemote,
}
