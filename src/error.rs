use crate::domain::bank::BankId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransferError>;

/// Error kinds surfaced by the transfer engine.
///
/// Validation always happens before any mutation, so a returned error means
/// the stored task record was left untouched.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("bank not found: {0}")]
    BankNotFound(BankId),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("bank {bank} does not support currency {currency}")]
    UnsupportedCurrency { bank: String, currency: String },

    #[error("source and destination bank must differ")]
    SameBank,

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("no transfer route available from bank {from} to bank {to}")]
    NoRouteAvailable { from: BankId, to: BankId },

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A route references a channel that does not exist in the bank graph.
    #[error("no channel from bank {from} to bank {to}")]
    MissingChannel { from: BankId, to: BankId },

    #[error("bank configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
