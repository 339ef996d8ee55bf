use crate::domain::account::{AccountNo, Amount, Balance};
use crate::domain::order::OrderId;
use crate::domain::request::RequestId;
use crate::domain::role::Role;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Workflow error taxonomy. Validation failures are resolved at the boundary
/// before any state change; everything else is returned as a typed result so
/// a failed payment never leaves the ledger mutated.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("account secret does not match")]
    Authentication,
    #[error("{role} is not permitted to {action}")]
    Authorization { role: Role, action: String },
    #[error("insufficient funds: balance {balance} is short of {needed}")]
    InsufficientFunds { balance: Balance, needed: Amount },
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    /// Soft failure: callers treat this as a benign no-op so a duplicate
    /// approve call never applies a second side effect.
    #[error("request {0} is already approved")]
    AlreadyApproved(RequestId),
    #[error("{0} not found")]
    NotFound(String),
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
    #[error("order {0} is no longer awaiting payment")]
    OrderAlreadyPaid(OrderId),
    #[error("cart has no lines to check out")]
    EmptyCart,
    #[error("account {0} already exists")]
    DuplicateAccount(AccountNo),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

impl WorkflowError {
    /// Stable error kind string as exposed to collaborators on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Authentication => "AuthenticationError",
            Self::Authorization { .. } => "AuthorizationError",
            Self::InsufficientFunds { .. } => "InsufficientFundsError",
            Self::InvalidTransition { .. } => "InvalidTransitionError",
            Self::AlreadyApproved(_) => "AlreadyApprovedError",
            Self::NotFound(_) => "NotFoundError",
            Self::OrderNotFound(_) => "OrderNotFoundError",
            Self::OrderAlreadyPaid(_) => "OrderAlreadyPaidError",
            Self::EmptyCart => "EmptyCartError",
            Self::DuplicateAccount(_) => "DuplicateAccountError",
            Self::Serialization(_) | Self::Io(_) | Self::Storage(_) => "StorageError",
            #[cfg(feature = "storage-rocksdb")]
            Self::RocksDb(_) => "StorageError",
        }
    }
}
