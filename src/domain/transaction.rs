use super::account::{AccountNo, Amount};
use super::order::{Order, OrderId};
use crate::error::{Result, WorkflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

impl TransactionStatus {
    pub fn can_advance_to(self, to: TransactionStatus) -> bool {
        matches!(
            (self, to),
            (TransactionStatus::Pending, TransactionStatus::Completed)
                | (TransactionStatus::Pending, TransactionStatus::Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A funds movement record. Immutable after creation except for the status,
/// which advances from `Pending` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub order_id: Option<OrderId>,
    pub from: AccountNo,
    pub to: AccountNo,
    pub amount: Amount,
    pub at: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// The record of an order payment. The ledger transfer has already been
    /// applied atomically by the time this is created, so the record is born
    /// `Completed`.
    pub fn payment(order: &Order, from: AccountNo, to: AccountNo) -> Self {
        Self {
            id: TransactionId::generate(),
            order_id: Some(order.id),
            from,
            to,
            amount: order.amount,
            at: Utc::now(),
            status: TransactionStatus::Completed,
        }
    }

    /// A top-up of a single account. Born `Pending`: the balance changes only
    /// when the Bank approves the matching transaction request.
    pub fn top_up(account_no: AccountNo, amount: Amount) -> Self {
        Self {
            id: TransactionId::generate(),
            order_id: None,
            from: account_no.clone(),
            to: account_no,
            amount,
            at: Utc::now(),
            status: TransactionStatus::Pending,
        }
    }

    pub fn advance(&mut self, to: TransactionStatus) -> Result<()> {
        if self.status.can_advance_to(to) {
            self.status = to;
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }
}
