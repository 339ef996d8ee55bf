use super::order::OrderId;
use super::transaction::TransactionId;
use crate::error::{Result, WorkflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The four approval queues share one state machine; the kind selects which
/// role may sign off and which entity advances on approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Order,
    Delivery,
    Supply,
    Transaction,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Order => "Order",
            RequestKind::Delivery => "Delivery",
            RequestKind::Supply => "Supply",
            RequestKind::Transaction => "Transaction",
        };
        f.write_str(name)
    }
}

/// The entity a request is tied to: orders for the order/delivery/supply
/// queues, transactions for the settlement queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestTarget {
    Order(OrderId),
    Transaction(TransactionId),
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestTarget::Order(id) => write!(f, "order {id}"),
            RequestTarget::Transaction(id) => write!(f, "transaction {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
}

/// An entry in an approval queue.
///
/// `Pending --approve--> Approved` is the whole state machine; there is no
/// reject or cancel transition. A request once created is approved or remains
/// pending indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub target: RequestTarget,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
}

impl ApprovalRequest {
    pub fn new(kind: RequestKind, target: RequestTarget) -> Self {
        Self {
            id: RequestId::generate(),
            kind,
            target,
            requested_at: Utc::now(),
            status: RequestStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The single permitted transition. A second approval reports
    /// `AlreadyApproved`, which callers treat as a benign no-op.
    pub fn approve(&mut self) -> Result<()> {
        match self.status {
            RequestStatus::Pending => {
                self.status = RequestStatus::Approved;
                Ok(())
            }
            RequestStatus::Approved => Err(WorkflowError::AlreadyApproved(self.id)),
        }
    }
}
