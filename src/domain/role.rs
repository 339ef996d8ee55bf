use super::request::RequestKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four role holders of the marketplace. Approval authority is dispatched
/// on this closed set, never on a free-form role string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Customer,
    #[serde(rename = "E-commerce")]
    Ecommerce,
    Supplier,
    Bank,
}

impl Role {
    /// Capability check backing the four approval queues: the E-commerce
    /// counterpart signs off orders and deliveries, the Supplier fulfills
    /// supply requests, the Bank settles transactions.
    pub fn may_approve(&self, kind: RequestKind) -> bool {
        matches!(
            (self, kind),
            (Role::Ecommerce, RequestKind::Order | RequestKind::Delivery)
                | (Role::Supplier, RequestKind::Supply)
                | (Role::Bank, RequestKind::Transaction)
        )
    }

    /// Products are stocked by the supplying side of the marketplace.
    pub fn may_manage_products(&self) -> bool {
        matches!(self, Role::Supplier | Role::Ecommerce)
    }

    /// Account and transaction listings across all holders are a Bank view.
    pub fn may_audit_ledger(&self) -> bool {
        matches!(self, Role::Bank)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Customer => "Customer",
            Role::Ecommerce => "E-commerce",
            Role::Supplier => "Supplier",
            Role::Bank => "Bank",
        };
        f.write_str(name)
    }
}

/// The acting identity passed into each workflow call; replaces any ambient
/// session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}
