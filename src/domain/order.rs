use super::account::{AccountNo, Amount};
use super::cart::Cart;
use super::product::ProductId;
use crate::error::{Result, WorkflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Order lifecycle. Transitions are monotonic: an order never regresses to an
/// earlier state, and `Delivered`/`Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
    AwaitingDelivery,
    Delivered,
    Failed,
}

impl OrderStatus {
    pub fn can_advance_to(self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Failed)
                | (OrderStatus::Paid, OrderStatus::AwaitingDelivery)
                | (OrderStatus::AwaitingDelivery, OrderStatus::Delivered)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::AwaitingDelivery => "AwaitingDelivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart line frozen into an order at checkout time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Amount,
}

/// An order: the immutable snapshot of a cart plus its lifecycle status.
/// Orders are append-only history and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: AccountNo,
    pub lines: Vec<OrderLine>,
    pub amount: Amount,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshots the cart's lines, locking in their prices. Fails on an empty
    /// cart; the caller clears the cart only after the order is stored.
    pub fn checkout(cart: &Cart, customer: AccountNo) -> Result<Self> {
        if cart.is_empty() {
            return Err(WorkflowError::EmptyCart);
        }
        let amount = Amount::new(cart.amount())?;
        let lines = cart
            .lines()
            .map(|(product_id, line)| OrderLine {
                product_id: *product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();
        Ok(Self {
            id: OrderId::generate(),
            customer,
            lines,
            amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Compare-and-set status transition: only the expected predecessor may
    /// advance, so a doubly-applied transition fails closed.
    pub fn advance(&mut self, to: OrderStatus) -> Result<()> {
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
