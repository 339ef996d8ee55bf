use crate::domain::account::BankAccount;
use crate::domain::cart::Cart;
use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::product::{Product, ProductId};
use crate::domain::role::Role;
use crate::domain::transaction::{Transaction, TransactionId, TransactionStatus};
use crate::error::WorkflowError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One workflow call as collaborators submit it, tagged by operation name.
///
/// Approval and payment calls may omit their entity id; a replay driver then
/// substitutes the id it remembered from the preceding call, mirroring how
/// the surrounding UI chains calls through fetched state. The optional `role`
/// on approval calls overrides the naturally authorized role, which is how a
/// script exercises the capability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WorkflowRequest {
    #[serde(rename_all = "camelCase")]
    CreateBankAccount {
        account_no: String,
        account_name: String,
        balance: u64,
        account_secret: String,
    },
    #[serde(rename_all = "camelCase")]
    AddMoney {
        account_no: String,
        amount: u64,
        account_secret: String,
    },
    #[serde(rename_all = "camelCase")]
    GetAccountInfo { account_no: String },
    GetBankAccounts,
    #[serde(rename_all = "camelCase")]
    CreateProduct {
        name: String,
        price: u64,
        description: String,
        image_ref: String,
    },
    GetProducts,
    #[serde(rename_all = "camelCase")]
    AddToCart { product: String, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    CreateOrder { account_no: String },
    #[serde(rename_all = "camelCase")]
    Pay {
        account_no: String,
        account_secret: String,
        #[serde(default)]
        order_id: Option<OrderId>,
    },
    #[serde(rename_all = "camelCase")]
    AbandonOrder {
        #[serde(default)]
        order_id: Option<OrderId>,
    },
    #[serde(rename_all = "camelCase")]
    GetOrderHistory { account_no: String },
    GetTransactionHistory,
    #[serde(rename_all = "camelCase")]
    ApproveOrderRequest {
        #[serde(default)]
        order_id: Option<OrderId>,
        #[serde(default)]
        role: Option<Role>,
    },
    #[serde(rename_all = "camelCase")]
    ApproveDeliveryRequest {
        #[serde(default)]
        order_id: Option<OrderId>,
        #[serde(default)]
        role: Option<Role>,
    },
    #[serde(rename_all = "camelCase")]
    ApproveSupplyRequest {
        #[serde(default)]
        order_id: Option<OrderId>,
        #[serde(default)]
        role: Option<Role>,
    },
    #[serde(rename_all = "camelCase")]
    ApproveTransactionRequest {
        #[serde(default)]
        transaction_id: Option<TransactionId>,
        #[serde(default)]
        role: Option<Role>,
    },
}

/// Wire envelope: every workflow call resolves to `{"ok": ...}` or
/// `{"error": {"kind": ...}}`; no error silently succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseEnvelope {
    Ok(ResponsePayload),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&WorkflowError> for ErrorBody {
    fn from(err: &WorkflowError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    OrderCreated(OrderCreated),
    Payment(PaymentReceipt),
    Account(AccountRef),
    AccountInfo(AccountInfo),
    Accounts(Vec<AccountInfo>),
    Product(ProductView),
    Products(Vec<ProductView>),
    Cart(CartView),
    Order(OrderView),
    Orders(Vec<OrderView>),
    Transaction(TransactionView),
    Transactions(Vec<TransactionView>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub amount: u64,
    pub status: OrderStatus,
}

impl From<&Order> for OrderCreated {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            amount: order.amount.value(),
            status: order.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
}

impl From<&Transaction> for PaymentReceipt {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.id,
            status: tx.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account_name: String,
    pub account_no: String,
    pub balance: u64,
}

impl From<&BankAccount> for AccountInfo {
    fn from(account: &BankAccount) -> Self {
        Self {
            account_name: account.account_name.clone(),
            account_no: account.account_no.to_string(),
            balance: account.balance.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub description: String,
    pub image_ref: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.value(),
            description: product.description.clone(),
            image_ref: product.image_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub amount: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let mut lines: Vec<_> = cart
            .lines()
            .map(|(product_id, line)| CartLineView {
                product_id: *product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.value(),
            })
            .collect();
        lines.sort_by_key(|line| line.product_id.to_string());
        Self {
            lines,
            amount: cart.amount(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub amount: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            amount: order.amount.value(),
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: TransactionId,
    pub order_id: Option<OrderId>,
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub at: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            order_id: tx.order_id,
            from: tx.from.to_string(),
            to: tx.to.to_string(),
            amount: tx.amount.value(),
            at: tx.at,
            status: tx.status,
        }
    }
}
