use super::account::{AccountNo, Amount, BankAccount};
use super::order::{Order, OrderId};
use super::product::{Product, ProductId};
use super::request::{ApprovalRequest, RequestId, RequestKind, RequestTarget};
use super::transaction::{Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;

/// The authoritative store of account balances and the only component
/// permitted to mutate them. `credit` and `transfer` are the sole balance
/// mutations in the crate; `transfer` debits and credits under a single
/// exclusion scope, so both mutations happen or neither does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Rejects a duplicate account number.
    async fn create(&self, account: BankAccount) -> Result<()>;
    async fn get(&self, account_no: &AccountNo) -> Result<Option<BankAccount>>;
    async fn get_all(&self) -> Result<Vec<BankAccount>>;
    /// Adds funds to one account, returning its updated state.
    async fn credit(&self, account_no: &AccountNo, amount: Amount) -> Result<BankAccount>;
    /// Atomic debit+credit. Fails without any mutation when the payer cannot
    /// cover the amount or either account is unknown.
    async fn transfer(&self, from: &AccountNo, to: &AccountNo, amount: Amount) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;
    async fn for_customer(&self, account_no: &AccountNo) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn store(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, tx_id: TransactionId) -> Result<Option<Transaction>>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn store(&self, request: ApprovalRequest) -> Result<()>;
    async fn get(&self, request_id: RequestId) -> Result<Option<ApprovalRequest>>;
    async fn find_by_target(
        &self,
        kind: RequestKind,
        target: RequestTarget,
    ) -> Result<Option<ApprovalRequest>>;
    /// The queue listing: requests of the kind still awaiting sign-off.
    async fn pending(&self, kind: RequestKind) -> Result<Vec<ApprovalRequest>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn store(&self, product: Product) -> Result<()>;
    async fn get(&self, product_id: ProductId) -> Result<Option<Product>>;
    async fn get_all(&self) -> Result<Vec<Product>>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type RequestStoreBox = Box<dyn RequestStore>;
pub type ProductStoreBox = Box<dyn ProductStore>;
