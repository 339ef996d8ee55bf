use crate::domain::account::{AccountNo, Amount, BankAccount};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{LedgerStore, OrderStore, ProductStore, RequestStore, TransactionStore};
use crate::domain::product::{Product, ProductId};
use crate::domain::request::{ApprovalRequest, RequestId, RequestKind, RequestTarget};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::{Result, WorkflowError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger.
///
/// One `RwLock` guards the whole account map, which is what makes `transfer`
/// atomic: debit and credit happen under a single write guard, so no caller
/// can observe an intermediate state.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    accounts: Arc<RwLock<HashMap<AccountNo, BankAccount>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create(&self, account: BankAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.account_no) {
            return Err(WorkflowError::DuplicateAccount(account.account_no.clone()));
        }
        accounts.insert(account.account_no.clone(), account);
        Ok(())
    }

    async fn get(&self, account_no: &AccountNo) -> Result<Option<BankAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(account_no).cloned())
    }

    async fn get_all(&self) -> Result<Vec<BankAccount>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<_> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.account_no.cmp(&b.account_no));
        Ok(all)
    }

    async fn credit(&self, account_no: &AccountNo, amount: Amount) -> Result<BankAccount> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(account_no)
            .ok_or_else(|| WorkflowError::NotFound(format!("account {account_no}")))?;
        account.credit(amount);
        Ok(account.clone())
    }

    async fn transfer(&self, from: &AccountNo, to: &AccountNo, amount: Amount) -> Result<()> {
        let mut accounts = self.accounts.write().await;

        // Validate both sides before touching either balance; everything
        // below runs under the same write guard.
        let payer = accounts
            .get(from)
            .ok_or_else(|| WorkflowError::NotFound(format!("account {from}")))?;
        if payer.balance.value() < amount.value() {
            return Err(WorkflowError::InsufficientFunds {
                balance: payer.balance,
                needed: amount,
            });
        }
        if !accounts.contains_key(to) {
            return Err(WorkflowError::NotFound(format!("account {to}")));
        }

        accounts
            .get_mut(from)
            .ok_or_else(|| WorkflowError::NotFound(format!("account {from}")))?
            .debit(amount)?;
        accounts
            .get_mut(to)
            .ok_or_else(|| WorkflowError::NotFound(format!("account {to}")))?
            .credit(amount);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn for_customer(&self, account_no: &AccountNo) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<_> = orders
            .values()
            .filter(|order| &order.customer == account_no)
            .cloned()
            .collect();
        matching.sort_by_key(|order| order.created_at);
        Ok(matching)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn get(&self, tx_id: TransactionId) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&tx_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<_> = transactions.values().cloned().collect();
        all.sort_by_key(|tx| tx.at);
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<RequestId, ApprovalRequest>>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn store(&self, request: ApprovalRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request);
        Ok(())
    }

    async fn get(&self, request_id: RequestId) -> Result<Option<ApprovalRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&request_id).cloned())
    }

    async fn find_by_target(
        &self,
        kind: RequestKind,
        target: RequestTarget,
    ) -> Result<Option<ApprovalRequest>> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .find(|request| request.kind == kind && request.target == target)
            .cloned())
    }

    async fn pending(&self, kind: RequestKind) -> Result<Vec<ApprovalRequest>> {
        let requests = self.requests.read().await;
        let mut matching: Vec<_> = requests
            .values()
            .filter(|request| request.kind == kind && request.is_pending())
            .cloned()
            .collect();
        matching.sort_by_key(|request| request.requested_at);
        Ok(matching)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn store(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id, product);
        Ok(())
    }

    async fn get(&self, product_id: ProductId) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&product_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut all: Vec<_> = products.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}
