use crate::domain::account::{AccountNo, Amount, BankAccount};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{LedgerStore, OrderStore, ProductStore, RequestStore, TransactionStore};
use crate::domain::product::{Product, ProductId};
use crate::domain::request::{ApprovalRequest, RequestId, RequestKind, RequestTarget};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::{Result, WorkflowError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;

/// Column Family for bank accounts, keyed by account number.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for orders, keyed by generated id.
pub const CF_ORDERS: &str = "orders";
/// Column Family for transactions, keyed by generated id.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for approval requests, keyed by generated id.
pub const CF_REQUESTS: &str = "requests";
/// Column Family for products, keyed by generated id.
pub const CF_PRODUCTS: &str = "products";

/// A persistent store implementation using RocksDB.
///
/// One column family per entity collection, JSON-encoded values. The struct
/// is thread-safe (`Clone` shares the underlying `Arc<DB>`), and a transfer
/// is committed as a single `WriteBatch` so both balance mutations land or
/// neither does.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// that all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [
            CF_ACCOUNTS,
            CF_ORDERS,
            CF_TRANSACTIONS,
            CF_REQUESTS,
            CF_PRODUCTS,
        ]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
        .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| WorkflowError::Storage(format!("column family {name} not found")))
    }

    fn put<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        self.db.put_cf(cf, key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(serde_json::from_slice(&value)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl LedgerStore for RocksDbStore {
    async fn create(&self, account: BankAccount) -> Result<()> {
        let key = account.account_no.as_str().as_bytes().to_vec();
        if self
            .fetch::<BankAccount>(CF_ACCOUNTS, &key)?
            .is_some()
        {
            return Err(WorkflowError::DuplicateAccount(account.account_no.clone()));
        }
        self.put(CF_ACCOUNTS, &key, &account)
    }

    async fn get(&self, account_no: &AccountNo) -> Result<Option<BankAccount>> {
        self.fetch(CF_ACCOUNTS, account_no.as_str().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<BankAccount>> {
        let mut accounts: Vec<BankAccount> = self.scan(CF_ACCOUNTS)?;
        accounts.sort_by(|a, b| a.account_no.cmp(&b.account_no));
        Ok(accounts)
    }

    async fn credit(&self, account_no: &AccountNo, amount: Amount) -> Result<BankAccount> {
        let key = account_no.as_str().as_bytes().to_vec();
        let mut account: BankAccount = self
            .fetch(CF_ACCOUNTS, &key)?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {account_no}")))?;
        account.credit(amount);
        self.put(CF_ACCOUNTS, &key, &account)?;
        Ok(account)
    }

    async fn transfer(&self, from: &AccountNo, to: &AccountNo, amount: Amount) -> Result<()> {
        let from_key = from.as_str().as_bytes().to_vec();
        let to_key = to.as_str().as_bytes().to_vec();

        let mut payer: BankAccount = self
            .fetch(CF_ACCOUNTS, &from_key)?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {from}")))?;
        let mut payee: BankAccount = self
            .fetch(CF_ACCOUNTS, &to_key)?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {to}")))?;

        payer.debit(amount)?;
        payee.credit(amount);

        // Both puts land in one batch; a transfer can never be half-applied.
        let cf = self.cf(CF_ACCOUNTS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(cf, &from_key, serde_json::to_vec(&payer)?);
        batch.put_cf(cf, &to_key, serde_json::to_vec(&payee)?);
        self.db.write(batch)?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for RocksDbStore {
    async fn store(&self, order: Order) -> Result<()> {
        self.put(CF_ORDERS, order.id.to_string().as_bytes(), &order)
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        self.fetch(CF_ORDERS, order_id.to_string().as_bytes())
    }

    async fn for_customer(&self, account_no: &AccountNo) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.scan(CF_ORDERS)?;
        orders.retain(|order| &order.customer == account_no);
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }
}

#[async_trait]
impl TransactionStore for RocksDbStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        self.put(CF_TRANSACTIONS, tx.id.to_string().as_bytes(), &tx)
    }

    async fn get(&self, tx_id: TransactionId) -> Result<Option<Transaction>> {
        self.fetch(CF_TRANSACTIONS, tx_id.to_string().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self.scan(CF_TRANSACTIONS)?;
        transactions.sort_by_key(|tx| tx.at);
        Ok(transactions)
    }
}

#[async_trait]
impl RequestStore for RocksDbStore {
    async fn store(&self, request: ApprovalRequest) -> Result<()> {
        self.put(CF_REQUESTS, request.id.to_string().as_bytes(), &request)
    }

    async fn get(&self, request_id: RequestId) -> Result<Option<ApprovalRequest>> {
        self.fetch(CF_REQUESTS, request_id.to_string().as_bytes())
    }

    async fn find_by_target(
        &self,
        kind: RequestKind,
        target: RequestTarget,
    ) -> Result<Option<ApprovalRequest>> {
        let requests: Vec<ApprovalRequest> = self.scan(CF_REQUESTS)?;
        Ok(requests
            .into_iter()
            .find(|request| request.kind == kind && request.target == target))
    }

    async fn pending(&self, kind: RequestKind) -> Result<Vec<ApprovalRequest>> {
        let mut requests: Vec<ApprovalRequest> = self.scan(CF_REQUESTS)?;
        requests.retain(|request| request.kind == kind && request.is_pending());
        requests.sort_by_key(|request| request.requested_at);
        Ok(requests)
    }
}

#[async_trait]
impl ProductStore for RocksDbStore {
    async fn store(&self, product: Product) -> Result<()> {
        self.put(CF_PRODUCTS, product.id.to_string().as_bytes(), &product)
    }

    async fn get(&self, product_id: ProductId) -> Result<Option<Product>> {
        self.fetch(CF_PRODUCTS, product_id.to_string().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.scan(CF_PRODUCTS)?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}
