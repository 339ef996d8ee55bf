use crate::domain::account::{AccountNo, Amount, BankAccount, Balance};
use crate::domain::cart::Cart;
use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::ports::{
    LedgerStoreBox, OrderStoreBox, ProductStoreBox, RequestStoreBox, TransactionStoreBox,
};
use crate::domain::product::Product;
use crate::domain::request::{
    ApprovalRequest, RequestId, RequestKind, RequestTarget,
};
use crate::domain::role::Actor;
use crate::domain::transaction::{Transaction, TransactionId, TransactionStatus};
use crate::error::{Result, WorkflowError};
use tracing::{debug, info};
use uuid::Uuid;

/// The entity an approval advanced: the order for the order/delivery/supply
/// queues, the transaction for the settlement queue.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Order(Order),
    Transaction(Transaction),
}

/// The main entry point of the workflow core.
///
/// `WorkflowEngine` owns the storage ports and composes them into the
/// checkout, payment and approval operations. Each operation awaits its store
/// calls in sequence, so one actor's calls never overlap; the ledger port is
/// the only place balances change.
pub struct WorkflowEngine {
    ledger: LedgerStoreBox,
    orders: OrderStoreBox,
    transactions: TransactionStoreBox,
    requests: RequestStoreBox,
    products: ProductStoreBox,
    platform_account: AccountNo,
}

impl WorkflowEngine {
    pub fn new(
        ledger: LedgerStoreBox,
        orders: OrderStoreBox,
        transactions: TransactionStoreBox,
        requests: RequestStoreBox,
        products: ProductStoreBox,
        platform_account: AccountNo,
    ) -> Self {
        Self {
            ledger,
            orders,
            transactions,
            requests,
            products,
            platform_account,
        }
    }

    /// The account credited by every order payment.
    pub fn platform_account(&self) -> &AccountNo {
        &self.platform_account
    }

    /// Opens the platform account if it does not exist yet, with a throwaway
    /// secret: the platform only ever receives funds in these flows.
    pub async fn ensure_platform_account(&self, account_name: &str) -> Result<()> {
        if self.ledger.get(&self.platform_account).await?.is_none() {
            let secret = Uuid::new_v4().to_string();
            let account = BankAccount::open(
                self.platform_account.clone(),
                account_name,
                Balance::ZERO,
                &secret,
            )?;
            self.ledger.create(account).await?;
            info!(account_no = %self.platform_account, "platform account opened");
        }
        Ok(())
    }

    /// Converts the cart into a `Pending` order. The cart is cleared only
    /// after the order has been stored, so a failed checkout loses nothing.
    pub async fn checkout(&self, cart: &mut Cart, customer: &AccountNo) -> Result<Order> {
        let order = Order::checkout(cart, customer.clone())?;
        self.orders.store(order.clone()).await?;
        cart.clear();
        info!(order_id = %order.id, amount = %order.amount, "order created");
        Ok(order)
    }

    /// Executes the payment for an order.
    ///
    /// The debit of the payer and the credit of the platform account happen
    /// as one atomic ledger transfer; on any failure before or inside the
    /// transfer no balance changes and the order stays `Pending`. Success
    /// records the completed transaction, marks the order `Paid` and enqueues
    /// the E-commerce order request plus the Bank settlement request.
    pub async fn pay(
        &self,
        order_id: OrderId,
        payer: &AccountNo,
        secret: &str,
    ) -> Result<Transaction> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;
        if order.status != OrderStatus::Pending {
            return Err(WorkflowError::OrderAlreadyPaid(order_id));
        }

        let account = self
            .ledger
            .get(payer)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {payer}")))?;
        if !account.verify_secret(secret) {
            return Err(WorkflowError::Authentication);
        }
        if account.balance.value() < order.amount.value() {
            return Err(WorkflowError::InsufficientFunds {
                balance: account.balance,
                needed: order.amount,
            });
        }

        self.ledger
            .transfer(payer, &self.platform_account, order.amount)
            .await?;

        let tx = Transaction::payment(&order, payer.clone(), self.platform_account.clone());
        self.transactions.store(tx.clone()).await?;

        let order = self.mark_status(order.id, OrderStatus::Paid).await?;

        self.requests
            .store(ApprovalRequest::new(
                RequestKind::Order,
                RequestTarget::Order(order.id),
            ))
            .await?;
        self.requests
            .store(ApprovalRequest::new(
                RequestKind::Transaction,
                RequestTarget::Transaction(tx.id),
            ))
            .await?;

        info!(order_id = %order.id, transaction_id = %tx.id, amount = %tx.amount, "payment completed");
        Ok(tx)
    }

    /// Explicitly gives up on an unpaid order. This is a distinct caller
    /// action, never an automatic reaction to a failed payment.
    pub async fn abandon(&self, order_id: OrderId) -> Result<Order> {
        let order = self.mark_status(order_id, OrderStatus::Failed).await?;
        info!(order_id = %order.id, "order abandoned");
        Ok(order)
    }

    /// Compare-and-set lifecycle transition for an order: only the expected
    /// predecessor status may advance, so an out-of-order or repeated
    /// transition fails with `InvalidTransition`.
    pub async fn mark_status(&self, order_id: OrderId, to: OrderStatus) -> Result<Order> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(order_id))?;
        order.advance(to)?;
        self.orders.store(order.clone()).await?;
        Ok(order)
    }

    pub async fn create_account(
        &self,
        account_no: &str,
        account_name: &str,
        balance: u64,
        secret: &str,
    ) -> Result<BankAccount> {
        let account_no = AccountNo::new(account_no)?;
        let account = BankAccount::open(account_no, account_name, Balance::new(balance), secret)?;
        self.ledger.create(account.clone()).await?;
        info!(account_no = %account.account_no, "bank account created");
        Ok(account)
    }

    /// Requests a top-up of the account. The transaction is recorded
    /// `Pending` and queued for the Bank; the balance changes only when the
    /// Bank approves, through the same credit primitive every balance change
    /// uses.
    pub async fn add_money(
        &self,
        account_no: &AccountNo,
        amount: u64,
        secret: &str,
    ) -> Result<Transaction> {
        let amount = Amount::new(amount)?;
        let account = self
            .ledger
            .get(account_no)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {account_no}")))?;
        if !account.verify_secret(secret) {
            return Err(WorkflowError::Authentication);
        }

        let tx = Transaction::top_up(account_no.clone(), amount);
        self.transactions.store(tx.clone()).await?;
        self.requests
            .store(ApprovalRequest::new(
                RequestKind::Transaction,
                RequestTarget::Transaction(tx.id),
            ))
            .await?;
        info!(account_no = %account_no, transaction_id = %tx.id, "top-up requested");
        Ok(tx)
    }

    pub async fn account_info(&self, account_no: &AccountNo) -> Result<BankAccount> {
        self.ledger
            .get(account_no)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("account {account_no}")))
    }

    /// All accounts, for the Bank's listing.
    pub async fn accounts(&self, actor: &Actor) -> Result<Vec<BankAccount>> {
        self.authorize_audit(actor)?;
        self.ledger.get_all().await
    }

    /// All transactions, for the Bank's history view.
    pub async fn transaction_history(&self, actor: &Actor) -> Result<Vec<Transaction>> {
        self.authorize_audit(actor)?;
        self.transactions.get_all().await
    }

    /// The customer's order history, oldest first.
    pub async fn orders_for(&self, account_no: &AccountNo) -> Result<Vec<Order>> {
        self.orders.for_customer(account_no).await
    }

    pub async fn create_product(
        &self,
        actor: &Actor,
        name: &str,
        price: u64,
        description: &str,
        image_ref: &str,
    ) -> Result<Product> {
        if !actor.role.may_manage_products() {
            return Err(WorkflowError::Authorization {
                role: actor.role,
                action: "create products".to_string(),
            });
        }
        let product = Product::new(name, Amount::new(price)?, description, image_ref);
        self.products.store(product.clone()).await?;
        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn get_products(&self) -> Result<Vec<Product>> {
        self.products.get_all().await
    }

    /// The role's queue: requests of the kind still awaiting sign-off.
    pub async fn pending_requests(
        &self,
        actor: &Actor,
        kind: RequestKind,
    ) -> Result<Vec<ApprovalRequest>> {
        self.authorize_approval(actor, kind)?;
        self.requests.pending(kind).await
    }

    /// Approves a request and advances the tied entity.
    ///
    /// Listing and approval are not transactionally linked, so this must not
    /// assume exclusivity: a request someone else approved first reports
    /// `AlreadyApproved` without re-running any side effect, and callers
    /// re-fetch the queue afterwards instead of splicing locally.
    pub async fn approve(&self, actor: &Actor, request_id: RequestId) -> Result<ApprovalOutcome> {
        let mut request = self
            .requests
            .get(request_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("request {request_id}")))?;
        self.authorize_approval(actor, request.kind)?;

        request.approve()?;
        self.requests.store(request.clone()).await?;
        debug!(request_id = %request.id, kind = %request.kind, "request approved");

        let outcome = match (request.kind, request.target) {
            (RequestKind::Order, RequestTarget::Order(order_id)) => {
                let order = self
                    .mark_status(order_id, OrderStatus::AwaitingDelivery)
                    .await?;

                // The accepted order fans out to the delivery queue and the
                // supplier's restock queue.
                self.requests
                    .store(ApprovalRequest::new(
                        RequestKind::Delivery,
                        RequestTarget::Order(order_id),
                    ))
                    .await?;
                self.requests
                    .store(ApprovalRequest::new(
                        RequestKind::Supply,
                        RequestTarget::Order(order_id),
                    ))
                    .await?;
                ApprovalOutcome::Order(order)
            }
            (RequestKind::Delivery, RequestTarget::Order(order_id)) => {
                let order = self.mark_status(order_id, OrderStatus::Delivered).await?;
                ApprovalOutcome::Order(order)
            }
            (RequestKind::Supply, RequestTarget::Order(order_id)) => {
                // Restock fulfillment acknowledged; the order advances on the
                // delivery side, not here.
                let order = self
                    .orders
                    .get(order_id)
                    .await?
                    .ok_or(WorkflowError::OrderNotFound(order_id))?;
                ApprovalOutcome::Order(order)
            }
            (RequestKind::Transaction, RequestTarget::Transaction(tx_id)) => {
                let mut tx = self
                    .transactions
                    .get(tx_id)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(format!("transaction {tx_id}")))?;
                if tx.status == TransactionStatus::Pending {
                    match self.ledger.credit(&tx.to, tx.amount).await {
                        Ok(_) => {
                            tx.advance(TransactionStatus::Completed)?;
                            self.transactions.store(tx.clone()).await?;
                        }
                        Err(err @ WorkflowError::NotFound(_)) => {
                            tx.advance(TransactionStatus::Rejected)?;
                            self.transactions.store(tx.clone()).await?;
                            return Err(err);
                        }
                        Err(err) => return Err(err),
                    }
                }
                ApprovalOutcome::Transaction(tx)
            }
            (kind, _) => {
                return Err(WorkflowError::Storage(format!(
                    "request {request_id} of kind {kind} has a mismatched target"
                )));
            }
        };

        info!(request_id = %request.id, kind = %request.kind, "approval applied");
        Ok(outcome)
    }

    pub async fn approve_order_request(&self, actor: &Actor, order_id: OrderId) -> Result<Order> {
        let request = self
            .request_for(RequestKind::Order, RequestTarget::Order(order_id))
            .await?;
        self.approve_order_outcome(actor, request.id).await
    }

    pub async fn approve_delivery_request(
        &self,
        actor: &Actor,
        order_id: OrderId,
    ) -> Result<Order> {
        let request = self
            .request_for(RequestKind::Delivery, RequestTarget::Order(order_id))
            .await?;
        self.approve_order_outcome(actor, request.id).await
    }

    pub async fn approve_supply_request(&self, actor: &Actor, order_id: OrderId) -> Result<Order> {
        let request = self
            .request_for(RequestKind::Supply, RequestTarget::Order(order_id))
            .await?;
        self.approve_order_outcome(actor, request.id).await
    }

    pub async fn approve_transaction_request(
        &self,
        actor: &Actor,
        transaction_id: TransactionId,
    ) -> Result<Transaction> {
        let request = self
            .request_for(
                RequestKind::Transaction,
                RequestTarget::Transaction(transaction_id),
            )
            .await?;
        match self.approve(actor, request.id).await? {
            ApprovalOutcome::Transaction(tx) => Ok(tx),
            ApprovalOutcome::Order(_) => Err(WorkflowError::Storage(
                "transaction approval yielded an order outcome".to_string(),
            )),
        }
    }

    async fn approve_order_outcome(&self, actor: &Actor, request_id: RequestId) -> Result<Order> {
        match self.approve(actor, request_id).await? {
            ApprovalOutcome::Order(order) => Ok(order),
            ApprovalOutcome::Transaction(_) => Err(WorkflowError::Storage(
                "order approval yielded a transaction outcome".to_string(),
            )),
        }
    }

    async fn request_for(
        &self,
        kind: RequestKind,
        target: RequestTarget,
    ) -> Result<ApprovalRequest> {
        self.requests
            .find_by_target(kind, target)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("{kind} request for {target}")))
    }

    fn authorize_approval(&self, actor: &Actor, kind: RequestKind) -> Result<()> {
        if actor.role.may_approve(kind) {
            Ok(())
        } else {
            Err(WorkflowError::Authorization {
                role: actor.role,
                action: format!("approve {kind} requests"),
            })
        }
    }

    fn authorize_audit(&self, actor: &Actor) -> Result<()> {
        if actor.role.may_audit_ledger() {
            Ok(())
        } else {
            Err(WorkflowError::Authorization {
                role: actor.role,
                action: "audit the ledger".to_string(),
            })
        }
    }
}
