use super::dto::{
    AccountRef, CartView, ErrorBody, OrderCreated, PaymentReceipt, ResponseEnvelope,
    ResponsePayload, WorkflowRequest,
};
use crate::application::engine::WorkflowEngine;
use crate::domain::account::AccountNo;
use crate::domain::cart::Cart;
use crate::domain::order::OrderId;
use crate::domain::role::{Actor, Role};
use crate::domain::transaction::TransactionId;
use crate::error::{Result, WorkflowError};

/// Replays a script of workflow requests against the engine.
///
/// The runner plays every role of a recorded multi-role session: it keeps the
/// customer's cart between calls and remembers the ids the engine generated,
/// so a script can say "pay" or "approve" without knowing them up front. The
/// engine still enforces every capability check; scripts override the acting
/// role precisely to demonstrate that.
pub struct ScriptRunner {
    engine: WorkflowEngine,
    cart: Cart,
    last_order: Option<OrderId>,
    last_transaction: Option<TransactionId>,
}

impl ScriptRunner {
    pub fn new(engine: WorkflowEngine) -> Self {
        Self {
            engine,
            cart: Cart::new(),
            last_order: None,
            last_transaction: None,
        }
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// Applies one request, mapping the typed result onto the wire envelope.
    pub async fn apply(&mut self, request: WorkflowRequest) -> ResponseEnvelope {
        match self.dispatch(request).await {
            Ok(payload) => ResponseEnvelope::Ok(payload),
            Err(err) => ResponseEnvelope::Error(ErrorBody::from(&err)),
        }
    }

    async fn dispatch(&mut self, request: WorkflowRequest) -> Result<ResponsePayload> {
        match request {
            WorkflowRequest::CreateBankAccount {
                account_no,
                account_name,
                balance,
                account_secret,
            } => {
                let account = self
                    .engine
                    .create_account(&account_no, &account_name, balance, &account_secret)
                    .await?;
                Ok(ResponsePayload::Account(AccountRef {
                    account_id: account.account_no.to_string(),
                }))
            }
            WorkflowRequest::AddMoney {
                account_no,
                amount,
                account_secret,
            } => {
                let account_no = AccountNo::new(account_no)?;
                let tx = self
                    .engine
                    .add_money(&account_no, amount, &account_secret)
                    .await?;
                self.last_transaction = Some(tx.id);
                Ok(ResponsePayload::Account(AccountRef {
                    account_id: account_no.to_string(),
                }))
            }
            WorkflowRequest::GetAccountInfo { account_no } => {
                let account_no = AccountNo::new(account_no)?;
                let account = self.engine.account_info(&account_no).await?;
                Ok(ResponsePayload::AccountInfo((&account).into()))
            }
            WorkflowRequest::GetBankAccounts => {
                let accounts = self.engine.accounts(&actor(None, Role::Bank)).await?;
                Ok(ResponsePayload::Accounts(
                    accounts.iter().map(Into::into).collect(),
                ))
            }
            WorkflowRequest::CreateProduct {
                name,
                price,
                description,
                image_ref,
            } => {
                let product = self
                    .engine
                    .create_product(
                        &actor(None, Role::Supplier),
                        &name,
                        price,
                        &description,
                        &image_ref,
                    )
                    .await?;
                Ok(ResponsePayload::Product((&product).into()))
            }
            WorkflowRequest::GetProducts => {
                let products = self.engine.get_products().await?;
                Ok(ResponsePayload::Products(
                    products.iter().map(Into::into).collect(),
                ))
            }
            WorkflowRequest::AddToCart { product, quantity } => {
                let products = self.engine.get_products().await?;
                let product = products
                    .iter()
                    .find(|candidate| candidate.name == product)
                    .ok_or_else(|| WorkflowError::NotFound(format!("product {product}")))?;
                self.cart.adjust_quantity(product, quantity);
                Ok(ResponsePayload::Cart(CartView::from(&self.cart)))
            }
            WorkflowRequest::CreateOrder { account_no } => {
                let account_no = AccountNo::new(account_no)?;
                let order = self.engine.checkout(&mut self.cart, &account_no).await?;
                self.last_order = Some(order.id);
                Ok(ResponsePayload::OrderCreated(OrderCreated::from(&order)))
            }
            WorkflowRequest::Pay {
                account_no,
                account_secret,
                order_id,
            } => {
                let account_no = AccountNo::new(account_no)?;
                let order_id = self.order_ref(order_id)?;
                let tx = self.engine.pay(order_id, &account_no, &account_secret).await?;
                self.last_transaction = Some(tx.id);
                Ok(ResponsePayload::Payment(PaymentReceipt::from(&tx)))
            }
            WorkflowRequest::AbandonOrder { order_id } => {
                let order_id = self.order_ref(order_id)?;
                let order = self.engine.abandon(order_id).await?;
                Ok(ResponsePayload::Order((&order).into()))
            }
            WorkflowRequest::GetOrderHistory { account_no } => {
                let account_no = AccountNo::new(account_no)?;
                let orders = self.engine.orders_for(&account_no).await?;
                Ok(ResponsePayload::Orders(
                    orders.iter().map(Into::into).collect(),
                ))
            }
            WorkflowRequest::GetTransactionHistory => {
                let transactions = self
                    .engine
                    .transaction_history(&actor(None, Role::Bank))
                    .await?;
                Ok(ResponsePayload::Transactions(
                    transactions.iter().map(Into::into).collect(),
                ))
            }
            WorkflowRequest::ApproveOrderRequest { order_id, role } => {
                let order_id = self.order_ref(order_id)?;
                let order = self
                    .engine
                    .approve_order_request(&actor(role, Role::Ecommerce), order_id)
                    .await?;
                Ok(ResponsePayload::Order((&order).into()))
            }
            WorkflowRequest::ApproveDeliveryRequest { order_id, role } => {
                let order_id = self.order_ref(order_id)?;
                let order = self
                    .engine
                    .approve_delivery_request(&actor(role, Role::Ecommerce), order_id)
                    .await?;
                Ok(ResponsePayload::Order((&order).into()))
            }
            WorkflowRequest::ApproveSupplyRequest { order_id, role } => {
                let order_id = self.order_ref(order_id)?;
                let order = self
                    .engine
                    .approve_supply_request(&actor(role, Role::Supplier), order_id)
                    .await?;
                Ok(ResponsePayload::Order((&order).into()))
            }
            WorkflowRequest::ApproveTransactionRequest {
                transaction_id,
                role,
            } => {
                let transaction_id = self.transaction_ref(transaction_id)?;
                let tx = self
                    .engine
                    .approve_transaction_request(&actor(role, Role::Bank), transaction_id)
                    .await?;
                Ok(ResponsePayload::Transaction((&tx).into()))
            }
        }
    }

    fn order_ref(&self, explicit: Option<OrderId>) -> Result<OrderId> {
        explicit
            .or(self.last_order)
            .ok_or_else(|| WorkflowError::NotFound("order reference".to_string()))
    }

    fn transaction_ref(&self, explicit: Option<TransactionId>) -> Result<TransactionId> {
        explicit
            .or(self.last_transaction)
            .ok_or_else(|| WorkflowError::NotFound("transaction reference".to_string()))
    }
}

fn actor(role_override: Option<Role>, natural: Role) -> Actor {
    Actor::new("replay", role_override.unwrap_or(natural))
}
