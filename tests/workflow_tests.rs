use shopflow::application::engine::WorkflowEngine;
use shopflow::domain::account::AccountNo;
use shopflow::domain::cart::Cart;
use shopflow::domain::order::{Order, OrderStatus};
use shopflow::domain::role::{Actor, Role};
use shopflow::domain::transaction::TransactionStatus;
use shopflow::error::WorkflowError;
use shopflow::infrastructure::in_memory::{
    InMemoryLedgerStore, InMemoryOrderStore, InMemoryProductStore, InMemoryRequestStore,
    InMemoryTransactionStore,
};
use std::sync::Arc;

const CUSTOMER_NO: &str = "111122223333";
const PLATFORM_NO: &str = "999999999999";
const SECRET: &str = "hunter2!";

async fn engine_with_customer(balance: u64) -> (WorkflowEngine, AccountNo) {
    let engine = WorkflowEngine::new(
        Box::new(InMemoryLedgerStore::new()),
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemoryTransactionStore::new()),
        Box::new(InMemoryRequestStore::new()),
        Box::new(InMemoryProductStore::new()),
        AccountNo::new(PLATFORM_NO).unwrap(),
    );
    engine.ensure_platform_account("Platform").await.unwrap();
    let account = engine
        .create_account(CUSTOMER_NO, "Alice", balance, SECRET)
        .await
        .unwrap();
    (engine, account.account_no)
}

async fn paid_order(engine: &WorkflowEngine, customer: &AccountNo, price: u64) -> Order {
    let product = engine
        .create_product(&Actor::new("depot", Role::Supplier), "Widget", price, "", "w.png")
        .await
        .unwrap();
    let mut cart = Cart::new();
    cart.adjust_quantity(&product, 1);
    let order = engine.checkout(&mut cart, customer).await.unwrap();
    engine.pay(order.id, customer, SECRET).await.unwrap();
    order
}

async fn total_funds(engine: &WorkflowEngine) -> u64 {
    engine
        .accounts(&Actor::new("bank", Role::Bank))
        .await
        .unwrap()
        .iter()
        .map(|account| account.balance.value())
        .sum()
}

#[tokio::test]
async fn test_conservation_of_funds_across_payments() {
    let (engine, customer) = engine_with_customer(10_000).await;
    let before = total_funds(&engine).await;

    paid_order(&engine, &customer, 2000).await;
    paid_order(&engine, &customer, 3500).await;
    assert_eq!(total_funds(&engine).await, before);

    let customer_balance = engine
        .account_info(&customer)
        .await
        .unwrap()
        .balance
        .value();
    assert_eq!(customer_balance, 4500);
    let platform_balance = engine
        .account_info(engine.platform_account())
        .await
        .unwrap()
        .balance
        .value();
    assert_eq!(platform_balance, 5500);
}

#[tokio::test]
async fn test_failed_payment_conserves_funds() {
    let (engine, customer) = engine_with_customer(1500).await;
    let before = total_funds(&engine).await;

    let product = engine
        .create_product(&Actor::new("depot", Role::Supplier), "Widget", 2000, "", "w.png")
        .await
        .unwrap();
    let mut cart = Cart::new();
    cart.adjust_quantity(&product, 1);
    let order = engine.checkout(&mut cart, &customer).await.unwrap();

    let result = engine.pay(order.id, &customer, SECRET).await;
    assert!(matches!(
        result,
        Err(WorkflowError::InsufficientFunds { .. })
    ));
    assert_eq!(total_funds(&engine).await, before);
}

#[tokio::test]
async fn test_racing_delivery_approvals_apply_once() {
    let (engine, customer) = engine_with_customer(5000).await;
    let order = paid_order(&engine, &customer, 2000).await;
    let ecommerce = Actor::new("shop", Role::Ecommerce);
    engine
        .approve_order_request(&ecommerce, order.id)
        .await
        .unwrap();

    // Two actors race the same queue entry; the loser sees the approved
    // terminal state instead of re-running the transition.
    let engine = Arc::new(engine);
    let first = engine.approve_delivery_request(&ecommerce, order.id);
    let second = engine.approve_delivery_request(&ecommerce, order.id);
    let (first, second) = tokio::join!(first, second);

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(WorkflowError::AlreadyApproved(_))
    )));

    let history = engine.orders_for(&customer).await.unwrap();
    assert_eq!(history[0].status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_order_history_keeps_every_order() {
    let (engine, customer) = engine_with_customer(10_000).await;

    let product = engine
        .create_product(&Actor::new("depot", Role::Supplier), "Widget", 1000, "", "w.png")
        .await
        .unwrap();

    let mut cart = Cart::new();
    cart.adjust_quantity(&product, 1);
    let abandoned = engine.checkout(&mut cart, &customer).await.unwrap();
    engine.abandon(abandoned.id).await.unwrap();

    cart.adjust_quantity(&product, 2);
    let paid = engine.checkout(&mut cart, &customer).await.unwrap();
    engine.pay(paid.id, &customer, SECRET).await.unwrap();

    // Append-only history: the abandoned order is still there, oldest first.
    let history = engine.orders_for(&customer).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].status, OrderStatus::Failed);
    assert_eq!(history[1].status, OrderStatus::Paid);
}

#[tokio::test]
async fn test_bank_sees_every_transaction() {
    let (engine, customer) = engine_with_customer(10_000).await;
    let bank = Actor::new("bank", Role::Bank);

    paid_order(&engine, &customer, 2000).await;
    engine.add_money(&customer, 500, SECRET).await.unwrap();

    let transactions = engine.transaction_history(&bank).await.unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].status, TransactionStatus::Completed);
    assert_eq!(transactions[1].status, TransactionStatus::Pending);
}

#[tokio::test]
async fn test_price_change_does_not_alter_placed_orders() {
    let (engine, customer) = engine_with_customer(10_000).await;
    let supplier = Actor::new("depot", Role::Supplier);

    let product = engine
        .create_product(&supplier, "Widget", 1000, "", "w.png")
        .await
        .unwrap();
    let mut cart = Cart::new();
    cart.adjust_quantity(&product, 2);
    let order = engine.checkout(&mut cart, &customer).await.unwrap();

    // Re-listing the product at a new price leaves the snapshot alone.
    engine
        .create_product(&supplier, "Widget", 9000, "", "w.png")
        .await
        .unwrap();
    let tx = engine.pay(order.id, &customer, SECRET).await.unwrap();
    assert_eq!(tx.amount.value(), 2000);
}
