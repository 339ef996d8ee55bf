use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_full_lifecycle_script() {
    let script = common::lifecycle_script();

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    // Cart of 2x500 + 1x1000 checks out at 2000; after payment the balance
    // is 3000 and the order walks Pending -> Paid -> AwaitingDelivery ->
    // Delivered through the approval chain.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"ok":{"accountId":"111122223333"}}"#))
        .stdout(predicate::str::contains(r#""amount":2000"#))
        .stdout(predicate::str::contains(r#""status":"Pending""#))
        .stdout(predicate::str::contains(r#""status":"Completed""#))
        .stdout(predicate::str::contains(r#""status":"AwaitingDelivery""#))
        .stdout(predicate::str::contains(r#""status":"Delivered""#))
        .stdout(predicate::str::contains(
            r#"{"ok":{"accountName":"Alice","accountNo":"111122223333","balance":3000}}"#,
        ));
}

#[test]
fn test_insufficient_funds_leaves_balance_untouched() {
    let script = common::write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":1500,"accountSecret":"hunter2!"}"#,
        r#"{"op":"createProduct","name":"Monitor","price":1000,"description":"","imageRef":"mon.png"}"#,
        r#"{"op":"addToCart","product":"Monitor","quantity":2}"#,
        r#"{"op":"createOrder","accountNo":"111122223333"}"#,
        r#"{"op":"pay","accountNo":"111122223333","accountSecret":"hunter2!"}"#,
        r#"{"op":"getAccountInfo","accountNo":"111122223333"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"InsufficientFundsError""#))
        .stdout(predicate::str::contains(r#""balance":1500"#));
}

#[test]
fn test_wrong_secret_is_an_authentication_error() {
    let script = common::write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":5000,"accountSecret":"hunter2!"}"#,
        r#"{"op":"createProduct","name":"Monitor","price":1000,"description":"","imageRef":"mon.png"}"#,
        r#"{"op":"addToCart","product":"Monitor","quantity":1}"#,
        r#"{"op":"createOrder","accountNo":"111122223333"}"#,
        r#"{"op":"pay","accountNo":"111122223333","accountSecret":"letmein"}"#,
        r#"{"op":"getAccountInfo","accountNo":"111122223333"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"AuthenticationError""#))
        .stdout(predicate::str::contains(r#""balance":5000"#));
}

#[test]
fn test_double_approval_reports_already_approved() {
    let script = common::write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":5000,"accountSecret":"hunter2!"}"#,
        r#"{"op":"createProduct","name":"Monitor","price":1000,"description":"","imageRef":"mon.png"}"#,
        r#"{"op":"addToCart","product":"Monitor","quantity":1}"#,
        r#"{"op":"createOrder","accountNo":"111122223333"}"#,
        r#"{"op":"pay","accountNo":"111122223333","accountSecret":"hunter2!"}"#,
        r#"{"op":"approveOrderRequest"}"#,
        r#"{"op":"approveOrderRequest"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"AwaitingDelivery""#))
        .stdout(predicate::str::contains(r#""kind":"AlreadyApprovedError""#));
}

#[test]
fn test_unauthorized_role_is_rejected() {
    let script = common::write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":5000,"accountSecret":"hunter2!"}"#,
        r#"{"op":"createProduct","name":"Monitor","price":1000,"description":"","imageRef":"mon.png"}"#,
        r#"{"op":"addToCart","product":"Monitor","quantity":1}"#,
        r#"{"op":"createOrder","accountNo":"111122223333"}"#,
        r#"{"op":"pay","accountNo":"111122223333","accountSecret":"hunter2!"}"#,
        r#"{"op":"approveOrderRequest","role":"Customer"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"AuthorizationError""#));
}

#[test]
fn test_malformed_request_goes_to_stderr() {
    let script = common::write_script(&[
        r#"{"op":"noSuchOperation"}"#,
        r#"{"op":"getProducts"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"ok":[]}"#))
        .stderr(predicate::str::contains("Error reading request"));
}

#[test]
fn test_top_up_settles_on_bank_approval() {
    let script = common::write_script(&[
        r#"{"op":"createBankAccount","accountNo":"111122223333","accountName":"Alice","balance":1000,"accountSecret":"hunter2!"}"#,
        r#"{"op":"addMoney","accountNo":"111122223333","amount":2500,"accountSecret":"hunter2!"}"#,
        r#"{"op":"getAccountInfo","accountNo":"111122223333"}"#,
        r#"{"op":"approveTransactionRequest"}"#,
        r#"{"op":"getAccountInfo","accountNo":"111122223333"}"#,
    ]);

    let mut cmd = Command::new(cargo_bin!("shopflow"));
    cmd.arg(script.path());

    // Balance stays 1000 until the Bank approves the pending top-up.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""balance":1000"#))
        .stdout(predicate::str::contains(r#""status":"Completed""#))
        .stdout(predicate::str::contains(r#""balance":3500"#));
}
