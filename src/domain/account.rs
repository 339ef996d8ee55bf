use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Minimum length accepted for an account secret.
pub const MIN_SECRET_LEN: usize = 6;

/// An account balance in minor currency units.
///
/// This is a wrapper around `u64` so a balance can never be negative by
/// construction; the only way to decrease it is [`BankAccount::debit`], which
/// refuses to underflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Balance(u64);

/// A positive monetary amount in minor currency units.
///
/// Ensures that prices and transfer amounts are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(WorkflowError::Validation(
                "amount must be greater than 0".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = WorkflowError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Add<Amount> for Balance {
    type Output = Self;
    fn add(self, rhs: Amount) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Amount> for Balance {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A 12-digit bank account number, the unique key of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountNo(String);

impl AccountNo {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(WorkflowError::Validation(
                "account number must contain exactly 12 digits".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A bank account held by exactly one role holder.
///
/// Balances are mutated only through [`BankAccount::credit`] and
/// [`BankAccount::debit`]; the ledger store applies these under its own
/// exclusion scope so a transfer is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_no: AccountNo,
    pub account_name: String,
    pub balance: Balance,
    secret_hash: String,
}

impl BankAccount {
    /// Opens an account, hashing the supplied secret. The plaintext secret is
    /// never stored.
    pub fn open(
        account_no: AccountNo,
        account_name: impl Into<String>,
        balance: Balance,
        secret: &str,
    ) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(WorkflowError::Validation(format!(
                "account secret must contain at least {MIN_SECRET_LEN} characters"
            )));
        }
        Ok(Self {
            account_no,
            account_name: account_name.into(),
            balance,
            secret_hash: sha256::digest(secret),
        })
    }

    pub fn verify_secret(&self, secret: &str) -> bool {
        sha256::digest(secret) == self.secret_hash
    }

    /// Adds funds to the balance.
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    /// Removes funds from the balance, refusing to drive it below zero.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        match self.balance.value().checked_sub(amount.value()) {
            Some(rest) => {
                self.balance = Balance::new(rest);
                Ok(())
            }
            None => Err(WorkflowError::InsufficientFunds {
                balance: self.balance,
                needed: amount,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(balance: u64) -> BankAccount {
        BankAccount::open(
            AccountNo::new("111122223333").unwrap(),
            "Alice",
            Balance::new(balance),
            "hunter2!",
        )
        .unwrap()
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(1).is_ok());
        assert!(matches!(
            Amount::new(0),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn test_account_no_validation() {
        assert!(AccountNo::new("111122223333").is_ok());
        assert!(AccountNo::new("12345").is_err());
        assert!(AccountNo::new("11112222333a").is_err());
        assert!(AccountNo::new("1111222233334").is_err());
    }

    #[test]
    fn test_secret_hashing() {
        let account = account(0);
        assert!(account.verify_secret("hunter2!"));
        assert!(!account.verify_secret("wrong"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = BankAccount::open(
            AccountNo::new("111122223333").unwrap(),
            "Alice",
            Balance::ZERO,
            "abc",
        );
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn test_credit_and_debit() {
        let mut account = account(1000);
        account.credit(Amount::new(500).unwrap());
        assert_eq!(account.balance, Balance::new(1500));

        account.debit(Amount::new(700).unwrap()).unwrap();
        assert_eq!(account.balance, Balance::new(800));
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let mut account = account(1500);
        let result = account.debit(Amount::new(2000).unwrap());
        assert!(matches!(
            result,
            Err(WorkflowError::InsufficientFunds { .. })
        ));
        // Failed debit leaves the balance untouched.
        assert_eq!(account.balance, Balance::new(1500));
    }
}
