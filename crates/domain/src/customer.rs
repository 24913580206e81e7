//! Customer aggregate with credit ledger.

use chrono::{DateTime, Utc};
use common::CustomerId;
use outcome::{Outcome, UnitOutcome};
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::fault::Fault;
use crate::money::Money;

/// The state of a customer account.
///
/// State transitions:
/// ```text
/// Active ◄──► Suspended
///    │            │
///    └────────────┴──► Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CustomerStatus {
    /// Account is in good standing; credit operations are permitted.
    #[default]
    Active,

    /// Account is temporarily blocked.
    Suspended,

    /// Account is closed (terminal state).
    Closed,
}

impl CustomerStatus {
    /// Returns true if the (from, to) pair is a legal transition.
    pub fn can_transition(&self, to: CustomerStatus) -> bool {
        matches!(
            (self, to),
            (CustomerStatus::Active, CustomerStatus::Suspended)
                | (CustomerStatus::Suspended, CustomerStatus::Active)
                | (CustomerStatus::Active, CustomerStatus::Closed)
                | (CustomerStatus::Suspended, CustomerStatus::Closed)
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Suspended => "Suspended",
            CustomerStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer aggregate root.
///
/// Holds the credit ledger: available credit starts at the credit limit,
/// is debited when orders are submitted and restored on cancellation.
/// The version counter increments on every successful mutating operation
/// and backs the optimistic-concurrency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: Email,
    credit_limit: Money,
    available_credit: Money,
    status: CustomerStatus,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Customer {
    /// Creates an active customer with available credit equal to the limit.
    pub fn create(
        name: impl Into<String>,
        email: Email,
        credit_limit: Money,
    ) -> Result<Self, Fault> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Fault::Validation {
                field: "name",
                reason: "name must not be empty".to_string(),
            });
        }

        Ok(Self {
            id: CustomerId::new(),
            name,
            email,
            credit_limit,
            available_credit: credit_limit,
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            version: 1,
        })
    }

    /// Safe form of [`Customer::create`].
    pub fn try_create(
        name: impl Into<String>,
        email: Email,
        credit_limit: Money,
    ) -> Outcome<Self> {
        Outcome::from_result(Self::create(name, email, credit_limit))
    }

    /// Returns the customer ID.
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the customer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the credit limit.
    pub fn credit_limit(&self) -> Money {
        self.credit_limit
    }

    /// Returns the currently available credit.
    pub fn available_credit(&self) -> Money {
        self.available_credit
    }

    /// Returns the account status.
    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the optimistic-concurrency version.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn require_active(&self, operation: &'static str) -> Result<(), Fault> {
        if self.status != CustomerStatus::Active {
            return Err(Fault::InvalidState {
                entity: "Customer",
                operation,
                current: self.status.to_string(),
                required: "Active",
            });
        }
        Ok(())
    }

    fn check_use_credit(&self, amount: &Money) -> Result<Money, Fault> {
        self.require_active("use credit")?;
        if amount.currency() != self.available_credit.currency() {
            return Err(Fault::CurrencyMismatch {
                left: self.available_credit.currency(),
                right: amount.currency(),
            });
        }
        if amount.cents() > self.available_credit.cents() {
            return Err(Fault::InsufficientCredit {
                customer_id: self.id,
                available: self.available_credit,
                requested: *amount,
            });
        }
        self.available_credit.subtract(*amount)
    }

    /// Debits available credit.
    ///
    /// Rejected while not Active, on a currency mismatch, or when the
    /// requested amount exceeds available credit; the customer is left
    /// unmodified in every rejected case.
    pub fn use_credit(&mut self, amount: Money) -> Result<(), Fault> {
        let new_available = self.check_use_credit(&amount)?;
        self.available_credit = new_available;
        self.version += 1;
        Ok(())
    }

    /// Safe form of [`Customer::use_credit`].
    pub fn try_use_credit(&mut self, amount: Money) -> UnitOutcome {
        Outcome::from_result(self.use_credit(amount))
    }

    /// Debits available credit after checking the caller's expected version.
    ///
    /// A stale expected version is rejected with a conflict fault carrying
    /// entity type, id, expected and actual versions.
    pub fn use_credit_versioned(
        &mut self,
        amount: Money,
        expected_version: u64,
    ) -> Result<(), Fault> {
        if expected_version != self.version {
            return Err(Fault::VersionConflict {
                entity: "Customer",
                id: self.id.to_string(),
                expected: expected_version,
                actual: self.version,
            });
        }
        self.use_credit(amount)
    }

    fn check_restore_credit(&self, amount: &Money) -> Result<Money, Fault> {
        self.require_active("restore credit")?;
        if amount.currency() != self.available_credit.currency() {
            return Err(Fault::CurrencyMismatch {
                left: self.available_credit.currency(),
                right: amount.currency(),
            });
        }
        let new_available = self.available_credit.add(*amount)?;
        if new_available.cents() > self.credit_limit.cents() {
            return Err(Fault::CreditLimitExceeded {
                customer_id: self.id,
                limit: self.credit_limit,
                amount: *amount,
            });
        }
        Ok(new_available)
    }

    /// Restores previously debited credit, never past the credit limit.
    pub fn restore_credit(&mut self, amount: Money) -> Result<(), Fault> {
        let new_available = self.check_restore_credit(&amount)?;
        self.available_credit = new_available;
        self.version += 1;
        Ok(())
    }

    /// Safe form of [`Customer::restore_credit`].
    pub fn try_restore_credit(&mut self, amount: Money) -> UnitOutcome {
        Outcome::from_result(self.restore_credit(amount))
    }

    fn transition(&mut self, to: CustomerStatus) -> Result<(), Fault> {
        if !self.status.can_transition(to) {
            return Err(Fault::InvalidTransition {
                entity: "Customer",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.version += 1;
        Ok(())
    }

    /// Suspends an active account.
    pub fn suspend(&mut self) -> Result<(), Fault> {
        self.transition(CustomerStatus::Suspended)
    }

    /// Safe form of [`Customer::suspend`].
    pub fn try_suspend(&mut self) -> UnitOutcome {
        Outcome::from_result(self.suspend())
    }

    /// Reactivates a suspended account.
    pub fn activate(&mut self) -> Result<(), Fault> {
        self.transition(CustomerStatus::Active)
    }

    /// Safe form of [`Customer::activate`].
    pub fn try_activate(&mut self) -> UnitOutcome {
        Outcome::from_result(self.activate())
    }

    /// Closes the account. Closure is a status, not removal.
    pub fn close(&mut self) -> Result<(), Fault> {
        self.transition(CustomerStatus::Closed)
    }

    /// Safe form of [`Customer::close`].
    pub fn try_close(&mut self) -> UnitOutcome {
        Outcome::from_result(self.close())
    }
}
