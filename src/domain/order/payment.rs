//! Order payment: status state machine and the conditional updates
//! driven by gateway events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::customer::Address;
use crate::domain::foundation::{DomainError, StateMachine, Timestamp};

/// Payment status as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Session opened, nothing charged yet.
    Pending,
    /// Funds reserved.
    Authorized,
    /// Funds taken. The order is confirmed from here on.
    Captured,
    /// Order delivered and settled.
    Completed,
    Canceled,
    Refunded,
    Failed,
    Expired,
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Authorized)
                | (Pending, Captured)
                | (Pending, Canceled)
                | (Pending, Failed)
                | (Pending, Expired)
                | (Authorized, Captured)
                | (Authorized, Canceled)
                | (Authorized, Failed)
                | (Authorized, Expired)
                | (Captured, Completed)
                | (Captured, Canceled)
                | (Captured, Refunded)
                | (Completed, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Authorized, Captured, Canceled, Failed, Expired],
            Authorized => vec![Captured, Canceled, Failed, Expired],
            Captured => vec![Completed, Canceled, Refunded],
            Completed => vec![Refunded],
            Canceled | Refunded | Failed | Expired => vec![],
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    CreditCard,
    PayPay,
    LinePay,
    Merpay,
    RakutenPay,
    AuPay,
}

impl PaymentMethodType {
    /// Gateway payment type identifier.
    pub fn gateway_type(&self) -> &'static str {
        match self {
            PaymentMethodType::CreditCard => "credit_card",
            PaymentMethodType::PayPay => "paypay",
            PaymentMethodType::LinePay => "linepay",
            PaymentMethodType::Merpay => "merpay",
            PaymentMethodType::RakutenPay => "rakutenpay",
            PaymentMethodType::AuPay => "aupay",
        }
    }

    /// Payment types the gateway session should offer for this method.
    pub fn accepted_types(&self) -> Vec<String> {
        vec![self.gateway_type().to_string()]
    }

    /// Returns true for redirect-based wallet methods.
    pub fn is_wallet(&self) -> bool {
        !matches!(self, PaymentMethodType::CreditCard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundType {
    Canceled,
    Refunded,
}

/// Status change reported by a payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusUpdate {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub issued_at: Timestamp,
}

/// Refund or cancellation reported by a payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundUpdate {
    pub status: PaymentStatus,
    pub refund_type: RefundType,
    pub total: i64,
    pub reason: String,
    pub issued_at: Timestamp,
}

/// Payment part of an order, including its price breakdown.
///
/// # Invariants
///
/// - `total == subtotal - discount + shipping_fee + tax`
/// - Amounts and address snapshots never change after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayment {
    /// Gateway session id.
    pub transaction_id: String,
    /// Gateway payment id, known once an event arrives.
    pub payment_id: Option<String>,
    pub method: PaymentMethodType,
    pub status: PaymentStatus,
    pub subtotal: i64,
    pub discount: i64,
    pub shipping_fee: i64,
    pub tax: i64,
    pub total: i64,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub paid_at: Option<Timestamp>,
    pub captured_at: Option<Timestamp>,
    pub canceled_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
    pub refunded_at: Option<Timestamp>,
    pub refund_type: Option<RefundType>,
    pub refund_total: i64,
    pub refund_reason: String,
    /// Issue time of the last applied event.
    pub last_event_at: Option<Timestamp>,
}

impl OrderPayment {
    /// Rejects events that are not strictly newer than the last applied one,
    /// or whose status is not reachable from the current one.
    fn check_applicable(
        &self,
        status: PaymentStatus,
        issued_at: Timestamp,
    ) -> Result<(), DomainError> {
        if let Some(last) = self.last_event_at {
            if !issued_at.is_after(&last) {
                return Err(DomainError::precondition_failed(format!(
                    "payment event issued at {:?} is not newer than {:?}",
                    issued_at.as_datetime(),
                    last.as_datetime()
                )));
            }
        }
        self.status
            .transition_to(status)
            .map(|_| ())
            .map_err(|e| DomainError::precondition_failed(e.to_string()))
    }

    fn stamp(&mut self, status: PaymentStatus, at: Timestamp) {
        match status {
            PaymentStatus::Authorized => self.paid_at = Some(at),
            PaymentStatus::Captured => {
                self.paid_at.get_or_insert(at);
                self.captured_at = Some(at);
            }
            PaymentStatus::Canceled => self.canceled_at = Some(at),
            PaymentStatus::Failed | PaymentStatus::Expired => self.failed_at = Some(at),
            PaymentStatus::Refunded => self.refunded_at = Some(at),
            PaymentStatus::Pending | PaymentStatus::Completed => {}
        }
        self.status = status;
        self.last_event_at = Some(at);
    }

    /// Applies a status event.
    ///
    /// # Errors
    ///
    /// `PreconditionFailed` when the event is stale or the transition is invalid.
    pub fn apply_status(&mut self, update: &PaymentStatusUpdate) -> Result<(), DomainError> {
        self.check_applicable(update.status, update.issued_at)?;
        if !update.payment_id.is_empty() {
            self.payment_id = Some(update.payment_id.clone());
        }
        self.stamp(update.status, update.issued_at);
        Ok(())
    }

    /// Applies a refund or cancellation event.
    ///
    /// # Errors
    ///
    /// `PreconditionFailed` when the event is stale or the transition is invalid.
    pub fn apply_refund(&mut self, update: &RefundUpdate) -> Result<(), DomainError> {
        self.check_applicable(update.status, update.issued_at)?;
        self.refund_type = Some(update.refund_type);
        self.refund_total = update.total;
        self.refund_reason = update.reason.clone();
        self.stamp(update.status, update.issued_at);
        Ok(())
    }
}
