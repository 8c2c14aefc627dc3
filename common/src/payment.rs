use std::fmt;

use serde::{Deserialize, Serialize};

use crate::order::OrderId;

/// Share of the order total charged on top as a transaction fee.
pub const TRANSACTION_FEE_RATE: f64 = 0.02;

pub const PAYMENT_SUCCESS_TEXT: &str = "Payment processed successfully!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Mpesa,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "mpesa",
            PaymentMethod::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/payment/initiate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
}

impl PaymentRequest {
    pub fn mpesa(order_id: OrderId) -> Self {
        Self {
            order_id,
            payment_method: PaymentMethod::Mpesa,
        }
    }
}

/// Payload fields of a successful payment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentReceipt {
    #[serde(default)]
    pub transaction_id: String,
    /// Order total plus the transaction fee.
    #[serde(default)]
    pub total_amount: f64,
}

pub fn transaction_fee(order_total: f64) -> f64 {
    order_total * TRANSACTION_FEE_RATE
}

pub fn total_with_fee(order_total: f64) -> f64 {
    order_total + transaction_fee(order_total)
}
