//! # Receipt Document
//!
//! The value object a caller hands to the composer for one print request.
//! Built elsewhere from cart, store settings and cashier identity; struk
//! performs no lookups of its own.
//!
//! Money is an integer count of the smallest currency unit (rupiah).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrukError};

/// Store identity printed in the receipt header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl StoreInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            phone: None,
        }
    }
}

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// e.g. `"L / Hitam"` (size / color)
    #[serde(default)]
    pub variant_info: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: u64) -> Self {
        Self {
            name: name.into(),
            variant_info: None,
            quantity,
            unit_price,
        }
    }

    pub fn variant(mut self, info: impl Into<String>) -> Self {
        self.variant_info = Some(info.into());
        self
    }

    /// `quantity × unit_price`, or `None` if it does not fit in a `u64`.
    pub fn subtotal(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }

    /// `quantity × unit_price` without overflow, for display.
    pub fn exact_subtotal(&self) -> u128 {
        u128::from(self.quantity) * u128::from(self.unit_price)
    }
}

/// A discount or voucher line, printed as a deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub label: String,
    pub amount: u64,
}

impl Adjustment {
    pub fn new(label: impl Into<String>, amount: u64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Qris,
}

impl PaymentMethod {
    /// Label printed on the payment row.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "TUNAI",
            PaymentMethod::Qris => "QRIS",
        }
    }
}

/// Tendered cash and change. Both amounts travel together so a receipt can
/// never carry one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashPayment {
    pub received: u64,
    pub change: u64,
}

impl CashPayment {
    /// Consistent cash fields for a given net total.
    ///
    /// ```
    /// use struk::receipt::CashPayment;
    ///
    /// let cash = CashPayment::settle(89_000, 100_000);
    /// assert_eq!(cash.change, 11_000);
    /// ```
    pub fn settle(total: u64, received: u64) -> Self {
        Self {
            received,
            change: received.saturating_sub(total),
        }
    }
}

/// # Receipt Document
///
/// Immutable input for one print. `total` is the caller-computed net total;
/// the composer prints it as given and never recomputes it from the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDocument {
    pub store: StoreInfo,
    /// Multi-line footer, newline separated
    #[serde(default)]
    pub footer: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    pub total: u64,
    pub payment_method: PaymentMethod,
    /// Only meaningful when `payment_method` is cash
    #[serde(default)]
    pub cash: Option<CashPayment>,
    pub cashier_name: String,
    /// Free-form; only the first 8 characters are printed
    pub transaction_id: String,
    /// Local wall-clock time of the sale
    pub timestamp: NaiveDateTime,
}

impl ReceiptDocument {
    /// Sum of line subtotals before adjustments. `None` on overflow.
    pub fn gross_total(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(0u64, |sum, item| sum.checked_add(item.subtotal()?))
    }

    /// Sum of all discount/voucher amounts. `None` on overflow.
    pub fn adjustment_total(&self) -> Option<u64> {
        self.adjustments
            .iter()
            .try_fold(0u64, |sum, a| sum.checked_add(a.amount))
    }

    /// Upstream consistency check.
    ///
    /// The composer never calls this: it prints whatever it is given. Callers
    /// that build documents from user input run it before printing.
    pub fn validate(&self) -> Result<()> {
        if self.store.name.trim().is_empty() {
            return Err(StrukError::InvalidReceipt("store name is empty".into()));
        }

        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(StrukError::InvalidReceipt(format!(
                "item '{}' has zero quantity",
                item.name
            )));
        }

        if let Some(item) = self.items.iter().find(|item| item.subtotal().is_none()) {
            return Err(StrukError::InvalidReceipt(format!(
                "subtotal of item '{}' is out of range",
                item.name
            )));
        }
        if self.gross_total().is_none() {
            return Err(StrukError::InvalidReceipt("item total is out of range".into()));
        }
        if self.adjustment_total().is_none() {
            return Err(StrukError::InvalidReceipt("discount total is out of range".into()));
        }

        if let Some(cash) = self.cash {
            if self.payment_method != PaymentMethod::Cash {
                return Err(StrukError::InvalidReceipt(
                    "cash amounts given for a non-cash payment".into(),
                ));
            }
            if cash.received < self.total {
                return Err(StrukError::InvalidReceipt(format!(
                    "cash received {} is less than total {}",
                    cash.received, self.total
                )));
            }
            let expected = CashPayment::settle(self.total, cash.received).change;
            if cash.change != expected {
                return Err(StrukError::InvalidReceipt(format!(
                    "change {} does not match received {} minus total {}",
                    cash.change, cash.received, self.total
                )));
            }
        }

        Ok(())
    }
}
