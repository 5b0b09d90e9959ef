//! # Sales Receipts
//!
//! The receipt data model, the fixed-width composer that turns it into a
//! printer instruction stream, and a few built-in sample receipts.
//!
//! ```
//! use struk::receipt;
//!
//! let doc = receipt::by_name("cash").unwrap();
//! let bytes = doc.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod compose;
mod document;
pub mod layout;
pub mod share;

pub use compose::compose;
pub use document::{
    Adjustment, CashPayment, LineItem, PaymentMethod, ReceiptDocument, StoreInfo,
};

use chrono::NaiveDate;

// ============================================================================
// SAMPLE RECEIPTS
// ============================================================================

fn sample_store() -> StoreInfo {
    StoreInfo {
        name: "STYLK".into(),
        address: Some("Jl. Braga No. 21, Bandung".into()),
        phone: Some("0812-2233-4455".into()),
    }
}

fn sample(total: u64, payment_method: PaymentMethod, cash: Option<CashPayment>) -> ReceiptDocument {
    let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(14, 5, 0))
        .unwrap_or_default();

    ReceiptDocument {
        store: sample_store(),
        footer: Some("Barang yang sudah dibeli\ntidak dapat ditukar/retur".into()),
        items: vec![
            LineItem::new("Kaos Oversize Washed", 2, 75_000).variant("XL / Hitam"),
            LineItem::new("Topi Baseball", 1, 65_000).variant("All Size / Krem"),
        ],
        adjustments: vec![],
        total,
        payment_method,
        cash,
        cashier_name: "Sari".into(),
        transaction_id: "9f3c2a7e-41d8-4b6a-9e0f-2c1d5b7a8e90".into(),
        timestamp,
    }
}

/// Cash sale with change.
pub fn cash_receipt() -> ReceiptDocument {
    sample(
        215_000,
        PaymentMethod::Cash,
        Some(CashPayment::settle(215_000, 250_000)),
    )
}

/// QRIS sale (no cash rows).
pub fn qris_receipt() -> ReceiptDocument {
    sample(215_000, PaymentMethod::Qris, None)
}

/// Cash sale with two discount lines.
pub fn voucher_receipt() -> ReceiptDocument {
    let mut doc = sample(
        200_000,
        PaymentMethod::Cash,
        Some(CashPayment::settle(200_000, 200_000)),
    );
    doc.adjustments = vec![
        Adjustment::new("Voucher WELCOME10", 10_000),
        Adjustment::new("Diskon Member", 5_000),
    ];
    doc
}

/// Get a sample receipt by name.
pub fn by_name(name: &str) -> Option<ReceiptDocument> {
    match name {
        "cash" => Some(cash_receipt()),
        "qris" => Some(qris_receipt()),
        "voucher" => Some(voucher_receipt()),
        _ => None,
    }
}

/// List all sample receipt names.
pub fn list_receipts() -> &'static [&'static str] {
    &["cash", "qris", "voucher"]
}
