//! # Plain-Text Receipt
//!
//! A chat-friendly rendition of a receipt for sending through a messaging
//! app instead of printing. Uses `*...*` for bold and keeps Unicode as-is.

use super::document::ReceiptDocument;
use super::layout::{rupiah, rupiah_wide};

const RULE: &str = "------------------------";

/// Render the receipt as a short message.
///
/// ```text
/// *TOKO*
/// ------------------------
/// Kaos (L / Hitam) x2 = Rp150.000
/// ------------------------
/// *Total: Rp150.000*
/// Bayar: TUNAI
///
/// Terima kasih telah berbelanja di TOKO!
/// ```
pub fn share_text(doc: &ReceiptDocument) -> String {
    let mut out = format!("*{}*\n{}\n", doc.store.name, RULE);

    for item in &doc.items {
        out.push_str(&item.name);
        if let Some(variant) = item.variant_info.as_deref().filter(|v| !v.is_empty()) {
            out.push_str(&format!(" ({})", variant));
        }
        out.push_str(&format!(
            " x{} = {}\n",
            item.quantity,
            rupiah_wide(item.exact_subtotal())
        ));
    }
    out.push_str(RULE);
    out.push('\n');

    for adjustment in &doc.adjustments {
        out.push_str(&format!("{}: -{}\n", adjustment.label, rupiah(adjustment.amount)));
    }
    out.push_str(&format!("*Total: {}*\n", rupiah(doc.total)));
    out.push_str(&format!("Bayar: {}\n", doc.payment_method.label()));
    if let Some(cash) = doc.cash.filter(|c| c.change > 0) {
        out.push_str(&format!("Kembalian: {}\n", rupiah(cash.change)));
    }

    out.push_str(&format!(
        "\nTerima kasih telah berbelanja di {}!",
        doc.store.name
    ));
    out
}
