//! # Receipt Composer
//!
//! Turns a [`ReceiptDocument`] into a printer instruction stream using the
//! fixed sales-receipt template. Pure: no device access, and date/time come
//! from the document, never from the clock.
//!
//! ## Template (32 columns)
//!
//! ```text
//!            TOKO  (double, bold)
//!         Jl. Merdeka 1
//!           0812-3456
//!
//! ================================
//! Tgl : 09/03/2024 14:05
//! No  : A1B2C3D4
//! Kasir: Sari
//! ================================
//! Kaos Polos
//!   L / Hitam
//!   2x Rp75.000          Rp150.000
//! --------------------------------
//! Voucher                -Rp10.000
//! TOTAL                  Rp140.000   (bold)
//! --------------------------------
//! Bayar                      TUNAI
//! Diterima               Rp150.000
//! Kembalian               Rp10.000
//! ================================
//!
//!        Terima kasih telah
//!       berbelanja di TOKO!
//! ```
//!
//! Non-ASCII text is kept as-is here; substitution happens in codegen.

use crate::ir::{Op, Program};
use crate::printer::PrinterProfile;
use crate::protocol::text::{Alignment, CharSize};

use super::document::{PaymentMethod, ReceiptDocument};
use super::layout::{
    amount_row, halves, rupiah, rupiah_wide, separator, spread, spread_min_gap, truncate,
};

/// Compose a receipt for the given printer profile.
pub fn compose(doc: &ReceiptDocument, profile: &PrinterProfile) -> Program {
    let columns = profile.columns;
    let mut program = Program::with_init();

    header(&mut program, doc);

    program.push(Op::SetAlign(Alignment::Left));
    program.push(Op::SetSize(CharSize::Normal));
    program.line(separator('=', columns));
    metadata(&mut program, doc);
    program.line(separator('=', columns));

    items(&mut program, doc, columns);
    program.line(separator('-', columns));
    adjustments(&mut program, doc, columns);

    program.push(Op::SetBold(true));
    program.line(spread_min_gap("TOTAL", &rupiah(doc.total), columns));
    program.push(Op::SetBold(false));

    program.line(separator('-', columns));
    payment(&mut program, doc, columns);
    program.line(separator('=', columns));

    footer(&mut program, doc);

    program.push(Op::Feed {
        lines: profile.trailing_feed,
    });
    program.push(Op::Cut { partial: true });

    program
}

fn header(program: &mut Program, doc: &ReceiptDocument) {
    program.push(Op::SetAlign(Alignment::Center));
    program.push(Op::SetSize(CharSize::Double));
    program.push(Op::SetBold(true));
    program.line(doc.store.name.as_str());
    program.push(Op::SetSize(CharSize::Normal));
    program.push(Op::SetBold(false));

    if let Some(address) = non_empty(&doc.store.address) {
        program.line(address);
    }
    if let Some(phone) = non_empty(&doc.store.phone) {
        program.line(phone);
    }
    program.line("");
}

fn metadata(program: &mut Program, doc: &ReceiptDocument) {
    let stamp = doc.timestamp.format("%d/%m/%Y %H:%M");
    let short_id: String = doc.transaction_id.chars().take(8).collect();

    program.line(format!("Tgl : {}", stamp));
    program.line(format!("No  : {}", short_id.to_uppercase()));
    program.line(format!("Kasir: {}", doc.cashier_name));
}

fn items(program: &mut Program, doc: &ReceiptDocument, columns: usize) {
    for item in &doc.items {
        program.line(truncate(&item.name, columns));

        if let Some(variant) = non_empty(&item.variant_info) {
            program.line(format!("  {}", variant));
        }

        let qty_price = format!("  {}x {}", item.quantity, rupiah(item.unit_price));
        let subtotal = rupiah_wide(item.exact_subtotal());
        match spread(&qty_price, &subtotal, columns) {
            Some(row) => program.line(row),
            None => {
                // Too wide for one line: let the printer right-align the
                // subtotal on its own line
                program.line(qty_price);
                program.push(Op::SetAlign(Alignment::Right));
                program.line(subtotal);
                program.push(Op::SetAlign(Alignment::Left));
            }
        }
    }
}

fn adjustments(program: &mut Program, doc: &ReceiptDocument, columns: usize) {
    for adjustment in &doc.adjustments {
        let value = format!("-{}", rupiah(adjustment.amount));
        let label_room = columns.saturating_sub(value.chars().count() + 1);
        program.line(spread_min_gap(
            &truncate(&adjustment.label, label_room),
            &value,
            columns,
        ));
    }
}

fn payment(program: &mut Program, doc: &ReceiptDocument, columns: usize) {
    program.line(halves("Bayar", doc.payment_method.label(), columns));

    if doc.payment_method != PaymentMethod::Cash {
        return;
    }
    let Some(cash) = doc.cash else {
        return;
    };
    if cash.received == 0 {
        return;
    }

    program.line(amount_row("Diterima", &rupiah(cash.received), columns));
    if cash.change > 0 {
        program.line(amount_row("Kembalian", &rupiah(cash.change), columns));
    }
}

fn footer(program: &mut Program, doc: &ReceiptDocument) {
    program.push(Op::SetAlign(Alignment::Center));
    program.line("");
    program.line("Terima kasih telah");
    program.line(format!("berbelanja di {}!", doc.store.name));

    if let Some(text) = non_empty(&doc.footer) {
        program.line("");
        for line in text.split('\n') {
            program.line(line);
        }
    }
    program.line("");
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl ReceiptDocument {
    /// Compose for the default 58mm profile.
    pub fn compose(&self) -> Program {
        compose(self, &PrinterProfile::MP58)
    }

    /// Compose and encode for the default 58mm profile.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.compose().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::document::{Adjustment, CashPayment, LineItem, StoreInfo};
    use chrono::NaiveDate;

    fn minimal() -> ReceiptDocument {
        ReceiptDocument {
            store: StoreInfo::new("TOKO"),
            footer: None,
            items: vec![LineItem::new("Kopi", 1, 18_000)],
            adjustments: vec![],
            total: 18_000,
            payment_method: PaymentMethod::Qris,
            cash: None,
            cashier_name: "Budi".into(),
            transaction_id: "f00dcafe-1234".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .and_then(|d| d.and_hms_opt(8, 7, 0))
                .unwrap(),
        }
    }

    fn texts(program: &Program) -> Vec<&str> {
        program.texts().collect()
    }

    #[test]
    fn test_starts_with_init_and_ends_with_feed_cut() {
        let program = minimal().compose();
        assert_eq!(program.ops[0], Op::Init);
        let n = program.len();
        assert_eq!(program.ops[n - 2], Op::Feed { lines: 4 });
        assert_eq!(program.ops[n - 1], Op::Cut { partial: true });
    }

    #[test]
    fn test_header_styles() {
        let program = minimal().compose();
        assert_eq!(
            &program.ops[1..6],
            &[
                Op::SetAlign(Alignment::Center),
                Op::SetSize(CharSize::Double),
                Op::SetBold(true),
                Op::Text("TOKO".into()),
                Op::Newline,
            ]
        );
    }

    #[test]
    fn test_metadata_lines() {
        let program = minimal().compose();
        let t = texts(&program);
        assert!(t.contains(&"Tgl : 09/03/2024 08:07"));
        assert!(t.contains(&"No  : F00DCAFE"));
        assert!(t.contains(&"Kasir: Budi"));
    }

    #[test]
    fn test_optional_fields_absent() {
        let program = minimal().compose();
        let t = texts(&program);
        assert!(!t.iter().any(|s| s.starts_with("Diterima")));
        assert!(!t.iter().any(|s| s.starts_with("Kembalian")));
        // header: name only, then the blank line
        assert_eq!(t[0], "TOKO");
        assert!(t[1].starts_with("===="));
        // footer: thank-you lines only
        let last = t.len() - 1;
        assert_eq!(t[last], "berbelanja di TOKO!");
        assert_eq!(t[last - 1], "Terima kasih telah");
    }

    #[test]
    fn test_optional_fields_present() {
        let mut doc = minimal();
        doc.store.address = Some("Jl. Merdeka 1".into());
        doc.store.phone = Some("0812-3456".into());
        doc.footer = Some("Barang yang sudah dibeli\ntidak dapat ditukar".into());
        doc.items[0] = LineItem::new("Kaos", 1, 18_000).variant("L / Hitam");

        let program = doc.compose();
        let t = texts(&program);
        assert_eq!(&t[0..3], &["TOKO", "Jl. Merdeka 1", "0812-3456"]);
        assert!(t.contains(&"  L / Hitam"));
        assert_eq!(
            &t[t.len() - 2..],
            &["Barang yang sudah dibeli", "tidak dapat ditukar"]
        );
    }

    #[test]
    fn test_item_row_fits() {
        let program = minimal().compose();
        let row = texts(&program)
            .into_iter()
            .find(|s| s.starts_with("  1x"))
            .unwrap()
            .to_string();
        assert_eq!(row.len(), 32);
        assert!(row.starts_with("  1x Rp18.000"));
        assert!(row.ends_with(" Rp18.000"));
    }

    #[test]
    fn test_item_row_split_uses_right_alignment() {
        let mut doc = minimal();
        doc.items = vec![LineItem::new("Jam Tangan", 1_000, 12_500_000)];
        let program = doc.compose();

        let qty_at = program
            .ops
            .iter()
            .position(|op| *op == Op::Text("  1000x Rp12.500.000".into()))
            .unwrap();
        assert_eq!(
            &program.ops[qty_at + 1..qty_at + 5],
            &[
                Op::Newline,
                Op::SetAlign(Alignment::Right),
                Op::Text("Rp12.500.000.000".into()),
                Op::Newline,
            ]
        );
        assert_eq!(program.ops[qty_at + 5], Op::SetAlign(Alignment::Left));
    }

    #[test]
    fn test_out_of_range_subtotal_prints_exact_amount() {
        let mut doc = minimal();
        doc.items = vec![LineItem::new("Emas", 3, u64::MAX / 2)];
        assert!(doc.validate().is_err());

        let program = doc.compose();
        assert!(texts(&program).contains(&"Rp27.670.116.110.564.327.421"));
    }

    #[test]
    fn test_footer_keeps_trailing_blank_line() {
        let mut doc = minimal();
        doc.footer = Some("Simpan struk ini\n".into());
        let program = doc.compose();

        let n = program.len();
        assert_eq!(
            &program.ops[n - 6..],
            &[
                Op::Text("Simpan struk ini".into()),
                Op::Newline,
                Op::Newline,
                Op::Newline,
                Op::Feed { lines: 4 },
                Op::Cut { partial: true },
            ]
        );
    }

    #[test]
    fn test_long_name_truncated() {
        let mut doc = minimal();
        doc.items[0].name = "A".repeat(40);
        let program = doc.compose();
        assert!(texts(&program).contains(&"A".repeat(32).as_str()));
        assert!(!texts(&program).iter().any(|s| s.contains(&"A".repeat(33))));
    }

    #[test]
    fn test_total_is_bold_and_echoed() {
        let mut doc = minimal();
        doc.total = 1; // not the item sum; printed as given
        let program = doc.compose();
        let at = program
            .ops
            .iter()
            .position(|op| matches!(op, Op::Text(s) if s.starts_with("TOTAL")))
            .unwrap();
        assert_eq!(program.ops[at - 1], Op::SetBold(true));
        assert_eq!(program.ops[at + 2], Op::SetBold(false));
        assert_eq!(
            program.ops[at],
            Op::Text(format!("TOTAL{}Rp1", " ".repeat(24)))
        );
    }

    #[test]
    fn test_qris_payment_row() {
        let program = minimal().compose();
        assert!(texts(&program).contains(&format!("Bayar{}QRIS", " ".repeat(23)).as_str()));
    }

    #[test]
    fn test_cash_rows() {
        let mut doc = minimal();
        doc.payment_method = PaymentMethod::Cash;
        doc.cash = Some(CashPayment::settle(18_000, 20_000));
        let program = doc.compose();
        let t = texts(&program);
        assert!(t.contains(&format!("Bayar{}TUNAI", " ".repeat(22)).as_str()));
        assert!(t.contains(&format!("Diterima{}Rp20.000", " ".repeat(16)).as_str()));
        assert!(t.contains(&format!("Kembalian{}Rp2.000", " ".repeat(16)).as_str()));
    }

    #[test]
    fn test_adjustment_rows_before_total() {
        let mut doc = minimal();
        doc.adjustments = vec![Adjustment::new("Voucher LEBARAN", 3_000)];
        doc.total = 15_000;
        let program = doc.compose();
        let t = texts(&program);
        let voucher = t.iter().position(|s| s.starts_with("Voucher")).unwrap();
        let total = t.iter().position(|s| s.starts_with("TOTAL")).unwrap();
        assert_eq!(voucher + 1, total);
        assert!(t[voucher].ends_with(" -Rp3.000"));
        assert_eq!(t[voucher].len(), 32);
    }

    #[test]
    fn test_profile_width_is_respected() {
        let program = compose(&minimal(), &PrinterProfile::MP80);
        assert!(program.texts().any(|s| s == separator('=', 48)));
    }

    #[test]
    fn test_composition_is_pure() {
        let doc = minimal();
        assert_eq!(doc.compose(), doc.compose());
    }
}
