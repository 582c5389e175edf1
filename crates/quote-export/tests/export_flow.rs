//! Exports a finalized quotation in every format.

use std::fs;

use chrono::NaiveDate;
use quote_core::{finalize, CompanyProfile, HeaderFields, ItemPatch, QuotationForm, QuotationView, UserIdentity};
use quote_export::{deliver, exporter_for, read_item_rows, ExportFormat, ExportTarget};
use rust_decimal::Decimal;

fn sample_view() -> QuotationView {
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut form = QuotationForm::new();
    form.client_name = "Lakshmi N".to_string();
    form.update_item(
        0,
        &ItemPatch::new()
            .description("TV unit")
            .length("10")
            .width("1")
            .price_per_area("10"),
    );
    form.add_item();
    form.update_item(
        1,
        &ItemPatch::new()
            .description("Shoe rack")
            .length("25.05")
            .width("10")
            .price_per_area("1"),
    );

    let owner = UserIdentity {
        id: "u1".to_string(),
        email: "u1@mabric.in".to_string(),
        full_name: None,
    };
    let mut record = finalize(&form, &HeaderFields::new(today), None, &owner, today);
    record.quotation_number = "QT-20250101-000123".to_string();
    QuotationView::build(&record, &CompanyProfile::default(), "Rs.")
}

#[test]
fn totals_match_reference_values() {
    let view = sample_view();
    assert_eq!(view.subtotal, "Rs. 350.50");
    assert_eq!(view.tax_amount, "Rs. 35.05");
    assert_eq!(view.grand_total, "Rs. 385.55");
    assert_eq!(view.valid_until, "16 January 2025");
}

#[test]
fn delivers_every_format() {
    let view = sample_view();
    let scratch = tempfile::tempdir().unwrap();
    let dir = scratch.path();
    let target = ExportTarget::directory(dir);

    for format in ExportFormat::ALL {
        let exporter = exporter_for(format);
        let path = deliver(exporter.as_ref(), &view, &target).unwrap().unwrap();
        assert_eq!(path, dir.join(format!("QT-20250101-000123.{}", format.extension())));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    let csv = fs::read(dir.join("QT-20250101-000123.csv")).unwrap();
    let items = read_item_rows(csv.as_slice()).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].particulars, "Shoe rack");
    assert_eq!(items[1].area, "250.50".parse::<Decimal>().unwrap());
    assert_eq!(items[1].amount, "250.50".parse::<Decimal>().unwrap());
}

#[test]
fn missing_directory_is_a_no_op() {
    let view = sample_view();
    let scratch = tempfile::tempdir().unwrap();
    let target = ExportTarget::directory(scratch.path().join("does-not-exist/nested"));

    for format in ExportFormat::ALL {
        let exporter = exporter_for(format);
        assert_eq!(deliver(exporter.as_ref(), &view, &target).unwrap(), None);
    }
}
