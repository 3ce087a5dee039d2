//! Integration tests for gst-invoice-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use gst_invoice_core::{
    AmountInWordsConverter, CandidateProduct, Customer, FileSequenceStore, InvoiceAssembler,
    InvoiceRecord, InvoiceRenderer, InvoiceRequestBuilder, InvoiceService, InvoiceSettings,
    ItemDraft, Location, MemorySequenceStore, OrderInput, PlainTextRenderer, SequenceStore,
    SyntheticInvoiceParams, TaxClassifier, WarningKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn pune() -> Location {
    Location::new("Pune", "Maharashtra", "27ABCDE1234F1Z5")
}

fn builder(invoice_number: &str) -> InvoiceRequestBuilder {
    InvoiceRequestBuilder::new(
        invoice_number,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        pune(),
    )
}

fn order_json(invoice_number: Option<&str>) -> String {
    let number = match invoice_number {
        Some(n) => format!("\"{}\"", n),
        None => "null".to_string(),
    };
    format!(
        r#"{{
            "invoiceNumber": {},
            "customerName": "Asha Rao",
            "items": [{{"title": "Sunglasses A", "quantity": 2, "price": 1000}}],
            "subtotal": 2000,
            "tax": 305.08,
            "total": 2000,
            "paymentMethod": "Card",
            "location": {{"city": "Pune", "state": "Maharashtra", "gstNumber": "27ABCDE1234F1Z5"}},
            "timestamp": "2024-03-01T10:15:00Z"
        }}"#,
        number
    )
}

fn pool() -> Vec<CandidateProduct> {
    vec![
        CandidateProduct::new("Aviator Sunglasses", dec("2499")),
        CandidateProduct::new("Round Eyeglasses Frame", dec("1299")),
        CandidateProduct::new("Blue-cut Lens Pair", dec("899.50")),
        CandidateProduct::new("Wayfarer Sunglasses", dec("1999")),
        CandidateProduct::new("Kids Frame", dec("699")),
        CandidateProduct::new("Display Sample", dec("0")),
    ]
}

fn synthetic_params(total_quantity: u32, target: Option<BigDecimal>) -> SyntheticInvoiceParams {
    SyntheticInvoiceParams {
        total_quantity,
        pool: pool(),
        target_grand_total: target,
        customer: Customer::named("Walk-in"),
        location: pune(),
        payment_method: "Cash".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    }
}

fn assert_totals_consistent(record: &InvoiceRecord) {
    let taxable: BigDecimal = record.items.iter().map(|i| &i.tax.taxable_value).sum();
    let group_taxable: BigDecimal = record.hsn_groups.values().map(|g| &g.taxable_value).sum();
    let group_tax: BigDecimal = record.hsn_groups.values().map(|g| g.total_tax()).sum();
    let charged: BigDecimal = record.items.iter().map(|i| &i.amount_after_discount).sum();

    assert_eq!(taxable, record.total_taxable_value);
    assert_eq!(group_taxable, record.total_taxable_value);
    assert_eq!(group_tax, record.total_tax);
    assert_eq!(charged, record.grand_total);
    assert_eq!(
        record.subtotal_after_discount,
        &record.subtotal_before_discount - &record.total_discount
    );
    assert!(record.total_discount >= BigDecimal::from(0));
}

#[test]
fn test_end_to_end_without_target() {
    let request = builder("PUNEEYE0001")
        .item(ItemDraft::new("Sunglasses A", 2, BigDecimal::from(1000)))
        .build()
        .unwrap();
    let record = InvoiceAssembler::default().assemble(request).unwrap();

    assert_eq!(record.total_taxable_value, dec("1694.92"));
    assert_eq!(record.total_cgst, dec("152.54"));
    assert_eq!(record.total_sgst, dec("152.54"));
    assert_eq!(record.grand_total, dec("2000.00"));
    assert_totals_consistent(&record);
}

#[test]
fn test_end_to_end_with_target() {
    let request = builder("PUNEEYE0002")
        .item(ItemDraft::new("Sunglasses A", 2, BigDecimal::from(1000)))
        .target_grand_total(BigDecimal::from(1800))
        .build()
        .unwrap();
    let record = InvoiceAssembler::default().assemble(request).unwrap();

    assert_eq!(record.total_discount, BigDecimal::from(200));
    assert_eq!(record.grand_total, BigDecimal::from(1800));
    assert_eq!(record.total_taxable_value, dec("1525.42"));
    assert_totals_consistent(&record);
}

#[test]
fn test_reconciled_grand_total_always_hits_target() {
    let assembler = InvoiceAssembler::default();
    let carts = vec![
        vec![
            ItemDraft::new("Aviator Sunglasses", 1, dec("2499")),
            ItemDraft::new("Reading Eyeglasses Frame", 3, dec("649.99")),
            ItemDraft::new("Lens", 2, dec("333.33")).with_discount(dec("66.66")),
        ],
        vec![
            ItemDraft::new("Reading Eyeglasses Frame", 3, dec("649.99")),
            ItemDraft::new("Wayfarer Sunglasses", 1, dec("1999")).with_discount(dec("199.90")),
            ItemDraft::new("Free Pouch", 1, dec("0")),
        ],
    ];

    for items in &carts {
        let unit_price_total: BigDecimal = items.iter().map(|i| i.line_total()).sum();
        for target in (0..1_000_000i64).step_by(9973) {
            let target = BigDecimal::new(target.into(), 2);
            let request = builder("T1")
                .items(items.clone())
                .target_grand_total(target.clone())
                .build()
                .unwrap();
            let record = assembler.assemble(request).unwrap();

            assert_eq!(record.grand_total, target, "target {}", target);
            assert!(record
                .items
                .iter()
                .all(|i| i.amount_after_discount >= BigDecimal::from(0)));
            if target <= unit_price_total {
                assert_eq!(record.subtotal_before_discount, unit_price_total);
                assert_eq!(record.total_discount, &unit_price_total - &target);
            } else {
                assert_eq!(record.subtotal_before_discount, target);
                assert_eq!(record.total_discount, BigDecimal::from(0));
            }
            assert_totals_consistent(&record);
        }
    }
}

#[test]
fn test_item_discount_then_target() {
    let request = builder("PUNEEYE0003")
        .item(
            ItemDraft::new("Sunglasses A", 2, BigDecimal::from(1000))
                .with_discount(BigDecimal::from(300)),
        )
        .target_grand_total(BigDecimal::from(1800))
        .build()
        .unwrap();
    let record = InvoiceAssembler::default().assemble(request).unwrap();

    assert_eq!(record.subtotal_before_discount, BigDecimal::from(2000));
    assert_eq!(record.total_discount, BigDecimal::from(200));
    assert_eq!(record.grand_total, BigDecimal::from(1800));
    assert_eq!(record.total_taxable_value, dec("1525.42"));
}

#[test]
fn test_words_for_record_totals() {
    let words = AmountInWordsConverter::convert(&dec("1500.50")).unwrap();
    assert!(words.contains("and Fifty Paise"));
    assert!(AmountInWordsConverter::convert(&dec("100000")).unwrap().contains("Lakh"));
    assert!(AmountInWordsConverter::convert(&dec("10000000")).unwrap().contains("Crore"));
    assert_eq!(AmountInWordsConverter::convert(&dec("0")).unwrap(), "Zero");
}

#[tokio::test]
async fn test_service_numbers_orders_per_location() {
    let service = InvoiceService::new(MemorySequenceStore::new());
    let order = OrderInput::from_json(&order_json(None)).unwrap();

    let first = service.create_invoice(&order).await.unwrap();
    let second = service.create_invoice(&order).await.unwrap();

    assert_eq!(first.invoice_number, "PUNEEYE0001");
    assert_eq!(second.invoice_number, "PUNEEYE0002");
    assert_eq!(first.customer.name, "Asha Rao");
    assert_eq!(first.payment_method, "Card");
    assert_eq!(first.grand_total, BigDecimal::from(2000));
    assert!(first.warnings.is_empty());
    assert_eq!(service.store().current_sequence("pune").await.unwrap(), 2);
}

#[tokio::test]
async fn test_service_uses_supplied_number_verbatim() {
    let service = InvoiceService::new(MemorySequenceStore::new());
    let order = OrderInput::from_json(&order_json(Some("SHOP/1001"))).unwrap();

    let record = service.create_invoice(&order).await.unwrap();

    assert_eq!(record.invoice_number, "SHOP/1001");
    assert_eq!(record.file_name("pdf"), "SHOP_1001.pdf");
    assert_eq!(service.store().current_sequence("pune").await.unwrap(), 0);
}

#[tokio::test]
async fn test_service_reconciles_order_to_target() {
    let service = InvoiceService::new(MemorySequenceStore::new());
    let order = OrderInput::from_json(&order_json(None)).unwrap();

    let record = service
        .create_invoice_with_target(&order, BigDecimal::from(1800))
        .await
        .unwrap();

    assert_eq!(record.grand_total, BigDecimal::from(1800));
    assert_eq!(record.total_discount, BigDecimal::from(200));
    // order said 2000, invoice now says 1800
    assert!(record.has_warning(WarningKind::OrderTotalMismatch));
}

#[tokio::test]
async fn test_service_with_custom_settings() {
    let settings = InvoiceSettings::from_toml_str(
        r#"
        company_suffix = "OPT"
        sequence_width = 6
        "#,
    )
    .unwrap();
    let service = InvoiceService::with_settings(
        MemorySequenceStore::new(),
        settings,
        TaxClassifier::default(),
    );
    let order = OrderInput::from_json(&order_json(None)).unwrap();

    let record = service.create_invoice(&order).await.unwrap();
    assert_eq!(record.invoice_number, "PUNEOPT000001");
}

#[tokio::test]
async fn test_synthetic_invoice_is_deterministic_per_seed() {
    let first = InvoiceService::new(MemorySequenceStore::new())
        .generate_synthetic(synthetic_params(12, None), &mut StdRng::seed_from_u64(11))
        .await
        .unwrap();
    let second = InvoiceService::new(MemorySequenceStore::new())
        .generate_synthetic(synthetic_params(12, None), &mut StdRng::seed_from_u64(11))
        .await
        .unwrap();

    assert_eq!(first.invoice_number, "PUNEEYE0001");
    assert_eq!(first.items.len(), second.items.len());
    for (a, b) in first.items.iter().zip(&second.items) {
        assert_eq!(a.item, b.item);
    }

    let units: u32 = first.items.iter().map(|i| i.item.quantity).sum();
    assert_eq!(units, 12);
    assert!(first.items.iter().all(|i| i.item.unit_price > BigDecimal::from(0)));
    assert_totals_consistent(&first);
}

#[tokio::test]
async fn test_synthetic_invoice_with_target() {
    let service = InvoiceService::new(MemorySequenceStore::new());
    let mut rng = StdRng::seed_from_u64(99);

    for round in 1..=20u64 {
        let record = service
            .generate_synthetic(synthetic_params(7, Some(dec("9999.99"))), &mut rng)
            .await
            .unwrap();

        assert_eq!(record.invoice_number, format!("PUNEEYE{:04}", round));
        assert_eq!(record.grand_total, dec("9999.99"));
        assert_totals_consistent(&record);
    }
}

#[tokio::test]
async fn test_synthetic_rejects_zero_quantity_without_consuming_number() {
    let service = InvoiceService::new(MemorySequenceStore::new());
    let result = service
        .generate_synthetic(synthetic_params(0, None), &mut StdRng::seed_from_u64(1))
        .await;

    assert!(result.is_err());
    assert_eq!(service.store().current_sequence("pune").await.unwrap(), 0);
}

#[tokio::test]
async fn test_file_store_backs_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sequences.json");
    let order = OrderInput::from_json(&order_json(None)).unwrap();

    let first = InvoiceService::new(FileSequenceStore::new(&path))
        .create_invoice(&order)
        .await
        .unwrap();
    let after_restart = InvoiceService::new(FileSequenceStore::new(&path))
        .create_invoice(&order)
        .await
        .unwrap();

    assert_eq!(first.invoice_number, "PUNEEYE0001");
    assert_eq!(after_restart.invoice_number, "PUNEEYE0002");
}

#[test]
fn test_record_round_trips_through_json_for_renderers() {
    let request = builder("SHOP/7")
        .item(ItemDraft::new("Reading Eyeglasses Frame", 1, dec("1050")))
        .build()
        .unwrap();
    let record = InvoiceAssembler::default().assemble(request).unwrap();

    let json = serde_json::to_string(&record).unwrap();
    let parsed: InvoiceRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, record);

    let text = PlainTextRenderer::default().render(&parsed).unwrap();
    assert!(text.contains("90031900 @ 5%"));
    assert!(text.contains("One Thousand Fifty Rupees"));
}
