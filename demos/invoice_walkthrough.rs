//! Invoice walkthrough: order intake, target reconciliation and synthetic invoices

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use gst_invoice_core::{
    CandidateProduct, Customer, InvoiceRenderer, InvoiceService, Location, MemorySequenceStore,
    OrderInput, PlainTextRenderer, SyntheticInvoiceParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const ORDER: &str = r#"{
    "customerName": "Asha Rao",
    "customerPhone": "+91 98200 00000",
    "items": [
        {"title": "Aviator Sunglasses", "quantity": 1, "price": 2499},
        {"title": "Reading Frame", "productType": "Eyeglasses", "quantity": 2, "price": 1299, "discountPercentage": 10}
    ],
    "total": 4837.20,
    "paymentMethod": "UPI",
    "location": {"city": "Pune", "state": "Maharashtra", "gstNumber": "27ABCDE1234F1Z5"},
    "timestamp": "2024-03-01T10:15:00Z"
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧾 GST Invoice Core - Walkthrough\n");

    let service = InvoiceService::new(MemorySequenceStore::new());
    let renderer = PlainTextRenderer::default();

    // 1. Invoice an order exactly as charged
    println!("📦 Invoicing a point-of-sale order...");
    let order = OrderInput::from_json(ORDER)?;
    let record = service.create_invoice(&order).await?;
    println!("{}", renderer.render(&record)?);

    // 2. Same order, reconciled down to a round amount
    println!("💸 Reconciling the order to ₹4500...");
    let record = service
        .create_invoice_with_target(&order, BigDecimal::from(4500))
        .await?;
    println!("{}", renderer.render(&record)?);
    for warning in &record.warnings {
        println!("  ⚠ {:?}: {}", warning.kind, warning.message);
    }
    println!();

    // 3. Synthetic invoice from a product pool
    println!("🎲 Generating a synthetic invoice...");
    let params = SyntheticInvoiceParams {
        total_quantity: 6,
        pool: vec![
            CandidateProduct::new("Aviator Sunglasses", BigDecimal::from(2499)),
            CandidateProduct::new("Round Eyeglasses Frame", BigDecimal::from(1299)),
            CandidateProduct::new("Blue-cut Lens Pair", BigDecimal::from(899)),
            CandidateProduct::new("Wayfarer Sunglasses", BigDecimal::from(1999)),
        ],
        target_grand_total: Some(BigDecimal::from(10000)),
        customer: Customer::named("Walk-in"),
        location: Location::new("Pune", "Maharashtra", "27ABCDE1234F1Z5"),
        payment_method: "Cash".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let record = service.generate_synthetic(params, &mut rng).await?;
    println!("{}", renderer.render(&record)?);
    println!("  ✓ Saved as {}", record.file_name("txt"));

    println!("\n🎉 Walkthrough completed!");

    Ok(())
}
