//! Stage two operations against a throwaway sled store and submit them.
//!
//! Run with `RUST_LOG=debug cargo run --example workshop` to follow the store writes.
use anyhow::Context;
use std::sync::Arc;
use stone_workshop::{
    builder::{NumericField, TextField},
    config::DashboardConfig,
    dashboard::WorkshopDashboard,
    process::{Process, ProcessType},
    service::{NoticeLevel, Notifier},
    store::{SledCartStore, SledWorkshop},
};
use tracing_subscriber::EnvFilter;

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        println!("[{level:?}] {message}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let temp_dir = tempfile::tempdir()?;
    let db = Arc::new(sled::open(temp_dir.path().join("workshop.db"))?);
    let config = DashboardConfig::default();

    let workshop = SledWorkshop::new(db.clone());
    let polish = workshop.insert_process(
        Process::new("Pulido", "PUL", ProcessType::Finish).with_cost_per_sqm(12.5),
    )?;
    let cut = workshop.insert_process(
        Process::new("Corte", "CRT", ProcessType::Cut).with_cost_per_sqm(18.0),
    )?;
    let slab = workshop.insert_product("Mármol Travertino", true)?;
    let polished = workshop.insert_product("Mármol Travertino Pulido", true)?;
    let tiles = workshop.insert_product("Travertino 60x40", true)?;
    let lot = workshop.insert_lot(slab, "TR-0107")?;
    workshop.insert_quant(slab, Some(lot), 6.2, true)?;

    let store = SledCartStore::new(db, &config.cart_storage_key);
    let mut dashboard = WorkshopDashboard::start(workshop, ConsoleNotifier, store, config)
        .await
        .context("dashboard failed to start")?;

    dashboard.select_process(polish);
    dashboard.choose_input_product(Some(slab)).await?;
    dashboard.choose_input_lot(Some(lot));
    dashboard.choose_output_product(Some(polished));
    dashboard.set_numeric(NumericField::LaborCost, "15");
    dashboard.add_to_cart();

    dashboard.select_process(cut);
    dashboard.choose_input_product(Some(slab)).await?;
    dashboard.choose_input_lot(Some(lot));
    dashboard.choose_output_product(Some(tiles));
    dashboard.set_text(TextField::FormatWidth, "60");
    dashboard.set_text(TextField::FormatHeight, "40");
    dashboard.set_text(TextField::FormatQty, "24");
    dashboard.add_to_cart();

    println!("cart total: {:.2}", dashboard.cart_total());
    dashboard.process_cart().await;

    for order in dashboard.recent_orders() {
        println!(
            "{} {} -> {} [{}] {:.2}",
            order.name,
            order.lot_in.as_ref().map(|l| l.1.as_str()).unwrap_or("-"),
            order.lot_out_name,
            order.state_label(),
            order.total_cost
        );
    }
    println!("{:?}", dashboard.stats());
    Ok(())
}
