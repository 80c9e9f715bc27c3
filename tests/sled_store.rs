//! End-to-end runs against the embedded sled store.
mod common;

use common::RecordingNotifier;
use sled::open;
use std::sync::Arc;
use stone_workshop::{
    builder::{NumericField, TextField},
    cart::{Cart, CartStore},
    config::DashboardConfig,
    dashboard::WorkshopDashboard,
    error::{ServiceError, TransitionError},
    orders::OrderState,
    pipeline::OrderRequest,
    process::{Process, ProcessType},
    service::RecordService,
    store::{SledCartStore, SledWorkshop},
};
use tempfile::tempdir;

struct Seeded {
    workshop: SledWorkshop,
    polish: i64,
    cut: i64,
    slab: i64,
    tiles: i64,
    lot: i64,
}

fn seed(db: Arc<sled::Db>) -> anyhow::Result<Seeded> {
    let workshop = SledWorkshop::new(db);

    let polish = workshop.insert_process(
        Process::new("Pulido", "PUL", ProcessType::Finish)
            .with_cost_per_sqm(10.0)
            .with_sequence(20),
    )?;
    let cut = workshop.insert_process(
        Process::new("Corte", "CRT", ProcessType::Cut)
            .with_cost_per_sqm(20.0)
            .with_sequence(10),
    )?;
    let mut retired = Process::new("Flameado", "FLA", ProcessType::Other);
    retired.active = false;
    workshop.insert_process(retired)?;

    let slab = workshop.insert_product("Granito Negro", true)?;
    let tiles = workshop.insert_product("Granito Negro 60x40", true)?;
    workshop.insert_product("Adhesivo", false)?;

    let lot = workshop.insert_lot(slab, "GN-001")?;
    let other_lot = workshop.insert_lot(slab, "GN-002")?;
    workshop.insert_quant(slab, Some(lot), 2.0, true)?;
    workshop.insert_quant(slab, Some(lot), 1.5, true)?;
    workshop.insert_quant(slab, Some(other_lot), 5.0, false)?; // in transit
    workshop.insert_quant(slab, None, 9.0, true)?;

    Ok(Seeded {
        workshop,
        polish,
        cut,
        slab,
        tiles,
        lot,
    })
}

fn request(seeded: &Seeded, process_id: i64) -> OrderRequest {
    OrderRequest {
        process_id,
        product_in_id: seeded.slab,
        lot_in_id: seeded.lot,
        qty_in: 3.5,
        product_out_id: seeded.tiles,
        qty_out: 3.5,
        format_width: "60".into(),
        format_height: "40".into(),
        format_qty: "10".into(),
        labor_cost: 4.0,
    }
}

#[tokio::test]
async fn catalogue_queries() -> anyhow::Result<()> {
    // Sled locks its directory, so every test gets its own database.
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("catalogue.db"))?);
    let seeded = seed(db)?;

    let processes = seeded.workshop.active_processes().await?;
    let codes: Vec<_> = processes.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["CRT", "PUL"]);

    let products = seeded.workshop.lot_tracked_products(200).await?;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Granito Negro", "Granito Negro 60x40"]);
    assert_eq!(seeded.workshop.lot_tracked_products(1).await?.len(), 1);

    let quants = seeded.workshop.internal_quants(seeded.slab).await?;
    assert_eq!(quants.len(), 3);
    let lots = stone_workshop::lots::aggregate_lots(&quants);
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].name, "GN-001");
    assert_eq!(lots[0].qty, 3.5);
    Ok(())
}

#[tokio::test]
async fn created_orders_carry_server_side_costs() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("create.db"))?);
    let seeded = seed(db)?;

    let cut_id = seeded.workshop.create_order(&request(&seeded, seeded.cut)).await?;
    let cut = seeded.workshop.order(cut_id)?;
    assert_eq!(cut.name, "WS/00001");
    assert_eq!(cut.state, OrderState::Draft);
    assert_eq!(cut.lot_out_name.as_deref(), Some("GN-001-CRT"));
    assert!((cut.area_sqm - 2.4).abs() < 1e-9);
    assert!((cut.process_cost - 48.0).abs() < 1e-9);
    assert!((cut.total_cost - 52.0).abs() < 1e-9);

    let polish_id = seeded
        .workshop
        .create_order(&request(&seeded, seeded.polish))
        .await?;
    let polish = seeded.workshop.order(polish_id)?;
    assert_eq!(polish.name, "WS/00002");
    assert_eq!(polish.area_sqm, 3.5);
    assert_eq!(polish.total_cost, 39.0);

    let recent = seeded.workshop.recent_orders(20).await?;
    assert_eq!(recent[0].id, polish_id);
    assert_eq!(recent[1].id, cut_id);
    assert_eq!(recent[1].process.as_ref().map(|p| p.1.as_str()), Some("Corte"));
    assert_eq!(recent[1].lot_in.as_ref().map(|l| l.1.as_str()), Some("GN-001"));
    assert_eq!(recent[1].state_label(), "Draft");
    Ok(())
}

#[tokio::test]
async fn unknown_process_is_rejected() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("unknown.db"))?);
    let seeded = seed(db)?;

    let result = seeded.workshop.create_order(&request(&seeded, 9_999)).await;
    assert!(matches!(
        result,
        Err(ServiceError::NotFound {
            kind: "workshop process",
            id: 9_999
        })
    ));
    assert!(seeded.workshop.recent_orders(20).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn order_lifecycle() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("lifecycle.db"))?);
    let seeded = seed(db)?;

    let id = seeded
        .workshop
        .create_order(&request(&seeded, seeded.polish))
        .await?;

    assert_eq!(seeded.workshop.confirm(id)?.state, OrderState::Confirmed);
    assert_eq!(seeded.workshop.start(id)?.state, OrderState::InProgress);
    let done = seeded.workshop.finish(id)?;
    assert_eq!(done.state, OrderState::Done);
    assert!(done.date_done.is_some());

    let rows = seeded.workshop.order_stat_rows().await?;
    assert_eq!(rows.len(), 1);

    assert_eq!(seeded.workshop.cancel(id)?.state, OrderState::Cancel);
    assert!(seeded.workshop.order_stat_rows().await?.is_empty());
    assert_eq!(seeded.workshop.reset_to_draft(id)?.state, OrderState::Draft);
    Ok(())
}

#[tokio::test]
async fn orders_need_known_products_and_a_matching_lot() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("references.db"))?);
    let seeded = seed(db)?;

    let mut orphan = request(&seeded, seeded.polish);
    orphan.product_out_id = 4_242;
    assert!(matches!(
        seeded.workshop.create_order(&orphan).await,
        Err(ServiceError::NotFound { kind: "product", id: 4_242 })
    ));

    // the lot belongs to the slab, not to the finished tiles
    let mut swapped = request(&seeded, seeded.polish);
    swapped.product_in_id = seeded.tiles;
    let result = seeded.workshop.create_order(&swapped).await;
    assert!(matches!(
        result,
        Err(ServiceError::LotMismatch { lot, product }) if lot == seeded.lot && product == seeded.tiles
    ));

    assert!(seeded.workshop.recent_orders(20).await?.is_empty());
    assert!(matches!(
        seeded.workshop.start(77_777),
        Err(TransitionError::Service(ServiceError::NotFound { .. }))
    ));
    Ok(())
}

#[tokio::test]
async fn cart_slot_round_trips_through_sled() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("cart.db"))?);
    let config = DashboardConfig::default();
    let seeded = seed(db.clone())?;

    let staged = {
        let store = SledCartStore::new(db.clone(), &config.cart_storage_key);
        let mut dashboard = WorkshopDashboard::start(
            seeded.workshop.clone(),
            RecordingNotifier::default(),
            store,
            config.clone(),
        )
        .await?;

        assert!(dashboard.select_process(seeded.cut));
        dashboard.choose_input_product(Some(seeded.slab)).await?;
        dashboard.choose_input_lot(Some(seeded.lot));
        dashboard.choose_output_product(Some(seeded.tiles));
        dashboard.set_text(TextField::FormatWidth, "60");
        dashboard.set_text(TextField::FormatHeight, "40");
        dashboard.set_text(TextField::FormatQty, "10");
        dashboard.set_numeric(NumericField::LaborCost, "4");
        assert!(dashboard.add_to_cart());

        dashboard.cart().entries().to_vec()
    };

    // a new session reads the same slot
    let store = SledCartStore::new(db.clone(), &config.cart_storage_key);
    assert_eq!(store.load()?, staged);

    let mut cart = Cart::restore(store);
    assert_eq!(cart.entries(), staged.as_slice());
    assert_eq!(cart.entries()[0].lot_out_name, "GN-001-CRT");

    let submission = stone_workshop::pipeline::submit_cart(&mut cart, &seeded.workshop).await;
    assert!(submission.is_complete());
    assert!(cart.is_empty());
    assert!(SledCartStore::new(db, &config.cart_storage_key).load()?.is_empty());

    let order = seeded.workshop.order(submission.created()[0])?;
    assert!((order.total_cost - staged[0].total_cost).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn corrupt_cart_slot_restores_empty() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = Arc::new(open(temp_dir.path().join("corrupt.db"))?);
    db.insert("ws_cart", "[{\"key\":".as_bytes())?;

    let cart = Cart::restore(SledCartStore::new(db, "ws_cart"));
    assert!(cart.is_empty());
    Ok(())
}
