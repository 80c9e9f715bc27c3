//! Workshop dashboard: ties the order builder, the cart and the record service together
use super::builder::{NumericField, OrderBuilder, TextField};
use super::cart::{Cart, CartStore};
use super::config::DashboardConfig;
use super::error::ServiceError;
use super::orders::{OrderStats, OrderSummary};
use super::pipeline::{Submission, submit_cart};
use super::process::{Process, Product, RecordId};
use super::service::{NoticeLevel, Notifier, OrderAction, RecordService};
use tracing::{debug, warn};

pub struct WorkshopDashboard<R, N, S>
where
    R: RecordService,
    N: Notifier,
    S: CartStore,
{
    config: DashboardConfig,
    records: R,
    notifier: N,
    builder: OrderBuilder,
    cart: Cart<S>,
    processes: Vec<Process>,
    products: Vec<Product>,
    recent_orders: Vec<OrderSummary>,
    stats: OrderStats,
}

impl<R, N, S> WorkshopDashboard<R, N, S>
where
    R: RecordService,
    N: Notifier,
    S: CartStore,
{
    /// Restore the cart and load processes, products, recent orders and counters.
    pub async fn start(
        records: R,
        notifier: N,
        store: S,
        config: DashboardConfig,
    ) -> Result<Self, ServiceError> {
        let mut dashboard = Self {
            config,
            records,
            notifier,
            builder: OrderBuilder::default(),
            cart: Cart::restore(store),
            processes: Vec::new(),
            products: Vec::new(),
            recent_orders: Vec::new(),
            stats: OrderStats::default(),
        };

        dashboard.processes = dashboard.records.active_processes().await?;
        dashboard.products = dashboard
            .records
            .lot_tracked_products(dashboard.config.product_limit)
            .await?;
        dashboard.builder.set_catalogue(dashboard.products.clone());
        dashboard.refresh().await?;

        Ok(dashboard)
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }
    pub fn products(&self) -> &[Product] {
        &self.products
    }
    pub fn builder(&self) -> &OrderBuilder {
        &self.builder
    }
    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }
    pub fn cart_total(&self) -> f64 {
        self.cart.total()
    }
    pub fn recent_orders(&self) -> &[OrderSummary] {
        &self.recent_orders
    }
    pub fn stats(&self) -> OrderStats {
        self.stats
    }

    /// Reload the recent orders list and the counters.
    pub async fn refresh(&mut self) -> Result<(), ServiceError> {
        self.recent_orders = self
            .records
            .recent_orders(self.config.recent_order_limit)
            .await?;
        self.stats = OrderStats::from_rows(&self.records.order_stat_rows().await?);
        Ok(())
    }

    /// Returns false when `process_id` is not an active process.
    pub fn select_process(&mut self, process_id: RecordId) -> bool {
        match self.processes.iter().find(|p| p.id == process_id) {
            Some(process) => {
                self.builder.select_process(process.clone());
                true
            }
            None => false,
        }
    }

    /// Set the input product and load the lots it has in stock.
    pub async fn choose_input_product(
        &mut self,
        product_id: Option<RecordId>,
    ) -> Result<(), ServiceError> {
        self.builder.set_input_product(product_id);
        if let Some(id) = product_id {
            let quants = self.records.internal_quants(id).await?;
            self.builder.set_lots(&quants);
            debug!(product_id = id, lots = self.builder.lots().len(), "lots loaded");
        }
        Ok(())
    }

    pub fn choose_input_lot(&mut self, lot_id: Option<RecordId>) {
        self.builder.set_input_lot(lot_id);
    }
    pub fn choose_output_product(&mut self, product_id: Option<RecordId>) {
        self.builder.set_output_product(product_id);
    }
    pub fn set_numeric(&mut self, field: NumericField, raw: &str) {
        self.builder.set_numeric(field, raw);
    }
    pub fn set_text(&mut self, field: TextField, raw: &str) {
        self.builder.set_text(field, raw);
    }

    /// Stage the current draft. An incomplete draft is reported and left untouched.
    pub fn add_to_cart(&mut self) -> bool {
        match self.builder.stage() {
            Ok(staged) => {
                let message = format!("{} added to cart", staged.process_name);
                self.cart.add(staged);
                self.notifier.notify(NoticeLevel::Success, &message);
                true
            }
            Err(e) => {
                debug!(reason = %e, "draft not staged");
                self.notifier
                    .notify(NoticeLevel::Warning, "Complete all fields before adding.");
                false
            }
        }
    }

    pub fn remove_from_cart(&mut self, key: &str) -> bool {
        self.cart.remove_by_key(key)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Turn the cart into workshop orders. Only a fully submitted cart refreshes the
    /// orders list and counters.
    pub async fn process_cart(&mut self) -> Submission {
        let submission = submit_cart(&mut self.cart, &self.records).await;

        match &submission {
            Submission::Nothing => {}
            Submission::Complete { created } => {
                self.notifier.notify(
                    NoticeLevel::Success,
                    &format!("{} order(s) created successfully", created.len()),
                );
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "orders could not be refreshed after submission");
                }
            }
            Submission::Partial { error, .. } => {
                self.notifier.notify(
                    NoticeLevel::Danger,
                    &format!("Error creating orders: {error}"),
                );
            }
        }

        submission
    }

    pub fn open_order(&self, order_id: RecordId) -> OrderAction {
        OrderAction::Open(order_id)
    }

    pub fn new_order_form(&self) -> OrderAction {
        OrderAction::NewForm
    }
}
