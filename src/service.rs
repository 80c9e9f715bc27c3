//! Collaborators the dashboard talks to: the record service and the notifier.
use super::error::ServiceError;
use super::lots::StockQuant;
use super::orders::{OrderSummary, StatRow};
use super::pipeline::OrderRequest;
use super::process::{Process, Product, RecordId};
use async_trait::async_trait;

/// Remote record store holding processes, stock and workshop orders.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Active processes in catalogue order.
    async fn active_processes(&self) -> Result<Vec<Process>, ServiceError>;

    /// Stockable, lot-tracked products by name, at most `limit`.
    async fn lot_tracked_products(&self, limit: usize) -> Result<Vec<Product>, ServiceError>;

    /// Positive quants of `product_id` held in internal locations.
    async fn internal_quants(&self, product_id: RecordId) -> Result<Vec<StockQuant>, ServiceError>;

    /// Newest orders first, at most `limit`.
    async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderSummary>, ServiceError>;

    /// State and process type of every order that is not cancelled.
    async fn order_stat_rows(&self) -> Result<Vec<StatRow>, ServiceError>;

    async fn create_order(&self, request: &OrderRequest) -> Result<RecordId, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
}

pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Navigation the host should perform for the order entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Open(RecordId),
    NewForm,
}
