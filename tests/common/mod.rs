//! Shared fakes for the dashboard scenarios.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use stone_workshop::{
    error::ServiceError,
    lots::StockQuant,
    orders::{OrderSummary, StatRow},
    pipeline::OrderRequest,
    process::{Process, ProcessType, Product, RecordId},
    service::{NoticeLevel, Notifier, RecordService},
};

pub const MARBLE: RecordId = 10;
pub const MARBLE_POLISHED: RecordId = 11;
pub const MARBLE_LOT: RecordId = 100;
pub const POLISH: RecordId = 1;
pub const CUT: RecordId = 2;

#[derive(Default)]
pub struct FakeState {
    pub processes: Vec<Process>,
    pub products: Vec<Product>,
    pub quants: Vec<StockQuant>,
    pub created: Vec<OrderRequest>,
    pub create_calls: usize,
    pub fail_on_call: Option<usize>, // zero-based create call that fails
    pub order_loads: usize,
    pub stat_loads: usize,
}

/// Record service kept in memory; clones share state so tests can inspect it.
#[derive(Clone, Default)]
pub struct FakeRecords {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeRecords {
    pub fn stocked() -> Self {
        let records = FakeRecords::default();
        {
            let mut state = records.state.lock().unwrap();
            state.processes = vec![
                Process::new("Pulido", "PUL", ProcessType::Finish)
                    .with_id(POLISH)
                    .with_cost_per_sqm(10.0),
                Process::new("Corte", "CRT", ProcessType::Cut)
                    .with_id(CUT)
                    .with_cost_per_sqm(20.0),
            ];
            state.products = vec![
                Product::new(MARBLE, "Mármol Blanco"),
                Product::new(MARBLE_POLISHED, "Mármol Blanco Pulido"),
            ];
            state.quants = vec![
                StockQuant {
                    product_id: MARBLE,
                    lot: Some((MARBLE_LOT, "MB-100".into())),
                    quantity: 3.0,
                },
                StockQuant {
                    product_id: MARBLE,
                    lot: Some((MARBLE_LOT, "MB-100".into())),
                    quantity: 1.0,
                },
            ];
        }
        records
    }

    pub fn fail_on(&self, call: usize) {
        self.state.lock().unwrap().fail_on_call = Some(call);
    }

    pub fn created(&self) -> Vec<OrderRequest> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn order_loads(&self) -> usize {
        self.state.lock().unwrap().order_loads
    }

    pub fn stat_loads(&self) -> usize {
        self.state.lock().unwrap().stat_loads
    }
}

#[async_trait]
impl RecordService for FakeRecords {
    async fn active_processes(&self) -> Result<Vec<Process>, ServiceError> {
        Ok(self.state.lock().unwrap().processes.clone())
    }

    async fn lot_tracked_products(&self, limit: usize) -> Result<Vec<Product>, ServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state.products.iter().take(limit).cloned().collect())
    }

    async fn internal_quants(&self, product_id: RecordId) -> Result<Vec<StockQuant>, ServiceError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .quants
            .iter()
            .filter(|q| q.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderSummary>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.order_loads += 1;
        Ok(state
            .created
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(index, request)| OrderSummary {
                id: index as RecordId + 1,
                name: format!("WS/{:05}", index + 1),
                process: Some((request.process_id, String::new())),
                product_in: Some((request.product_in_id, String::new())),
                lot_in: Some((request.lot_in_id, String::new())),
                product_out: Some((request.product_out_id, String::new())),
                lot_out_name: String::new(),
                total_cost: 0.0,
                state: "draft".into(),
            })
            .collect())
    }

    async fn order_stat_rows(&self) -> Result<Vec<StatRow>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.stat_loads += 1;
        Ok(state
            .created
            .iter()
            .map(|_| StatRow {
                state: "draft".into(),
                process_type: Some(ProcessType::Finish),
            })
            .collect())
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<RecordId, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let call = state.create_calls;
        state.create_calls += 1;
        if state.fail_on_call == Some(call) {
            return Err(ServiceError::Remote("lot is reserved".into()));
        }
        state.created.push(request.clone());
        Ok(state.created.len() as RecordId)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub notices: Arc<Mutex<Vec<(NoticeLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(NoticeLevel, String)> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}
