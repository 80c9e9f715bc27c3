//! Embedded record store over sled
//!
//! Implements [`RecordService`] for installations without a remote ERP. Records are
//! CBOR encoded, one sled tree per record kind, keyed by big-endian id.
use super::cart::{CartStore, decode_entries, encode_entries};
use super::costs::finite_or_zero;
use super::error::{ServiceError, StorageError, TransitionError};
use super::lots::StockQuant;
use super::operation::StagedOperation;
use super::orders::{OrderState, OrderSummary, StatRow};
use super::parse::{parse_lenient, parse_lenient_int};
use super::pipeline::OrderRequest;
use super::process::{Process, ProcessType, Product, RecordId, sort_catalogue};
use super::service::RecordService;
use super::utils::TimeStamp;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

const PROCESSES: &str = "processes";
const PRODUCTS: &str = "products";
const LOTS: &str = "lots";
const QUANTS: &str = "quants";
const ORDERS: &str = "orders";
const ORDER_SEQUENCE: &[u8] = b"order_sequence";

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct ProductRecord {
    #[n(0)]
    pub id: RecordId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub lot_tracked: bool,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct LotRecord {
    #[n(0)]
    pub id: RecordId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub product_id: RecordId,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct QuantRecord {
    #[n(0)]
    pub id: RecordId,
    #[n(1)]
    pub product_id: RecordId,
    #[n(2)]
    pub lot_id: Option<RecordId>,
    #[n(3)]
    pub quantity: f64,
    #[n(4)]
    pub internal: bool, // held in an internal location
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct OrderRecord {
    #[n(0)]
    pub id: RecordId,
    #[n(1)]
    pub name: String, // WS/00001
    #[n(2)]
    pub state: OrderState,
    #[n(3)]
    pub process_id: RecordId,
    #[n(4)]
    pub process_type: ProcessType,
    #[n(5)]
    pub product_in_id: RecordId,
    #[n(6)]
    pub lot_in_id: RecordId,
    #[n(7)]
    pub qty_in: f64,
    #[n(8)]
    pub product_out_id: RecordId,
    #[n(9)]
    pub lot_out_name: Option<String>,
    #[n(10)]
    pub qty_out: f64,
    #[n(11)]
    pub format_width: f64,
    #[n(12)]
    pub format_height: f64,
    #[n(13)]
    pub format_qty: i64,
    #[n(14)]
    pub area_sqm: f64,
    #[n(15)]
    pub process_cost: f64,
    #[n(16)]
    pub labor_cost: f64,
    #[n(17)]
    pub total_cost: f64,
    #[n(18)]
    pub created_at: TimeStamp<Utc>,
    #[n(19)]
    pub date_done: Option<TimeStamp<Utc>>,
}

/// Area an order is billed for once stored. Unlike the draft, a cut without complete
/// dimensions falls back to the input quantity.
pub fn stored_area(process_type: ProcessType, qty_in: f64, width: f64, height: f64, pieces: i64) -> f64 {
    if process_type == ProcessType::Cut && width != 0.0 && height != 0.0 && pieces != 0 {
        finite_or_zero((width / 100.0) * (height / 100.0) * pieces as f64)
    } else {
        qty_in
    }
}

#[derive(Clone)]
pub struct SledWorkshop {
    instance: Arc<sled::Db>,
}

impl SledWorkshop {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn next_id(&self) -> Result<RecordId, ServiceError> {
        Ok(self.instance.generate_id()? as RecordId + 1)
    }

    fn put<T: minicbor::Encode<()>>(&self, tree: &str, id: RecordId, record: &T) -> Result<(), ServiceError> {
        let cbor = minicbor::to_vec(record)?;
        self.instance.open_tree(tree)?.insert(id.to_be_bytes(), cbor)?;
        Ok(())
    }

    fn get<T>(&self, tree: &str, id: RecordId) -> Result<Option<T>, ServiceError>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.instance.open_tree(tree)?.get(id.to_be_bytes())? {
            Some(cbor) => Ok(Some(minicbor::decode(&cbor)?)),
            None => Ok(None),
        }
    }

    fn scan<T>(&self, tree: &str) -> Result<Vec<T>, ServiceError>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        let mut records = Vec::new();
        for entry in self.instance.open_tree(tree)?.iter() {
            let (_, cbor) = entry?;
            records.push(minicbor::decode(&cbor)?);
        }
        Ok(records)
    }

    fn next_order_name(&self) -> Result<String, ServiceError> {
        let counter = self.instance.update_and_fetch(ORDER_SEQUENCE, |old| {
            let current = old
                .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
                .map(u64::from_be_bytes)
                .unwrap_or(0);
            Some((current + 1).to_be_bytes().to_vec())
        })?;
        let sequence = counter
            .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_ref()).ok())
            .map(u64::from_be_bytes)
            .unwrap_or(1);

        Ok(format!("WS/{sequence:05}"))
    }

    /// Store a process; its `id` is assigned here.
    pub fn insert_process(&self, mut process: Process) -> Result<RecordId, ServiceError> {
        process.id = self.next_id()?;
        self.put(PROCESSES, process.id, &process)?;
        Ok(process.id)
    }

    pub fn insert_product(&self, name: &str, lot_tracked: bool) -> Result<RecordId, ServiceError> {
        let id = self.next_id()?;
        let record = ProductRecord {
            id,
            name: name.to_string(),
            lot_tracked,
        };
        self.put(PRODUCTS, id, &record)?;
        Ok(id)
    }

    pub fn insert_lot(&self, product_id: RecordId, name: &str) -> Result<RecordId, ServiceError> {
        let id = self.next_id()?;
        let record = LotRecord {
            id,
            name: name.to_string(),
            product_id,
        };
        self.put(LOTS, id, &record)?;
        Ok(id)
    }

    pub fn insert_quant(
        &self,
        product_id: RecordId,
        lot_id: Option<RecordId>,
        quantity: f64,
        internal: bool,
    ) -> Result<RecordId, ServiceError> {
        let id = self.next_id()?;
        let record = QuantRecord {
            id,
            product_id,
            lot_id,
            quantity,
            internal,
        };
        self.put(QUANTS, id, &record)?;
        Ok(id)
    }

    pub fn order(&self, order_id: RecordId) -> Result<OrderRecord, ServiceError> {
        self.get(ORDERS, order_id)?.ok_or(ServiceError::NotFound {
            kind: "workshop order",
            id: order_id,
        })
    }

    fn set_state(&self, order_id: RecordId, state: OrderState) -> Result<OrderRecord, ServiceError> {
        let mut order = self.order(order_id)?;
        order.state = state;
        if state == OrderState::Done {
            order.date_done = Some(TimeStamp::new());
        }
        self.put(ORDERS, order.id, &order)?;
        info!(order = %order.name, state = state.as_str(), "order state changed");
        Ok(order)
    }

    /// Confirm an order once its input and output references resolve.
    pub fn confirm(&self, order_id: RecordId) -> Result<OrderRecord, TransitionError> {
        let order = self.order(order_id)?;
        let product_in = self.get::<ProductRecord>(PRODUCTS, order.product_in_id)?;
        let lot_in = self.get::<LotRecord>(LOTS, order.lot_in_id)?;
        if product_in.is_none() || lot_in.is_none() {
            return Err(TransitionError::MissingInput(order_id));
        }
        if self.get::<ProductRecord>(PRODUCTS, order.product_out_id)?.is_none() {
            return Err(TransitionError::MissingOutput(order_id));
        }
        Ok(self.set_state(order_id, OrderState::Confirmed)?)
    }

    pub fn start(&self, order_id: RecordId) -> Result<OrderRecord, TransitionError> {
        Ok(self.set_state(order_id, OrderState::InProgress)?)
    }

    /// Mark an order done and stamp its completion time.
    pub fn finish(&self, order_id: RecordId) -> Result<OrderRecord, TransitionError> {
        Ok(self.set_state(order_id, OrderState::Done)?)
    }

    pub fn cancel(&self, order_id: RecordId) -> Result<OrderRecord, TransitionError> {
        Ok(self.set_state(order_id, OrderState::Cancel)?)
    }

    pub fn reset_to_draft(&self, order_id: RecordId) -> Result<OrderRecord, TransitionError> {
        Ok(self.set_state(order_id, OrderState::Draft)?)
    }

    fn label<T>(&self, tree: &str, id: RecordId, name: impl Fn(T) -> String) -> Result<Option<(RecordId, String)>, ServiceError>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        Ok(self.get::<T>(tree, id)?.map(|record| (id, name(record))))
    }

    fn summarise(&self, order: OrderRecord) -> Result<OrderSummary, ServiceError> {
        Ok(OrderSummary {
            id: order.id,
            name: order.name,
            process: self.label(PROCESSES, order.process_id, |p: Process| p.name)?,
            product_in: self.label(PRODUCTS, order.product_in_id, |p: ProductRecord| p.name)?,
            lot_in: self.label(LOTS, order.lot_in_id, |l: LotRecord| l.name)?,
            product_out: self.label(PRODUCTS, order.product_out_id, |p: ProductRecord| p.name)?,
            lot_out_name: order.lot_out_name.unwrap_or_default(),
            total_cost: order.total_cost,
            state: order.state.as_str().to_string(),
        })
    }
}

#[async_trait]
impl RecordService for SledWorkshop {
    async fn active_processes(&self) -> Result<Vec<Process>, ServiceError> {
        let mut processes: Vec<Process> = self
            .scan::<Process>(PROCESSES)?
            .into_iter()
            .filter(|p| p.active)
            .collect();
        sort_catalogue(&mut processes);
        Ok(processes)
    }

    async fn lot_tracked_products(&self, limit: usize) -> Result<Vec<Product>, ServiceError> {
        let mut products: Vec<ProductRecord> = self
            .scan::<ProductRecord>(PRODUCTS)?
            .into_iter()
            .filter(|p| p.lot_tracked)
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(products
            .into_iter()
            .take(limit)
            .map(|p| Product::new(p.id, &p.name))
            .collect())
    }

    async fn internal_quants(&self, product_id: RecordId) -> Result<Vec<StockQuant>, ServiceError> {
        let quants = self.scan::<QuantRecord>(QUANTS)?;
        let mut rows = Vec::new();

        for quant in quants {
            if quant.product_id != product_id || !quant.internal || quant.quantity <= 0.0 {
                continue;
            }
            let lot = match quant.lot_id {
                Some(lot_id) => self.label(LOTS, lot_id, |l: LotRecord| l.name)?,
                None => None,
            };
            rows.push(StockQuant {
                product_id,
                lot,
                quantity: quant.quantity,
            });
        }
        Ok(rows)
    }

    async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderSummary>, ServiceError> {
        let mut orders = self.scan::<OrderRecord>(ORDERS)?;
        orders.sort_by(|a, b| {
            let (a_at, b_at) = (a.created_at.to_datetime_utc(), b.created_at.to_datetime_utc());
            b_at.cmp(&a_at).then_with(|| b.id.cmp(&a.id))
        });

        orders
            .into_iter()
            .take(limit)
            .map(|order| self.summarise(order))
            .collect()
    }

    async fn order_stat_rows(&self) -> Result<Vec<StatRow>, ServiceError> {
        Ok(self
            .scan::<OrderRecord>(ORDERS)?
            .into_iter()
            .filter(|order| order.state != OrderState::Cancel)
            .map(|order| StatRow {
                state: order.state.as_str().to_string(),
                process_type: Some(order.process_type),
            })
            .collect())
    }

    /// Create a draft order, deriving lot-out name, area and costs from the request.
    async fn create_order(&self, request: &OrderRequest) -> Result<RecordId, ServiceError> {
        let process: Process = self.get(PROCESSES, request.process_id)?.ok_or(ServiceError::NotFound {
            kind: "workshop process",
            id: request.process_id,
        })?;
        for product_id in [request.product_in_id, request.product_out_id] {
            if self.get::<ProductRecord>(PRODUCTS, product_id)?.is_none() {
                return Err(ServiceError::NotFound {
                    kind: "product",
                    id: product_id,
                });
            }
        }
        let lot: LotRecord = self.get(LOTS, request.lot_in_id)?.ok_or(ServiceError::NotFound {
            kind: "lot",
            id: request.lot_in_id,
        })?;
        if lot.product_id != request.product_in_id {
            return Err(ServiceError::LotMismatch {
                lot: lot.id,
                product: request.product_in_id,
            });
        }

        let format_width = parse_lenient(&request.format_width);
        let format_height = parse_lenient(&request.format_height);
        let format_qty = parse_lenient_int(&request.format_qty);
        let area_sqm = stored_area(
            process.process_type,
            request.qty_in,
            format_width,
            format_height,
            format_qty,
        );
        let process_cost = finite_or_zero(area_sqm * process.cost_per_sqm);

        let order = OrderRecord {
            id: self.next_id()?,
            name: self.next_order_name()?,
            state: OrderState::Draft,
            process_id: process.id,
            process_type: process.process_type,
            product_in_id: request.product_in_id,
            lot_in_id: lot.id,
            qty_in: request.qty_in,
            product_out_id: request.product_out_id,
            lot_out_name: Some(format!("{}-{}", lot.name, process.code)),
            qty_out: request.qty_out,
            format_width,
            format_height,
            format_qty,
            area_sqm,
            process_cost,
            labor_cost: request.labor_cost,
            total_cost: finite_or_zero(process_cost + request.labor_cost),
            created_at: TimeStamp::new(),
            date_done: None,
        };

        self.put(ORDERS, order.id, &order)?;
        debug!(order = %order.name, total_cost = order.total_cost, "workshop order stored");
        Ok(order.id)
    }
}

/// Cart slot kept under a single sled key.
pub struct SledCartStore {
    instance: Arc<sled::Db>,
    key: String,
}

impl SledCartStore {
    pub fn new(instance: Arc<sled::Db>, key: &str) -> Self {
        Self {
            instance,
            key: key.to_string(),
        }
    }
}

impl CartStore for SledCartStore {
    fn load(&self) -> Result<Vec<StagedOperation>, StorageError> {
        let raw = self
            .instance
            .get(self.key.as_bytes())
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        match raw {
            Some(bytes) => {
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| StorageError::Unavailable(e.to_string()))?;
                decode_entries(text)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[StagedOperation]) -> Result<(), StorageError> {
        let raw = encode_entries(entries)?;
        self.instance
            .insert(self.key.as_bytes(), raw.as_bytes())
            .and_then(|_| self.instance.flush())
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
