//! Submission of the cart as workshop orders.
//!
//! Entries are created one at a time in cart order. The first failure stops the batch;
//! orders created before it stay created and only they leave the cart.
use super::cart::{Cart, CartStore};
use super::error::ServiceError;
use super::operation::StagedOperation;
use super::process::RecordId;
use super::service::RecordService;
use tracing::{debug, info, warn};

/// Fields sent to create one order. Output lot name and costs are left to the
/// record service, which derives them itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub process_id: RecordId,
    pub product_in_id: RecordId,
    pub lot_in_id: RecordId,
    pub qty_in: f64,
    pub product_out_id: RecordId,
    pub qty_out: f64,
    pub format_width: String,
    pub format_height: String,
    pub format_qty: String,
    pub labor_cost: f64,
}

impl From<&StagedOperation> for OrderRequest {
    fn from(entry: &StagedOperation) -> Self {
        Self {
            process_id: entry.process_id,
            product_in_id: entry.product_in_id,
            lot_in_id: entry.lot_in_id,
            qty_in: entry.qty_in,
            product_out_id: entry.product_out_id,
            qty_out: entry.qty_out,
            format_width: entry.format_width.clone(),
            format_height: entry.format_height.clone(),
            format_qty: entry.format_qty.clone(),
            labor_cost: entry.labor_cost,
        }
    }
}

#[derive(Debug)]
pub enum Submission {
    /// The cart was empty.
    Nothing,
    Complete {
        created: Vec<RecordId>,
    },
    Partial {
        created: Vec<RecordId>,
        failed_index: usize,
        remaining: Vec<StagedOperation>,
        error: ServiceError,
    },
}

impl Submission {
    pub fn created(&self) -> &[RecordId] {
        match self {
            Submission::Nothing => &[],
            Submission::Complete { created } | Submission::Partial { created, .. } => created,
        }
    }
    pub fn is_complete(&self) -> bool {
        matches!(self, Submission::Complete { .. })
    }
}

pub async fn submit_cart<S, R>(cart: &mut Cart<S>, records: &R) -> Submission
where
    S: CartStore,
    R: RecordService + ?Sized,
{
    if cart.is_empty() {
        return Submission::Nothing;
    }

    let requests: Vec<OrderRequest> = cart.entries().iter().map(OrderRequest::from).collect();
    let mut created = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        match records.create_order(request).await {
            Ok(id) => {
                debug!(index, order_id = id, "workshop order created");
                created.push(id);
            }
            Err(error) => {
                warn!(index, %error, "order submission stopped");
                cart.drop_submitted(created.len());
                return Submission::Partial {
                    created,
                    failed_index: index,
                    remaining: cart.entries().to_vec(),
                    error,
                };
            }
        }
    }

    info!(count = created.len(), "cart submitted");
    cart.clear();
    Submission::Complete { created }
}
