//! Recent workshop orders and the dashboard counters.
use super::process::{ProcessType, RecordId};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    #[n(0)]
    Draft,
    #[n(1)]
    Confirmed,
    #[n(2)]
    InProgress,
    #[n(3)]
    Done,
    #[n(4)]
    Cancel,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Draft => "draft",
            OrderState::Confirmed => "confirmed",
            OrderState::InProgress => "in_progress",
            OrderState::Done => "done",
            OrderState::Cancel => "cancel",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            OrderState::Draft => "Draft",
            OrderState::Confirmed => "Confirmed",
            OrderState::InProgress => "In Progress",
            OrderState::Done => "Done",
            OrderState::Cancel => "Cancelled",
        }
    }
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(OrderState::Draft),
            "confirmed" => Some(OrderState::Confirmed),
            "in_progress" => Some(OrderState::InProgress),
            "done" => Some(OrderState::Done),
            "cancel" => Some(OrderState::Cancel),
            _ => None,
        }
    }
}

/// Display label for a raw state value; unknown states show as they are.
pub fn state_label(raw: &str) -> String {
    OrderState::parse(raw)
        .map(|state| state.label().to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// A row of the recent orders list. Relations are `(id, display label)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: RecordId,
    pub name: String,
    pub process: Option<(RecordId, String)>,
    pub product_in: Option<(RecordId, String)>,
    pub lot_in: Option<(RecordId, String)>,
    pub product_out: Option<(RecordId, String)>,
    pub lot_out_name: String,
    pub total_cost: f64,
    pub state: String,
}

impl OrderSummary {
    pub fn state_label(&self) -> String {
        state_label(&self.state)
    }
}

/// State and process type of one order, as needed for the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub state: String,
    pub process_type: Option<ProcessType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderStats {
    pub in_progress: usize,
    pub done: usize,
    pub finish: usize,
    pub cut: usize,
}

impl OrderStats {
    /// Count orders per state and process type. Cancelled orders never count.
    pub fn from_rows(rows: &[StatRow]) -> Self {
        let live = rows.iter().filter(|row| row.state != OrderState::Cancel.as_str());

        live.fold(Self::default(), |mut stats, row| {
            match OrderState::parse(&row.state) {
                Some(OrderState::InProgress) => stats.in_progress += 1,
                Some(OrderState::Done) => stats.done += 1,
                _ => {}
            }
            match row.process_type {
                Some(ProcessType::Finish) => stats.finish += 1,
                Some(ProcessType::Cut) => stats.cut += 1,
                _ => {}
            }
            stats
        })
    }
}
