//! Workshop processes, the catalogue an operator picks from.
use serde::{Deserialize, Serialize};

pub type RecordId = i64;

#[derive(
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    #[n(0)]
    #[default]
    Finish,
    #[n(1)]
    Cut,
    #[n(2)]
    Other,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessType::Finish => "finish",
            ProcessType::Cut => "cut",
            ProcessType::Other => "other",
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Process {
    #[n(0)]
    pub id: RecordId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub code: String, // short code appended to output lot names, e.g. ACB, CRT
    #[n(3)]
    pub process_type: ProcessType,
    #[n(4)]
    pub cost_per_sqm: f64,
    #[n(5)]
    pub labor_cost: f64, // flat labor cost, informational only
    #[n(6)]
    pub sequence: i32,
    #[n(7)]
    pub active: bool,
}

impl Process {
    pub fn new(name: &str, code: &str, process_type: ProcessType) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            process_type,
            cost_per_sqm: 0.0,
            labor_cost: 0.0,
            sequence: 10,
            active: true,
        }
    }
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }
    pub fn with_cost_per_sqm(mut self, cost: f64) -> Self {
        self.cost_per_sqm = cost;
        self
    }
    pub fn with_labor_cost(mut self, cost: f64) -> Self {
        self.labor_cost = cost;
        self
    }
    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }
}

/// Catalogue order: `sequence` first, then name.
pub fn sort_catalogue(processes: &mut [Process]) {
    processes.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.name.cmp(&b.name)));
}

/// A lot-tracked product as listed in the product pickers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub display_name: String,
}

impl Product {
    pub fn new(id: RecordId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            display_name: name.to_string(),
        }
    }
}
