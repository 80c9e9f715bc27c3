//! The editable draft and the immutable cart entry it is staged into.
use super::process::{ProcessType, RecordId};
use serde::{Deserialize, Deserializer, Serialize};

// mutable form state for the operation being built
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub product_in_id: Option<RecordId>,
    pub product_in_name: String,
    pub lot_in_id: Option<RecordId>,
    pub lot_in_name: String,
    pub qty_in: f64,
    pub product_out_id: Option<RecordId>,
    pub product_out_name: String,
    pub qty_out: f64,
    pub lot_out_name: String,
    // format dimensions stay text because they may be blank
    pub format_width: String,
    pub format_height: String,
    pub format_qty: String,
    pub labor_cost: f64,
    pub area_sqm: f64,
    pub process_cost: f64,
    pub total_cost: f64,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            product_in_id: None,
            product_in_name: String::new(),
            lot_in_id: None,
            lot_in_name: String::new(),
            qty_in: 0.0,
            product_out_id: None,
            product_out_name: String::new(),
            qty_out: 0.0,
            lot_out_name: String::new(),
            format_width: String::new(),
            format_height: String::new(),
            format_qty: "1".to_string(),
            labor_cost: 0.0,
            area_sqm: 0.0,
            process_cost: 0.0,
            total_cost: 0.0,
        }
    }
}

/// A staged operation waiting in the cart.
///
/// Field names follow the `ws_cart` storage layout so carts written by earlier
/// dashboards restore unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StagedOperation {
    pub key: String,
    pub process_id: RecordId,
    pub process_name: String,
    pub process_type: ProcessType,
    pub process_code: String,
    pub product_in_id: RecordId,
    pub product_in_name: String,
    pub lot_in_id: RecordId,
    pub lot_in_name: String,
    pub qty_in: f64,
    pub qty_out: f64,
    pub product_out_id: RecordId,
    pub product_out_name: String,
    pub lot_out_name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub format_width: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub format_height: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub format_qty: String,
    pub labor_cost: f64,
    pub area_sqm: f64,
    pub process_cost: f64,
    pub total_cost: f64,
}

// older carts stored the piece count as a JSON number
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    })
}
