//! Derived cost fields for a draft operation.
use super::operation::Draft;
use super::parse::{parse_lenient, parse_lenient_int};
use super::process::{Process, ProcessType};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Costs {
    pub area_sqm: f64,
    pub process_cost: f64,
    pub total_cost: f64,
}

/// Area billed for an operation.
///
/// Cuts bill the cut pieces: width and height are centimetres, so the area is
/// `(w/100) * (h/100) * pieces` square metres, and zero unless all three are set.
/// Every other process bills the input quantity as is.
pub fn area_sqm(process_type: ProcessType, qty_in: f64, width: &str, height: &str, pieces: &str) -> f64 {
    match process_type {
        ProcessType::Cut => {
            let w = parse_lenient(width);
            let h = parse_lenient(height);
            let n = parse_lenient_int(pieces);
            if w != 0.0 && h != 0.0 && n != 0 {
                finite_or_zero((w / 100.0) * (h / 100.0) * n as f64)
            } else {
                0.0
            }
        }
        _ => qty_in,
    }
}

pub fn compute_costs(draft: &Draft, process: &Process) -> Costs {
    let area_sqm = area_sqm(
        process.process_type,
        draft.qty_in,
        &draft.format_width,
        &draft.format_height,
        &draft.format_qty,
    );
    let process_cost = finite_or_zero(area_sqm * process.cost_per_sqm);

    Costs {
        area_sqm,
        process_cost,
        total_cost: finite_or_zero(process_cost + draft.labor_cost),
    }
}

/// Overflowed arithmetic reads as zero, like an overflowing typed number.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
