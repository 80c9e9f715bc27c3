//! Stock lots available as process input.
use super::process::RecordId;
use std::collections::BTreeMap;

/// One stock quant row in an internal location.
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuant {
    pub product_id: RecordId,
    pub lot: Option<(RecordId, String)>, // (lot id, lot name)
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub id: RecordId,
    pub name: String,
    pub qty: f64,
}

/// Sum quants per lot. Quants without a lot are skipped, as are lots whose
/// available quantity does not come out positive. Lots are returned by id.
pub fn aggregate_lots(quants: &[StockQuant]) -> Vec<Lot> {
    let mut lots: BTreeMap<RecordId, Lot> = BTreeMap::new();

    for quant in quants.iter().filter(|q| q.quantity > 0.0) {
        let Some((lot_id, lot_name)) = &quant.lot else {
            continue;
        };
        lots.entry(*lot_id)
            .or_insert_with(|| Lot {
                id: *lot_id,
                name: lot_name.clone(),
                qty: 0.0,
            })
            .qty += quant.quantity;
    }

    lots.into_values().filter(|lot| lot.qty > 0.0).collect()
}
