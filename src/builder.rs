//! Order builder: one draft operation with its cost fields kept in step
use super::costs::compute_costs;
use super::error::ValidationError;
use super::lots::{Lot, StockQuant, aggregate_lots};
use super::operation::{Draft, StagedOperation};
use super::parse::parse_lenient;
use super::process::{Process, Product, RecordId};
use super::utils::new_staging_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    QtyIn,
    QtyOut,
    LaborCost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    FormatWidth,
    FormatHeight,
    FormatQty,
    LotOutName,
}

#[derive(Debug, Default)]
pub struct OrderBuilder {
    products: Vec<Product>,
    process: Option<Process>,
    lots: Vec<Lot>,
    selected_lot: Option<Lot>,
    draft: Draft,
}

impl OrderBuilder {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }
    pub fn set_catalogue(&mut self, products: Vec<Product>) {
        self.products = products;
    }
    pub fn draft(&self) -> &Draft {
        &self.draft
    }
    pub fn process(&self) -> Option<&Process> {
        self.process.as_ref()
    }
    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }
    pub fn selected_lot(&self) -> Option<&Lot> {
        self.selected_lot.as_ref()
    }

    /// Make `process` the active one and start over with an empty draft.
    pub fn select_process(&mut self, process: Process) {
        self.process = Some(process);
        self.selected_lot = None;
        self.lots.clear();
        self.draft = Draft::default();
    }

    /// Set the input product. The lots on offer are supplied afterwards through
    /// [`OrderBuilder::set_lots`] once stock has been looked up.
    pub fn set_input_product(&mut self, product_id: Option<RecordId>) {
        self.draft.product_in_id = product_id;
        self.draft.product_in_name = self.display_name(product_id);
        self.selected_lot = None;
        if product_id.is_none() {
            self.lots.clear();
        }
    }

    pub fn set_lots(&mut self, quants: &[StockQuant]) {
        self.lots = aggregate_lots(quants);
    }

    /// Pick an input lot. Its available quantity becomes both input and output quantity
    /// and the output lot is named after it; later edits keep that name.
    pub fn set_input_lot(&mut self, lot_id: Option<RecordId>) {
        let lot = lot_id.and_then(|id| self.lots.iter().find(|lot| lot.id == id).cloned());
        self.selected_lot = lot.clone();

        let Some(lot) = lot else {
            return;
        };
        self.draft.lot_in_id = Some(lot.id);
        self.draft.lot_in_name = lot.name;
        self.draft.qty_in = lot.qty;
        self.draft.qty_out = lot.qty;
        self.update_lot_out_name();
        self.recompute();
    }

    pub fn set_output_product(&mut self, product_id: Option<RecordId>) {
        self.draft.product_out_id = product_id;
        self.draft.product_out_name = self.display_name(product_id);
        self.recompute();
    }

    pub fn set_numeric(&mut self, field: NumericField, raw: &str) {
        let value = parse_lenient(raw);
        match field {
            NumericField::QtyIn => self.draft.qty_in = value,
            NumericField::QtyOut => self.draft.qty_out = value,
            NumericField::LaborCost => self.draft.labor_cost = value,
        }
        self.recompute();
    }

    pub fn set_text(&mut self, field: TextField, raw: &str) {
        let slot = match field {
            TextField::FormatWidth => &mut self.draft.format_width,
            TextField::FormatHeight => &mut self.draft.format_height,
            TextField::FormatQty => &mut self.draft.format_qty,
            TextField::LotOutName => &mut self.draft.lot_out_name,
        };
        *slot = raw.to_string();
        self.recompute();
    }

    /// Snapshot the draft into a cart entry and reset the builder for the next one.
    /// A draft missing a selection is left exactly as it was.
    pub fn stage(&mut self) -> Result<StagedOperation, ValidationError> {
        let draft = &self.draft;
        let Some(process) = self.process.as_ref() else {
            return Err(ValidationError::NoProcess);
        };
        let product_in_id = draft.product_in_id.ok_or(ValidationError::MissingInputProduct)?;
        let lot_in_id = draft.lot_in_id.ok_or(ValidationError::MissingInputLot)?;
        let product_out_id = draft
            .product_out_id
            .ok_or(ValidationError::MissingOutputProduct)?;

        let staged = StagedOperation {
            key: new_staging_key(),
            process_id: process.id,
            process_name: process.name.clone(),
            process_type: process.process_type,
            process_code: process.code.clone(),
            product_in_id,
            product_in_name: draft.product_in_name.clone(),
            lot_in_id,
            lot_in_name: draft.lot_in_name.clone(),
            qty_in: draft.qty_in,
            qty_out: draft.qty_out,
            product_out_id,
            product_out_name: draft.product_out_name.clone(),
            lot_out_name: draft.lot_out_name.clone(),
            format_width: draft.format_width.clone(),
            format_height: draft.format_height.clone(),
            format_qty: draft.format_qty.clone(),
            labor_cost: draft.labor_cost,
            area_sqm: draft.area_sqm,
            process_cost: draft.process_cost,
            total_cost: draft.total_cost,
        };

        self.draft = Draft::default();
        self.selected_lot = None;
        self.lots.clear();

        Ok(staged)
    }

    fn display_name(&self, product_id: Option<RecordId>) -> String {
        product_id
            .and_then(|id| self.products.iter().find(|p| p.id == id))
            .map(|p| p.display_name.clone())
            .unwrap_or_default()
    }

    fn update_lot_out_name(&mut self) {
        match &self.process {
            Some(process) if !self.draft.lot_in_name.is_empty() => {
                self.draft.lot_out_name = format!("{}-{}", self.draft.lot_in_name, process.code);
            }
            _ => {}
        }
    }

    fn recompute(&mut self) {
        let Some(process) = &self.process else {
            return;
        };
        let costs = compute_costs(&self.draft, process);
        self.draft.area_sqm = costs.area_sqm;
        self.draft.process_cost = costs.process_cost;
        self.draft.total_cost = costs.total_cost;
    }
}
