//! Dashboard settings.
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CART_KEY: &str = "ws_cart";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Storage slot holding the serialised cart.
    pub cart_storage_key: String,
    /// Most products offered in the pickers.
    pub product_limit: usize,
    /// Length of the recent orders list.
    pub recent_order_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cart_storage_key: DEFAULT_CART_KEY.to_string(),
            product_limit: 200,
            recent_order_limit: 20,
        }
    }
}

impl DashboardConfig {
    /// Missing keys keep their defaults.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("dashboard config is not valid JSON")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config {}", path.display()))?;
        Self::from_json_str(&raw)
    }
}
