pub mod builder;
pub mod cart;
pub mod config;
pub mod costs;
pub mod dashboard;
pub mod error;
pub mod lots;
pub mod operation;
pub mod orders;
pub mod parse;
pub mod pipeline;
pub mod process;
pub mod service;
pub mod store;
pub mod utils;
