pub mod catalog;
pub mod errors;
pub mod geo;
pub mod money;
pub mod order;
pub mod ports;
pub mod pricing;
