pub mod catalog_service;
pub mod order_service;
pub mod proximity_service;

#[cfg(test)]
pub(crate) mod testing;
