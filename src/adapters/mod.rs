// Adapters layer: concrete implementations of the store port and the HTTP surface.

pub mod http;
pub mod memory_store;
