// Adapters layer: concrete implementations of the domain ports.

pub mod photo;
pub mod storage;
