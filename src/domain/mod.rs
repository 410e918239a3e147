// Domain layer: contact models and the ports the pipelines and adapters plug into.

pub mod model;
pub mod ports;
