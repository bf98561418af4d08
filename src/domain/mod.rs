// Domain layer: request/result models, the layer catalog and ports (interfaces).

pub mod catalog;
pub mod model;
pub mod ports;
