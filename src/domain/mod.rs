// Domain layer: core models and ports (interfaces). No database or HTTP types here.

pub mod model;
pub mod ports;
