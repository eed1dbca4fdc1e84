// Domain layer: core models and ports (interfaces). No IO in here.

pub mod model;
pub mod ports;
