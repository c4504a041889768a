// Domain layer: contact model, statistics and the ports the pipeline depends on.

pub mod model;
pub mod ports;
