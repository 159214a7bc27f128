// Domain layer: catalog records, the join structures, and the ports the core talks through.

pub mod model;
pub mod ports;
