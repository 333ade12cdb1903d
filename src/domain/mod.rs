// Domain layer: credential/token models and the ports the interceptor and exchanger talk through.

pub mod model;
pub mod ports;
