mod cors;
mod metrics_layer;
mod tracing_layer;

pub use cors::*;
pub use metrics_layer::*;
pub use tracing_layer::*;
