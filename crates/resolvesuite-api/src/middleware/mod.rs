pub mod connection_gate;
pub mod error_rendering;

pub use connection_gate::connection_gate_middleware;
pub use error_rendering::{error_rendering_middleware, ErrorRendering};
