//! Collaborator traits the domain drives: market data, parameter storage
//! and rendering.

pub mod market_data_port;
pub mod parameter_port;
pub mod render_port;
