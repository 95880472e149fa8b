//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_parameter_adapter;
pub mod format;
pub mod html_report;
pub mod terminal_renderer;
