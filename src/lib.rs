//! Interactive force-directed viewer for request/response trace graphs.

pub mod app;
pub mod dataset;
pub mod layout;
