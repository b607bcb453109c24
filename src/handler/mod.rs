//! Request handler module
//!
//! Responsible for request routing dispatch and serving LDP resources.

pub mod resource;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
