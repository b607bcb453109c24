//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handlers: `Accept` parsing,
//! content-type detection, body types and fixed responses.

pub mod accept;
pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use accept::parse_accept;
pub use body::ResponseBody;
pub use response::{
    build_404_response, build_405_response, build_500_response, build_options_response, from_ldp,
};
