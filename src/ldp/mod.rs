//! Linked Data Platform core
//!
//! Request path to response: classify the filesystem entry, negotiate the
//! RDF format, then assemble headers and body.

pub mod assemble;
pub mod classify;
pub mod container;
pub mod error;
pub mod graph;
pub mod negotiate;
pub mod registry;

pub use assemble::{assemble, LdpBody, LdpResponse, RequestTarget};
pub use classify::{classify, Resource, ResourceKind};
pub use error::ResourceError;
pub use graph::RdfGraph;
pub use negotiate::negotiate;
pub use registry::{FormatDescriptor, FormatRegistry, RegistryError};
