//! Static LDP
//!
//! Serves a directory tree as a read-only Linked Data Platform: RDF files are
//! RDF sources re-serialized through content negotiation, directories are
//! basic containers, and everything else is a non-RDF source.

pub mod config;
pub mod handler;
pub mod http;
pub mod ldp;
pub mod logger;
pub mod server;
