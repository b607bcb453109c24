//! RDF format registry
//!
//! Immutable table of the RDF serializations the server understands, built once
//! from configuration and shared read-only across requests. Lookups are keyed
//! maps over the configured list; the list order is kept for negotiation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// One supported RDF serialization
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// File extension without the leading dot, e.g. `ttl`
    pub extension: String,
    /// Media type announced in `Content-Type`, e.g. `text/turtle`
    pub mime_type: String,
    /// Identifier understood by the graph adapter, e.g. `turtle`
    #[serde(rename = "format")]
    pub format_id: String,
}

impl FormatDescriptor {
    pub fn new(extension: &str, mime_type: &str, format_id: &str) -> Self {
        Self {
            extension: extension.to_string(),
            mime_type: mime_type.to_string(),
            format_id: format_id.to_string(),
        }
    }
}

/// Invalid format table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no RDF formats configured")]
    Empty,
    #[error("extension '{0}' is registered more than once")]
    DuplicateExtension(String),
    #[error("format entry has an empty {0}")]
    EmptyField(&'static str),
}

/// Lookup tables over the configured formats
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
    by_extension: HashMap<String, usize>,
    by_format_id: HashMap<String, usize>,
    by_mime_type: HashMap<String, usize>,
}

impl FormatRegistry {
    /// Build the registry, rejecting duplicate extensions.
    ///
    /// A format identifier or media type may appear on several entries; the
    /// first entry in configuration order is canonical for it.
    pub fn new(formats: Vec<FormatDescriptor>) -> Result<Self, RegistryError> {
        if formats.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut by_extension = HashMap::with_capacity(formats.len());
        let mut by_format_id = HashMap::with_capacity(formats.len());
        let mut by_mime_type = HashMap::with_capacity(formats.len());

        for (index, format) in formats.iter().enumerate() {
            if format.extension.is_empty() {
                return Err(RegistryError::EmptyField("extension"));
            }
            if format.mime_type.is_empty() {
                return Err(RegistryError::EmptyField("mime_type"));
            }
            if format.format_id.is_empty() {
                return Err(RegistryError::EmptyField("format"));
            }
            if by_extension.insert(format.extension.clone(), index).is_some() {
                return Err(RegistryError::DuplicateExtension(format.extension.clone()));
            }
            by_format_id.entry(format.format_id.clone()).or_insert(index);
            by_mime_type
                .entry(format.mime_type.to_ascii_lowercase())
                .or_insert(index);
        }

        Ok(Self {
            formats,
            by_extension,
            by_format_id,
            by_mime_type,
        })
    }

    pub fn lookup_by_extension(&self, extension: &str) -> Option<&FormatDescriptor> {
        self.by_extension.get(extension).map(|&i| &self.formats[i])
    }

    pub fn lookup_by_format_id(&self, format_id: &str) -> Option<&FormatDescriptor> {
        self.by_format_id.get(format_id).map(|&i| &self.formats[i])
    }

    /// Media types compare case-insensitively
    pub fn lookup_by_mime_type(&self, mime_type: &str) -> Option<&FormatDescriptor> {
        self.by_mime_type
            .get(&mime_type.to_ascii_lowercase())
            .map(|&i| &self.formats[i])
    }

    /// Media types in configuration order
    pub fn acceptable_mime_types(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.mime_type.as_str())
    }

    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }
}
