//! RDF graph adapter
//!
//! Thin layer over `oxrdf` / `oxrdfio` that speaks in the format identifiers
//! used by the registry. Parsing and serialization are CPU bound; callers on
//! the async runtime should run them on the blocking pool.

use super::error::ResourceError;
use oxrdf::vocab::xsd;
use oxrdf::{Graph, Literal, NamedNode, Triple};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

pub const LDP_NS: &str = "http://www.w3.org/ns/ldp#";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
pub const DCTERMS_MODIFIED: &str = "http://purl.org/dc/terms/modified";

/// Map a registry format identifier onto an `oxrdfio` syntax.
///
/// Besides the fixed names, any identifier `oxrdfio` recognises as a file
/// extension or media type is accepted (e.g. `jsonld`).
pub fn rdf_format(format_id: &str) -> Result<RdfFormat, ResourceError> {
    match format_id {
        "turtle" => Ok(RdfFormat::Turtle),
        "ntriples" => Ok(RdfFormat::NTriples),
        "nquads" => Ok(RdfFormat::NQuads),
        "trig" => Ok(RdfFormat::TriG),
        "n3" => Ok(RdfFormat::N3),
        "rdfxml" => Ok(RdfFormat::RdfXml),
        other => RdfFormat::from_extension(other)
            .or_else(|| RdfFormat::from_media_type(other))
            .ok_or_else(|| ResourceError::UnknownFormat(other.to_string())),
    }
}

/// In-memory triple set
#[derive(Debug, Default, Clone)]
pub struct RdfGraph {
    graph: Graph,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` as `format_id`, resolving relative IRIs against `base_iri`.
    ///
    /// Named graphs in quad formats are folded into the default graph.
    pub fn parse(bytes: &[u8], format_id: &str, base_iri: &str) -> Result<Self, ResourceError> {
        let format = rdf_format(format_id)?;
        let parser = RdfParser::from_format(format)
            .with_base_iri(base_iri)
            .map_err(|_| ResourceError::InvalidIri(base_iri.to_string()))?;

        let mut graph = Graph::new();
        for quad in parser.for_reader(bytes) {
            let quad = quad.map_err(|e| ResourceError::Parse {
                format: format_id.to_string(),
                message: e.to_string(),
            })?;
            graph.insert(&Triple::from(quad));
        }
        Ok(Self { graph })
    }

    /// Write every triple in `format_id`.
    pub fn serialize(&self, format_id: &str) -> Result<Vec<u8>, ResourceError> {
        let format = rdf_format(format_id)?;
        let serialize_err = |message: String| ResourceError::Serialize {
            format: format_id.to_string(),
            message,
        };

        let mut serializer = RdfSerializer::from_format(format);
        if matches!(
            format,
            RdfFormat::Turtle | RdfFormat::TriG | RdfFormat::N3 | RdfFormat::RdfXml
        ) {
            serializer = serializer
                .with_prefix("ldp", LDP_NS)
                .and_then(|s| s.with_prefix("dcterms", DCTERMS_NS))
                .map_err(|e| serialize_err(e.to_string()))?;
        }

        let mut writer = serializer.for_writer(Vec::new());
        for triple in &self.graph {
            writer
                .serialize_triple(triple)
                .map_err(|e| serialize_err(e.to_string()))?;
        }
        writer.finish().map_err(|e| serialize_err(e.to_string()))
    }

    /// Add `<subject> <predicate> "value"^^datatype`
    pub fn add_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        literal: Literal,
    ) -> Result<(), ResourceError> {
        let triple = Triple::new(named_node(subject)?, named_node(predicate)?, literal);
        self.graph.insert(&triple);
        Ok(())
    }

    /// Add `<subject> <predicate> <object>`
    pub fn add_resource(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<(), ResourceError> {
        let triple = Triple::new(
            named_node(subject)?,
            named_node(predicate)?,
            named_node(object)?,
        );
        self.graph.insert(&triple);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub const fn inner(&self) -> &Graph {
        &self.graph
    }

    /// Objects of every `<subject> <predicate> ?o` triple, as strings
    pub fn objects_of(&self, subject: &str, predicate: &str) -> Vec<String> {
        let (Ok(s), Ok(p)) = (NamedNode::new(subject), NamedNode::new(predicate)) else {
            return Vec::new();
        };
        let mut objects: Vec<String> = self
            .graph
            .objects_for_subject_predicate(s.as_ref(), p.as_ref())
            .map(|o| match o {
                oxrdf::TermRef::NamedNode(n) => n.as_str().to_string(),
                oxrdf::TermRef::Literal(l) => l.value().to_string(),
                other => other.to_string(),
            })
            .collect();
        objects.sort();
        objects
    }
}

/// `xsd:dateTime` literal
pub fn date_time_literal(value: &str) -> Literal {
    Literal::new_typed_literal(value, xsd::DATE_TIME)
}

/// Whether `iri` is an absolute IRI usable as a subject
pub fn is_valid_iri(iri: &str) -> bool {
    NamedNode::new(iri).is_ok()
}

fn named_node(iri: &str) -> Result<NamedNode, ResourceError> {
    NamedNode::new(iri).map_err(|_| ResourceError::InvalidIri(iri.to_string()))
}
