//! Response assembly
//!
//! Builds status, LDP headers and body for a classified resource. RDF sources
//! and containers are re-serialized in the negotiated format; other files are
//! passed through untouched.

use super::classify::{Resource, ResourceKind};
use super::container::build_container_graph;
use super::error::ResourceError;
use super::graph::RdfGraph;
use super::registry::FormatRegistry;
use crate::http::mime;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, LINK, VARY};
use tokio::fs;

const LINK_RESOURCE: &str = "<http://www.w3.org/ns/ldp#Resource>; rel=\"type\"";
const LINK_RDF_SOURCE: &str = "<http://www.w3.org/ns/ldp#RDFSource>; rel=\"type\"";
const LINK_NON_RDF_SOURCE: &str = "<http://www.w3.org/ns/ldp#NonRDFSource>; rel=\"type\"";
const LINK_BASIC_CONTAINER: &str = "<http://www.w3.org/ns/ldp#BasicContainer>; rel=\"type\"";

/// Response payload
#[derive(Debug)]
pub enum LdpBody {
    /// HEAD responses and bodiless statuses
    Empty,
    Bytes(Bytes),
    /// Raw file streamed from disk, `len` bytes long
    File { file: fs::File, len: u64 },
}

/// Status, headers and body for one request
#[derive(Debug)]
pub struct LdpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: LdpBody,
}

impl LdpResponse {
    fn not_found() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(9u64));
        Self {
            status: 404,
            headers,
            body: LdpBody::Bytes(Bytes::from_static(b"Not Found")),
        }
    }

    /// Declared `Content-Length`, zero when absent
    pub fn content_length(&self) -> u64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// All values of the `Link` header in order
    pub fn links(&self) -> Vec<&str> {
        self.headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Per-request inputs supplied by the HTTP layer
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    /// Absolute URL of the request (scheme, host and path)
    pub subject_uri: &'a str,
    /// Negotiated format id, already defaulted
    pub response_format: &'a str,
    /// `false` for HEAD: headers are computed in full but the body is dropped
    pub is_get: bool,
}

/// Assemble the response for `resource`.
pub async fn assemble(
    resource: &Resource,
    target: RequestTarget<'_>,
    registry: &FormatRegistry,
) -> Result<LdpResponse, ResourceError> {
    match &resource.kind {
        ResourceKind::Missing => Ok(LdpResponse::not_found()),
        ResourceKind::RdfFile(source_format) => {
            assemble_rdf_source(resource, source_format, target, registry).await
        }
        ResourceKind::OpaqueFile => assemble_non_rdf_source(resource, target).await,
        ResourceKind::Directory => assemble_container(resource, target, registry).await,
    }
}

async fn assemble_rdf_source(
    resource: &Resource,
    source_format: &str,
    target: RequestTarget<'_>,
    registry: &FormatRegistry,
) -> Result<LdpResponse, ResourceError> {
    let source = fs::read(&resource.path).await?;
    let source_format = source_format.to_string();
    let subject = target.subject_uri.to_string();
    let response_format = target.response_format.to_string();

    let content = run_blocking(move || {
        RdfGraph::parse(&source, &source_format, &subject)?.serialize(&response_format)
    })
    .await?;

    let mut headers = HeaderMap::new();
    append_links(&mut headers, LINK_RDF_SOURCE);
    headers.insert(VARY, HeaderValue::from_static("Accept"));
    insert_rdf_content_type(&mut headers, target.response_format, registry)?;
    Ok(with_content(headers, content, target.is_get))
}

async fn assemble_non_rdf_source(
    resource: &Resource,
    target: RequestTarget<'_>,
) -> Result<LdpResponse, ResourceError> {
    let content_type = mime::detect_content_type(&resource.path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    append_links(&mut headers, LINK_NON_RDF_SOURCE);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(resource.len));

    let body = if target.is_get {
        LdpBody::File {
            file: fs::File::open(&resource.path).await?,
            len: resource.len,
        }
    } else {
        LdpBody::Empty
    };

    Ok(LdpResponse {
        status: 200,
        headers,
        body,
    })
}

async fn assemble_container(
    resource: &Resource,
    target: RequestTarget<'_>,
    registry: &FormatRegistry,
) -> Result<LdpResponse, ResourceError> {
    let graph = build_container_graph(&resource.path, target.subject_uri).await?;
    let response_format = target.response_format.to_string();
    let content = run_blocking(move || graph.serialize(&response_format)).await?;

    let mut headers = HeaderMap::new();
    append_links(&mut headers, LINK_BASIC_CONTAINER);
    headers.insert(VARY, HeaderValue::from_static("Accept"));
    insert_rdf_content_type(&mut headers, target.response_format, registry)?;
    Ok(with_content(headers, content, target.is_get))
}

/// `ldp#Resource` followed by the more specific type
fn append_links(headers: &mut HeaderMap, specific: &'static str) {
    headers.append(LINK, HeaderValue::from_static(LINK_RESOURCE));
    headers.append(LINK, HeaderValue::from_static(specific));
}

fn insert_rdf_content_type(
    headers: &mut HeaderMap,
    format_id: &str,
    registry: &FormatRegistry,
) -> Result<(), ResourceError> {
    if let Some(format) = registry.lookup_by_format_id(format_id) {
        let value = HeaderValue::from_str(&format.mime_type)
            .map_err(|_| ResourceError::InvalidHeader(format.mime_type.clone()))?;
        headers.insert(CONTENT_TYPE, value);
    }
    Ok(())
}

/// Length always reflects the serialized content, even for HEAD
fn with_content(mut headers: HeaderMap, content: Vec<u8>, is_get: bool) -> LdpResponse {
    headers.insert(CONTENT_LENGTH, HeaderValue::from(content.len()));
    let body = if is_get {
        LdpBody::Bytes(Bytes::from(content))
    } else {
        LdpBody::Empty
    };
    LdpResponse {
        status: 200,
        headers,
        body,
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, ResourceError>
where
    F: FnOnce() -> Result<T, ResourceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ResourceError::Task(e.to_string()))?
}
