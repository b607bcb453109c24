//! LDP resource handler
//!
//! Glue between hyper and the LDP core: derives the subject URI, classifies
//! the path, negotiates the format and turns the result into a response.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, ResponseBody};
use crate::ldp::{self, RequestTarget, ResourceError, ResourceKind};
use crate::logger;
use hyper::http::uri::Authority;
use hyper::Response;

/// Outcome of a GET/HEAD on a resource
pub struct Served {
    pub response: Response<ResponseBody>,
    /// Format the body was serialized in, for RDF sources and containers
    pub rdf_format: Option<String>,
}

impl From<Response<ResponseBody>> for Served {
    fn from(response: Response<ResponseBody>) -> Self {
        Self {
            response,
            rdf_format: None,
        }
    }
}

/// Absolute URL of the request: `base_url` when configured, else `http://{host}`,
/// followed by the raw request path.
pub fn subject_uri(base_url: Option<&str>, host: &str, raw_path: &str) -> String {
    let path = if raw_path.is_empty() { "/" } else { raw_path };
    match base_url {
        Some(base) => format!("{}{path}", base.trim_end_matches('/')),
        None => format!("http://{host}{path}"),
    }
}

/// Whether a `Host` header value can stand as the authority of a subject IRI
pub fn is_usable_host(host: &str) -> bool {
    host.parse::<Authority>().is_ok() && ldp::graph::is_valid_iri(&format!("http://{host}/"))
}

/// Response format for the request: the negotiated one, else the default
pub fn response_format<'a>(accept: Option<&str>, state: &'a AppState) -> &'a str {
    accept
        .and_then(|header| ldp::negotiate(&http::parse_accept(header), &state.registry))
        .unwrap_or_else(|| state.default_format())
}

/// Serve a GET or HEAD request
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Served {
    let Ok(decoded) = urlencoding::decode(ctx.path) else {
        return http::build_404_response().into();
    };

    let resource = match ldp::classify(&state.source_root, &decoded, &state.registry).await {
        Ok(resource) => resource,
        Err(err) => return error_response(ctx, &err).into(),
    };
    if resource.kind == ResourceKind::Missing {
        return http::build_404_response().into();
    }

    let format = response_format(ctx.accept.as_deref(), state);
    let fallback_host = format!("{}:{}", state.config.server.host, state.config.server.port);
    let host = match ctx.host.as_deref() {
        Some(host) if is_usable_host(host) => host,
        Some(host) => {
            logger::log_debug(&format!("Ignoring unusable Host header {host:?}"));
            fallback_host.as_str()
        }
        None => fallback_host.as_str(),
    };
    let subject = subject_uri(state.config.server.base_url.as_deref(), host, ctx.path);
    let target = RequestTarget {
        subject_uri: &subject,
        response_format: format,
        is_get: !ctx.is_head,
    };

    match ldp::assemble(&resource, target, &state.registry).await {
        Ok(ldp_response) => Served {
            response: http::from_ldp(ldp_response, state.config.http.enable_cors),
            rdf_format: (resource.kind != ResourceKind::OpaqueFile).then(|| format.to_string()),
        },
        Err(err) => error_response(ctx, &err).into(),
    }
}

fn error_response(ctx: &RequestContext<'_>, err: &ResourceError) -> Response<ResponseBody> {
    match err {
        ResourceError::Traversal { path } => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                ctx.path,
                path.display()
            ));
            http::build_404_response()
        }
        err if err.is_not_found() => http::build_404_response(),
        err => {
            logger::log_error(&format!("Failed to serve '{}': {err}", ctx.path));
            http::build_500_response()
        }
    }
}
