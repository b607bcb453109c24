//! Container listing graph for directories.

use super::error::ResourceError;
use super::graph::{date_time_literal, RdfGraph, DCTERMS_MODIFIED, LDP_CONTAINS};
use crate::logger;
use chrono::{DateTime, Local, SecondsFormat};
use std::path::Path;
use tokio::fs;

/// URI of a direct child of `subject`, with exactly one `/` between them.
pub fn child_uri(subject: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        subject.trim_end_matches('/'),
        urlencoding::encode(file_name.trim_start_matches('/'))
    )
}

/// Build the listing graph for `dir`.
///
/// Holds one `dcterms:modified` literal taken from the directory's own mtime
/// and one `ldp:contains` triple per direct child. Hidden entries (names
/// starting with `.`) are left out. The mtime only reflects changes to the
/// directory itself, not to files further down.
pub async fn build_container_graph(dir: &Path, subject: &str) -> Result<RdfGraph, ResourceError> {
    let modified = fs::metadata(dir).await?.modified()?;
    let modified = DateTime::<Local>::from(modified).to_rfc3339_opts(SecondsFormat::Secs, false);

    let mut graph = RdfGraph::new();
    graph.add_literal(subject, DCTERMS_MODIFIED, date_time_literal(&modified))?;

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            logger::log_warning(&format!(
                "Skipping non UTF-8 entry in {}: {:?}",
                dir.display(),
                file_name
            ));
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        graph.add_resource(subject, LDP_CONTAINS, &child_uri(subject, name))?;
    }

    Ok(graph)
}
