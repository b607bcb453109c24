//! Content negotiation over the format registry.

use super::registry::FormatRegistry;

/// Pick the RDF format for a response.
///
/// `acceptable` is the client's media types already ordered by preference.
/// The first one that names a registered media type wins; `None` means the
/// caller keeps its default format. Wildcards never match a registered type,
/// so `*/*` behaves like a missing header.
pub fn negotiate<'r, S: AsRef<str>>(
    acceptable: &[S],
    registry: &'r FormatRegistry,
) -> Option<&'r str> {
    acceptable
        .iter()
        .find_map(|media_type| registry.lookup_by_mime_type(media_type.as_ref()))
        .map(|format| format.format_id.as_str())
}
