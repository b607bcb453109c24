//! `Accept` header parsing
//!
//! Turns a raw `Accept` header into media types ordered by client preference,
//! which is what content negotiation consumes.

/// Parse an `Accept` header into media types, most preferred first.
///
/// Parameters other than `q` are dropped, entries with `q=0` are removed and
/// entries with equal weight keep the order the client sent them in. A
/// malformed weight counts as `q=1`.
///
/// # Examples
/// ```
/// use static_ldp::http::accept::parse_accept;
/// let types = parse_accept("text/html;q=0.5, application/rdf+xml");
/// assert_eq!(types, vec!["application/rdf+xml", "text/html"]);
/// ```
pub fn parse_accept(header: &str) -> Vec<String> {
    let mut weighted: Vec<(u16, String)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let media_type = parts.next()?.trim();
            if media_type.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|param| param.split_once('='))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                .map_or(1000, |(_, value)| parse_quality(value.trim()));
            (quality > 0).then(|| (quality, media_type.to_ascii_lowercase()))
        })
        .collect();

    // stable: equal weights keep header order
    weighted.sort_by(|a, b| b.0.cmp(&a.0));
    weighted.into_iter().map(|(_, media_type)| media_type).collect()
}

/// `q` value in thousandths, clamped to 0..=1000
fn parse_quality(value: &str) -> u16 {
    value.parse::<f32>().map_or(1000, |q| {
        if q.is_nan() {
            1000
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let thousandths = (q.clamp(0.0, 1.0) * 1000.0).round() as u16;
            thousandths
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type() {
        assert_eq!(parse_accept("text/turtle"), vec!["text/turtle"]);
    }

    #[test]
    fn test_quality_ordering() {
        let types = parse_accept("text/turtle;q=0.9, application/ld+json, */*;q=0.1");
        assert_eq!(types, vec!["application/ld+json", "text/turtle", "*/*"]);
    }

    #[test]
    fn test_equal_weights_keep_client_order() {
        let types = parse_accept("application/rdf+xml, text/turtle, application/n-triples");
        assert_eq!(
            types,
            vec!["application/rdf+xml", "text/turtle", "application/n-triples"]
        );
    }

    #[test]
    fn test_drops_params_and_zero_weight() {
        let types = parse_accept("text/turtle; charset=utf-8, application/rdf+xml;q=0");
        assert_eq!(types, vec!["text/turtle"]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse_accept("").is_empty());
        assert!(parse_accept(" , ,").is_empty());
        assert_eq!(parse_accept("text/turtle;q=abc"), vec!["text/turtle"]);
        assert_eq!(parse_accept("Text/Turtle"), vec!["text/turtle"]);
    }
}
