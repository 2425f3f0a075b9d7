use url::Url;

use plexfetch_models::ShareReference;

use crate::error::ResolveError;

/// Break a viewer share URL down into a server hash and content key.
///
/// The interesting parts live in the fragment, which looks like
/// `!/server/{hash}/details?key=%2Flibrary%2Fmetadata%2F{id}&...`:
/// the third path segment is the server identifier and the fourth carries
/// a query string whose `key` parameter is the content's metadata path.
/// Pure parsing; no network.
pub fn parse_share_url(raw: &str) -> Result<ShareReference, ResolveError> {
    let parsed =
        Url::parse(raw).map_err(|e| ResolveError::MalformedUrl(format!("{}: {}", raw, e)))?;
    let fragment = parsed
        .fragment()
        .ok_or_else(|| ResolveError::MalformedUrl("missing fragment".to_string()))?;

    let segments: Vec<&str> = fragment.trim_start_matches('!').split('/').collect();
    if segments.len() < 4 {
        return Err(ResolveError::MalformedUrl(format!(
            "fragment has {} segments, expected at least 4",
            segments.len()
        )));
    }

    let server_hash = segments[2].to_string();
    if server_hash.is_empty() {
        return Err(ResolveError::MalformedUrl(
            "empty server identifier".to_string(),
        ));
    }

    let (_, query) = segments[3]
        .split_once('?')
        .ok_or_else(|| ResolveError::MalformedUrl("missing key parameter".to_string()))?;
    let content_key = url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ResolveError::MalformedUrl("missing key parameter".to_string()))?;

    Ok(ShareReference {
        server_hash,
        content_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARE_URL: &str = "https://app.plex.tv/desktop#!/server/abc123def/details?key=%2Flibrary%2Fmetadata%2F4242&context=home";

    #[test]
    fn test_parse_extracts_hash_and_decoded_key() {
        let reference = parse_share_url(SHARE_URL).unwrap();
        assert_eq!(reference.server_hash, "abc123def");
        assert_eq!(reference.content_key, "/library/metadata/4242");
    }

    #[test]
    fn test_too_few_fragment_segments_is_malformed() {
        let result = parse_share_url("https://app.plex.tv/desktop#!/server/abc123def");
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }

    #[test]
    fn test_missing_key_parameter_is_malformed() {
        let result = parse_share_url(
            "https://app.plex.tv/desktop#!/server/abc123def/details?context=home",
        );
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }

    #[test]
    fn test_segment_without_query_is_malformed() {
        let result = parse_share_url("https://app.plex.tv/desktop#!/server/abc123def/details");
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }

    #[test]
    fn test_missing_fragment_is_malformed() {
        let result = parse_share_url("https://app.plex.tv/desktop");
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }

    #[test]
    fn test_unparseable_url_is_malformed() {
        let result = parse_share_url("not a url at all");
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }
}
