//! Citation extraction from grounding metadata.

use forge_core::domain_of;
use forge_models::Source;

use crate::wire::GenerateContentResponse;

/// Sources cited by the first candidate of a response.
///
/// Only web chunks carrying both a URI and a title are kept. Order follows
/// the provider and duplicates are preserved.
pub fn extract_sources(response: &GenerateContentResponse) -> Vec<Source> {
    let Some(metadata) = response
        .first_candidate()
        .and_then(|c| c.grounding_metadata.as_ref())
    else {
        return Vec::new();
    };

    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| match (&web.uri, &web.title) {
            (Some(uri), Some(title)) => Some(Source::new(title.as_str(), uri.as_str(), domain_of(uri))),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Candidate, GroundingChunk, GroundingMetadata};

    #[test]
    fn test_extract_keeps_complete_web_chunks() {
        let response = GenerateContentResponse::from_text("x").with_web_chunks([
            (Some("https://www.a.com/x"), Some("A")),
            (None, Some("B")),
        ]);

        let sources = extract_sources(&response);
        assert_eq!(sources, vec![Source::new("A", "https://www.a.com/x", "a.com")]);
    }

    #[test]
    fn test_extract_drops_title_less_chunks() {
        let response = GenerateContentResponse::from_text("x")
            .with_web_chunks([(Some("https://a.com"), None::<&str>)]);
        assert!(extract_sources(&response).is_empty());
    }

    #[test]
    fn test_extract_without_metadata() {
        assert!(extract_sources(&GenerateContentResponse::from_text("x")).is_empty());
        assert!(extract_sources(&GenerateContentResponse::default()).is_empty());
    }

    #[test]
    fn test_extract_preserves_order_and_duplicates() {
        let response = GenerateContentResponse::from_text("x").with_web_chunks([
            (Some("https://b.org/1"), Some("B")),
            (Some("not a url"), Some("Weird")),
            (Some("https://b.org/1"), Some("B")),
        ]);

        let sources = extract_sources(&response);
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0], sources[2]);
        assert_eq!(sources[1].domain, "source");
    }

    #[test]
    fn test_extract_ignores_non_web_chunks_and_other_candidates() {
        let mut response = GenerateContentResponse::from_text("x");
        response.candidates[0].grounding_metadata = Some(GroundingMetadata {
            grounding_chunks: vec![GroundingChunk { web: None }],
        });
        response.candidates.push(Candidate::default());
        response.candidates[1].grounding_metadata = GenerateContentResponse::from_text("y")
            .with_web_chunks([(Some("https://c.com"), Some("C"))])
            .candidates[0]
            .grounding_metadata
            .clone();

        assert!(extract_sources(&response).is_empty());
    }
}
