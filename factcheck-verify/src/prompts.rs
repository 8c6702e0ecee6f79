//! Fixed prompt templates for the credibility pass and the three checks.
//!
//! Every template ends with the exact JSON shape the reply must take; the
//! sanitizer recovers that object even when the model wraps it in prose.

use crate::types::{Fact, Source, SourceType};
use chrono::NaiveDate;
use serde::Serialize;

pub const CREDIBILITY_SYSTEM: &str = "You are a URL validation expert. You must return only valid JSON matching the exact structure requested.";
pub const SEMANTIC_SYSTEM: &str = "You are a semantic analysis expert. Verify the logical consistency and plausibility of facts based on claimed sources.";
pub const CROSS_REFERENCE_SYSTEM: &str = "You are a fact verification expert. Analyze if sources would reasonably support the given fact based on your knowledge of these sources and their typical content.";
pub const RECENCY_SYSTEM: &str = "You are a source dating expert. Analyze URLs and source types to assess their likely publication dates.";

pub fn credibility(url: &str) -> String {
    format!(
        r#"Analyze this URL for credibility: {url}

Return a JSON object with this exact structure:
{{
    "isValid": true or false,
    "credibilityScore": number between 0 and 1,
    "sourceType": one of ["news", "press-release", "research", "official-document", "blog"],
    "analysis": "your detailed explanation",
    "date": "YYYY-MM-DD"
}}"#
    )
}

#[derive(Serialize)]
struct SourcePair<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    kind: Option<SourceType>,
}

/// `[{url, type}]` as compact JSON. Sources without a type carry `null`.
fn source_pairs(sources: &[Source]) -> String {
    let pairs: Vec<SourcePair<'_>> = sources
        .iter()
        .map(|s| SourcePair {
            url: &s.url,
            kind: s.source_type,
        })
        .collect();
    serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
}

pub fn semantic(fact: &Fact, sources: &[Source]) -> String {
    format!(
        r#"Perform a semantic analysis of this fact and its claimed sources:

Fact: "{fact}"
Sources: {sources}

Verify:
1. Logical consistency of the fact
2. Plausibility given the sources
3. Temporal consistency
4. Statistical reasonableness
5. Attribution accuracy

Return a JSON response:
{{
    "isValid": boolean,
    "confidence": number (0-1),
    "issues": [array of potential issues],
    "analysis": "detailed semantic analysis"
}}"#,
        sources = source_pairs(sources)
    )
}

pub fn cross_reference(fact: &Fact, sources: &[Source]) -> String {
    format!(
        r#"Verify if this fact is likely accurate based on the provided sources:

Fact: "{fact}"
Sources: {sources}

Requirements:
1. Assess if these sources would likely contain this information
2. Check if the fact aligns with typical content from these sources
3. Verify if the combination of sources provides sufficient validation

Return a JSON response:
{{
    "isSupported": boolean,
    "confidence": number (0-1),
    "analysis": "detailed explanation of verification",
    "likelyQuotes": ["potential quotes that would support this fact"]
}}"#,
        sources = source_pairs(sources)
    )
}

pub fn recency(sources: &[Source], window_months: u32, window_start: NaiveDate) -> String {
    let urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
    let urls = serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"Analyze these source URLs to determine if they are likely recent (within the last {window_months} months, i.e. published on or after {window_start}):

Sources: {urls}

Consider:
1. URL patterns that might indicate dates
2. Types of content (news articles, press releases, etc.)
3. Typical update frequencies for these sources

Return a JSON response:
{{
    "areRecent": boolean,
    "confidence": number (0-1),
    "analysis": "explanation of date assessment"
}}"#,
        window_start = window_start.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_prompts_embed_fact_and_typed_sources() {
        let mut a = Source::new("https://news.example.com/a");
        a.source_type = Some(SourceType::News);
        let b = Source::new("https://blog.example.org/b");
        let fact = Fact::from("Company X raised $50M");

        let prompt = semantic(&fact, &[a.clone(), b.clone()]);
        assert!(prompt.contains(r#"Fact: "Company X raised $50M""#));
        assert!(prompt.contains(r#"{"url":"https://news.example.com/a","type":"news"}"#));
        assert!(prompt.contains(r#"{"url":"https://blog.example.org/b","type":null}"#));

        let prompt = cross_reference(&fact, &[a, b]);
        assert!(prompt.starts_with("Verify if this fact is likely accurate"));
        assert!(prompt.contains("likelyQuotes"));
    }

    #[test]
    fn recency_prompt_lists_urls_and_window_start() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let prompt = recency(
            &[Source::new("https://a.example.com"), Source::new("https://b.example.com")],
            3,
            start,
        );
        assert!(prompt.contains("within the last 3 months"));
        assert!(prompt.contains("on or after 2024-03-15"));
        assert!(prompt.contains(r#"["https://a.example.com","https://b.example.com"]"#));
    }

    #[test]
    fn credibility_prompt_names_the_url() {
        let prompt = credibility("https://example.com/story");
        assert!(prompt.starts_with("Analyze this URL for credibility: https://example.com/story"));
        assert!(prompt.contains("\"credibilityScore\""));
    }
}
