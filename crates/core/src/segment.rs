//! Heuristic section segmentation.
//!
//! A rule-based fallback that groups tokens into named resume sections:
//! header tokens are detected by keyword prefix match, sorted by vertical
//! center, and every token falling strictly inside the vertical band
//! between two consecutive headers is collected under the upper header's
//! section.
//!
//! This is a deliberate, known-imprecise approximation and not a layout
//! model replacement: banding looks only at vertical centers, so
//! multi-column layouts bleed across sections, and two side-by-side
//! headers produce a degenerate band.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::NormalizedBox;

/// Mapping from section name to at most one joined text string.
///
/// Keys are exactly the sections for which a header was detected;
/// sections whose band collected no tokens map to an empty list.
pub type SectionGroups = IndexMap<String, Vec<String>>;

/// Ordered table of section name -> header keyword prefixes.
///
/// Matching is case-insensitive `starts_with`, so ordinary body text
/// beginning with a keyword ("Languages are...") is a known
/// false-positive source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionLexicon {
    sections: IndexMap<String, Vec<String>>,
}

impl Default for SectionLexicon {
    fn default() -> Self {
        let mut sections = IndexMap::new();
        let mut add = |name: &str, keywords: &[&str]| {
            sections.insert(
                name.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            );
        };
        add(
            "skills",
            &[
                "skills",
                "technical skills",
                "technical proficiencies",
                "skillset",
            ],
        );
        add(
            "experience",
            &[
                "experience",
                "work experience",
                "professional experience",
                "employment",
            ],
        );
        add(
            "summary",
            &["summary", "professional summary", "profile", "about me"],
        );
        add("languages", &["languages", "spoken languages"]);
        add(
            "tools",
            &["tools", "tools & technologies", "technologies", "tech stack"],
        );
        add("libraries", &["libraries", "frameworks", "packages"]);
        Self { sections }
    }
}

impl SectionLexicon {
    /// An empty lexicon; no token will ever be treated as a header.
    pub fn empty() -> Self {
        Self {
            sections: IndexMap::new(),
        }
    }

    /// Adds or replaces a section and its keyword prefixes.
    pub fn with_section(mut self, name: &str, keywords: &[&str]) -> Self {
        self.sections.insert(
            name.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    /// Returns the section whose keyword list first matches the token,
    /// by case-insensitive prefix.
    fn match_section(&self, token: &str) -> Option<&str> {
        let lowered = token.trim().to_lowercase();
        for (section, keywords) in &self.sections {
            if keywords.iter().any(|kw| lowered.starts_with(kw.as_str())) {
                return Some(section.as_str());
            }
        }
        None
    }
}

/// A detected header token; lives only within one segmentation call.
struct HeaderMatch<'a> {
    section: &'a str,
    y_center: f64,
}

/// Partitions a page's tokens into named sections.
///
/// Tokens and boxes are the parallel arrays of a [`crate::builder::PageInput`];
/// `page_height` is the page height in its original units and bounds the
/// last band at `page_height + 1`. Returns an empty map when no header is
/// detected; there is no whole-page fallback.
pub fn segment_sections(
    tokens: &[String],
    bboxes: &[NormalizedBox],
    page_height: f64,
    lexicon: &SectionLexicon,
) -> SectionGroups {
    let y_centers: Vec<f64> = bboxes.iter().map(|b| b.y_center()).collect();

    let mut headers: Vec<HeaderMatch<'_>> = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        if let Some(section) = lexicon.match_section(token) {
            headers.push(HeaderMatch {
                section,
                y_center: y_centers[idx],
            });
        }
    }

    if headers.is_empty() {
        return SectionGroups::new();
    }

    // Stable sort: ties between headers at the same height keep detection
    // order.
    headers.sort_by(|a, b| a.y_center.total_cmp(&b.y_center));

    let mut collected: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for header in &headers {
        collected.entry(header.section).or_default();
    }

    // Band membership is purely geometric: any token whose vertical
    // center falls strictly inside a band belongs to it, regardless of
    // horizontal position.
    for (i, header) in headers.iter().enumerate() {
        let top = header.y_center;
        let bottom = match headers.get(i + 1) {
            Some(next) => next.y_center,
            None => page_height + 1.0,
        };
        let bucket = collected.entry(header.section).or_default();
        for (token, &y) in tokens.iter().zip(&y_centers) {
            if y > top && y < bottom {
                bucket.push(token);
            }
        }
    }

    collected
        .into_iter()
        .map(|(section, tokens)| {
            let body = if tokens.is_empty() {
                Vec::new()
            } else {
                vec![tokens.join(" ").trim().to_string()]
            };
            (section.to_string(), body)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_at_y(y: i32) -> NormalizedBox {
        NormalizedBox(0, y - 5, 100, y + 5)
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_default_lexicon_matches_by_prefix() {
        let lexicon = SectionLexicon::default();
        assert_eq!(lexicon.match_section("Experience"), Some("experience"));
        assert_eq!(lexicon.match_section("EMPLOYMENT"), Some("experience"));
        assert_eq!(lexicon.match_section("  frameworks:"), Some("libraries"));
        assert_eq!(lexicon.match_section("engineer"), None);
    }

    #[test]
    fn test_first_matching_section_wins() {
        let lexicon = SectionLexicon::empty()
            .with_section("a", &["tech"])
            .with_section("b", &["tech stack"]);
        assert_eq!(lexicon.match_section("Tech stack"), Some("a"));
    }

    #[test]
    fn test_no_headers_yields_empty_map() {
        let lexicon = SectionLexicon::default();
        let groups = segment_sections(
            &tokens(&["foo", "bar"]),
            &[box_at_y(10), box_at_y(20)],
            500.0,
            &lexicon,
        );
        assert!(groups.is_empty());
    }
}
