//! Tests for the heuristic section segmenter: header detection, band
//! partitioning and the documented imprecisions of the approach.

use vitae_core::geometry::NormalizedBox;
use vitae_core::segment::{SectionLexicon, segment_sections};

fn box_at_y(y: i32) -> NormalizedBox {
    NormalizedBox(0, y - 5, 100, y + 5)
}

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_no_headers_returns_empty_groups() {
    let groups = segment_sections(
        &tokens(&["foo", "bar"]),
        &[box_at_y(10), box_at_y(20)],
        500.0,
        &SectionLexicon::default(),
    );
    assert!(groups.is_empty());
}

#[test]
fn test_single_header_collects_body_below() {
    let groups = segment_sections(
        &tokens(&["Experience", "Built", "systems"]),
        &[box_at_y(10), box_at_y(20), box_at_y(30)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups["experience"], vec!["Built systems".to_string()]);
}

#[test]
fn test_header_token_itself_is_not_collected() {
    // The header's own center sits on the band's open upper bound.
    let groups = segment_sections(
        &tokens(&["Experience"]),
        &[box_at_y(10)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["experience"], Vec::<String>::new());
}

#[test]
fn test_two_headers_split_into_bands() {
    let groups = segment_sections(
        &tokens(&["Summary", "Seasoned", "Skills", "Rust"]),
        &[box_at_y(10), box_at_y(50), box_at_y(100), box_at_y(150)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["summary"], vec!["Seasoned".to_string()]);
    assert_eq!(groups["skills"], vec!["Rust".to_string()]);
}

#[test]
fn test_sections_keyed_in_vertical_order() {
    let groups = segment_sections(
        &tokens(&["Skills", "Rust", "Summary", "Seasoned"]),
        &[box_at_y(100), box_at_y(150), box_at_y(10), box_at_y(50)],
        500.0,
        &SectionLexicon::default(),
    );
    let keys: Vec<&String> = groups.keys().collect();
    assert_eq!(keys, ["summary", "skills"]);
}

#[test]
fn test_repeated_header_feeds_one_section() {
    // The same header repeated across a column break: two matches, two
    // bands, one section accumulating both.
    let groups = segment_sections(
        &tokens(&["Experience", "Acme", "Experience", "Initech"]),
        &[box_at_y(10), box_at_y(30), box_at_y(60), box_at_y(90)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups.len(), 1);
    assert_eq!(groups["experience"], vec!["Acme Initech".to_string()]);
}

#[test]
fn test_band_membership_is_purely_geometric() {
    // Banding looks only at vertical centers: a token in a far-right
    // column at the same height is collected like any left-column token.
    let groups = segment_sections(
        &tokens(&["Skills", "Rust", "Chess"]),
        &[box_at_y(10), box_at_y(30), NormalizedBox(500, 25, 600, 35)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["skills"], vec!["Rust Chess".to_string()]);
}

#[test]
fn test_side_by_side_headers_leave_a_degenerate_band() {
    // Two headers at identical height: the first band is empty, ties
    // resolved only by stable detection order.
    let groups = segment_sections(
        &tokens(&["Summary", "Skills", "Rust"]),
        &[box_at_y(10), box_at_y(10), box_at_y(50)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["summary"], Vec::<String>::new());
    assert_eq!(groups["skills"], vec!["Rust".to_string()]);
}

#[test]
fn test_prefix_match_false_positives_on_body_text() {
    // Known imprecision: a body token starting with a keyword is taken
    // for a header ("Languages are...").
    let groups = segment_sections(
        &tokens(&["Experience", "Languages", "are", "fun"]),
        &[box_at_y(10), box_at_y(30), box_at_y(50), box_at_y(70)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["experience"], Vec::<String>::new());
    assert_eq!(groups["languages"], vec!["are fun".to_string()]);
}

#[test]
fn test_last_band_extends_just_past_page_height() {
    let groups = segment_sections(
        &tokens(&["Skills", "bottom"]),
        &[box_at_y(10), box_at_y(500)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["skills"], vec!["bottom".to_string()]);
}

#[test]
fn test_tokens_past_page_height_fall_outside_last_band() {
    // Carried-forward quirk: boxes are on the 0-1000 grid while the band
    // bound is the page height in original units, so grid centers past
    // the page height are dropped.
    let groups = segment_sections(
        &tokens(&["Skills", "dropped"]),
        &[box_at_y(10), box_at_y(900)],
        500.0,
        &SectionLexicon::default(),
    );
    assert_eq!(groups["skills"], Vec::<String>::new());
}

#[test]
fn test_custom_lexicon_sections_extend_the_vocabulary() {
    let lexicon = SectionLexicon::default().with_section("education", &["education", "academic"]);
    let groups = segment_sections(
        &tokens(&["Education", "BSc"]),
        &[box_at_y(10), box_at_y(30)],
        500.0,
        &lexicon,
    );
    assert_eq!(groups["education"], vec!["BSc".to_string()]);
}
