//! Lossy canonicalization of Korean place and highway names.
//!
//! The output is a comparison key, never shown to users. It is intentionally
//! coarse: digits, direction suffixes, and generic facility words are all
//! stripped, so two different physical facilities can collapse to the same
//! key. Matching always re-validates with a geo-distance bound or a shared
//! route-name check before accepting a key collision.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical regex"));

/// Direction suffixes seen on rest-area signage ("bound for X").
const DIRECTION_SUFFIXES: &[&str] = &[
    "상행",
    "하행",
    "양방향",
    "양평방향",
    "서울방향",
    "부산방향",
    "목포방향",
    "대전방향",
    "인천방향",
    "강릉방향",
    "춘천방향",
    "통영방향",
    "순천방향",
    "논산방향",
    "대구방향",
    "울산방향",
    "광주방향",
];

/// Generic facility words stripped from place names. Order matters:
/// "졸음쉼터" must go before the bare "쉼터".
const PLACE_SUFFIXES: &[&str] = &["고속도로", "휴게소", "졸음쉼터", "쉼터"];

/// Generic road-class words stripped from highway names. "고속국도" before
/// "국도", and the bare line suffix "선" last.
const ROUTE_SUFFIXES: &[&str] = &["고속국도", "고속도로", "자동차전용도로", "국도", "선"];

fn base_normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = PARENTHETICAL.replace_all(&lowered, "");
    stripped
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '·' | '-' | '.'))
        .collect()
}

fn strip_all(mut text: String, words: &[&str]) -> String {
    for word in words {
        text = text.replace(word, "");
    }
    text
}

/// Normalizes a rest-area / place name into a comparison key.
#[must_use]
pub fn normalize_rest_name(name: &str) -> String {
    let text = base_normalize(name);
    let text = strip_all(text, PLACE_SUFFIXES);
    let text = strip_all(text, DIRECTION_SUFFIXES);
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Normalizes a highway / route name into a comparison key.
#[must_use]
pub fn normalize_route_name(name: &str) -> String {
    let text = base_normalize(name);
    let text = strip_all(text, ROUTE_SUFFIXES);
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}
