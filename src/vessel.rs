use once_cell::sync::Lazy;
use regex::Regex;

/// Trip suffix appended by some operators to the vessel label: a hyphen, one
/// or more digits and at most one trailing letter ("-26v", "-1a", "-12x").
static TRIP_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\S)\s*-\d+[A-Za-z]?$").unwrap());

/// Strip the trip suffix from a raw vessel label to recover the display name.
///
/// Labels without a recognizable suffix pass through unchanged, so this never
/// fails. The suffix grammar is inferred from observed data and treated as a
/// best-effort heuristic.
pub fn parse_vessel_name(raw: &str) -> String {
    match TRIP_SUFFIX.captures(raw) {
        Some(caps) => caps[1].trim().to_string(),
        None => raw.to_string(),
    }
}
