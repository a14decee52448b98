//! Picking one station out of a search result.

use crate::domain::Station;

/// Select the station that best matches a free-text query.
///
/// Matching ignores case and prefers, in order:
///
/// 1. the first candidate whose name equals the query,
/// 2. the first candidate whose name contains the query,
/// 3. the first candidate, trusting the API's relevance order.
///
/// Returns `None` only when `candidates` is empty.
///
/// ```
/// use tfl::domain::Station;
/// use tfl::stations::select_best_match;
///
/// let candidates = vec![
///     Station::new("1", "Liverpool Street Underground Station"),
///     Station::new("2", "Liverpool"),
///     Station::new("3", "Liverpool Street"),
/// ];
///
/// let best = select_best_match(&candidates, "liverpool").unwrap();
/// assert_eq!(best.name, "Liverpool");
/// ```
pub fn select_best_match<'a>(candidates: &'a [Station], query: &str) -> Option<&'a Station> {
    let query = query.to_lowercase();
    let names: Vec<String> = candidates.iter().map(|s| s.name.to_lowercase()).collect();

    let exact = names.iter().position(|name| *name == query);
    let contains = || names.iter().position(|name| name.contains(&query));

    exact
        .or_else(contains)
        .map(|idx| &candidates[idx])
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Station> {
        vec![
            Station::new("1", "Liverpool Street Underground Station"),
            Station::new("2", "Liverpool"),
            Station::new("3", "Liverpool Street"),
        ]
    }

    fn best_id(query: &str) -> String {
        select_best_match(&candidates(), query).unwrap().id.clone()
    }

    #[test]
    fn exact_match() {
        assert_eq!(best_id("Liverpool"), "2");
    }

    #[test]
    fn exact_match_case_insensitive() {
        assert_eq!(best_id("liverpool"), "2");
        assert_eq!(best_id("LIVERPOOL"), "2");
    }

    #[test]
    fn exact_match_beats_earlier_substring() {
        assert_eq!(best_id("Liverpool Street"), "3");
    }

    #[test]
    fn first_substring_match_when_no_exact() {
        assert_eq!(best_id("Underground"), "1");
        assert_eq!(best_id("street"), "1");
    }

    #[test]
    fn falls_back_to_first_candidate() {
        assert_eq!(best_id("Paddington"), "1");
    }

    #[test]
    fn empty_candidates() {
        assert!(select_best_match(&[], "Bank").is_none());
    }
}
