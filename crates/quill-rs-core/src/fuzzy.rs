//! Subsequence scoring used to rank context candidates.

/// Candidates must score strictly above this to be kept.
pub const MATCH_THRESHOLD: f64 = 0.3;
/// Maximum number of ranked results.
pub const MAX_RESULTS: usize = 5;

/// Score how well `pattern` matches `candidate` as an in-order subsequence.
///
/// Both inputs are lower-cased. Each pattern character that is found earns
/// 1.0 when it is the first hit or directly follows the previous hit, and 0.5
/// otherwise. Characters that never match earn nothing. The total is divided
/// by the pattern length, so the result is in `[0, 1]`. An empty pattern
/// scores 0.0.
pub fn score(pattern: &str, candidate: &str) -> f64 {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    if pattern.is_empty() {
        return 0.0;
    }
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();

    let mut points = 0.0;
    let mut next = 0usize;
    let mut last_match: Option<usize> = None;
    for wanted in &pattern {
        let Some(offset) = candidate[next..].iter().position(|c| c == wanted) else {
            break;
        };
        let idx = next + offset;
        points += match last_match {
            None => 1.0,
            Some(prev) if idx == prev + 1 => 1.0,
            Some(_) => 0.5,
        };
        last_match = Some(idx);
        next = idx + 1;
    }
    points / pattern.len() as f64
}

/// Rank `candidates` against `query`, best first.
///
/// `key` extracts the text to match. Only scores above [`MATCH_THRESHOLD`]
/// survive; ties keep their input order; at most [`MAX_RESULTS`] are returned.
pub fn rank<T>(query: &str, candidates: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<(T, f64)> {
    let mut scored: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let value = score(query, key(&candidate));
            (value > MATCH_THRESHOLD).then_some((candidate, value))
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(MAX_RESULTS);
    scored
}

#[cfg(test)]
mod tests {
    use super::{MAX_RESULTS, rank, score};
    use pretty_assertions::assert_eq;

    #[test]
    fn leading_contiguous_match_scores_one() {
        assert_eq!(score("note", "notes/today.md"), 1.0);
        assert_eq!(score("NoTe", "notebook"), 1.0);
    }

    #[test]
    fn interrupted_match_scores_between_zero_and_one() {
        // n=1, t=0.5 (gap), e=1 (adjacent to t)
        let value = score("nte", "note");
        assert!(value > 0.0 && value < 1.0);
        assert_eq!(value, 2.5 / 3.0);
    }

    #[test]
    fn first_hit_need_not_be_at_start() {
        assert_eq!(score("md", "a.md"), 1.0);
    }

    #[test]
    fn missing_characters_score_nothing() {
        assert_eq!(score("xyz", "notes.md"), 0.0);
        assert_eq!(score("nz", "notes"), 0.5);
        assert_eq!(score("", "notes"), 0.0);
    }

    #[test]
    fn rank_filters_sorts_and_truncates() {
        let candidates = vec![
            "zzz.md", "alpha.md", "al.md", "a-l.md", "b.md", "alp.md", "alph.md", "al2.md",
        ];
        let ranked = rank("al", candidates, |c| *c);
        assert_eq!(ranked.len(), MAX_RESULTS);
        assert!(ranked.iter().all(|(_, s)| *s > 0.3));
        let names: Vec<&str> = ranked.iter().map(|(c, _)| *c).collect();
        // perfect scores keep their input order ahead of the partial match
        assert_eq!(names, vec!["alpha.md", "al.md", "alp.md", "alph.md", "al2.md"]);
    }

    #[test]
    fn rank_drops_weak_matches() {
        let ranked = rank("abcd", vec!["a", "abcd"], |c| *c);
        assert_eq!(ranked, vec![("abcd", 1.0)]);
    }
}
