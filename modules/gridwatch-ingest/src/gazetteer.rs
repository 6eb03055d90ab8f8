//! Curated place reference data plus approximate name matching.
//!
//! Lookup is two-pass: a case-insensitive containment pass over primary and
//! Kinyarwanda names short-circuits, and only when it yields nothing does the
//! edit-distance pass run. Absence of a match is a normal outcome, never an
//! error.

use gridwatch_common::GazetteerEntry;

/// Minimum similarity (0-100 scale) for a fuzzy hit. Strictly greater-than.
const FUZZY_THRESHOLD: f64 = 60.0;

/// Normalized edit-distance similarity on a 0-100 scale.
fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Best similarity between the query and any of the entry's names.
fn entry_score(query: &str, entry: &GazetteerEntry) -> f64 {
    let mut score = ratio(query, &entry.name);
    if let Some(kin) = &entry.name_kinyarwanda {
        score = score.max(ratio(query, kin));
    }
    for alias in &entry.aliases {
        score = score.max(ratio(query, alias));
    }
    score
}

/// Search entries by name: containment first, fuzzy fallback.
///
/// Containment matches (primary or Kinyarwanda name contains the query,
/// case-insensitively) return immediately. Otherwise entries scoring strictly
/// above the threshold are returned best-first, ties kept in entry order.
pub fn search<'a>(
    query: &str,
    entries: &'a [GazetteerEntry],
    limit: usize,
) -> Vec<&'a GazetteerEntry> {
    let needle = query.to_lowercase();

    let contained: Vec<&GazetteerEntry> = entries
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&needle)
                || e.name_kinyarwanda
                    .as_ref()
                    .is_some_and(|k| k.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect();

    if !contained.is_empty() {
        return contained;
    }

    let mut scored: Vec<(&GazetteerEntry, f64)> = entries
        .iter()
        .filter_map(|e| {
            let score = entry_score(query, e);
            (score > FUZZY_THRESHOLD).then_some((e, score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(e, _)| e).collect()
}

/// The curated Rwanda gazetteer: districts and major towns, with the
/// pre-2006 district names kept as aliases where they differ.
pub fn rwanda_gazetteer() -> Vec<GazetteerEntry> {
    vec![
        GazetteerEntry::new("Kigali").with_kinyarwanda("Umujyi wa Kigali"),
        GazetteerEntry::new("Butare").with_aliases(&["Astrida"]),
        GazetteerEntry::new("Gitarama"),
        GazetteerEntry::new("Ruhengeri"),
        GazetteerEntry::new("Gisenyi"),
        GazetteerEntry::new("Cyangugu"),
        GazetteerEntry::new("Kibungo"),
        GazetteerEntry::new("Byumba"),
        GazetteerEntry::new("Gikongoro"),
        GazetteerEntry::new("Kibuye"),
        GazetteerEntry::new("Umutara"),
        GazetteerEntry::new("Gasabo"),
        GazetteerEntry::new("Kicukiro"),
        GazetteerEntry::new("Nyarugenge"),
        GazetteerEntry::new("Muhanga").with_aliases(&["Gitarama"]),
        GazetteerEntry::new("Musanze").with_aliases(&["Ruhengeri"]),
        GazetteerEntry::new("Rubavu").with_aliases(&["Gisenyi"]),
        GazetteerEntry::new("Rusizi").with_aliases(&["Cyangugu"]),
        GazetteerEntry::new("Nyagatare"),
        GazetteerEntry::new("Kayonza"),
        GazetteerEntry::new("Rwamagana"),
        GazetteerEntry::new("Bugesera"),
        GazetteerEntry::new("Nyanza"),
        GazetteerEntry::new("Gisagara"),
        GazetteerEntry::new("Nyaruguru"),
        GazetteerEntry::new("Huye").with_aliases(&["Butare"]),
        GazetteerEntry::new("Nyamagabe").with_aliases(&["Gikongoro"]),
        GazetteerEntry::new("Ruhango"),
        GazetteerEntry::new("Kamonyi"),
        GazetteerEntry::new("Rulindo"),
        GazetteerEntry::new("Gakenke"),
        GazetteerEntry::new("Burera"),
        GazetteerEntry::new("Gicumbi").with_aliases(&["Byumba"]),
        GazetteerEntry::new("Kirehe"),
        GazetteerEntry::new("Ngoma").with_aliases(&["Kibungo"]),
        GazetteerEntry::new("Gatsibo"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<GazetteerEntry> {
        rwanda_gazetteer()
    }

    // --- containment pass ---

    #[test]
    fn containment_match_returns_entry() {
        let entries = entries();
        let hits = search("Kigali", &entries, 10);
        assert_eq!(hits[0].name, "Kigali");
    }

    #[test]
    fn containment_is_case_insensitive() {
        let entries = entries();
        let hits = search("NYARUGENGE", &entries, 10);
        assert_eq!(hits[0].name, "Nyarugenge");
    }

    #[test]
    fn partial_query_matches_by_containment() {
        let entries = entries();
        let hits = search("kiga", &entries, 10);
        assert!(hits.iter().any(|e| e.name == "Kigali"));
    }

    #[test]
    fn kinyarwanda_name_matches_by_containment() {
        let entries = entries();
        let hits = search("umujyi wa kigali", &entries, 10);
        assert_eq!(hits[0].name, "Kigali");
    }

    #[test]
    fn containment_short_circuits_fuzzy() {
        // "Nyanza" is contained in exactly one primary name; a fuzzy pass
        // would also surface Nyamagabe-like near misses.
        let entries = entries();
        let hits = search("Nyanza", &entries, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Nyanza");
    }

    #[test]
    fn limit_applies_to_containment_hits() {
        let entries = entries();
        let hits = search("a", &entries, 3);
        assert_eq!(hits.len(), 3);
    }

    // --- fuzzy pass ---

    #[test]
    fn identical_query_scores_hundred() {
        let entry = GazetteerEntry::new("Kigali");
        assert_eq!(entry_score("kigali", &entry), 100.0);
    }

    #[test]
    fn misspelling_above_threshold_matches() {
        let entries = entries();
        let hits = search("Kigaly", &entries, 10);
        assert!(hits.iter().any(|e| e.name == "Kigali"));
    }

    #[test]
    fn alias_contributes_to_score() {
        let entries = entries();
        let hits = search("Astridda", &entries, 10);
        assert!(hits.iter().any(|e| e.name == "Butare"));
    }

    #[test]
    fn garbage_query_returns_empty() {
        let entries = entries();
        assert!(search("xqzw", &entries, 10).is_empty());
    }

    #[test]
    fn fuzzy_results_are_best_first() {
        let entries = vec![
            GazetteerEntry::new("Ruhango"),
            GazetteerEntry::new("Ruhengeri"),
        ];
        // "Ruhanga" is one edit from Ruhango, further from Ruhengeri.
        let hits = search("Ruhanga", &entries, 10);
        assert_eq!(hits[0].name, "Ruhango");
    }

    #[test]
    fn fuzzy_respects_limit() {
        let entries = vec![
            GazetteerEntry::new("Nyanza"),
            GazetteerEntry::new("Nyanze"),
        ];
        let hits = search("Nyanzo", &entries, 1);
        assert_eq!(hits.len(), 1);
    }
}
