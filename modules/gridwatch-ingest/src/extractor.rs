//! Location extraction: gazetteer containment scan plus optional generic NER.
//!
//! Gazetteer matches always come first in the output — the gazetteer is an
//! ordered list scanned independently of the recognizer. Results are
//! title-cased canonical names, deduplicated case-insensitively.

use std::sync::Arc;

use gridwatch_common::GazetteerEntry;
use tracing::info;

use crate::traits::{EntityLabel, EntityRecognizer};

/// Title-case each whitespace-separated word.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct LocationExtractor {
    gazetteer: Vec<GazetteerEntry>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl LocationExtractor {
    pub fn new(
        gazetteer: Vec<GazetteerEntry>,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
    ) -> Self {
        if recognizer.is_none() {
            info!("no entity recognizer configured, extraction is gazetteer-only");
        }
        Self {
            gazetteer,
            recognizer,
        }
    }

    /// Ordered candidate place names found in `text`.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        let mut found: Vec<String> = Vec::new();

        for entry in &self.gazetteer {
            if self.entry_matches(entry, &text_lower) {
                push_unique(&mut found, title_case(&entry.name));
            }
        }

        if let Some(recognizer) = &self.recognizer {
            for entity in recognizer.entities(text) {
                if matches!(entity.label, EntityLabel::Gpe | EntityLabel::Location) {
                    push_unique(&mut found, title_case(entity.text.trim()));
                }
            }
        }

        found
    }

    fn entry_matches(&self, entry: &GazetteerEntry, text_lower: &str) -> bool {
        if text_lower.contains(&entry.name.to_lowercase()) {
            return true;
        }
        if let Some(kin) = &entry.name_kinyarwanda {
            if text_lower.contains(&kin.to_lowercase()) {
                return true;
            }
        }
        entry
            .aliases
            .iter()
            .any(|alias| text_lower.contains(&alias.to_lowercase()))
    }
}

fn push_unique(found: &mut Vec<String>, candidate: String) {
    if candidate.is_empty() {
        return;
    }
    if !found.iter().any(|f| f.eq_ignore_ascii_case(&candidate)) {
        found.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::rwanda_gazetteer;
    use crate::traits::NamedEntity;

    struct StubRecognizer {
        entities: Vec<NamedEntity>,
    }

    impl EntityRecognizer for StubRecognizer {
        fn entities(&self, _text: &str) -> Vec<NamedEntity> {
            self.entities.clone()
        }
    }

    fn gazetteer_only() -> LocationExtractor {
        LocationExtractor::new(rwanda_gazetteer(), None)
    }

    fn with_recognizer(entities: Vec<NamedEntity>) -> LocationExtractor {
        LocationExtractor::new(
            rwanda_gazetteer(),
            Some(Arc::new(StubRecognizer { entities })),
        )
    }

    fn entity(text: &str, label: EntityLabel) -> NamedEntity {
        NamedEntity {
            text: text.to_string(),
            label,
        }
    }

    // --- gazetteer scan ---

    #[test]
    fn gazetteer_name_is_found_title_cased() {
        let locations = gazetteer_only().extract("power outage in kigali this morning");
        assert_eq!(locations, vec!["Kigali"]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let locations = gazetteer_only().extract("Outage in KICUKIRO");
        assert_eq!(locations, vec!["Kicukiro"]);
    }

    #[test]
    fn multiple_locations_keep_gazetteer_order() {
        let locations = gazetteer_only().extract("Restoration under way in Musanze and Gasabo");
        // Gazetteer order, not text order.
        assert_eq!(locations, vec!["Gasabo", "Musanze"]);
    }

    #[test]
    fn alias_hit_yields_canonical_name() {
        let locations = gazetteer_only().extract("crews heading to Astrida");
        assert_eq!(locations, vec!["Butare"]);
    }

    #[test]
    fn no_location_yields_empty() {
        assert!(gazetteer_only().extract("thank you for your patience").is_empty());
    }

    // --- recognizer merge ---

    #[test]
    fn recognizer_entities_follow_gazetteer_matches() {
        let extractor = with_recognizer(vec![entity("Nairobi", EntityLabel::Gpe)]);
        let locations = extractor.extract("no power in Kigali");
        assert_eq!(locations, vec!["Kigali", "Nairobi"]);
    }

    #[test]
    fn recognizer_duplicates_are_dropped_case_insensitively() {
        let extractor = with_recognizer(vec![entity("KIGALI", EntityLabel::Gpe)]);
        let locations = extractor.extract("no power in Kigali");
        assert_eq!(locations, vec!["Kigali"]);
    }

    #[test]
    fn non_geo_entities_are_ignored() {
        let extractor = with_recognizer(vec![entity("REG", EntityLabel::Other)]);
        let locations = extractor.extract("no power in Kigali");
        assert_eq!(locations, vec!["Kigali"]);
    }

    #[test]
    fn recognizer_entity_is_title_cased() {
        let extractor = with_recognizer(vec![entity("lake kivu", EntityLabel::Location)]);
        let locations = extractor.extract("boats stranded");
        assert_eq!(locations, vec!["Lake Kivu"]);
    }
}
