//! Assembly of the final outage record from one post.
//!
//! The only business-logic gate in the pipeline: a post with no recognizable
//! location anywhere produces nothing — silently, that is a normal outcome.
//! Everything else yields exactly one fully formed record.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use gridwatch_common::{OutageRecord, RawPost};

use crate::classifier;
use crate::correlator;
use crate::extractor::LocationExtractor;

pub struct OutageAssembler {
    extractor: LocationExtractor,
}

impl OutageAssembler {
    pub fn new(extractor: LocationExtractor) -> Self {
        Self { extractor }
    }

    /// Build zero or one record for a post.
    ///
    /// Locations are extracted from the combined text; when that yields
    /// nothing and reply context exists, the original post's text gets one
    /// more chance on its own. Classification always runs over the combined
    /// text.
    pub fn process(&self, post: &RawPost) -> Option<OutageRecord> {
        let combined = correlator::combined_text(post);

        let mut areas = self.extractor.extract(&combined);
        if areas.is_empty() {
            if let Some(original) = &post.original_text {
                areas = self.extractor.extract(original);
            }
        }
        if areas.is_empty() {
            debug!(post_id = %post.id, "no location recognized, skipping post");
            return None;
        }

        let (outage_type, confidence) = classifier::classify_outage_type(&combined);
        let cause = classifier::extract_cause(&combined);
        let estimated_duration = classifier::extract_duration(&combined);

        Some(OutageRecord {
            id: Uuid::new_v4(),
            post_id: post.id.clone(),
            areas,
            outage_type,
            status: outage_type.derived_status(),
            reported_at: post.created_at.unwrap_or_else(Utc::now),
            estimated_duration,
            cause: cause.map(str::to_string),
            text: combined.trim().to_string(),
            confidence,
        })
    }
}
