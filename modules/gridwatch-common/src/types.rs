use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// What a post reports. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutageType {
    Outage,
    Restoration,
    Maintenance,
}

impl std::fmt::Display for OutageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutageType::Outage => write!(f, "outage"),
            OutageType::Restoration => write!(f, "restoration"),
            OutageType::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Lifecycle state derived deterministically from the outage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutageStatus {
    Active,
    Resolved,
    Scheduled,
}

impl std::fmt::Display for OutageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutageStatus::Active => write!(f, "active"),
            OutageStatus::Resolved => write!(f, "resolved"),
            OutageStatus::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl OutageType {
    /// Fixed type → status mapping.
    pub fn derived_status(self) -> OutageStatus {
        match self {
            OutageType::Restoration => OutageStatus::Resolved,
            OutageType::Maintenance => OutageStatus::Scheduled,
            OutageType::Outage => OutageStatus::Active,
        }
    }
}

/// The two ingested post streams. Each keeps its own fetch cursor;
/// they must never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// The provider account's own timeline (including replies to users).
    Provider,
    /// Posts from any user that mention the provider account.
    Mentions,
}

impl StreamKind {
    /// Durable key for this stream's cursor.
    pub fn cursor_key(self) -> &'static str {
        match self {
            StreamKind::Provider => "provider_posts",
            StreamKind::Mentions => "mentions",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Provider => write!(f, "provider"),
            StreamKind::Mentions => write!(f, "mentions"),
        }
    }
}

// --- Posts ---

/// Engagement counters as reported by the post source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PostMetrics {
    pub retweets: u32,
    pub likes: u32,
    pub replies: u32,
    pub quotes: u32,
}

/// A post as returned by the source, before any extraction.
///
/// `id` is the source's own identifier — opaque, but ordered the way the
/// source orders it (streams return newest first). For replies, `original_text`
/// carries the text of the post being replied to, resolved by the source's
/// expansion mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub author_id: Option<String>,
    #[serde(default)]
    pub is_reply: bool,
    pub original_text: Option<String>,
    #[serde(default)]
    pub metrics: PostMetrics,
}

// --- Gazetteer ---

/// One curated place: canonical name plus optional aliases.
/// Reference data, loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub name: String,
    pub name_kinyarwanda: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl GazetteerEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            name_kinyarwanda: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_kinyarwanda(mut self, name: &str) -> Self {
        self.name_kinyarwanda = Some(name.to_string());
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }
}

// --- Outage records ---

/// The pipeline's output: one structured outage event per qualifying post.
/// Built exactly once, never mutated; the store may attach an embedding
/// vector before durability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutageRecord {
    pub id: Uuid,
    /// Identifier of the post this record was extracted from.
    pub post_id: String,
    /// All extracted candidate areas, discovery-ordered; `areas[0]` is the
    /// primary area.
    pub areas: Vec<String>,
    pub outage_type: OutageType,
    pub status: OutageStatus,
    pub reported_at: DateTime<Utc>,
    pub estimated_duration: Option<String>,
    pub cause: Option<String>,
    /// The combined text the extraction and classification ran over.
    pub text: String,
    /// Winning category score, in [0.0, 1.0].
    pub confidence: f32,
}
