//! Shared primitive type aliases.

/// Identities, sessions, and token ids are all UUIDs (v4).
pub type SubjectId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
