//! Commit record extraction and serialization.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::Commit;
use serde::{Deserialize, Serialize};

/// One version-control commit, as emitted on the NDJSON stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Hashes of the parent commits.
    pub parents: Vec<String>,
    /// Commit author.
    pub author: Identity,
    /// Committer, which differs from the author for amended or applied commits.
    pub committer: Identity,
    /// Instant the commit was authored; written as UTC ISO-8601.
    #[serde(with = "utc_iso8601")]
    pub authored_at: DateTime<FixedOffset>,
    /// Instant the commit was committed; written as UTC ISO-8601.
    #[serde(with = "utc_iso8601")]
    pub committed_at: DateTime<FixedOffset>,
    /// First line of the commit message.
    pub subject: String,
    /// Remainder of the commit message, if any.
    pub body: Option<String>,
}

/// Name and email of a commit author or committer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Identity {
    fn from_signature(signature: &git2::Signature<'_>) -> Self {
        Self {
            name: signature.name().unwrap_or("Unknown").to_string(),
            email: signature.email().unwrap_or("unknown@example.com").to_string(),
        }
    }
}

impl CommitRecord {
    /// Builds a record from a `git2::Commit`.
    pub fn from_git_commit(commit: &Commit<'_>) -> Result<Self> {
        let hash = commit.id().to_string();
        let parents = commit.parent_ids().map(|id| id.to_string()).collect();

        let author = Identity::from_signature(&commit.author());
        let committer = Identity::from_signature(&commit.committer());

        let authored_at = signature_time(&commit.author().when())?;
        let committed_at = signature_time(&commit.time())?;

        // summary()/body() are None for non-UTF-8 messages; emit what we can.
        let subject = commit.summary().unwrap_or("").to_string();
        let body = commit.body().map(str::to_string);

        Ok(Self {
            hash,
            parents,
            author,
            committer,
            authored_at,
            committed_at,
            subject,
            body,
        })
    }
}

/// Converts a git timestamp to a timezone-aware instant.
fn signature_time(time: &git2::Time) -> Result<DateTime<FixedOffset>> {
    use chrono::Offset;

    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| chrono::Utc.fix());

    Ok(DateTime::from_timestamp(time.seconds(), 0)
        .context("Invalid commit timestamp")?
        .with_timezone(&offset))
}

/// Serde codec writing datetimes as UTC ISO-8601 strings regardless of the
/// offset they were recorded with.
pub mod utc_iso8601 {
    use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as e.g. `2026-01-30T12:34:56Z`.
    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let utc = value.with_timezone(&Utc);
        serializer.serialize_str(&utc.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Deserializes any RFC 3339 string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_record(authored_at: DateTime<FixedOffset>) -> CommitRecord {
        CommitRecord {
            hash: "a".repeat(40),
            parents: vec![],
            author: Identity {
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
            },
            committer: Identity {
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
            },
            authored_at,
            committed_at: authored_at,
            subject: "feat: add thing".to_string(),
            body: None,
        }
    }

    #[test]
    fn datetimes_serialize_as_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let authored = offset.with_ymd_and_hms(2026, 1, 30, 14, 0, 0).unwrap();
        let record = sample_record(authored);

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(json["authored_at"], "2026-01-30T12:00:00Z");
    }

    #[test]
    fn datetimes_round_trip_the_instant() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let authored = offset.with_ymd_and_hms(2025, 6, 1, 9, 30, 15).unwrap();
        let record = sample_record(authored);

        let json = serde_json::to_string(&record).unwrap();
        let back: CommitRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.authored_at.with_timezone(&Utc), authored.with_timezone(&Utc));
    }
}
