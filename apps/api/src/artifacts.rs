//! Artifact Store: the current draft of each generated hiring document.
//!
//! Four fixed slots. `set` overwrites unconditionally; there is no history.

use serde::{Deserialize, Serialize};

/// Kind of hiring artifact. Serialized as `jd`, `email`, `checklist`, `offer_letter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Jd,
    Email,
    Checklist,
    OfferLetter,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Jd,
        ArtifactKind::Email,
        ArtifactKind::Checklist,
        ArtifactKind::OfferLetter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Jd => "jd",
            ArtifactKind::Email => "email",
            ArtifactKind::Checklist => "checklist",
            ArtifactKind::OfferLetter => "offer_letter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Jd => "Job Description",
            ArtifactKind::Email => "Outreach Email",
            ArtifactKind::Checklist => "Hiring Checklist",
            ArtifactKind::OfferLetter => "Offer Letter",
        }
    }

    /// The artifact a recruiter's request refers to, checked in the order
    /// job description, email, checklist, offer letter.
    pub fn mentioned_in(text: &str) -> Option<ArtifactKind> {
        let lower = text.to_lowercase();
        let mentions_jd = lower.contains("job description")
            || lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == "jd");

        if mentions_jd {
            Some(ArtifactKind::Jd)
        } else if lower.contains("email") {
            Some(ArtifactKind::Email)
        } else if lower.contains("checklist") {
            Some(ArtifactKind::Checklist)
        } else if lower.contains("offer") {
            Some(ArtifactKind::OfferLetter)
        } else {
            None
        }
    }
}

/// Per-session store of the latest text for each artifact kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStore {
    pub jd: String,
    pub email: String,
    pub checklist: String,
    pub offer_letter: String,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current text, or `""` if the slot was never written.
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Jd => &self.jd,
            ArtifactKind::Email => &self.email,
            ArtifactKind::Checklist => &self.checklist,
            ArtifactKind::OfferLetter => &self.offer_letter,
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, text: impl Into<String>) {
        let slot = match kind {
            ArtifactKind::Jd => &mut self.jd,
            ArtifactKind::Email => &mut self.email,
            ArtifactKind::Checklist => &mut self.checklist,
            ArtifactKind::OfferLetter => &mut self.offer_letter,
        };
        *slot = text.into();
    }

    /// The non-empty slot whose text matches `existing` exactly (modulo outer whitespace).
    pub fn kind_holding(&self, existing: &str) -> Option<ArtifactKind> {
        let existing = existing.trim();
        if existing.is_empty() {
            return None;
        }
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind).trim() == existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_slot_reads_empty() {
        let store = ArtifactStore::new();
        for kind in ArtifactKind::ALL {
            assert_eq!(store.get(kind), "");
        }
    }

    #[test]
    fn test_set_overwrites_only_its_slot() {
        let mut store = ArtifactStore::new();
        store.set(ArtifactKind::Email, "first draft");
        store.set(ArtifactKind::Email, "second draft");
        store.set(ArtifactKind::Checklist, "1. Source");

        assert_eq!(store.get(ArtifactKind::Email), "second draft");
        assert_eq!(store.get(ArtifactKind::Checklist), "1. Source");
        assert_eq!(store.get(ArtifactKind::Jd), "");
        assert_eq!(store.get(ArtifactKind::OfferLetter), "");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ArtifactKind::OfferLetter).unwrap();
        assert_eq!(json, r#""offer_letter""#);
        let kind: ArtifactKind = serde_json::from_str(r#""jd""#).unwrap();
        assert_eq!(kind, ArtifactKind::Jd);
    }

    #[test]
    fn test_mentioned_in_prefers_job_description() {
        assert_eq!(
            ArtifactKind::mentioned_in("Make the job description and email shorter"),
            Some(ArtifactKind::Jd)
        );
        assert_eq!(
            ArtifactKind::mentioned_in("tweak the JD tone"),
            Some(ArtifactKind::Jd)
        );
        assert_eq!(
            ArtifactKind::mentioned_in("Make the email warmer"),
            Some(ArtifactKind::Email)
        );
        assert_eq!(
            ArtifactKind::mentioned_in("add background check to the checklist"),
            Some(ArtifactKind::Checklist)
        );
        assert_eq!(
            ArtifactKind::mentioned_in("raise the salary in the offer"),
            Some(ArtifactKind::OfferLetter)
        );
        assert_eq!(ArtifactKind::mentioned_in("make it shorter"), None);
    }

    #[test]
    fn test_jd_must_be_a_whole_word() {
        // "adjdust" style substrings must not count as a JD mention
        assert_eq!(ArtifactKind::mentioned_in("fix the adjdust typo"), None);
    }

    #[test]
    fn test_kind_holding_matches_exact_text() {
        let mut store = ArtifactStore::new();
        store.set(ArtifactKind::Checklist, "1. Source\n2. Screen");
        assert_eq!(
            store.kind_holding("  1. Source\n2. Screen\n"),
            Some(ArtifactKind::Checklist)
        );
        assert_eq!(store.kind_holding("something else"), None);
        assert_eq!(store.kind_holding("   "), None);
    }
}
