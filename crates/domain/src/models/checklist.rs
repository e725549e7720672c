//! Audit checklist domain models and section ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Verdict recorded for a checklist question. Unanswered rows have no status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    Compliant,
    NonCompliant,
    Observation,
    ImprovementOpportunity,
}

impl ChecklistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistStatus::Compliant => "compliant",
            ChecklistStatus::NonCompliant => "non_compliant",
            ChecklistStatus::Observation => "observation",
            ChecklistStatus::ImprovementOpportunity => "improvement_opportunity",
        }
    }
}

impl FromStr for ChecklistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compliant" => Ok(ChecklistStatus::Compliant),
            "non_compliant" => Ok(ChecklistStatus::NonCompliant),
            "observation" => Ok(ChecklistStatus::Observation),
            "improvement_opportunity" => Ok(ChecklistStatus::ImprovementOpportunity),
            _ => Err(format!("Invalid checklist status: {}", s)),
        }
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence attached to a checklist row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// A checklist row of an audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub position: i32,
    pub section: String,
    pub question: String,
    pub status: Option<ChecklistStatus>,
    pub notes: Option<String>,
    pub evidence: Vec<Evidence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update one checklist row.
///
/// `status` distinguishes an absent field (leave unchanged) from an explicit
/// `null` (clear the verdict). Values outside the verdict set fail to parse.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistItemRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<ChecklistStatus>>,

    #[validate(length(max = 10000, message = "Notes must be at most 10000 characters"))]
    pub notes: Option<String>,
}

/// Request to attach evidence to a checklist row.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddEvidenceRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Evidence type must be 1-50 characters"))]
    pub kind: String,

    #[validate(url(message = "Evidence URL must be a valid URL"))]
    pub url: String,

    #[validate(length(min = 1, max = 255, message = "Evidence name must be 1-255 characters"))]
    pub name: String,
}

impl AddEvidenceRequest {
    pub fn into_evidence(self, timestamp: DateTime<Utc>) -> Evidence {
        Evidence {
            kind: self.kind,
            url: self.url,
            name: self.name,
            timestamp,
        }
    }
}

/// Maps a present field to `Some`, keeping an explicit `null` as `Some(None)`.
pub(super) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Number(u64),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(chunk(&s[start..], prev));
    }
    out
}

fn chunk(text: &str, digits: bool) -> Chunk<'_> {
    if digits {
        // Runs longer than u64 saturate; section labels never get close.
        Chunk::Number(text.parse().unwrap_or(u64::MAX))
    } else {
        Chunk::Text(text)
    }
}

/// Natural ordering of section labels: digit runs compare numerically and
/// text runs case-insensitively, so `"9.2" < "10.1"`.
pub fn compare_sections(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Chunk::Number(x), Chunk::Number(y)) => x.cmp(y),
            (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

/// Sorts checklist rows by section, keeping template position for ties.
pub fn sort_checklist(items: &mut [ChecklistItem]) {
    items.sort_by(|a, b| {
        compare_sections(&a.section, &b.section).then(a.position.cmp(&b.position))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_section_ordering() {
        assert_eq!(compare_sections("9.2", "10.1"), Ordering::Less);
        assert_eq!(compare_sections("4.1", "4.10"), Ordering::Less);
        assert_eq!(compare_sections("4.2", "4.2"), Ordering::Equal);
        assert_eq!(compare_sections("10.2", "7.5"), Ordering::Greater);
        assert_eq!(compare_sections("4", "4.1"), Ordering::Less);
    }

    #[test]
    fn test_text_sections_compare_case_insensitively() {
        assert_eq!(compare_sections("Annex A", "annex b"), Ordering::Less);
        assert_eq!(compare_sections("A.5", "a.5"), Ordering::Equal);
    }

    #[test]
    fn test_sort_checklist() {
        let now = Utc::now();
        let audit_id = Uuid::new_v4();
        let item = |position: i32, section: &str| ChecklistItem {
            id: Uuid::new_v4(),
            audit_id,
            position,
            section: section.into(),
            question: "?".into(),
            status: None,
            notes: None,
            evidence: vec![],
            created_at: now,
            updated_at: now,
        };

        let mut items = vec![item(0, "10.2"), item(1, "9.1"), item(2, "4.1"), item(3, "8.5")];
        sort_checklist(&mut items);
        let sections: Vec<_> = items.iter().map(|i| i.section.as_str()).collect();
        assert_eq!(sections, vec!["4.1", "8.5", "9.1", "10.2"]);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: UpdateChecklistItemRequest =
            serde_json::from_value(serde_json::json!({"notes": "ok"})).unwrap();
        assert_eq!(absent.status, None);

        let cleared: UpdateChecklistItemRequest =
            serde_json::from_value(serde_json::json!({"status": null})).unwrap();
        assert_eq!(cleared.status, Some(None));

        let set: UpdateChecklistItemRequest =
            serde_json::from_value(serde_json::json!({"status": "non_compliant"})).unwrap();
        assert_eq!(set.status, Some(Some(ChecklistStatus::NonCompliant)));
    }

    #[test]
    fn test_update_rejects_unknown_status() {
        for bad in ["pending", "approved", "NON_COMPLIANT", ""] {
            let parsed: Result<UpdateChecklistItemRequest, _> =
                serde_json::from_value(serde_json::json!({ "status": bad }));
            assert!(parsed.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_evidence_uses_type_key() {
        let req: AddEvidenceRequest = serde_json::from_value(serde_json::json!({
            "type": "photo",
            "url": "https://files.example.com/a.jpg",
            "name": "a.jpg"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let evidence = req.into_evidence(Utc::now());
        let json = serde_json::to_value(&evidence).unwrap();
        assert_eq!(json["type"], "photo");
        assert!(json.get("timestamp").is_some());
    }
}
