//! Wire contracts for the longitudinal lesion history.

use serde::{Deserialize, Serialize};

/// One historical analysis snapshot for a lesion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub observation_id: i64,

    /// Server-authored capture timestamp. Carried as an opaque string and
    /// rendered verbatim; the client never re-parses or re-sorts it.
    pub captured_at: String,

    #[serde(default)]
    pub top_class: Option<String>,

    #[serde(default)]
    pub top_prob: Option<f64>,
}

/// A tracked lesion and its observations, in the order the server returned
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesion {
    pub lesion_id: i64,

    #[serde(default)]
    pub body_site: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Always a list, never null; an untracked lesion has an empty one.
    #[serde(default)]
    pub events: Vec<Observation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub lesions: Vec<Lesion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_events_decode_to_empty_list() {
        let json = r#"{"lesion_id": 7, "body_site": "forearm"}"#;
        let lesion: Lesion = serde_json::from_str(json).unwrap();
        assert!(lesion.events.is_empty());
        assert_eq!(lesion.body_site.as_deref(), Some("forearm"));
    }

    #[test]
    fn test_unclassified_observation_decodes() {
        let json = r#"{"observation_id": 3, "captured_at": "2024-03-01T09:30:00"}"#;
        let observation: Observation = serde_json::from_str(json).unwrap();
        assert!(observation.top_class.is_none());
        assert!(observation.top_prob.is_none());
    }

    #[test]
    fn test_empty_timeline_decodes() {
        let response: TimelineResponse = serde_json::from_str(r#"{"lesions": []}"#).unwrap();
        assert!(response.lesions.is_empty());
    }
}
