//! Core data models for the community resource API
//!
//! This module contains the data types used throughout the application for
//! representing service locations, community stories, shared experiences, and
//! migration updates. All types deserialize directly from the API's JSON wire
//! format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a support service, used for map marker grouping on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Legal,
    Health,
    Housing,
    Education,
    Language,
    Employment,
    Community,
}

/// A physical location offering support services to newcomers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
    /// Unique identifier for the location
    pub id: String,
    /// Human-readable name of the service
    pub name: String,
    /// What kind of support the service offers
    pub category: ServiceCategory,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Street address, if published
    pub address: Option<String>,
    /// Contact phone number, if published
    pub phone: Option<String>,
}

/// A community story submitted through the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier for the story
    pub id: String,
    /// Display name of the author, if they chose to share one
    pub author: Option<String>,
    /// Story title
    pub title: String,
    /// Story text
    pub body: String,
    /// When the story was submitted
    pub submitted_at: DateTime<Utc>,
}

/// A story submission, serialized as the request body on writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStory {
    /// Story title
    pub title: String,
    /// Story text
    pub body: String,
    /// Display name to publish alongside the story, if any
    pub author: Option<String>,
}

/// A shared settlement experience, shorter and more structured than a story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// Unique identifier for the experience
    pub id: String,
    /// Country the author migrated from, if shared
    pub country_of_origin: Option<String>,
    /// Free-form summary of the experience
    pub summary: String,
    /// Self-assessed helpfulness rating from 1 to 5, if given
    pub rating: Option<u8>,
    /// When the experience was shared
    pub shared_at: DateTime<Utc>,
}

/// A published update about migration rules, programs, or deadlines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationUpdate {
    /// Unique identifier for the update
    pub id: String,
    /// Headline of the update
    pub title: String,
    /// Short summary text
    pub summary: String,
    /// Link to the authoritative source, if any
    pub source_url: Option<String>,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_location_deserializes_from_wire_format() {
        let json = r#"{
            "id": "svc-17",
            "name": "Northside Legal Aid",
            "category": "legal",
            "latitude": 52.52,
            "longitude": 13.405,
            "address": "12 Harbour St",
            "phone": null
        }"#;

        let location: ServiceLocation =
            serde_json::from_str(json).expect("Failed to parse ServiceLocation");

        assert_eq!(location.id, "svc-17");
        assert_eq!(location.category, ServiceCategory::Legal);
        assert!((location.latitude - 52.52).abs() < 0.0001);
        assert_eq!(location.address.as_deref(), Some("12 Harbour St"));
        assert!(location.phone.is_none());
    }

    #[test]
    fn test_service_category_variants_are_distinct() {
        let categories = [
            ServiceCategory::Legal,
            ServiceCategory::Health,
            ServiceCategory::Housing,
            ServiceCategory::Education,
            ServiceCategory::Language,
            ServiceCategory::Employment,
            ServiceCategory::Community,
        ];

        for (i, a) in categories.iter().enumerate() {
            for (j, b) in categories.iter().enumerate() {
                if i == j {
                    assert_eq!(a, b);
                } else {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_service_category_serializes_lowercase() {
        let json = serde_json::to_string(&ServiceCategory::Employment).unwrap();
        assert_eq!(json, "\"employment\"");
    }

    #[test]
    fn test_story_serialization_roundtrip() {
        let story = Story {
            id: "story-3".to_string(),
            author: Some("Amina".to_string()),
            title: "First winter".to_string(),
            body: "The first winter was the hardest part.".to_string(),
            submitted_at: Utc::now(),
        };

        let json = serde_json::to_string(&story).expect("Failed to serialize Story");
        let deserialized: Story = serde_json::from_str(&json).expect("Failed to deserialize Story");

        assert_eq!(deserialized, story);
    }

    #[test]
    fn test_experience_with_optional_fields_absent() {
        let json = r#"{
            "id": "exp-9",
            "country_of_origin": null,
            "summary": "Registering for language classes took one visit.",
            "rating": null,
            "shared_at": "2026-03-01T12:00:00Z"
        }"#;

        let experience: Experience =
            serde_json::from_str(json).expect("Failed to parse Experience");

        assert!(experience.country_of_origin.is_none());
        assert!(experience.rating.is_none());
        assert_eq!(
            experience.summary,
            "Registering for language classes took one visit."
        );
    }

    #[test]
    fn test_migration_update_deserializes_list() {
        let json = r#"[
            {
                "id": "upd-1",
                "title": "Permit processing times updated",
                "summary": "Average wait is now eight weeks.",
                "source_url": "https://example.org/notices/1",
                "published_at": "2026-02-10T09:00:00Z"
            },
            {
                "id": "upd-2",
                "title": "New housing support program",
                "summary": "Applications open next month.",
                "source_url": null,
                "published_at": "2026-02-12T09:00:00Z"
            }
        ]"#;

        let updates: Vec<MigrationUpdate> =
            serde_json::from_str(json).expect("Failed to parse update list");

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, "upd-1");
        assert!(updates[1].source_url.is_none());
    }
}
