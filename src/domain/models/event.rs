use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Presentation variants for the public event page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Elegant,
    Rustic,
    Modern,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Elegant => "elegant",
            Template::Rustic => "rustic",
            Template::Modern => "modern",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elegant" => Ok(Template::Elegant),
            "rustic" => Ok(Template::Rustic),
            "modern" => Ok(Template::Modern),
            other => Err(format!("Unknown template '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub slug: String,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub template: String,
    #[serde(skip_serializing)]
    pub config_json: String,
    pub cover_image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(user_id: String, name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            slug,
            date: None,
            location: None,
            description: None,
            template: Template::Elegant.to_string(),
            config_json: "{}".to_string(),
            cover_image: None,
            is_published: false,
            created_at: Utc::now(),
        }
    }

    /// Presentation overrides as a JSON object; a corrupt column reads as empty.
    pub fn template_config(&self) -> serde_json::Value {
        serde_json::from_str::<serde_json::Value>(&self.config_json)
            .ok()
            .filter(|v| v.is_object())
            .unwrap_or_else(|| serde_json::json!({}))
    }
}

/// The fields a guest or visitor may see.
#[derive(Debug, Serialize, Clone)]
pub struct PublicEvent {
    pub name: String,
    pub slug: String,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub template: String,
    pub template_config: serde_json::Value,
    pub cover_image: Option<String>,
}

impl From<&Event> for PublicEvent {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            slug: event.slug.clone(),
            date: event.date,
            location: event.location.clone(),
            description: event.description.clone(),
            template: event.template.clone(),
            template_config: event.template_config(),
            cover_image: event.cover_image.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GuestStats {
    pub total: usize,
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parsing() {
        assert_eq!("rustic".parse::<Template>().unwrap(), Template::Rustic);
        assert!("Rustic".parse::<Template>().is_err());
        assert!("neon".parse::<Template>().is_err());
    }

    #[test]
    fn test_new_event_defaults() {
        let event = Event::new("u1".into(), "Party".into(), "party-abc123".into());
        assert_eq!(event.template, "elegant");
        assert!(!event.is_published);
        assert_eq!(event.template_config(), serde_json::json!({}));
    }

    #[test]
    fn test_corrupt_config_reads_as_empty_object() {
        let mut event = Event::new("u1".into(), "Party".into(), "party-abc123".into());
        event.config_json = "[1,2]".into();
        assert_eq!(event.template_config(), serde_json::json!({}));
        event.config_json = r##"{"accentColor":"#b08d57"}"##.into();
        assert_eq!(event.template_config()["accentColor"], "#b08d57");
    }
}
