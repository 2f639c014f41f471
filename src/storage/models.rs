use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a project took to build: a number of months or a free-text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeToDevelop {
    Months(f64),
    Label(String),
}

impl TimeToDevelop {
    /// Parse form input. Numeric text becomes months, anything else a label.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(months) if months.is_finite() => Some(TimeToDevelop::Months(months)),
            _ => Some(TimeToDevelop::Label(trimmed.to_string())),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, TimeToDevelop::Label(label) if label.trim().is_empty())
    }
}

/// External links attached to a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monolith: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
}

impl ProjectLinks {
    pub fn is_empty(&self) -> bool {
        self.frontend.is_none()
            && self.backend.is_none()
            && self.monolith.is_none()
            && self.live.is_none()
    }

    /// Drop blank links; `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        let links = ProjectLinks {
            frontend: non_empty(self.frontend),
            backend: non_empty(self.backend),
            monolith: non_empty(self.monolith),
            live: non_empty(self.live),
        };
        (!links.is_empty()).then_some(links)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("thumbnail is required")]
    MissingThumbnail,
}

/// The editable columns of a portfolio row.
///
/// Create and edit both persist through this type, and every optional field
/// serializes as `null` when absent so an update replaces the whole row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFields {
    pub title: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_to_develop: Option<TimeToDevelop>,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub urls: Option<ProjectLinks>,
    #[serde(default)]
    pub stack: Option<Vec<String>>,
}

impl PortfolioFields {
    /// Trim text, and turn blank strings and empty collections into `None`.
    pub fn normalized(self) -> Self {
        PortfolioFields {
            title: self.title.trim().to_string(),
            rank: non_empty(self.rank),
            description: self.description.filter(|d| !d.trim().is_empty()),
            time_to_develop: self.time_to_develop.filter(|t| !t.is_blank()),
            thumbnail: self.thumbnail.trim().to_string(),
            images: non_empty_list(self.images),
            urls: self.urls.and_then(ProjectLinks::normalized),
            stack: non_empty_list(self.stack),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.thumbnail.trim().is_empty() {
            return Err(ValidationError::MissingThumbnail);
        }
        Ok(())
    }
}

/// A portfolio row as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_to_develop: Option<TimeToDevelop>,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub urls: Option<ProjectLinks>,
    #[serde(default)]
    pub stack: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Portfolio {
    pub fn from_fields(id: i64, fields: PortfolioFields, created_at: DateTime<Utc>) -> Self {
        Portfolio {
            id,
            title: fields.title,
            rank: fields.rank,
            description: fields.description,
            time_to_develop: fields.time_to_develop,
            thumbnail: fields.thumbnail,
            images: fields.images,
            urls: fields.urls,
            stack: fields.stack,
            created_at,
        }
    }

    /// Replace every editable column, keeping `id` and `created_at`.
    pub fn apply_fields(&mut self, fields: PortfolioFields) {
        self.title = fields.title;
        self.rank = fields.rank;
        self.description = fields.description;
        self.time_to_develop = fields.time_to_develop;
        self.thumbnail = fields.thumbnail;
        self.images = fields.images;
        self.urls = fields.urls;
        self.stack = fields.stack;
    }

    pub fn fields(&self) -> PortfolioFields {
        PortfolioFields {
            title: self.title.clone(),
            rank: self.rank.clone(),
            description: self.description.clone(),
            time_to_develop: self.time_to_develop.clone(),
            thumbnail: self.thumbnail.clone(),
            images: self.images.clone(),
            urls: self.urls.clone(),
            stack: self.stack.clone(),
        }
    }

    /// Thumbnail followed by gallery images, skipping blanks.
    pub fn gallery(&self) -> Vec<String> {
        std::iter::once(&self.thumbnail)
            .chain(self.images.iter().flatten())
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Columns returned by the public list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub time_to_develop: Option<TimeToDevelop>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stack: Option<Vec<String>>,
}

impl From<&Portfolio> for PortfolioSummary {
    fn from(p: &Portfolio) -> Self {
        PortfolioSummary {
            id: p.id,
            title: p.title.clone(),
            thumbnail: p.thumbnail.clone(),
            rank: p.rank.clone(),
            time_to_develop: p.time_to_develop.clone(),
            created_at: p.created_at,
            stack: p.stack.clone(),
        }
    }
}

/// Ascending rank order with unranked rows last, matching `ORDER BY rank ASC`.
pub fn compare_rank(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn non_empty_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_develop_parse() {
        assert_eq!(TimeToDevelop::parse("3"), Some(TimeToDevelop::Months(3.0)));
        assert_eq!(
            TimeToDevelop::parse(" 2 months "),
            Some(TimeToDevelop::Label("2 months".to_string()))
        );
        assert_eq!(TimeToDevelop::parse("   "), None);
        assert_eq!(
            TimeToDevelop::parse("NaN"),
            Some(TimeToDevelop::Label("NaN".to_string()))
        );
    }

    #[test]
    fn test_time_to_develop_json_shapes() {
        let months: TimeToDevelop = serde_json::from_str("4").unwrap();
        assert_eq!(months, TimeToDevelop::Months(4.0));
        let label: TimeToDevelop = serde_json::from_str("\"six weeks\"").unwrap();
        assert_eq!(label, TimeToDevelop::Label("six weeks".to_string()));
    }

    #[test]
    fn test_normalized_collapses_empty_values() {
        let fields = PortfolioFields {
            title: "  Demo ".to_string(),
            rank: Some("".to_string()),
            description: Some("  ".to_string()),
            time_to_develop: Some(TimeToDevelop::Label(" ".to_string())),
            thumbnail: "https://cdn/a.png".to_string(),
            images: Some(vec![]),
            urls: Some(ProjectLinks {
                frontend: Some("".to_string()),
                ..Default::default()
            }),
            stack: Some(vec!["  ".to_string()]),
        }
        .normalized();

        assert_eq!(fields.title, "Demo");
        assert_eq!(fields.rank, None);
        assert_eq!(fields.description, None);
        assert_eq!(fields.time_to_develop, None);
        assert_eq!(fields.images, None);
        assert_eq!(fields.urls, None);
        assert_eq!(fields.stack, None);
    }

    #[test]
    fn test_normalized_keeps_values() {
        let fields = PortfolioFields {
            title: "Demo".to_string(),
            rank: Some(" S ".to_string()),
            thumbnail: "t".to_string(),
            stack: Some(vec![" Rust ".to_string(), "".to_string(), "axum".to_string()]),
            urls: Some(ProjectLinks {
                live: Some("https://demo.example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
        .normalized();

        assert_eq!(fields.rank.as_deref(), Some("S"));
        assert_eq!(
            fields.stack,
            Some(vec!["Rust".to_string(), "axum".to_string()])
        );
        assert_eq!(
            fields.urls.and_then(|u| u.live).as_deref(),
            Some("https://demo.example.com")
        );
    }

    #[test]
    fn test_validate_requires_title_and_thumbnail() {
        let mut fields = PortfolioFields::default();
        assert_eq!(fields.validate(), Err(ValidationError::MissingTitle));
        fields.title = "Demo".to_string();
        assert_eq!(fields.validate(), Err(ValidationError::MissingThumbnail));
        fields.thumbnail = "https://cdn/a.png".to_string();
        assert_eq!(fields.validate(), Ok(()));
    }

    #[test]
    fn test_fields_serialize_absent_as_null() {
        let json = serde_json::to_value(PortfolioFields {
            title: "Demo".to_string(),
            thumbnail: "t".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(json["images"].is_null());
        assert!(json.as_object().unwrap().contains_key("images"));
        assert!(json.as_object().unwrap().contains_key("stack"));
    }

    #[test]
    fn test_compare_rank_puts_unranked_last() {
        let mut ranks = vec![None, Some("S"), Some("A"), None, Some("B")];
        ranks.sort_by(|a, b| compare_rank(*a, *b));
        assert_eq!(ranks, vec![Some("A"), Some("B"), Some("S"), None, None]);
    }

    #[test]
    fn test_gallery_starts_with_thumbnail() {
        let p = Portfolio::from_fields(
            1,
            PortfolioFields {
                title: "Demo".to_string(),
                thumbnail: "z".to_string(),
                images: Some(vec!["x".to_string(), "".to_string(), "y".to_string()]),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(p.gallery(), vec!["z", "x", "y"]);
    }
}
