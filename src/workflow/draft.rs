use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::storage::models::{
    Portfolio, PortfolioFields, ProjectLinks, TimeToDevelop, ValidationError,
};

/// Changes requested by the admin edit form.
///
/// Scalar fields follow the usual three states: missing keeps the loaded
/// value, `null` clears it, a value replaces it. Gallery images and stack
/// tags are edited item by item.
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioEdit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub rank: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub time_to_develop: Option<Option<TimeToDevelop>>,
    #[serde(default, deserialize_with = "nullable")]
    pub urls: Option<Option<ProjectLinks>>,
    /// URL of an already uploaded replacement thumbnail
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub add_images: Vec<String>,
    #[serde(default)]
    pub remove_images: Vec<String>,
    #[serde(default)]
    pub add_stack: Vec<String>,
    #[serde(default)]
    pub remove_stack: Vec<String>,
}

/// Distinguishes between a missing field (`None`) and an explicit `null` (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// In-memory form state for editing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioDraft {
    pub title: String,
    pub rank: Option<String>,
    pub description: Option<String>,
    pub time_to_develop: Option<TimeToDevelop>,
    pub thumbnail: String,
    pub images: Vec<String>,
    pub urls: ProjectLinks,
    pub stack: Vec<String>,
}

impl PortfolioDraft {
    pub fn load(record: &Portfolio) -> Self {
        PortfolioDraft {
            title: record.title.clone(),
            rank: record.rank.clone(),
            description: record.description.clone(),
            time_to_develop: record.time_to_develop.clone(),
            thumbnail: record.thumbnail.clone(),
            images: record.images.clone().unwrap_or_default(),
            urls: record.urls.clone().unwrap_or_default(),
            stack: record.stack.clone().unwrap_or_default(),
        }
    }

    pub fn replace_thumbnail(&mut self, url: impl Into<String>) {
        self.thumbnail = url.into();
    }

    pub fn add_images<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.images
            .extend(urls.into_iter().filter(|url| !url.trim().is_empty()));
    }

    pub fn remove_image(&mut self, url: &str) {
        self.images.retain(|i| i != url);
    }

    /// Add a trimmed tag. Blank and duplicate tags are ignored; returns whether it was added.
    pub fn add_stack_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.stack.iter().any(|t| t == tag) {
            return false;
        }
        self.stack.push(tag.to_string());
        true
    }

    pub fn remove_stack_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        self.stack.retain(|t| t != tag);
    }

    /// Apply an edit request. Removals run before additions.
    pub fn apply(&mut self, edit: PortfolioEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(rank) = edit.rank {
            self.rank = rank;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(time_to_develop) = edit.time_to_develop {
            self.time_to_develop = time_to_develop;
        }
        if let Some(urls) = edit.urls {
            self.urls = urls.unwrap_or_default();
        }
        if let Some(thumbnail) = edit.thumbnail {
            self.replace_thumbnail(thumbnail);
        }

        for url in &edit.remove_images {
            self.remove_image(url);
        }
        self.add_images(edit.add_images);

        for tag in &edit.remove_stack {
            self.remove_stack_tag(tag);
        }
        for tag in &edit.add_stack {
            self.add_stack_tag(tag);
        }
    }

    /// The full set of editable columns to write back, normalized and validated.
    pub fn into_fields(self) -> Result<PortfolioFields, ValidationError> {
        let fields = PortfolioFields {
            title: self.title,
            rank: self.rank,
            description: self.description,
            time_to_develop: self.time_to_develop,
            thumbnail: self.thumbnail,
            images: Some(self.images),
            urls: Some(self.urls),
            stack: Some(self.stack),
        }
        .normalized();

        fields.validate()?;
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Portfolio {
        Portfolio::from_fields(
            7,
            PortfolioFields {
                title: "Tracker".to_string(),
                rank: Some("A".to_string()),
                description: Some("Habit tracker".to_string()),
                time_to_develop: Some(TimeToDevelop::Months(2.0)),
                thumbnail: "https://cdn/t.png".to_string(),
                images: Some(vec!["https://cdn/1.png".to_string(), "https://cdn/2.png".to_string()]),
                urls: Some(ProjectLinks {
                    live: Some("https://tracker.example.com".to_string()),
                    ..Default::default()
                }),
                stack: Some(vec!["Rust".to_string(), "htmx".to_string()]),
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_untouched_fields_keep_loaded_values() {
        let original = record();
        let mut draft = PortfolioDraft::load(&original);
        draft.apply(PortfolioEdit {
            title: Some("Tracker 2".to_string()),
            ..Default::default()
        });

        let fields = draft.into_fields().unwrap();
        let mut expected = original.fields();
        expected.title = "Tracker 2".to_string();
        assert_eq!(fields, expected);
    }

    #[test]
    fn test_null_clears_and_missing_keeps() {
        let edit: PortfolioEdit =
            serde_json::from_str(r#"{"rank": null, "description": "New"}"#).unwrap();
        assert_eq!(edit.rank, Some(None));
        assert_eq!(edit.time_to_develop, None);

        let mut draft = PortfolioDraft::load(&record());
        draft.apply(edit);
        let fields = draft.into_fields().unwrap();
        assert_eq!(fields.rank, None);
        assert_eq!(fields.description.as_deref(), Some("New"));
        assert_eq!(fields.time_to_develop, Some(TimeToDevelop::Months(2.0)));
    }

    #[test]
    fn test_gallery_and_stack_edits() {
        let mut draft = PortfolioDraft::load(&record());
        draft.apply(PortfolioEdit {
            thumbnail: Some("https://cdn/t2.png".to_string()),
            remove_images: vec!["https://cdn/1.png".to_string()],
            add_images: vec!["https://cdn/3.png".to_string()],
            remove_stack: vec!["htmx".to_string()],
            add_stack: vec![" axum ".to_string(), "Rust".to_string(), "".to_string()],
            ..Default::default()
        });

        let fields = draft.into_fields().unwrap();
        assert_eq!(fields.thumbnail, "https://cdn/t2.png");
        assert_eq!(
            fields.images,
            Some(vec!["https://cdn/2.png".to_string(), "https://cdn/3.png".to_string()])
        );
        assert_eq!(fields.stack, Some(vec!["Rust".to_string(), "axum".to_string()]));
    }

    #[test]
    fn test_removing_everything_normalizes_to_absent() {
        let mut draft = PortfolioDraft::load(&record());
        draft.apply(PortfolioEdit {
            remove_images: vec!["https://cdn/1.png".to_string(), "https://cdn/2.png".to_string()],
            remove_stack: vec!["Rust".to_string(), "htmx".to_string()],
            urls: Some(None),
            ..Default::default()
        });

        let fields = draft.into_fields().unwrap();
        assert_eq!(fields.images, None);
        assert_eq!(fields.stack, None);
        assert_eq!(fields.urls, None);
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let mut draft = PortfolioDraft::load(&record());
        draft.apply(PortfolioEdit {
            title: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(draft.into_fields(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_add_stack_tag_reports_duplicates() {
        let mut draft = PortfolioDraft::load(&record());
        assert!(!draft.add_stack_tag("Rust"));
        assert!(!draft.add_stack_tag("  "));
        assert!(draft.add_stack_tag("Postgres"));
    }
}
