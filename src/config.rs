use serde::Deserialize;

use crate::error::ConfigError;
use crate::logging::{LogLevel, DEFAULT_LOG_LEVEL};
use crate::media_card::MediaKind;

const SITE_CATALOG_JSON: &str = include_str!("../config/site.json");

const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 250;
const DEFAULT_HEADER_SCROLLED_OFFSET: f64 = 100.0;
const DEFAULT_HEADER_HIDE_OFFSET: f64 = 200.0;
const DEFAULT_SECTION_FOCUS_OFFSET: f64 = 150.0;
const DEFAULT_NAV_COLLAPSE_WIDTH: f64 = 768.0;
const LOG_LEVEL_QUERY_KEY: &str = "log";

#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub log_level: LogLevel,
    pub resize_debounce_ms: u32,
    pub header_scrolled_offset: f64,
    pub header_hide_offset: f64,
    pub section_focus_offset: f64,
    pub nav_collapse_width: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            header_scrolled_offset: DEFAULT_HEADER_SCROLLED_OFFSET,
            header_hide_offset: DEFAULT_HEADER_HIDE_OFFSET,
            section_focus_offset: DEFAULT_SECTION_FOCUS_OFFSET,
            nav_collapse_width: DEFAULT_NAV_COLLAPSE_WIDTH,
        }
    }
}

impl PageConfig {
    /// Reads overrides from a location search string such as `?log=debug`.
    pub fn from_query(search: &str) -> Self {
        let log_level = query_value(search, LOG_LEVEL_QUERY_KEY)
            .and_then(LogLevel::parse)
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            log_level,
            ..Self::default()
        }
    }
}

fn query_value<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[derive(Clone, PartialEq, Debug)]
pub struct ProjectEntry {
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub media_kind: MediaKind,
    pub video: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct CertificateEntry {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub image: String,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub label: String,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct SiteCatalog {
    pub owner: String,
    pub tagline: String,
    pub sections: Vec<SectionEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certificates: Vec<CertificateEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    title: String,
    summary: String,
    #[serde(default)]
    tags: Vec<String>,
    media_type: String,
    video: Option<String>,
    image: Option<String>,
    thumbnail: Option<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    owner: String,
    #[serde(default)]
    tagline: String,
    #[serde(default)]
    sections: Vec<SectionEntry>,
    #[serde(default)]
    projects: Vec<RawProject>,
    #[serde(default)]
    certificates: Vec<CertificateEntry>,
}

impl SiteCatalog {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let raw: RawCatalog = serde_json::from_str(source)?;
        let projects = raw
            .projects
            .into_iter()
            .map(|project| {
                let media_kind = MediaKind::parse(&project.media_type).ok_or_else(|| {
                    ConfigError::UnknownMediaKind {
                        title: project.title.clone(),
                        kind: project.media_type.clone(),
                    }
                })?;

                Ok(ProjectEntry {
                    title: project.title,
                    summary: project.summary,
                    tags: project.tags,
                    media_kind,
                    video: project.video,
                    image: project.image,
                    thumbnail: project.thumbnail,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            owner: raw.owner,
            tagline: raw.tagline,
            sections: raw.sections,
            projects,
            certificates: raw.certificates,
        })
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(SITE_CATALOG_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_overrides_log_level_only_when_valid() {
        assert_eq!(PageConfig::from_query("?log=debug").log_level, LogLevel::Debug);
        assert_eq!(PageConfig::from_query("?x=1&log=error").log_level, LogLevel::Error);
        assert_eq!(PageConfig::from_query("?log=loud").log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(PageConfig::from_query(""), PageConfig::default());
    }

    #[test]
    fn embedded_catalog_parses() {
        let catalog = SiteCatalog::embedded().expect("embedded catalog is valid");
        assert!(!catalog.projects.is_empty());
        assert!(!catalog.certificates.is_empty());
        assert!(catalog
            .projects
            .iter()
            .filter(|project| project.media_kind == MediaKind::Video)
            .all(|project| project.video.is_some()));
    }

    #[test]
    fn unknown_media_type_is_rejected() {
        let source = r#"{
            "owner": "Test",
            "projects": [
                { "title": "Odd", "summary": "", "mediaType": "audio" }
            ]
        }"#;

        let error = SiteCatalog::parse(source).expect_err("audio is not a card media type");
        assert!(matches!(
            error,
            ConfigError::UnknownMediaKind { ref kind, .. } if kind == "audio"
        ));
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        let error = SiteCatalog::parse("{ not json").expect_err("invalid JSON");
        assert!(matches!(error, ConfigError::Catalog(_)));
    }
}
