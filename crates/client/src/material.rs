use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use serde::Deserialize;

use crate::{reference::Reference, Client, Result};

/// A downloadable file attached to a course
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "courseId")]
    pub course: Option<Reference>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub file_url: String,
    /// Extension of the stored file, without the dot
    #[serde(default)]
    pub file_type: String,
    /// Size in bytes
    pub file_size: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Material {
    /// The name the file is shown with
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.title, self.file_type)
    }

    pub fn display_size(&self) -> String {
        human_size(self.file_size)
    }

    /// The upload date, in the local timezone
    pub fn display_date(&self) -> Option<String> {
        self.display_date_in(&Local)
    }

    pub fn display_date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        self.created_at
            .map(|d| d.with_timezone(tz).format("%B %-d, %Y").to_string())
    }
}

/// Format a size the way the catalog always has: B below 1KiB, then KB/MB to two places.
pub fn human_size(bytes: Option<u64>) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    match bytes {
        None | Some(0) => "N/A".to_string(),
        Some(b) if b < KB => format!("{} B", b),
        Some(b) if b < MB => format!("{:.2} KB", b as f64 / KB as f64),
        Some(b) => format!("{:.2} MB", b as f64 / MB as f64),
    }
}

/// A material to upload. Sent as multipart, so this isn't serialised directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMaterial {
    pub course_id: String,
    pub title: String,
    pub description: String,
    /// Local path of the file to attach
    pub file: PathBuf,
}

impl Client {
    pub fn materials(&self, course_id: &str) -> Result<Vec<Material>> {
        self.fetch(
            self.request(reqwest::Method::GET, "materials")
                .query(&[("courseId", course_id)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_material() {
        let m: Material = serde_json::from_str(
            r#"{"_id":"m1","courseId":"k1","title":"Lecture 1","description":"Intro",
                "fileUrl":"https://files.example/m1.pdf","fileType":"pdf","fileSize":2048,
                "createdAt":"2024-01-05T10:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(m.course.as_ref().map(Reference::id), Some("k1"));
        assert_eq!(m.display_name(), "Lecture 1.pdf");
        assert_eq!(m.display_size(), "2.00 KB");
        assert_eq!(m.display_date_in(&Utc).as_deref(), Some("January 5, 2024"));
    }

    #[test]
    fn upload_date_follows_the_timezone() {
        let m: Material = serde_json::from_str(
            r#"{"_id":"m1","title":"Late","fileUrl":"u","fileType":"pdf",
                "createdAt":"2024-01-05T23:30:00Z"}"#,
        )
        .unwrap();
        let east = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let west = chrono::FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(m.display_date_in(&Utc).as_deref(), Some("January 5, 2024"));
        assert_eq!(m.display_date_in(&east).as_deref(), Some("January 6, 2024"));
        assert_eq!(m.display_date_in(&west).as_deref(), Some("January 5, 2024"));
        assert!(m.display_date().is_some());
    }

    #[test]
    fn sizes() {
        assert_eq!(human_size(None), "N/A");
        assert_eq!(human_size(Some(0)), "N/A");
        assert_eq!(human_size(Some(512)), "512 B");
        assert_eq!(human_size(Some(1023)), "1023 B");
        assert_eq!(human_size(Some(1536)), "1.50 KB");
        assert_eq!(human_size(Some(5 * 1024 * 1024 + 1024 * 512)), "5.50 MB");
    }
}
