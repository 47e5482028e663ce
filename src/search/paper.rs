use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One archived paper as returned by `GET /api/papers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperRecord {
    pub id: Option<i64>,
    pub class: String,
    pub subject: String,
    pub semester: String,
    pub exam_year: String,
    pub exam_type: String,
    pub paper_code: Option<String>,
    pub exam_number: Option<String>,
    pub medium: String,
    pub university: Option<String>,
    pub time: Option<String>,
    pub max_marks: Option<String>,
    pub uploader_name: String,
    pub upload_date: Option<String>,
    pub filename: String,
    pub url: String,
}

impl PaperRecord {
    pub fn title(&self) -> String {
        format!(
            "{} {} (Sem {}) - {}",
            self.class, self.subject, self.semester, self.exam_year
        )
    }

    /// Lower-cased text that demo searches match against.
    pub fn searchable_text(&self) -> String {
        let optional = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            self.class.clone(),
            self.subject.clone(),
            self.semester.clone(),
            self.exam_year.clone(),
            self.exam_type.clone(),
            optional(&self.paper_code),
            optional(&self.exam_number),
            self.medium.clone(),
            optional(&self.university),
            self.uploader_name.clone(),
        ]
        .join(" ")
        .to_lowercase()
    }

    pub fn uploader(&self) -> &str {
        if self.uploader_name.trim().is_empty() {
            "Unknown"
        } else {
            &self.uploader_name
        }
    }

    /// Upload date as `Mon YYYY`, or "Unknown".
    pub fn upload_month(&self) -> String {
        self.upload_date
            .as_deref()
            .and_then(parse_upload_date)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Accepts SQLite `CURRENT_TIMESTAMP` values, RFC 3339 and bare dates.
fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_rows_with_extra_and_missing_fields() {
        let json = r#"[{
            "id": 7, "class": "BSc", "subject": "Physics", "semester": "III",
            "exam_year": "2024", "exam_type": "Main Semester", "paper_code": "N/A",
            "medium": "English Medium", "uploader_name": "Alvido",
            "upload_date": "2024-03-05 10:22:31", "filename": "ab12_physics.pdf",
            "url": "/uploads/ab12_physics.pdf", "original_name": "Physics Main Semester 2024"
        }]"#;

        let papers: Vec<PaperRecord> = serde_json::from_str(json).unwrap();
        let paper = &papers[0];
        assert_eq!(paper.title(), "BSc Physics (Sem III) - 2024");
        assert_eq!(paper.university, None);
        assert_eq!(paper.upload_month(), "Mar 2024");
    }

    #[test]
    fn upload_month_handles_other_formats() {
        let mut paper = PaperRecord {
            upload_date: Some("2023-12-10".into()),
            ..PaperRecord::default()
        };
        assert_eq!(paper.upload_month(), "Dec 2023");

        paper.upload_date = Some("Mon, 15 Jan 2024 08:00:00 GMT".into());
        assert_eq!(paper.upload_month(), "Jan 2024");

        paper.upload_date = Some("yesterday".into());
        assert_eq!(paper.upload_month(), "Unknown");

        paper.upload_date = None;
        assert_eq!(paper.upload_month(), "Unknown");
    }

    #[test]
    fn blank_uploader_shows_unknown() {
        assert_eq!(PaperRecord::default().uploader(), "Unknown");
    }
}
