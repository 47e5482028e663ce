//! Metadata fields attached to every uploaded paper.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Multipart part name expected by the server.
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

pub const CLASSES: &[&str] = &["BA", "BSc", "BA/BSc", "BSc Hons", "BBA", "BCA", "MCA"];

pub const SUBJECTS: &[&str] = &[
    "Maths",
    "Physics",
    "Chemistry",
    "Hindi",
    "English",
    "Biology",
    "Psychology",
    "Zoology",
    "Computer Science",
    "Political Science",
    "Statistics",
    "Geography",
    "Biotechnology",
    "Microbiology",
    "Environmental Science",
    "History",
    "Economics",
];

pub const SEMESTERS: &[&str] = &[
    "I",
    "II",
    "III",
    "IV",
    "V",
    "VI",
    "VII",
    "VIII",
    "IX",
    "X",
    "All Semesters",
];

pub const EXAM_TYPES: &[&str] = &[
    "Main Semester",
    "CIA",
    "Half Yearly",
    "Class Test",
    "Yearly",
    "Assignments",
];

pub const MEDIUMS: &[&str] = &["English Medium", "Hindi Medium", "Hinglish"];

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "admin_name",
        label: "Your Name",
        hint: "e.g., Alvido",
        kind: FieldKind::Text,
        required: true,
    },
    FieldSpec {
        name: "class",
        label: "Class",
        hint: "Select a Class",
        kind: FieldKind::Select(CLASSES),
        required: true,
    },
    FieldSpec {
        name: "subject",
        label: "Subject",
        hint: "Select a Subject",
        kind: FieldKind::Select(SUBJECTS),
        required: true,
    },
    FieldSpec {
        name: "semester",
        label: "Semester",
        hint: "Select a Semester",
        kind: FieldKind::Select(SEMESTERS),
        required: true,
    },
    FieldSpec {
        name: "exam_year",
        label: "Exam Year",
        hint: "e.g., 2025",
        kind: FieldKind::Text,
        required: true,
    },
    FieldSpec {
        name: "exam_type",
        label: "Exam Type",
        hint: "Select an Exam Type",
        kind: FieldKind::Select(EXAM_TYPES),
        required: true,
    },
    FieldSpec {
        name: "exam_number",
        label: "Exam Number (Optional)",
        hint: "e.g., First Paper (1)",
        kind: FieldKind::Text,
        required: false,
    },
    FieldSpec {
        name: "paper_code",
        label: "Paper Code (Optional)",
        hint: "Enter paper code",
        kind: FieldKind::Text,
        required: false,
    },
    FieldSpec {
        name: "medium",
        label: "Medium",
        hint: "Select a Medium",
        kind: FieldKind::Select(MEDIUMS),
        required: true,
    },
    FieldSpec {
        name: "university",
        label: "University / College (Optional)",
        hint: "e.g., University of Rajasthan",
        kind: FieldKind::Text,
        required: false,
    },
    FieldSpec {
        name: "time",
        label: "Time (Optional)",
        hint: "e.g., 3 hr",
        kind: FieldKind::Text,
        required: false,
    },
    FieldSpec {
        name: "max_marks",
        label: "Max Marks (Optional)",
        hint: "e.g., 100",
        kind: FieldKind::Text,
        required: false,
    },
];

/// Display label for a part name; unknown names are returned as given.
pub fn label_for(name: &str) -> &str {
    FIELDS
        .iter()
        .find(|spec| spec.name == name)
        .map_or(name, |spec| spec.label)
}

/// Values for one file's form, stored in `FIELDS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormCard {
    values: Vec<String>,
}

impl Default for FormCard {
    fn default() -> Self {
        Self {
            values: vec![String::new(); FIELDS.len()],
        }
    }
}

impl FormCard {
    pub fn new(default_uploader: Option<&str>) -> Self {
        let mut card = Self::default();
        if let Some(name) = default_uploader {
            card.set("admin_name", name);
        }
        card
    }

    fn index_of(name: &str) -> Option<usize> {
        FIELDS.iter().position(|spec| spec.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        Self::index_of(name).map(|i| self.values[i].as_str())
    }

    /// Returns false for names that are not part of the form.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match Self::index_of(name) {
            Some(i) => {
                self.values[i] = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Specs paired with mutable values, for editing widgets.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&'static FieldSpec, &mut String)> {
        FIELDS.iter().zip(self.values.iter_mut())
    }

    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        FIELDS
            .iter()
            .zip(&self.values)
            .filter(|(spec, value)| spec.required && value.trim().is_empty())
            .map(|(spec, _)| spec.name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    /// Every field as a multipart text part, optional blanks included.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        FIELDS
            .iter()
            .zip(&self.values)
            .map(|(spec, value)| (spec.name, value.trim().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormCard {
        let mut card = FormCard::new(Some("Alvido"));
        card.set("class", "BSc");
        card.set("subject", "Physics");
        card.set("semester", "III");
        card.set("exam_year", "2024");
        card.set("exam_type", "Main Semester");
        card.set("medium", "English Medium");
        card
    }

    #[test]
    fn fresh_card_lists_every_required_field() {
        let card = FormCard::new(None);
        assert_eq!(
            card.missing_required(),
            vec!["admin_name", "class", "subject", "semester", "exam_year", "exam_type", "medium"]
        );
    }

    #[test]
    fn optional_fields_do_not_block_validation() {
        let card = filled();
        assert_eq!(card.validate(), Ok(()));
        assert_eq!(card.get("university"), Some(""));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut card = filled();
        card.set("exam_year", "   ");
        assert_eq!(card.validate(), Err(vec!["exam_year"]));
    }

    #[test]
    fn unknown_field_is_ignored() {
        let mut card = FormCard::default();
        assert!(!card.set("password", "hunter2"));
        assert_eq!(card.get("password"), None);
    }

    #[test]
    fn pairs_cover_all_fields_in_form_order() {
        let mut card = filled();
        card.set("time", " 3 hr ");
        let pairs = card.form_pairs();

        assert_eq!(pairs.len(), FIELDS.len());
        assert_eq!(pairs[0], ("admin_name", "Alvido".to_string()));
        assert!(pairs.contains(&("time", "3 hr".to_string())));
        assert!(pairs.contains(&("paper_code", String::new())));
    }

    #[test]
    fn select_options_match_server_vocabulary() {
        let semester = FIELDS.iter().find(|f| f.name == "semester").unwrap();
        assert_eq!(semester.kind, FieldKind::Select(SEMESTERS));
        assert!(SEMESTERS.contains(&"All Semesters"));
    }
}
