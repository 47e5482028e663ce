use super::paper::PaperRecord;

/// Shortcut and synonym table applied to each query term.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("1", "i"),
    ("2", "ii"),
    ("3", "iii"),
    ("4", "iv"),
    ("5", "v"),
    ("6", "vi"),
    ("7", "vii"),
    ("8", "viii"),
    ("9", "ix"),
    ("10", "x"),
    ("one", "i"),
    ("two", "ii"),
    ("three", "iii"),
    ("four", "iv"),
    ("five", "v"),
    ("six", "vi"),
    ("seven", "vii"),
    ("eight", "viii"),
    ("first", "i"),
    ("second", "ii"),
    ("third", "iii"),
    ("fourth", "iv"),
    ("fifth", "v"),
    ("1st", "i"),
    ("2nd", "ii"),
    ("3rd", "iii"),
    ("sem", "semester"),
    ("phy", "physics"),
    ("pys", "psychology"),
    ("env", "environmental"),
    ("sci", "science"),
    ("his", "history"),
    ("eco", "economics"),
    ("stats", "statistics"),
    ("biotech", "biotechnology"),
    ("cs", "computer"),
    ("ps", "political"),
    ("geo", "geography"),
    ("zoo", "zoology"),
    ("bot", "botany"),
    ("eng", "english"),
    ("hin", "hindi"),
    ("chem", "chemistry"),
    ("math", "mathematics"),
    ("maths", "mathematics"),
];

pub fn translate_term(term: &str) -> String {
    let lower = term.to_lowercase();
    TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| to.to_string())
        .unwrap_or(lower)
}

/// Every term, after translation, must appear somewhere in the record.
pub fn matches(paper: &PaperRecord, query: &str) -> bool {
    let haystack = paper.searchable_text();
    query
        .split_whitespace()
        .map(translate_term)
        .all(|term| haystack.contains(&term))
}

pub fn filter(papers: &[PaperRecord], query: &str) -> Vec<PaperRecord> {
    papers
        .iter()
        .filter(|paper| matches(paper, query))
        .cloned()
        .collect()
}

fn sample(
    id: i64,
    subject: &str,
    semester: &str,
    year: &str,
    exam_type: &str,
    code: &str,
    time: &str,
    marks: &str,
    date: &str,
    filename: &str,
) -> PaperRecord {
    PaperRecord {
        id: Some(id),
        class: "BSc".into(),
        subject: subject.into(),
        semester: semester.into(),
        exam_year: year.into(),
        exam_type: exam_type.into(),
        paper_code: Some(code.into()),
        exam_number: Some(format!("{}/{:03}", year, id)),
        medium: "English".into(),
        university: Some("Demo University".into()),
        time: Some(time.into()),
        max_marks: Some(marks.into()),
        uploader_name: "Demo Admin".into(),
        upload_date: Some(date.into()),
        filename: filename.into(),
        url: String::new(),
    }
}

pub fn sample_papers() -> Vec<PaperRecord> {
    vec![
        sample(
            1,
            "Physics",
            "III",
            "2024",
            "End Semester",
            "PHY301",
            "3 hours",
            "100",
            "2024-01-15",
            "demo_physics_2024.pdf",
        ),
        sample(
            2,
            "Mathematics",
            "III",
            "2023",
            "End Semester",
            "MATH301",
            "3 hours",
            "100",
            "2023-12-10",
            "demo_math_2023.pdf",
        ),
        sample(
            3,
            "Chemistry",
            "II",
            "2024",
            "Mid Semester",
            "CHEM201",
            "2 hours",
            "50",
            "2024-03-20",
            "demo_chemistry_2024.pdf",
        ),
    ]
}
