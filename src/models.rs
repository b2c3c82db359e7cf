use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct GradeEntry {
    pub subject: String,
    pub grade: i64,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbGradeEntry {
    pub subject: Option<String>,
    pub grade: Option<i64>,
}

impl From<DbGradeEntry> for GradeEntry {
    fn from(entry: DbGradeEntry) -> Self {
        Self {
            subject: entry.subject.unwrap_or_default(),
            grade: entry.grade.unwrap_or_default(),
        }
    }
}
