/// Database row types — these map directly to SQLite rows.
/// Distinct from the caseflow-types API models to keep the DB layer
/// independent of the wire format. `files` columns hold JSON arrays of
/// opaque file-ref strings; the listing queries join in the owner's email.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub description: String,
    pub created_at: String,
}

pub struct CaseRow {
    pub id: String,
    pub owner_id: String,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: String,
    pub status: String,
    pub executor_id: Option<String>,
    pub created_at: String,
}

pub struct ProcessedCaseRow {
    pub id: String,
    pub case_id: String,
    pub owner_id: String,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: String,
    pub status: String,
    pub executor_id: String,
    pub executor_email: String,
    pub created_at: String,
}

pub struct ProjectRow {
    pub id: String,
    pub case_id: String,
    pub owner_id: String,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: String,
    pub status: String,
    pub executor_email: String,
    pub created_at: String,
}

pub struct ReviewRow {
    pub id: String,
    pub user_id: String,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_photo: Option<String>,
    pub text: String,
    pub rating: i64,
    pub created_at: String,
}

pub struct FileRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub mime: String,
    pub size: i64,
    pub sha256: String,
    pub created_at: String,
}

/// Optional field overrides applied when a processed case becomes a project.
/// Anything left `None` keeps the value snapshotted from the processed row.
#[derive(Debug, Default)]
pub struct ProjectOverrides {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub files: Option<Vec<String>>,
}

/// Outcome of the open→accepted transition.
#[derive(Debug)]
pub enum AcceptOutcome {
    Accepted { processed_case_id: String },
    AlreadyAccepted,
    CaseNotFound,
    ExecutorNotFound,
}

/// Outcome of the in_process→closed transition.
#[derive(Debug)]
pub enum CompleteOutcome {
    Completed { project_id: String },
    NotAssigned,
    NotFound,
}
