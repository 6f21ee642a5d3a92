use crate::Database;
use crate::models::{
    AcceptOutcome, CaseRow, CompleteOutcome, FileRow, ProcessedCaseRow, ProjectOverrides,
    ProjectRow, ReviewRow, UserRow,
};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3)",
                (id, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn update_profile(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
        photo: Option<&str>,
        description: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE users SET first_name = ?2, last_name = ?3, photo = ?4, description = ?5
                 WHERE id = ?1",
                params![id, first_name, last_name, photo, description],
            )?;
            Ok(updated > 0)
        })
    }

    // -- Cases --

    pub fn insert_case(
        &self,
        id: &str,
        owner_id: &str,
        title: &str,
        theme: &str,
        description: &str,
        cover: Option<&str>,
        files_json: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO cases (id, owner_id, title, theme, description, cover, files, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'open')",
                params![id, owner_id, title, theme, description, cover, files_json],
            )?;
            Ok(())
        })
    }

    pub fn list_cases(&self, owner_id: Option<&str>) -> Result<Vec<CaseRow>> {
        self.with_conn(|conn| {
            let mut sql = String::from(
                "SELECT c.id, c.owner_id, u.email, c.title, c.theme, c.description,
                        c.cover, c.files, c.status, c.executor_id, c.created_at
                 FROM cases c
                 LEFT JOIN users u ON c.owner_id = u.id",
            );
            if owner_id.is_some() {
                sql.push_str(" WHERE c.owner_id = ?1");
            }
            sql.push_str(" ORDER BY c.rowid");

            let mut stmt = conn.prepare(&sql)?;
            let map = |row: &rusqlite::Row<'_>| {
                Ok(CaseRow {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    owner_email: row.get(2)?,
                    title: row.get(3)?,
                    theme: row.get(4)?,
                    description: row.get(5)?,
                    cover: row.get(6)?,
                    files: row.get(7)?,
                    status: row.get(8)?,
                    executor_id: row.get(9)?,
                    created_at: row.get(10)?,
                })
            };
            let rows = match owner_id {
                Some(owner) => stmt.query_map([owner], map)?.collect::<Result<Vec<_>, _>>()?,
                None => stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?,
            };
            Ok(rows)
        })
    }

    pub fn get_case(&self, id: &str) -> Result<Option<CaseRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT c.id, c.owner_id, u.email, c.title, c.theme, c.description,
                        c.cover, c.files, c.status, c.executor_id, c.created_at
                 FROM cases c
                 LEFT JOIN users u ON c.owner_id = u.id
                 WHERE c.id = ?1",
                [id],
                |row| {
                    Ok(CaseRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        owner_email: row.get(2)?,
                        title: row.get(3)?,
                        theme: row.get(4)?,
                        description: row.get(5)?,
                        cover: row.get(6)?,
                        files: row.get(7)?,
                        status: row.get(8)?,
                        executor_id: row.get(9)?,
                        created_at: row.get(10)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Open→accepted transition, atomic.
    ///
    /// The check-and-set UPDATE decides the winner of a concurrent accept:
    /// only a case still `open` flips, and a loser's transaction rolls back
    /// having written nothing. The in-process copy snapshots the case fields
    /// and the executor's email as they are at this moment.
    pub fn accept_case(
        &self,
        processed_case_id: &str,
        case_id: &str,
        executor_id: &str,
    ) -> Result<AcceptOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let flipped = tx.execute(
                "UPDATE cases SET status = 'accepted', executor_id = ?2
                 WHERE id = ?1 AND status = 'open'",
                params![case_id, executor_id],
            )?;
            if flipped == 0 {
                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM cases WHERE id = ?1)",
                    [case_id],
                    |r| r.get(0),
                )?;
                return Ok(if exists {
                    AcceptOutcome::AlreadyAccepted
                } else {
                    AcceptOutcome::CaseNotFound
                });
            }

            let executor_email: Option<String> = tx
                .query_row(
                    "SELECT email FROM users WHERE id = ?1",
                    [executor_id],
                    |r| r.get(0),
                )
                .optional()?;
            let Some(executor_email) = executor_email else {
                return Ok(AcceptOutcome::ExecutorNotFound);
            };

            tx.execute(
                "INSERT INTO processed_cases
                     (id, case_id, owner_id, title, theme, description, cover, files,
                      status, executor_id, executor_email)
                 SELECT ?2, id, owner_id, title, theme, description, cover, files,
                        'in_process', ?3, ?4
                 FROM cases WHERE id = ?1",
                params![case_id, processed_case_id, executor_id, executor_email],
            )?;

            tx.commit()?;
            Ok(AcceptOutcome::Accepted {
                processed_case_id: processed_case_id.to_string(),
            })
        })
    }

    // -- Processed cases --

    pub fn list_processed_cases(&self) -> Result<Vec<ProcessedCaseRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.case_id, p.owner_id, u.email, p.title, p.theme, p.description,
                        p.cover, p.files, p.status, p.executor_id, p.executor_email, p.created_at
                 FROM processed_cases p
                 LEFT JOIN users u ON p.owner_id = u.id
                 ORDER BY p.rowid",
            )?;
            let rows = stmt
                .query_map([], map_processed_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_processed_case(&self, id: &str) -> Result<Option<ProcessedCaseRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT p.id, p.case_id, p.owner_id, u.email, p.title, p.theme, p.description,
                        p.cover, p.files, p.status, p.executor_id, p.executor_email, p.created_at
                 FROM processed_cases p
                 LEFT JOIN users u ON p.owner_id = u.id
                 WHERE p.id = ?1",
                [id],
                map_processed_row,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Append file refs to a live processed case, preserving order.
    /// Returns the full updated sequence, or `None` if the case no longer
    /// exists (already completed or never created). The read-modify-write
    /// runs in one transaction on the writer, so concurrent appends and a
    /// racing complete cannot lose references.
    pub fn append_processed_files(
        &self,
        id: &str,
        new_refs: &[String],
    ) -> Result<Option<Vec<String>>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let files: Option<String> = tx
                .query_row(
                    "SELECT files FROM processed_cases WHERE id = ?1",
                    [id],
                    |r| r.get(0),
                )
                .optional()?;
            let Some(files) = files else {
                return Ok(None);
            };

            let mut refs: Vec<String> = serde_json::from_str(&files).unwrap_or_default();
            refs.extend(new_refs.iter().cloned());

            tx.execute(
                "UPDATE processed_cases SET files = ?2 WHERE id = ?1",
                params![id, serde_json::to_string(&refs)?],
            )?;

            tx.commit()?;
            Ok(Some(refs))
        })
    }

    /// In_process→closed transition, atomic.
    ///
    /// The project snapshot and the processed-case delete commit together, so
    /// a racing append either lands before the snapshot read or finds the row
    /// gone. `executor_email` is the value captured at acceptance, never
    /// re-resolved.
    pub fn complete_case(
        &self,
        project_id: &str,
        processed_case_id: &str,
        requester_id: &str,
        overrides: &ProjectOverrides,
    ) -> Result<CompleteOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let row = query_processed_for_completion(&tx, processed_case_id)?;
            let Some(row) = row else {
                return Ok(CompleteOutcome::NotFound);
            };
            if row.executor_id != requester_id {
                return Ok(CompleteOutcome::NotAssigned);
            }

            let files_json = match &overrides.files {
                Some(refs) => serde_json::to_string(refs)?,
                None => row.files.clone(),
            };

            tx.execute(
                "INSERT INTO projects
                     (id, case_id, owner_id, title, theme, description, cover, files,
                      status, executor_email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'closed', ?9)",
                params![
                    project_id,
                    row.case_id,
                    row.owner_id,
                    overrides.title.as_deref().unwrap_or(&row.title),
                    overrides.theme.as_deref().unwrap_or(&row.theme),
                    overrides.description.as_deref().unwrap_or(&row.description),
                    overrides.cover.as_deref().or(row.cover.as_deref()),
                    files_json,
                    row.executor_email,
                ],
            )?;
            tx.execute(
                "DELETE FROM processed_cases WHERE id = ?1",
                [processed_case_id],
            )?;

            tx.commit()?;
            Ok(CompleteOutcome::Completed {
                project_id: project_id.to_string(),
            })
        })
    }

    // -- Projects --

    pub fn list_projects(
        &self,
        owner_id: Option<&str>,
        executor_email: Option<&str>,
    ) -> Result<Vec<ProjectRow>> {
        self.with_conn(|conn| {
            let mut sql = String::from(
                "SELECT p.id, p.case_id, p.owner_id, u.email, p.title, p.theme, p.description,
                        p.cover, p.files, p.status, p.executor_email, p.created_at
                 FROM projects p
                 LEFT JOIN users u ON p.owner_id = u.id",
            );
            if owner_id.is_some() {
                sql.push_str(" WHERE p.owner_id = ?1");
            } else if executor_email.is_some() {
                sql.push_str(" WHERE p.executor_email = ?1");
            }
            sql.push_str(" ORDER BY p.rowid");

            let mut stmt = conn.prepare(&sql)?;
            let rows = match owner_id.or(executor_email) {
                Some(param) => stmt
                    .query_map([param], map_project_row)?
                    .collect::<Result<Vec<_>, _>>()?,
                None => stmt
                    .query_map([], map_project_row)?
                    .collect::<Result<Vec<_>, _>>()?,
            };
            Ok(rows)
        })
    }

    pub fn get_project(&self, id: &str) -> Result<Option<ProjectRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT p.id, p.case_id, p.owner_id, u.email, p.title, p.theme, p.description,
                        p.cover, p.files, p.status, p.executor_email, p.created_at
                 FROM projects p
                 LEFT JOIN users u ON p.owner_id = u.id
                 WHERE p.id = ?1",
                [id],
                map_project_row,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    // -- Reviews --

    pub fn insert_review(
        &self,
        id: &str,
        user_id: &str,
        reviewer_id: &str,
        reviewer_name: &str,
        reviewer_photo: Option<&str>,
        text: &str,
        rating: i64,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO reviews (id, user_id, reviewer_id, reviewer_name, reviewer_photo, text, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, user_id, reviewer_id, reviewer_name, reviewer_photo, text, rating],
            )?;
            Ok(())
        })
    }

    pub fn list_reviews(&self, user_id: &str) -> Result<Vec<ReviewRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, reviewer_id, reviewer_name, reviewer_photo, text, rating, created_at
                 FROM reviews WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ReviewRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        reviewer_id: row.get(2)?,
                        reviewer_name: row.get(3)?,
                        reviewer_photo: row.get(4)?,
                        text: row.get(5)?,
                        rating: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Files --

    pub fn insert_file(
        &self,
        id: &str,
        owner_id: &str,
        name: &str,
        mime: &str,
        size: i64,
        sha256: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO files (id, owner_id, name, mime, size, sha256)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, owner_id, name, mime, size, sha256],
            )?;
            Ok(())
        })
    }

    pub fn get_file(&self, id: &str) -> Result<Option<FileRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, owner_id, name, mime, size, sha256, created_at
                 FROM files WHERE id = ?1",
                [id],
                |row| {
                    Ok(FileRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        name: row.get(2)?,
                        mime: row.get(3)?,
                        size: row.get(4)?,
                        sha256: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is a compile-time constant ("id" or "email"), never user input.
    let sql = format!(
        "SELECT id, email, password, first_name, last_name, photo, description, created_at
         FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                photo: row.get(5)?,
                description: row.get(6)?,
                created_at: row.get(7)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn map_processed_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProcessedCaseRow> {
    Ok(ProcessedCaseRow {
        id: row.get(0)?,
        case_id: row.get(1)?,
        owner_id: row.get(2)?,
        owner_email: row.get(3)?,
        title: row.get(4)?,
        theme: row.get(5)?,
        description: row.get(6)?,
        cover: row.get(7)?,
        files: row.get(8)?,
        status: row.get(9)?,
        executor_id: row.get(10)?,
        executor_email: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn map_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        case_id: row.get(1)?,
        owner_id: row.get(2)?,
        owner_email: row.get(3)?,
        title: row.get(4)?,
        theme: row.get(5)?,
        description: row.get(6)?,
        cover: row.get(7)?,
        files: row.get(8)?,
        status: row.get(9)?,
        executor_email: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Snapshot read inside the completing transaction. No JOIN: the project
/// copies only the processed row's own columns.
fn query_processed_for_completion(
    tx: &Transaction<'_>,
    id: &str,
) -> Result<Option<ProcessedCaseRow>> {
    let row = tx
        .query_row(
            "SELECT id, case_id, owner_id, title, theme, description, cover, files,
                    status, executor_id, executor_email, created_at
             FROM processed_cases WHERE id = ?1",
            [id],
            |row| {
                Ok(ProcessedCaseRow {
                    id: row.get(0)?,
                    case_id: row.get(1)?,
                    owner_id: row.get(2)?,
                    owner_email: None,
                    title: row.get(3)?,
                    theme: row.get(4)?,
                    description: row.get(5)?,
                    cover: row.get(6)?,
                    files: row.get(7)?,
                    status: row.get(8)?,
                    executor_id: row.get(9)?,
                    executor_email: row.get(10)?,
                    created_at: row.get(11)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use uuid::Uuid;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open(&dir.path().join("test.db")).expect("open db");
        (dir, db)
    }

    fn seed_user(db: &Database, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, email, "$argon2id$test").expect("create user");
        id
    }

    fn seed_case(db: &Database, owner_id: &str, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_case(&id, owner_id, title, "Design", "a description", None, "[]")
            .expect("insert case");
        id
    }

    #[test]
    fn accept_has_a_single_winner() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec_a = seed_user(&db, "a@example.com");
        let exec_b = seed_user(&db, "b@example.com");
        let case_id = seed_case(&db, &owner, "Logo");

        let first = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec_a)
            .unwrap();
        assert!(matches!(first, AcceptOutcome::Accepted { .. }));

        let second = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec_b)
            .unwrap();
        assert!(matches!(second, AcceptOutcome::AlreadyAccepted));

        // Exactly one in-process copy, and the case is a historical record.
        assert_eq!(db.list_processed_cases().unwrap().len(), 1);
        let case = db.get_case(&case_id).unwrap().unwrap();
        assert_eq!(case.status, "accepted");
        assert_eq!(case.executor_id.as_deref(), Some(exec_a.as_str()));
    }

    #[test]
    fn accept_unknown_case_reports_missing() {
        let (_dir, db) = open_db();
        let exec = seed_user(&db, "exec@example.com");
        let outcome = db
            .accept_case(&Uuid::new_v4().to_string(), "no-such-case", &exec)
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::CaseNotFound));
        assert!(db.list_processed_cases().unwrap().is_empty());
    }

    #[test]
    fn accept_snapshots_executor_email() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec = seed_user(&db, "exec@example.com");
        let case_id = seed_case(&db, &owner, "Site");

        let AcceptOutcome::Accepted { processed_case_id } = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec)
            .unwrap()
        else {
            panic!("expected accept to succeed");
        };

        let row = db.get_processed_case(&processed_case_id).unwrap().unwrap();
        assert_eq!(row.executor_email, "exec@example.com");
        assert_eq!(row.status, "in_process");
        assert_eq!(row.case_id, case_id);
        assert_eq!(row.title, "Site");
    }

    #[test]
    fn complete_requires_the_assigned_executor() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec = seed_user(&db, "exec@example.com");
        let intruder = seed_user(&db, "intruder@example.com");
        let case_id = seed_case(&db, &owner, "Logo");

        let AcceptOutcome::Accepted { processed_case_id } = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec)
            .unwrap()
        else {
            panic!("expected accept to succeed");
        };

        let outcome = db
            .complete_case(
                &Uuid::new_v4().to_string(),
                &processed_case_id,
                &intruder,
                &ProjectOverrides::default(),
            )
            .unwrap();
        assert!(matches!(outcome, CompleteOutcome::NotAssigned));

        // The in-process row must survive a rejected completion.
        assert!(db.get_processed_case(&processed_case_id).unwrap().is_some());
        assert!(db.list_projects(None, None).unwrap().is_empty());
    }

    #[test]
    fn append_after_complete_reports_missing() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec = seed_user(&db, "exec@example.com");
        let case_id = seed_case(&db, &owner, "Logo");

        let AcceptOutcome::Accepted { processed_case_id } = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec)
            .unwrap()
        else {
            panic!("expected accept to succeed");
        };

        let done = db
            .complete_case(
                &Uuid::new_v4().to_string(),
                &processed_case_id,
                &exec,
                &ProjectOverrides::default(),
            )
            .unwrap();
        assert!(matches!(done, CompleteOutcome::Completed { .. }));

        let appended = db
            .append_processed_files(&processed_case_id, &["/files/late".to_string()])
            .unwrap();
        assert!(appended.is_none());
    }

    #[test]
    fn lifecycle_snapshot_carries_appended_files() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec = seed_user(&db, "exec@example.com");
        let case_id = seed_case(&db, &owner, "Logo");

        let AcceptOutcome::Accepted { processed_case_id } = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec)
            .unwrap()
        else {
            panic!("expected accept to succeed");
        };

        let refs = db
            .append_processed_files(&processed_case_id, &["/files/f1".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(refs, vec!["/files/f1".to_string()]);

        let CompleteOutcome::Completed { project_id } = db
            .complete_case(
                &Uuid::new_v4().to_string(),
                &processed_case_id,
                &exec,
                &ProjectOverrides::default(),
            )
            .unwrap()
        else {
            panic!("expected completion to succeed");
        };

        let project = db.get_project(&project_id).unwrap().unwrap();
        assert_eq!(project.files, r#"["/files/f1"]"#);
        assert_eq!(project.status, "closed");
        assert_eq!(project.executor_email, "exec@example.com");
        assert_eq!(project.case_id, case_id);
        assert!(db.list_processed_cases().unwrap().is_empty());
    }

    #[test]
    fn complete_applies_overrides() {
        let (_dir, db) = open_db();
        let owner = seed_user(&db, "owner@example.com");
        let exec = seed_user(&db, "exec@example.com");
        let case_id = seed_case(&db, &owner, "Draft title");

        let AcceptOutcome::Accepted { processed_case_id } = db
            .accept_case(&Uuid::new_v4().to_string(), &case_id, &exec)
            .unwrap()
        else {
            panic!("expected accept to succeed");
        };

        let overrides = ProjectOverrides {
            title: Some("Final title".to_string()),
            files: Some(vec!["/files/final".to_string()]),
            ..Default::default()
        };
        let CompleteOutcome::Completed { project_id } = db
            .complete_case(&Uuid::new_v4().to_string(), &processed_case_id, &exec, &overrides)
            .unwrap()
        else {
            panic!("expected completion to succeed");
        };

        let project = db.get_project(&project_id).unwrap().unwrap();
        assert_eq!(project.title, "Final title");
        assert_eq!(project.files, r#"["/files/final"]"#);
        // Untouched fields keep the snapshot.
        assert_eq!(project.theme, "Design");
    }

    #[test]
    fn reviews_round_trip_in_insertion_order() {
        let (_dir, db) = open_db();
        let target = seed_user(&db, "target@example.com");
        let reviewer = seed_user(&db, "reviewer@example.com");

        for (i, rating) in [4, 5].into_iter().enumerate() {
            db.insert_review(
                &Uuid::new_v4().to_string(),
                &target,
                &reviewer,
                "Rita Reviewer",
                None,
                &format!("review {}", i),
                rating,
            )
            .unwrap();
        }

        let reviews = db.list_reviews(&target).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "review 0");
        assert_eq!(reviews[1].rating, 5);
    }
}
