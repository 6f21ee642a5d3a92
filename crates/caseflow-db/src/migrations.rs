use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                first_name  TEXT NOT NULL DEFAULT '',
                last_name   TEXT NOT NULL DEFAULT '',
                photo       TEXT,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE cases (
                id          TEXT PRIMARY KEY,
                owner_id    TEXT NOT NULL REFERENCES users(id),
                title       TEXT NOT NULL,
                theme       TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                cover       TEXT,
                files       TEXT NOT NULL DEFAULT '[]',
                status      TEXT NOT NULL DEFAULT 'open',
                executor_id TEXT REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_cases_owner ON cases(owner_id);
            CREATE INDEX idx_cases_status ON cases(status);

            -- UNIQUE(case_id): at most one live in-process copy per case.
            CREATE TABLE processed_cases (
                id             TEXT PRIMARY KEY,
                case_id        TEXT NOT NULL UNIQUE REFERENCES cases(id),
                owner_id       TEXT NOT NULL REFERENCES users(id),
                title          TEXT NOT NULL,
                theme          TEXT NOT NULL DEFAULT '',
                description    TEXT NOT NULL DEFAULT '',
                cover          TEXT,
                files          TEXT NOT NULL DEFAULT '[]',
                status         TEXT NOT NULL DEFAULT 'in_process',
                executor_id    TEXT NOT NULL REFERENCES users(id),
                executor_email TEXT NOT NULL,
                created_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE projects (
                id             TEXT PRIMARY KEY,
                case_id        TEXT NOT NULL,
                owner_id       TEXT NOT NULL REFERENCES users(id),
                title          TEXT NOT NULL,
                theme          TEXT NOT NULL DEFAULT '',
                description    TEXT NOT NULL DEFAULT '',
                cover          TEXT,
                files          TEXT NOT NULL DEFAULT '[]',
                status         TEXT NOT NULL DEFAULT 'closed',
                executor_email TEXT NOT NULL,
                created_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_projects_owner ON projects(owner_id);
            CREATE INDEX idx_projects_executor ON projects(executor_email);

            CREATE TABLE reviews (
                id             TEXT PRIMARY KEY,
                user_id        TEXT NOT NULL REFERENCES users(id),
                reviewer_id    TEXT NOT NULL REFERENCES users(id),
                reviewer_name  TEXT NOT NULL,
                reviewer_photo TEXT,
                text           TEXT NOT NULL,
                rating         INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                created_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_reviews_user ON reviews(user_id);

            CREATE TABLE files (
                id         TEXT PRIMARY KEY,
                owner_id   TEXT NOT NULL REFERENCES users(id),
                name       TEXT NOT NULL,
                mime       TEXT NOT NULL,
                size       INTEGER NOT NULL,
                sha256     TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    }

    info!("Database migrations complete");
    Ok(())
}
