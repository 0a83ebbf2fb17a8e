use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы схемы в порядке создания (ссылки идут только на ранее созданные)
const TABLES: &[(&str, &str)] = &[
    (
        "sys_settings",
        r#"
        CREATE TABLE sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a001_station",
        r#"
        CREATE TABLE a001_station (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            name_key TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            location TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "a002_division",
        r#"
        CREATE TABLE a002_division (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            name_key TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            directorate TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "sys_users",
        r#"
        CREATE TABLE sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            employee_id TEXT NOT NULL UNIQUE,
            staff_id TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            password_hash TEXT,
            full_name TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT 'OTHER',
            date_of_birth TEXT,
            phone_number TEXT NOT NULL DEFAULT '',
            marital_status TEXT NOT NULL DEFAULT 'SINGLE',
            number_of_dependents INTEGER NOT NULL DEFAULT 0,
            role TEXT NOT NULL DEFAULT 'STAFF',
            pb_number TEXT NOT NULL DEFAULT '',
            directorate TEXT NOT NULL DEFAULT '',
            station_id TEXT REFERENCES a001_station(id),
            division_id TEXT REFERENCES a002_division(id),
            date_registered TEXT NOT NULL,
            discontinued INTEGER NOT NULL DEFAULT 0,
            discontinued_date TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_by TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "sys_user_account_meta",
        r#"
        CREATE TABLE sys_user_account_meta (
            user_id TEXT PRIMARY KEY NOT NULL REFERENCES sys_users(id),
            email_verified INTEGER NOT NULL DEFAULT 0,
            phone_verified INTEGER NOT NULL DEFAULT 0,
            failed_login_attempts INTEGER NOT NULL DEFAULT 0,
            is_first_login INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a004_interest_rate",
        r#"
        CREATE TABLE a004_interest_rate (
            id TEXT PRIMARY KEY NOT NULL,
            rate_type TEXT NOT NULL,
            rate REAL NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            effective_from TEXT NOT NULL
        );
        "#,
    ),
    (
        "a003_member",
        r#"
        CREATE TABLE a003_member (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL UNIQUE REFERENCES sys_users(id),
            entrance_fee REAL NOT NULL DEFAULT 0,
            nominee TEXT,
            address TEXT,
            witness TEXT,
            relationship TEXT,
            joined_at TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );
        "#,
    ),
    (
        "a003_wallet",
        r#"
        CREATE TABLE a003_wallet (
            id TEXT PRIMARY KEY NOT NULL,
            member_id TEXT NOT NULL REFERENCES a003_member(id),
            balance REAL NOT NULL DEFAULT 0,
            wallet_number TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "a003_savings_account",
        r#"
        CREATE TABLE a003_savings_account (
            id TEXT PRIMARY KEY NOT NULL,
            member_id TEXT NOT NULL REFERENCES a003_member(id),
            balance REAL NOT NULL DEFAULT 0,
            interest_rate_id TEXT REFERENCES a004_interest_rate(id),
            last_interest_applied TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    ),
    (
        "sys_audit_log",
        r#"
        CREATE TABLE sys_audit_log (
            id TEXT PRIMARY KEY NOT NULL,
            timestamp TEXT NOT NULL,
            actor_id TEXT,
            actor_role TEXT NOT NULL,
            action TEXT NOT NULL,
            target_type TEXT NOT NULL,
            target_id TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            severity TEXT NOT NULL,
            ip_address TEXT,
            metadata TEXT NOT NULL DEFAULT '{}'
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a004_interest_rate_type ON a004_interest_rate (rate_type, is_active, effective_from);",
    "CREATE INDEX IF NOT EXISTS idx_sys_audit_log_action ON sys_audit_log (action, timestamp);",
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Idempotent schema bootstrap: creates missing tables and indexes
pub async fn bootstrap_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, ddl) in TABLES {
        let exists = conn
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
                [(*table).into()],
            ))
            .await?;

        if exists.is_none() {
            tracing::info!("Creating {} table", table);
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                ddl.to_string(),
            ))
            .await?;
        }
    }

    for ddl in INDEXES {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }

    Ok(())
}

/// Single-connection in-memory database with the full schema
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let conn = connect_in_memory().await.unwrap();
        bootstrap_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table'".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|r| r.try_get::<String>("", "name").unwrap())
            .collect();
        for (table, _) in TABLES {
            assert!(names.iter().any(|n| n == table), "missing {}", table);
        }
    }
}
