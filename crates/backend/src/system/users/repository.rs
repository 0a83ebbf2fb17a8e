use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use contracts::system::users::{Gender, MaritalStatus, Role, User};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

const USER_COLUMNS: &str = "id, employee_id, staff_id, email, full_name, title, gender, date_of_birth, \
     phone_number, marital_status, number_of_dependents, role, pb_number, directorate, station_id, \
     division_id, date_registered, discontinued, discontinued_date, is_active, created_by, created_at, updated_at";

/// Login-side state created together with an imported user
#[derive(Debug, Clone)]
pub struct AccountMeta {
    pub user_id: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub failed_login_attempts: i32,
    pub is_first_login: bool,
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp in sys_users: {}", value))?
        .with_timezone(&Utc))
}

fn user_from_row(row: &QueryResult) -> Result<User> {
    let gender: String = row.try_get("", "gender")?;
    let marital: String = row.try_get("", "marital_status")?;
    let role: String = row.try_get("", "role")?;
    let dob: Option<String> = row.try_get("", "date_of_birth")?;
    let discontinued_date: Option<String> = row.try_get("", "discontinued_date")?;
    let date_registered: String = row.try_get("", "date_registered")?;
    let created_at: String = row.try_get("", "created_at")?;
    let updated_at: String = row.try_get("", "updated_at")?;

    Ok(User {
        id: row.try_get("", "id")?,
        employee_id: row.try_get("", "employee_id")?,
        staff_id: row.try_get("", "staff_id")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        title: row.try_get("", "title")?,
        gender: Gender::parse(&gender).unwrap_or_default(),
        date_of_birth: dob
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        phone_number: row.try_get("", "phone_number")?,
        marital_status: MaritalStatus::parse(&marital).unwrap_or_default(),
        number_of_dependents: row.try_get::<i32>("", "number_of_dependents")?.max(0) as u32,
        role: Role::parse(&role).unwrap_or_default(),
        pb_number: row.try_get("", "pb_number")?,
        directorate: row.try_get("", "directorate")?,
        station_id: row.try_get("", "station_id")?,
        division_id: row.try_get("", "division_id")?,
        date_registered: parse_ts(&date_registered)?,
        discontinued: row.try_get::<i32>("", "discontinued")? != 0,
        discontinued_date: discontinued_date.as_deref().map(parse_ts).transpose()?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        created_by: row.try_get("", "created_by")?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

async fn find_one<C: ConnectionTrait>(
    conn: &C,
    filter: &str,
    value: String,
) -> Result<Option<User>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users WHERE {} = ?", USER_COLUMNS, filter),
            [value.into()],
        ))
        .await?;

    result.as_ref().map(user_from_row).transpose()
}

/// Create user with an optional password hash
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    password_hash: Option<&str>,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        format!(
            "INSERT INTO sys_users ({}, password_hash) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            USER_COLUMNS
        ),
        [
            user.id.clone().into(),
            user.employee_id.clone().into(),
            user.staff_id.clone().into(),
            user.email.clone().into(),
            user.full_name.clone().into(),
            user.title.clone().into(),
            user.gender.as_str().into(),
            user
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .into(),
            user.phone_number.clone().into(),
            user.marital_status.as_str().into(),
            (user.number_of_dependents as i32).into(),
            user.role.as_str().into(),
            user.pb_number.clone().into(),
            user.directorate.clone().into(),
            user.station_id.clone().into(),
            user.division_id.clone().into(),
            user.date_registered.to_rfc3339().into(),
            (if user.discontinued { 1 } else { 0 }).into(),
            user.discontinued_date.map(|d| d.to_rfc3339()).into(),
            (if user.is_active { 1 } else { 0 }).into(),
            user.created_by.clone().into(),
            user.created_at.to_rfc3339().into(),
            user.updated_at.to_rfc3339().into(),
            password_hash.map(str::to_string).into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

pub async fn insert_account_meta<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_user_account_meta
            (user_id, email_verified, phone_verified, failed_login_attempts, is_first_login, created_at)
         VALUES (?, 0, 0, 0, 1, ?)",
        [user_id.to_string().into(), now.to_rfc3339().into()],
    ))
    .await
    .context("Failed to insert account meta")?;

    Ok(())
}

pub async fn get_account_meta<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<AccountMeta>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id, email_verified, phone_verified, failed_login_attempts, is_first_login
             FROM sys_user_account_meta WHERE user_id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(AccountMeta {
            user_id: row.try_get("", "user_id")?,
            email_verified: row.try_get::<i32>("", "email_verified")? != 0,
            phone_verified: row.try_get::<i32>("", "phone_verified")? != 0,
            failed_login_attempts: row.try_get("", "failed_login_attempts")?,
            is_first_login: row.try_get::<i32>("", "is_first_login")? != 0,
        })),
        None => Ok(None),
    }
}

pub async fn get_by_staff_id<C: ConnectionTrait>(conn: &C, staff_id: &str) -> Result<Option<User>> {
    find_one(conn, "staff_id", staff_id.to_string()).await
}

/// Whether `email` belongs to a record other than `exclude_id`
pub async fn email_taken<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    exclude_id: Option<&str>,
) -> Result<bool> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as count FROM sys_users WHERE email = ? AND id <> ?",
            [
                email.to_string().into(),
                exclude_id.unwrap_or_default().to_string().into(),
            ],
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get::<i64>("", "count")? > 0),
        None => Ok(false),
    }
}

pub async fn get_password_hash<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(row.try_get("", "password_hash")?),
        None => Ok(None),
    }
}

/// Persists the links an import may change on an existing record
pub async fn update_links<C: ConnectionTrait>(conn: &C, user: &User) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users
         SET email = ?, station_id = ?, division_id = ?, directorate = ?, updated_at = ?
         WHERE id = ?",
        [
            user.email.clone().into(),
            user.station_id.clone().into(),
            user.division_id.clone().into(),
            user.directorate.clone().into(),
            user.updated_at.to_rfc3339().into(),
            user.id.clone().into(),
        ],
    ))
    .await
    .context("Failed to update user")?;

    Ok(())
}

pub async fn count_users<C: ConnectionTrait>(conn: &C) -> Result<usize> {
    let result = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as count FROM sys_users".to_string(),
        ))
        .await?;

    match result {
        Some(row) => {
            let count: i64 = row.try_get("", "count")?;
            Ok(count as usize)
        }
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn insert_and_read_back() {
        let db = connect_in_memory().await.unwrap();
        let now = Utc::now();
        let mut user = User::new_for_insert("1001".into(), "Ama Mensah".into(), now);
        user.email = Some("ama@example.com".into());
        user.gender = Gender::Female;
        user.marital_status = MaritalStatus::Married;
        user.date_of_birth = NaiveDate::from_ymd_opt(1990, 5, 17);
        user.number_of_dependents = 2;

        insert(&db, &user, Some("hash")).await.unwrap();
        insert_account_meta(&db, &user.id, now).await.unwrap();

        let stored = get_by_staff_id(&db, "1001").await.unwrap().unwrap();
        assert_eq!(stored.id, user.id);
        assert_eq!(stored.gender, Gender::Female);
        assert_eq!(stored.marital_status, MaritalStatus::Married);
        assert_eq!(stored.date_of_birth, user.date_of_birth);
        assert_eq!(stored.number_of_dependents, 2);
        assert_eq!(stored.role, Role::Staff);

        assert!(email_taken(&db, "ama@example.com", None).await.unwrap());
        assert!(!email_taken(&db, "ama@example.com", Some(&user.id)).await.unwrap());
        assert_eq!(
            get_password_hash(&db, &user.id).await.unwrap().as_deref(),
            Some("hash")
        );

        let meta = get_account_meta(&db, &user.id).await.unwrap().unwrap();
        assert!(meta.is_first_login);
        assert_eq!(meta.failed_login_attempts, 0);
    }

    #[tokio::test]
    async fn duplicate_staff_id_is_rejected() {
        let db = connect_in_memory().await.unwrap();
        let now = Utc::now();
        let first = User::new_for_insert("2002".into(), "Kofi".into(), now);
        let second = User::new_for_insert("2002".into(), "Kwame".into(), now);

        insert(&db, &first, None).await.unwrap();
        assert!(insert(&db, &second, None).await.is_err());
        assert_eq!(count_users(&db).await.unwrap(), 1);
    }
}
