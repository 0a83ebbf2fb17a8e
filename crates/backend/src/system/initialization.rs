use anyhow::Result;
use chrono::Utc;
use contracts::domain::a004_interest_rate::aggregate::{InterestRate, RateType};
use sea_orm::ConnectionTrait;

use crate::domain::a004_interest_rate::repository as rates;
use crate::system::users::{repository, service};

const ADMIN_STAFF_ID: &str = "ADMIN";
const ADMIN_PASSWORD_ENV: &str = "ADMIN_INITIAL_PASSWORD";
const DEFAULT_SAVINGS_RATE: f64 = 2.5;

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists<C: ConnectionTrait>(conn: &C) -> Result<()> {
    let count = repository::count_users(conn).await?;
    if count > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let password = std::env::var(ADMIN_PASSWORD_ENV).unwrap_or_else(|_| "admin".to_string());
    let admin = service::create_admin(conn, ADMIN_STAFF_ID, "Administrator", None, &password).await?;

    tracing::warn!("Default admin user created: Staff # {} (id {})", admin.staff_id, admin.id);
    if std::env::var(ADMIN_PASSWORD_ENV).is_err() {
        tracing::warn!("Default password in use. Please change it immediately.");
    }

    Ok(())
}

/// Seeds an active SAVINGS rate when the rate table is empty
pub async fn ensure_default_savings_rate<C: ConnectionTrait>(conn: &C) -> Result<()> {
    if rates::count(conn).await? > 0 {
        return Ok(());
    }

    let rate = InterestRate {
        id: uuid::Uuid::new_v4().to_string(),
        rate_type: RateType::Savings,
        rate: DEFAULT_SAVINGS_RATE,
        is_active: true,
        effective_from: Utc::now(),
    };
    rates::insert(conn, &rate).await?;
    tracing::info!("Seeded default {} rate {}", rate.rate_type, rate.rate);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use contracts::system::users::Role;

    #[tokio::test]
    async fn seeds_once() {
        let db = connect_in_memory().await.unwrap();

        ensure_admin_user_exists(&db).await.unwrap();
        ensure_admin_user_exists(&db).await.unwrap();
        assert_eq!(repository::count_users(&db).await.unwrap(), 1);
        let admin = repository::get_by_staff_id(&db, ADMIN_STAFF_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);

        ensure_default_savings_rate(&db).await.unwrap();
        ensure_default_savings_rate(&db).await.unwrap();
        assert_eq!(rates::count(&db).await.unwrap(), 1);
        let active = rates::get_active(&db, RateType::Savings).await.unwrap().unwrap();
        assert_eq!(active.rate, DEFAULT_SAVINGS_RATE);
    }
}
