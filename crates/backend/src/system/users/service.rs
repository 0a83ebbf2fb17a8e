use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{Role, User};
use sea_orm::ConnectionTrait;

use super::cache::DirectoryCache;
use super::repository;
use crate::system::auth::password;

/// Read-through lookup by staff number
pub async fn get_by_staff_id<C: ConnectionTrait>(
    conn: &C,
    cache: &DirectoryCache,
    staff_id: &str,
) -> Result<Option<User>> {
    if let Some(user) = cache.get(staff_id) {
        return Ok(Some(user));
    }

    let user = repository::get_by_staff_id(conn, staff_id).await?;
    if let Some(ref user) = user {
        cache.put(user.clone());
    }
    Ok(user)
}

/// Create a privileged account with a hashed password
pub async fn create_admin<C: ConnectionTrait>(
    conn: &C,
    staff_id: &str,
    full_name: &str,
    email: Option<String>,
    plain_password: &str,
) -> Result<User> {
    if staff_id.trim().is_empty() {
        return Err(anyhow::anyhow!("Staff # cannot be empty"));
    }

    if repository::get_by_staff_id(conn, staff_id).await?.is_some() {
        return Err(anyhow::anyhow!("Staff # already exists"));
    }

    let now = Utc::now();
    let mut user = User::new_for_insert(staff_id.to_string(), full_name.to_string(), now);
    user.email = email;
    user.role = Role::SuperAdmin;

    let password_hash = password::hash_password(plain_password)?;
    repository::insert(conn, &user, Some(&password_hash)).await?;
    repository::insert_account_meta(conn, &user.id, now).await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn lookup_fills_cache_until_invalidated() {
        let db = connect_in_memory().await.unwrap();
        let cache = DirectoryCache::new();
        create_admin(&db, "0001", "Root", None, "pw").await.unwrap();

        assert!(get_by_staff_id(&db, &cache, "9999").await.unwrap().is_none());
        assert!(cache.is_empty());

        let user = get_by_staff_id(&db, &cache, "0001").await.unwrap().unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
        assert_eq!(cache.len(), 1);

        cache.invalidate_all();
        assert!(get_by_staff_id(&db, &cache, "0001").await.unwrap().is_some());
    }
}
