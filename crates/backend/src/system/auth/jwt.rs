use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, DecodingKey, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

const JWT_SECRET_KEY: &str = "jwt_secret";

/// Validate JWT token and extract claims
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Secret from config, otherwise the one kept in sys_settings (generated on first use)
pub async fn resolve_secret<C: ConnectionTrait>(conn: &C, configured: Option<&str>) -> Result<String> {
    if let Some(secret) = configured.filter(|s| !s.trim().is_empty()) {
        return Ok(secret.to_string());
    }

    if let Some(secret) = get_jwt_secret_from_db(conn).await? {
        return Ok(secret);
    }

    let secret = generate_jwt_secret();
    save_jwt_secret_to_db(conn, &secret).await?;
    tracing::info!("Generated new JWT secret in sys_settings");
    Ok(secret)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db<C: ConnectionTrait>(conn: &C) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db<C: ConnectionTrait>(conn: &C, secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            JWT_SECRET_KEY.into(),
            secret.to_string().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to save JWT secret")?;

    Ok(())
}

/// Signs claims with HS256; tokens are issued elsewhere, this exists for tests
#[cfg(test)]
pub fn sign_for_tests(claims: &TokenClaims, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
pub fn claims_for_tests(role: contracts::system::users::Role) -> TokenClaims {
    let now = Utc::now().timestamp() as usize;
    TokenClaims {
        sub: uuid::Uuid::new_v4().to_string(),
        staff_id: "ADMIN".into(),
        email: Some("admin@example.com".into()),
        role,
        exp: now + 3600,
        iat: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use contracts::system::users::Role;

    #[test]
    fn validates_signed_token() {
        let claims = claims_for_tests(Role::Admin);
        let token = sign_for_tests(&claims, "secret");

        let decoded = validate_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, Role::Admin);
        assert!(validate_token(&token, "other").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = claims_for_tests(Role::Admin);
        claims.exp = 1_000;
        claims.iat = 900;
        let token = sign_for_tests(&claims, "secret");
        assert!(validate_token(&token, "secret").is_err());
    }

    #[tokio::test]
    async fn generated_secret_is_persisted() {
        let db = connect_in_memory().await.unwrap();
        let first = resolve_secret(&db, None).await.unwrap();
        let second = resolve_secret(&db, Some("  ")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(resolve_secret(&db, Some("configured")).await.unwrap(), "configured");
    }
}
