use contracts::system::audit::{AuditSeverity, AuditStatus, NewAuditEntry};
use contracts::system::auth::TokenClaims;
use sea_orm::ConnectionTrait;

use super::repository;

/// Who did what, from where
pub struct AuditContext<'a> {
    pub actor: &'a TokenClaims,
    pub ip_address: Option<String>,
}

/// Writes one entry. A failed write is logged and swallowed so it never fails the audited action.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    ctx: &AuditContext<'_>,
    action: &str,
    target_type: &str,
    status: AuditStatus,
    severity: AuditSeverity,
    metadata: serde_json::Value,
) -> Option<String> {
    let entry = NewAuditEntry {
        actor_id: Some(ctx.actor.sub.clone()),
        actor_role: ctx.actor.role.as_str().to_string(),
        action: action.to_string(),
        target_type: target_type.to_string(),
        target_id: String::new(),
        status,
        severity,
        ip_address: ctx.ip_address.clone(),
        metadata,
    };

    match repository::insert(conn, &entry).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::error!("Failed to write audit entry {}: {}", action, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use crate::system::auth::jwt::claims_for_tests;
    use contracts::system::users::Role;

    #[tokio::test]
    async fn record_and_list() {
        let db = connect_in_memory().await.unwrap();
        let claims = claims_for_tests(Role::Admin);
        let ctx = AuditContext {
            actor: &claims,
            ip_address: Some("10.0.0.1".into()),
        };

        let id = record(
            &db,
            &ctx,
            "USER_EXCEL_IMPORT",
            "User",
            AuditStatus::Success,
            AuditSeverity::High,
            serde_json::json!({ "successful": 3 }),
        )
        .await;
        assert!(id.is_some());

        let entries = repository::list_by_action(&db, "USER_EXCEL_IMPORT").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor_role, "ADMIN");
        assert_eq!(entries[0].status, AuditStatus::Success);
        assert_eq!(entries[0].metadata["successful"], 3);
        assert_eq!(entries[0].ip_address.as_deref(), Some("10.0.0.1"));
    }
}
