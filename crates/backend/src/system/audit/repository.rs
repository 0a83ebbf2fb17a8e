use chrono::Utc;
use contracts::system::audit::{AuditEntry, AuditSeverity, AuditStatus, NewAuditEntry};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub actor_id: Option<String>,
    pub actor_role: String,
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    pub status: String,
    pub severity: String,
    pub ip_address: Option<String>,
    pub metadata: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AuditEntry {
    fn from(m: Model) -> Self {
        let status = match m.status.as_str() {
            "SUCCESS" => AuditStatus::Success,
            _ => AuditStatus::Failed,
        };
        let severity = match m.severity.as_str() {
            "LOW" => AuditSeverity::Low,
            "MEDIUM" => AuditSeverity::Medium,
            "CRITICAL" => AuditSeverity::Critical,
            _ => AuditSeverity::High,
        };
        AuditEntry {
            id: m.id,
            actor_id: m.actor_id,
            actor_role: m.actor_role,
            action: m.action,
            target_type: m.target_type,
            target_id: m.target_id,
            status,
            severity,
            ip_address: m.ip_address,
            metadata: serde_json::from_str(&m.metadata).unwrap_or(serde_json::Value::Null),
            timestamp: m.timestamp,
        }
    }
}

/// Append an entry; the trail is never updated or deleted
pub async fn insert<C: ConnectionTrait>(conn: &C, entry: &NewAuditEntry) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let active = ActiveModel {
        id: Set(id.clone()),
        timestamp: Set(Utc::now()),
        actor_id: Set(entry.actor_id.clone()),
        actor_role: Set(entry.actor_role.clone()),
        action: Set(entry.action.clone()),
        target_type: Set(entry.target_type.clone()),
        target_id: Set(entry.target_id.clone()),
        status: Set(entry.status.as_str().to_string()),
        severity: Set(entry.severity.as_str().to_string()),
        ip_address: Set(entry.ip_address.clone()),
        metadata: Set(entry.metadata.to_string()),
    };
    active.insert(conn).await?;
    Ok(id)
}

/// Entries for an action, newest first
pub async fn list_by_action<C: ConnectionTrait>(
    conn: &C,
    action: &str,
) -> anyhow::Result<Vec<AuditEntry>> {
    let items = Entity::find()
        .filter(Column::Action.eq(action))
        .order_by_desc(Column::Timestamp)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
