use chrono::{DateTime, Utc};
use contracts::domain::a003_member::aggregate::{Member, SavingsAccount, Wallet};
use sea_orm::ConnectionTrait;

use super::repository;

/// Member with the wallet and savings account created alongside it
#[derive(Debug, Clone)]
pub struct Enrolment {
    pub member: Member,
    pub wallet: Wallet,
    pub savings: SavingsAccount,
}

/// Writes member, wallet and savings account on `conn`.
/// Run inside a transaction: a failure part way leaves partial rows otherwise.
pub async fn enrol<C: ConnectionTrait>(
    conn: &C,
    member: Member,
    staff_id: &str,
    wallet_prefix: &str,
    interest_rate_id: Option<String>,
    now: DateTime<Utc>,
) -> anyhow::Result<Enrolment> {
    repository::insert_member(conn, &member).await?;

    let member_id = member.id.value().to_string();
    let wallet = Wallet {
        id: uuid::Uuid::new_v4().to_string(),
        member_id: member_id.clone(),
        balance: 0.0,
        wallet_number: Wallet::number_for(wallet_prefix, staff_id, now),
        is_active: true,
        created_at: now,
    };
    repository::insert_wallet(conn, &wallet).await?;

    let savings = SavingsAccount {
        id: uuid::Uuid::new_v4().to_string(),
        member_id,
        balance: 0.0,
        interest_rate_id,
        last_interest_applied: Some(now),
        created_at: now,
    };
    repository::insert_savings_account(conn, &savings).await?;

    Ok(Enrolment {
        member,
        wallet,
        savings,
    })
}
