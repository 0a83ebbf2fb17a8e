//! Members with their wallet and savings account.
//! Every write takes the caller's connection so enrolment runs inside the row transaction.

use contracts::domain::a003_member::aggregate::{Member, MemberId, SavingsAccount, Wallet};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use uuid::Uuid;

pub mod member {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_member")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub user_id: String,
        pub entrance_fee: f64,
        pub nominee: Option<String>,
        pub address: Option<String>,
        pub witness: Option<String>,
        pub relationship: Option<String>,
        pub joined_at: chrono::DateTime<chrono::Utc>,
        pub is_active: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod wallet {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_wallet")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub member_id: String,
        pub balance: f64,
        pub wallet_number: String,
        pub is_active: bool,
        pub created_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod savings_account {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "a003_savings_account")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub member_id: String,
        pub balance: f64,
        pub interest_rate_id: Option<String>,
        pub last_interest_applied: Option<chrono::DateTime<chrono::Utc>>,
        pub created_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<member::Model> for Member {
    fn from(m: member::Model) -> Self {
        Member {
            id: MemberId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            user_id: m.user_id,
            entrance_fee: m.entrance_fee,
            nominee: m.nominee,
            address: m.address,
            witness: m.witness,
            relationship: m.relationship,
            joined_at: m.joined_at,
            is_active: m.is_active,
        }
    }
}

impl From<wallet::Model> for Wallet {
    fn from(m: wallet::Model) -> Self {
        Wallet {
            id: m.id,
            member_id: m.member_id,
            balance: m.balance,
            wallet_number: m.wallet_number,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

impl From<savings_account::Model> for SavingsAccount {
    fn from(m: savings_account::Model) -> Self {
        SavingsAccount {
            id: m.id,
            member_id: m.member_id,
            balance: m.balance,
            interest_rate_id: m.interest_rate_id,
            last_interest_applied: m.last_interest_applied,
            created_at: m.created_at,
        }
    }
}

pub async fn exists_for_user<C: ConnectionTrait>(conn: &C, user_id: &str) -> anyhow::Result<bool> {
    let count = member::Entity::find()
        .filter(member::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn get_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> anyhow::Result<Option<Member>> {
    let result = member::Entity::find()
        .filter(member::Column::UserId.eq(user_id))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn wallets_for_member<C: ConnectionTrait>(
    conn: &C,
    member_id: &str,
) -> anyhow::Result<Vec<Wallet>> {
    let items = wallet::Entity::find()
        .filter(wallet::Column::MemberId.eq(member_id))
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn savings_for_member<C: ConnectionTrait>(
    conn: &C,
    member_id: &str,
) -> anyhow::Result<Vec<SavingsAccount>> {
    let items = savings_account::Entity::find()
        .filter(savings_account::Column::MemberId.eq(member_id))
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert_member<C: ConnectionTrait>(conn: &C, m: &Member) -> anyhow::Result<()> {
    let active = member::ActiveModel {
        id: Set(m.id.value().to_string()),
        user_id: Set(m.user_id.clone()),
        entrance_fee: Set(m.entrance_fee),
        nominee: Set(m.nominee.clone()),
        address: Set(m.address.clone()),
        witness: Set(m.witness.clone()),
        relationship: Set(m.relationship.clone()),
        joined_at: Set(m.joined_at),
        is_active: Set(m.is_active),
    };
    active.insert(conn).await?;
    Ok(())
}

pub async fn insert_wallet<C: ConnectionTrait>(conn: &C, w: &Wallet) -> anyhow::Result<()> {
    let active = wallet::ActiveModel {
        id: Set(w.id.clone()),
        member_id: Set(w.member_id.clone()),
        balance: Set(w.balance),
        wallet_number: Set(w.wallet_number.clone()),
        is_active: Set(w.is_active),
        created_at: Set(w.created_at),
    };
    active.insert(conn).await?;
    Ok(())
}

pub async fn insert_savings_account<C: ConnectionTrait>(
    conn: &C,
    s: &SavingsAccount,
) -> anyhow::Result<()> {
    let active = savings_account::ActiveModel {
        id: Set(s.id.clone()),
        member_id: Set(s.member_id.clone()),
        balance: Set(s.balance),
        interest_rate_id: Set(s.interest_rate_id.clone()),
        last_interest_applied: Set(s.last_interest_applied),
        created_at: Set(s.created_at),
    };
    active.insert(conn).await?;
    Ok(())
}
