use contracts::domain::a004_interest_rate::aggregate::{InterestRate, RateType};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_interest_rate")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub rate_type: String,
    pub rate: f64,
    pub is_active: bool,
    pub effective_from: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for InterestRate {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let rate_type = match m.rate_type.as_str() {
            "SAVINGS" => RateType::Savings,
            "LOAN" => RateType::Loan,
            other => anyhow::bail!("Unknown rate type: {}", other),
        };
        Ok(InterestRate {
            id: m.id,
            rate_type,
            rate: m.rate,
            is_active: m.is_active,
            effective_from: m.effective_from,
        })
    }
}

/// Newest active rate of the given type
pub async fn get_active<C: ConnectionTrait>(
    conn: &C,
    rate_type: RateType,
) -> anyhow::Result<Option<InterestRate>> {
    let model = Entity::find()
        .filter(Column::RateType.eq(rate_type.as_str()))
        .filter(Column::IsActive.eq(true))
        .order_by_desc(Column::EffectiveFrom)
        .one(conn)
        .await?;
    model.map(InterestRate::try_from).transpose()
}

pub async fn count<C: ConnectionTrait>(conn: &C) -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn).await?)
}

pub async fn insert<C: ConnectionTrait>(conn: &C, rate: &InterestRate) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(rate.id.clone()),
        rate_type: Set(rate.rate_type.as_str().to_string()),
        rate: Set(rate.rate),
        is_active: Set(rate.is_active),
        effective_from: Set(rate.effective_from),
    };
    active.insert(conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use chrono::{Duration, Utc};

    fn rate(rate_type: RateType, value: f64, is_active: bool, age_days: i64) -> InterestRate {
        InterestRate {
            id: uuid::Uuid::new_v4().to_string(),
            rate_type,
            rate: value,
            is_active,
            effective_from: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn active_rate_is_newest_active_of_type() {
        let db = connect_in_memory().await.unwrap();
        assert!(get_active(&db, RateType::Savings).await.unwrap().is_none());

        insert(&db, &rate(RateType::Savings, 4.0, true, 30)).await.unwrap();
        insert(&db, &rate(RateType::Savings, 5.5, true, 1)).await.unwrap();
        insert(&db, &rate(RateType::Savings, 9.0, false, 0)).await.unwrap();
        insert(&db, &rate(RateType::Loan, 12.0, true, 0)).await.unwrap();

        let active = get_active(&db, RateType::Savings).await.unwrap().unwrap();
        assert_eq!(active.rate, 5.5);
        assert_eq!(active.rate_type, RateType::Savings);
    }
}
