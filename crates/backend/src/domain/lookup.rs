//! Get-or-create for reference lookups (stations, divisions)
//!
//! Matching is by `name_key` (trimmed, lower-cased name), which the store keeps unique.
//! Creation is an insert-or-ignore on both unique keys, so two importers racing for the
//! same new name end with one row: the loser re-reads the winner's entity.

use async_trait::async_trait;
use contracts::usecases::u501_import_roster::LookupKind;
use sea_orm::ConnectionTrait;

/// Upper bound on code suffixes tried for one name
const MAX_CODE_SUFFIX: u32 = 999;

#[async_trait]
pub trait LookupStore {
    type Entity: Send;

    const KIND: LookupKind;
    /// Code used when the name contains no letters
    const DEFAULT_CODE: &'static str;

    async fn find_by_name_key<C: ConnectionTrait>(
        conn: &C,
        name_key: &str,
    ) -> anyhow::Result<Option<Self::Entity>>;

    async fn code_exists<C: ConnectionTrait>(conn: &C, code: &str) -> anyhow::Result<bool>;

    /// `None` when a unique key was already taken and nothing was written
    async fn try_insert<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        name: &str,
        name_key: &str,
        directorate: Option<&str>,
    ) -> anyhow::Result<Option<Self::Entity>>;

    /// (id, code, name)
    fn identity(entity: &Self::Entity) -> (String, String, String);
}

#[derive(Debug, Clone)]
pub struct Resolved<E> {
    pub entity: E,
    pub created: bool,
}

pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Letters of the name, uppercased, truncated or padded with `X` to exactly 3
pub fn base_code(name: &str, default_code: &str) -> String {
    let letters: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .take(3)
        .collect();

    if letters.is_empty() {
        return default_code.to_string();
    }

    format!("{:X<3}", letters)
}

/// Candidate code for attempt `n`: the base itself, then base + "01", "02", ...
pub fn candidate_code(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}{:02}", base, n)
    }
}

pub async fn get_or_create<S, C>(
    conn: &C,
    name: &str,
    directorate: Option<&str>,
) -> anyhow::Result<Resolved<S::Entity>>
where
    S: LookupStore,
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("{} name is empty", S::KIND.as_str());
    }

    let key = name_key(name);
    if let Some(entity) = S::find_by_name_key(conn, &key).await? {
        return Ok(Resolved {
            entity,
            created: false,
        });
    }

    let base = base_code(name, S::DEFAULT_CODE);
    for n in 0..=MAX_CODE_SUFFIX {
        let code = candidate_code(&base, n);
        if S::code_exists(conn, &code).await? {
            continue;
        }

        if let Some(entity) = S::try_insert(conn, &code, name, &key, directorate).await? {
            return Ok(Resolved {
                entity,
                created: true,
            });
        }

        // Nothing inserted: either the name appeared concurrently or the code was just taken
        if let Some(entity) = S::find_by_name_key(conn, &key).await? {
            tracing::debug!("{} \"{}\" created concurrently", S::KIND.as_str(), name);
            return Ok(Resolved {
                entity,
                created: false,
            });
        }
    }

    anyhow::bail!(
        "no free {} code for \"{}\" after {} attempts",
        S::KIND.as_str(),
        name,
        MAX_CODE_SUFFIX + 1
    )
}
