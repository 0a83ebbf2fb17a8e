use chrono::{DateTime, Utc};
use contracts::domain::a004_interest_rate::aggregate::RateType;
use contracts::system::auth::TokenClaims;
use contracts::usecases::u501_import_roster::{
    CreatedLookup, ImportProfile, ImportReport, SuccessfulRow,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::config::{ImportConfig, TransactionScope};
use super::draft::{required_text, MemberDraft, UserDraft};
use super::error::ImportError;
use super::headers::{Columns, HeaderIndex, RowView};
use super::report::{ReportBuilder, RowOutcome};
use super::sheet::{CellValue, UploadTable};
use crate::domain::a001_station::service::StationStore;
use crate::domain::a002_division::service::DivisionStore;
use crate::domain::lookup::{self, LookupStore, Resolved};
use crate::domain::{a003_member, a004_interest_rate};
use crate::system::auth::password;
use crate::system::users::repository as users;

/// Who runs the import
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    /// Shown as `imported_by`
    pub identity: String,
}

impl From<&TokenClaims> for Principal {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            identity: claims.identity(),
        }
    }
}

/// Spreadsheet line of data row `index`: one header row, 1-based
pub fn row_number(index: usize) -> usize {
    index + 2
}

/// Bulk roster importer. One sequential pass per upload; the caller owns
/// cache invalidation and auditing.
pub struct RosterImporter {
    db: DatabaseConnection,
    config: ImportConfig,
}

/// Per-upload state shared by every row
struct Pass<'a> {
    profile: ImportProfile,
    columns: &'a Columns,
    principal: &'a Principal,
    savings_rate_id: Option<String>,
    now: DateTime<Utc>,
}

impl RosterImporter {
    pub fn new(db: DatabaseConnection, config: ImportConfig) -> Self {
        Self { db, config }
    }

    pub async fn import(
        &self,
        profile: ImportProfile,
        table: &UploadTable,
        principal: &Principal,
    ) -> Result<ImportReport, ImportError> {
        self.import_at(profile, table, principal, Utc::now()).await
    }

    /// `now` stamps generated dates, wallet numbers and the report
    pub async fn import_at(
        &self,
        profile: ImportProfile,
        table: &UploadTable,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, ImportError> {
        let index = HeaderIndex::new(&table.headers);
        let columns = Columns::resolve(&index, &self.config.headers, profile)?;

        tracing::info!(
            "Starting {} import of {} rows by {} ({:?} scope)",
            profile,
            table.rows.len(),
            principal.identity,
            self.config.transaction_scope
        );

        let savings_rate_id = match profile {
            ImportProfile::Member => {
                a004_interest_rate::repository::get_active(&self.db, RateType::Savings)
                    .await?
                    .map(|rate| rate.id)
            }
            ImportProfile::User => None,
        };

        let pass = Pass {
            profile,
            columns: &columns,
            principal,
            savings_rate_id,
            now,
        };
        let mut report = ReportBuilder::new(principal.identity.clone(), now, table.rows.len());

        match self.config.transaction_scope {
            TransactionScope::Row => {
                for (i, cells) in table.rows.iter().enumerate() {
                    let row = row_number(i);
                    let outcome = self.run_row(&self.db, &pass, cells, row).await;
                    report.record(row, index.row_data(cells), outcome);
                }
            }
            TransactionScope::Batch => {
                let batch = self.db.begin().await?;
                for (i, cells) in table.rows.iter().enumerate() {
                    let row = row_number(i);
                    let outcome = self.run_row(&batch, &pass, cells, row).await;
                    report.record(row, index.row_data(cells), outcome);
                }
                batch.commit().await?;
            }
        }

        let default_interest_rate = match profile {
            ImportProfile::Member => Some(
                a004_interest_rate::repository::get_active(&self.db, RateType::Savings)
                    .await?
                    .map(|rate| rate.rate)
                    .unwrap_or(0.0),
            ),
            ImportProfile::User => None,
        };

        let report = report.finish(default_interest_rate);
        tracing::info!(
            "{} import finished: {} successful, {} failed, {} skipped",
            profile,
            report.summary.successful,
            report.summary.failed,
            report.summary.skipped
        );
        Ok(report)
    }

    /// One row inside its own transaction (or savepoint when `conn` is already one).
    /// Only a `Created` row commits; every error ends as `Failed`.
    async fn run_row<C>(
        &self,
        conn: &C,
        pass: &Pass<'_>,
        cells: &[CellValue],
        row: usize,
    ) -> RowOutcome
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = match conn.begin().await {
            Ok(txn) => txn,
            Err(e) => {
                let err = anyhow::Error::from(e);
                tracing::error!("Row {}: could not open transaction: {:#}", row, err);
                return RowOutcome::database_error(&err);
            }
        };

        let view = RowView::new(cells);
        let result = match pass.profile {
            ImportProfile::User => self.process_user(&txn, pass, &view, row).await,
            ImportProfile::Member => self.process_member(&txn, pass, &view, row).await,
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Unexpected error at row {}: {:#}", row, e);
                RowOutcome::unexpected(&e)
            }
        };

        if matches!(outcome, RowOutcome::Created { .. }) {
            if let Err(e) = txn.commit().await {
                let err = anyhow::Error::from(e);
                tracing::error!("Row {}: commit failed: {:#}", row, err);
                return RowOutcome::database_error(&err);
            }
        } else if let Err(e) = txn.rollback().await {
            tracing::error!("Row {}: rollback failed: {}", row, e);
        }

        outcome
    }

    async fn process_user<C>(
        &self,
        conn: &C,
        pass: &Pass<'_>,
        view: &RowView<'_>,
        row: usize,
    ) -> anyhow::Result<RowOutcome>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let cols = pass.columns;
        let staff_id = match required_text(view, &cols.staff_id) {
            Ok(staff_id) => staff_id,
            Err(failure) => return Ok(failure.into()),
        };

        if users::get_by_staff_id(conn, &staff_id).await?.is_some() {
            return Ok(RowOutcome::Skipped {
                reason: format!("Staff # \"{}\" already exists in system", staff_id),
            });
        }

        let full_name = match cols.name.as_ref().map(|c| required_text(view, c)) {
            Some(Ok(name)) => name,
            Some(Err(failure)) => return Ok(failure.into()),
            None => return Ok(RowOutcome::failed("Name column is not mapped")),
        };

        let mut warnings = Vec::new();
        let mut draft = UserDraft::parse(
            view,
            cols,
            staff_id,
            full_name,
            &self.config.phone_country_code,
            pass.now,
            &mut warnings,
        );

        if let Some(email) = draft.email.take() {
            if users::email_taken(conn, &email, None).await? {
                warnings.push(format!(
                    "Email \"{}\" already exists for another user. Email field will be left blank.",
                    email
                ));
            } else {
                draft.email = Some(email);
            }
        }

        let mut lookups = Vec::new();
        let station_name = draft.station.clone();
        let station = match &station_name {
            Some(name) => {
                resolve_lookup::<StationStore, _>(conn, name, None, row, &mut warnings, &mut lookups)
                    .await
            }
            None => None,
        };
        let division_name = draft.division.clone();
        let directorate = draft.directorate.clone();
        let division = match &division_name {
            Some(name) => {
                resolve_lookup::<DivisionStore, _>(
                    conn,
                    name,
                    directorate.as_deref(),
                    row,
                    &mut warnings,
                    &mut lookups,
                )
                .await
            }
            None => None,
        };

        warnings.push(
            "Role not provided, defaulting to STAFF. Please review and update if necessary."
                .to_string(),
        );

        let mut user = draft.into_user(&pass.principal.user_id, pass.now);
        user.station_id = station.map(|s| s.entity.base.id.value().to_string());
        user.division_id = division.map(|d| d.entity.base.id.value().to_string());

        let initial = password::initial_password(&user.staff_id, &self.config.default_password_suffix);
        let password_hash = password::hash_password(&initial)?;

        let persisted: anyhow::Result<()> = async {
            users::insert(conn, &user, Some(&password_hash)).await?;
            users::insert_account_meta(conn, &user.id, pass.now).await
        }
        .await;
        if let Err(e) = persisted {
            tracing::error!("Database error creating user at row {}: {:#}", row, e);
            return Ok(RowOutcome::database_error(&e));
        }

        Ok(RowOutcome::Created {
            row: SuccessfulRow {
                row,
                user_id: user.id,
                employee_id: Some(user.employee_id),
                member_id: None,
                staff_id: user.staff_id,
                full_name: user.full_name,
                email: user.email,
                wallet_number: None,
                station: station_name,
                division: division_name,
                warnings,
            },
            lookups,
        })
    }

    async fn process_member<C>(
        &self,
        conn: &C,
        pass: &Pass<'_>,
        view: &RowView<'_>,
        row: usize,
    ) -> anyhow::Result<RowOutcome>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let cols = pass.columns;
        let staff_id = match required_text(view, &cols.staff_id) {
            Ok(staff_id) => staff_id,
            Err(failure) => return Ok(failure.into()),
        };

        let Some(mut user) = users::get_by_staff_id(conn, &staff_id).await? else {
            return Ok(RowOutcome::Skipped {
                reason: format!("User with Staff # \"{}\" not found in system", staff_id),
            });
        };

        if a003_member::repository::exists_for_user(conn, &user.id).await? {
            return Ok(RowOutcome::Skipped {
                reason: format!("User {} ({}) is already a member", user.full_name, staff_id),
            });
        }

        let mut warnings = Vec::new();
        let draft = MemberDraft::parse(view, cols, pass.now, &mut warnings);
        let mut lookups = Vec::new();

        if let Some(name) = &draft.station {
            if let Some(station) =
                resolve_lookup::<StationStore, _>(conn, name, None, row, &mut warnings, &mut lookups)
                    .await
            {
                user.station_id = Some(station.entity.base.id.value().to_string());
                warnings.push(format!("Updated user station to: \"{}\"", name));
            }
        }

        if let Some(name) = &draft.division {
            if let Some(division) = resolve_lookup::<DivisionStore, _>(
                conn,
                name,
                draft.directorate.as_deref(),
                row,
                &mut warnings,
                &mut lookups,
            )
            .await
            {
                user.division_id = Some(division.entity.base.id.value().to_string());
                user.directorate = division.entity.directorate.clone();
                warnings.push(format!("Updated user division to: \"{}\"", name));
            }
        }

        if let Some(email) = &draft.email {
            if users::email_taken(conn, email, Some(&user.id)).await? {
                warnings.push(format!(
                    "Email \"{}\" already exists for another user. Skipping email update.",
                    email
                ));
            } else {
                user.email = Some(email.clone());
                warnings.push(format!("Updated user email to: \"{}\"", email));
            }
        }
        user.updated_at = pass.now;

        let member = draft.to_member(&user.id);
        let persisted: anyhow::Result<a003_member::service::Enrolment> = async {
            users::update_links(conn, &user).await?;
            a003_member::service::enrol(
                conn,
                member,
                &user.staff_id,
                &self.config.wallet_prefix,
                pass.savings_rate_id.clone(),
                pass.now,
            )
            .await
        }
        .await;
        let enrolment = match persisted {
            Ok(enrolment) => enrolment,
            Err(e) => {
                tracing::error!("Database error enrolling member at row {}: {:#}", row, e);
                return Ok(RowOutcome::database_error(&e));
            }
        };

        Ok(RowOutcome::Created {
            row: SuccessfulRow {
                row,
                user_id: user.id,
                employee_id: None,
                member_id: Some(enrolment.member.id.value().to_string()),
                staff_id: user.staff_id,
                full_name: user.full_name,
                email: user.email,
                wallet_number: Some(enrolment.wallet.wallet_number),
                station: draft.station,
                division: draft.division,
                warnings,
            },
            lookups,
        })
    }
}

/// Get-or-create inside a savepoint. A store failure is logged and reported
/// as a warning; the row carries on without the link.
async fn resolve_lookup<S, C>(
    conn: &C,
    name: &str,
    directorate: Option<&str>,
    row: usize,
    warnings: &mut Vec<String>,
    created: &mut Vec<CreatedLookup>,
) -> Option<Resolved<S::Entity>>
where
    S: LookupStore,
    C: ConnectionTrait + TransactionTrait,
{
    let kind = S::KIND.as_str();
    let attempt: anyhow::Result<Resolved<S::Entity>> = async {
        let savepoint = conn.begin().await?;
        match lookup::get_or_create::<S, _>(&savepoint, name, directorate).await {
            Ok(resolved) => {
                savepoint.commit().await?;
                Ok(resolved)
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(e)
            }
        }
    }
    .await;

    match attempt {
        Ok(resolved) => {
            if resolved.created {
                let (id, code, entity_name) = S::identity(&resolved.entity);
                warnings.push(format!("Created new {}: \"{}\"", kind, name));
                created.push(CreatedLookup {
                    kind: S::KIND,
                    id,
                    code,
                    name: entity_name,
                    row,
                });
            }
            Some(resolved)
        }
        Err(e) => {
            tracing::error!("Error creating {} '{}' at row {}: {:#}", kind, name, row, e);
            warnings.push(format!("Could not create {}: \"{}\"", kind, name));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_station;
    use crate::shared::data::db::connect_in_memory;
    use crate::usecases::u501_import_roster::sheet::UploadFormat;
    use chrono::TimeZone;
    use contracts::domain::a004_interest_rate::aggregate::InterestRate;
    use contracts::usecases::u501_import_roster::LookupKind;

    fn csv(data: &str) -> UploadTable {
        UploadTable::read(UploadFormat::Csv, data.as_bytes().to_vec()).unwrap()
    }

    fn admin() -> Principal {
        Principal {
            user_id: "admin-id".into(),
            identity: "admin@ecg.com".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap()
    }

    fn importer(db: &DatabaseConnection, scope: TransactionScope) -> RosterImporter {
        let config = ImportConfig {
            transaction_scope: scope,
            ..ImportConfig::default()
        };
        RosterImporter::new(db.clone(), config)
    }

    const FIVE_ROWS: &str = "Staff #,Name,Email,Station\n\
        1001,Ama Mensah,ama@ecg.com,Accra Branch\n\
        ,Kofi Boateng,kofi@ecg.com,Accra Branch\n\
        1003,Yaw Asante,,\n\
        1001,Ama Mensah,ama@ecg.com,Accra Branch\n\
        1005,Esi Owusu,esi@ecg.com,Access Point\n";

    async fn assert_five_row_outcomes(scope: TransactionScope) {
        let db = connect_in_memory().await.unwrap();
        let report = importer(&db, scope)
            .import_at(ImportProfile::User, &csv(FIVE_ROWS), &admin(), now())
            .await
            .unwrap();

        let summary = &report.summary;
        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.total_processed, 5);
        assert_eq!(summary.successful, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.success_rate, "60.0%");
        assert_eq!(summary.imported_by, "admin@ecg.com");
        assert_eq!(report.row_numbers(), vec![2, 3, 4, 5, 6]);

        assert_eq!(report.failed[0].row, 3);
        assert_eq!(report.failed[0].error, "Staff # is required");
        assert_eq!(report.failed[0].data["Name"].as_deref(), Some("Kofi Boateng"));
        assert_eq!(report.failed[0].data["Staff #"], None);

        assert_eq!(report.skipped[0].row, 5);
        assert_eq!(
            report.skipped[0].reason,
            "Staff # \"1001\" already exists in system"
        );

        assert_eq!(
            summary.stations_created,
            vec!["Accra Branch".to_string(), "Access Point".to_string()]
        );
        let codes: Vec<&str> = report
            .created_lookups
            .iter()
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(codes, vec!["ACC", "ACC01"]);
        assert!(report
            .created_lookups
            .iter()
            .all(|l| l.kind == LookupKind::Station));

        let first = &report.successful[0];
        assert_eq!(first.staff_id, "1001");
        assert!(first.employee_id.is_some());
        assert_eq!(first.station.as_deref(), Some("Accra Branch"));
        assert!(first
            .warnings
            .contains(&"Created new station: \"Accra Branch\"".to_string()));
        assert!(report
            .warnings
            .contains(&"Created new station: \"Accra Branch\"".to_string()));

        assert_eq!(users::count_users(&db).await.unwrap(), 3);
        assert_eq!(a001_station::repository::list_all(&db).await.unwrap().len(), 2);

        let stored = users::get_by_staff_id(&db, "1001").await.unwrap().unwrap();
        assert_eq!(stored.email.as_deref(), Some("ama@ecg.com"));
        assert_eq!(stored.created_by.as_deref(), Some("admin-id"));
        assert!(stored.station_id.is_some());
        let hash = users::get_password_hash(&db, &stored.id).await.unwrap().unwrap();
        assert!(password::verify_password("1001@ECG2026", &hash).unwrap());
        assert!(users::get_account_meta(&db, &stored.id)
            .await
            .unwrap()
            .unwrap()
            .is_first_login);
    }

    #[tokio::test]
    async fn five_rows_per_row_transactions() {
        assert_five_row_outcomes(TransactionScope::Row).await;
    }

    #[tokio::test]
    async fn five_rows_single_batch_transaction() {
        assert_five_row_outcomes(TransactionScope::Batch).await;
    }

    async fn assert_insert_failure_isolated(scope: TransactionScope) {
        let db = connect_in_memory().await.unwrap();
        db.execute_unprepared(
            "CREATE TRIGGER reject_1002 BEFORE INSERT ON sys_users \
             WHEN NEW.staff_id = '1002' \
             BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .await
        .unwrap();

        let table = csv(
            "Staff #,Name,Station\n\
             1001,Ama,Alpha\n\
             1002,Kofi,Bravo\n\
             1003,Yaw,Charlie\n",
        );
        let report = importer(&db, scope)
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();

        assert_eq!(report.summary.successful, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.row_numbers(), vec![2, 3, 4]);

        let failed = &report.failed[0];
        assert_eq!(failed.row, 3);
        assert!(failed.error.starts_with("Database error: "));
        let database = &failed.field_errors["database"];
        assert!(database.starts_with("Failed to insert user"));
        assert_eq!(database.matches("boom").count(), 1);

        assert_eq!(
            report.summary.stations_created,
            vec!["Alpha".to_string(), "Charlie".to_string()]
        );
        let stations: Vec<String> = a001_station::repository::list_all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.base.name)
            .collect();
        assert_eq!(stations.len(), 2);
        assert!(!stations.contains(&"Bravo".to_string()));
        assert!(users::get_by_staff_id(&db, "1002").await.unwrap().is_none());
        assert_eq!(users::count_users(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_failure_rolls_back_row_per_row_transactions() {
        assert_insert_failure_isolated(TransactionScope::Row).await;
    }

    #[tokio::test]
    async fn insert_failure_rolls_back_row_single_batch_transaction() {
        assert_insert_failure_isolated(TransactionScope::Batch).await;
    }

    #[tokio::test]
    async fn rerun_skips_every_created_row() {
        let db = connect_in_memory().await.unwrap();
        let importer = importer(&db, TransactionScope::Row);
        let table = csv(FIVE_ROWS);

        importer
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();
        let second = importer
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();

        assert_eq!(second.summary.successful, 0);
        assert_eq!(second.summary.skipped, 4);
        assert_eq!(second.summary.failed, 1);
        assert!(second.summary.stations_created.is_empty());
        assert!(second.created_lookups.is_empty());
        assert_eq!(users::count_users(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn bad_and_duplicate_emails_are_dropped_with_warnings() {
        let db = connect_in_memory().await.unwrap();
        let table = csv(
            "Staff #,Name,Email\n\
             2001,Abena,abena-at-ecg\n\
             2002,Kwesi,shared@ecg.com\n\
             2003,Akua,shared@ecg.com\n",
        );
        let report = importer(&db, TransactionScope::Row)
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();

        assert_eq!(report.summary.successful, 3);
        assert!(report.successful[0].email.is_none());
        assert!(report.successful[0].warnings.contains(
            &"Invalid email format: \"abena-at-ecg\". Email field will be left blank.".to_string()
        ));
        assert_eq!(report.successful[1].email.as_deref(), Some("shared@ecg.com"));
        assert!(report.successful[2].email.is_none());
        assert!(report.successful[2].warnings.contains(
            &"Email \"shared@ecg.com\" already exists for another user. Email field will be left blank."
                .to_string()
        ));

        let stored = users::get_by_staff_id(&db, "2001").await.unwrap().unwrap();
        assert!(stored.email.is_none());
    }

    #[tokio::test]
    async fn missing_headers_abort_before_any_row() {
        let db = connect_in_memory().await.unwrap();
        let table = csv("Staff No,Email\n1,a@b.com\n");
        let err = importer(&db, TransactionScope::Row)
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Missing required headers: Staff #, Name");
        assert_eq!(users::count_users(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn division_takes_directorate_from_row() {
        let db = connect_in_memory().await.unwrap();
        let table = csv(
            "Staff #,Name,Division,Directorate\n\
             3001,Efua,Metering,Operations\n",
        );
        let report = importer(&db, TransactionScope::Row)
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();

        assert_eq!(report.summary.divisions_created, vec!["Metering".to_string()]);
        assert_eq!(report.created_lookups[0].code, "MET");
        let stored = users::get_by_staff_id(&db, "3001").await.unwrap().unwrap();
        assert_eq!(stored.directorate, "Operations");
        assert!(stored.division_id.is_some());
    }

    #[tokio::test]
    async fn member_profile_enrols_existing_users() {
        let db = connect_in_memory().await.unwrap();
        let importer = importer(&db, TransactionScope::Row);
        importer
            .import_at(
                ImportProfile::User,
                &csv("Staff #,Name\n4001,Ama\n4002,Kofi\n"),
                &admin(),
                now(),
            )
            .await
            .unwrap();

        let rate = InterestRate {
            id: "rate-1".into(),
            rate_type: RateType::Savings,
            rate: 2.5,
            is_active: true,
            effective_from: now(),
        };
        a004_interest_rate::repository::insert(&db, &rate).await.unwrap();

        let members = csv(
            "Staff #,Station,Division,Directorate,Email,Entrance Fee,Joined Date\n\
             4001,Tema,Finance,Corporate,ama@ecg.com,50,2024-01-15\n\
             4002,,,,,abc,\n\
             9999,,,,,,\n",
        );
        let report = importer
            .import_at(ImportProfile::Member, &members, &admin(), now())
            .await
            .unwrap();

        assert_eq!(report.summary.successful, 2);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.default_interest_rate, Some(2.5));
        assert_eq!(
            report.skipped[0].reason,
            "User with Staff # \"9999\" not found in system"
        );

        let ama = &report.successful[0];
        assert_eq!(ama.wallet_number.as_deref(), Some("CH40012603"));
        assert_eq!(ama.email.as_deref(), Some("ama@ecg.com"));
        assert!(ama.warnings.contains(&"Updated user station to: \"Tema\"".to_string()));
        assert!(ama.warnings.contains(&"Updated user division to: \"Finance\"".to_string()));
        assert!(ama.warnings.contains(&"Updated user email to: \"ama@ecg.com\"".to_string()));

        let kofi = &report.successful[1];
        assert!(kofi
            .warnings
            .contains(&"Invalid entrance fee value: \"abc\". Using 0.".to_string()));
        assert!(kofi
            .warnings
            .contains(&"Joined Date not provided. Using current date.".to_string()));

        let user = users::get_by_staff_id(&db, "4001").await.unwrap().unwrap();
        assert_eq!(user.directorate, "Corporate");
        assert_eq!(user.email.as_deref(), Some("ama@ecg.com"));
        let member = a003_member::repository::get_by_user_id(&db, &user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.entrance_fee, 50.0);
        let member_id = member.id.value().to_string();
        let savings = a003_member::repository::savings_for_member(&db, &member_id)
            .await
            .unwrap();
        assert_eq!(savings.len(), 1);
        assert_eq!(savings[0].interest_rate_id.as_deref(), Some("rate-1"));
        let wallets = a003_member::repository::wallets_for_member(&db, &member_id)
            .await
            .unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].wallet_number, "CH40012603");

        let again = importer
            .import_at(ImportProfile::Member, &members, &admin(), now())
            .await
            .unwrap();
        assert_eq!(again.summary.successful, 0);
        assert_eq!(again.skipped[0].reason, "User Ama (4001) is already a member");
    }

    #[tokio::test]
    async fn xlsx_upload_end_to_end() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Staff #", "Name", "Tel", "# of Dependents"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_number(1, 0, 5001.0).unwrap();
        sheet.write_string(1, 1, "Kojo  Antwi").unwrap();
        sheet.write_string(1, 2, "024 555 1234").unwrap();
        sheet.write_number(1, 3, 2.0).unwrap();
        let table = UploadTable::read(UploadFormat::Xlsx, workbook.save_to_buffer().unwrap()).unwrap();

        let db = connect_in_memory().await.unwrap();
        let report = importer(&db, TransactionScope::Row)
            .import_at(ImportProfile::User, &table, &admin(), now())
            .await
            .unwrap();

        assert_eq!(report.summary.successful, 1);
        assert_eq!(report.successful[0].full_name, "Kojo Antwi");
        let stored = users::get_by_staff_id(&db, "5001").await.unwrap().unwrap();
        assert_eq!(stored.phone_number, "+233245551234");
        assert_eq!(stored.number_of_dependents, 2);
    }
}
