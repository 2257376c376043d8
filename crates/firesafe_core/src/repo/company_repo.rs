//! Company record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist companies with their nested equipment.
//! - Keep SQL details and result ordering inside the persistence boundary.
//!
//! # Invariants
//! - Every read and mutation is scoped by owner; no statement touches rows of
//!   another owner.
//! - Company names are unique per owner.
//! - `find_by_owner` order: `registered_at ASC, name ASC, id ASC`; equipment
//!   keeps insertion `position` order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{ensure_schema_ready, DbError};
use crate::model::company::{
    normalize_text, Company, CompanyId, CompanyRecord, CompanyValidationError, OwnerId,
};
use crate::model::equipment::{
    EquipmentItem, EquipmentKind, ExtinguisherAgent, Measure, NewEquipmentItem,
};
use chrono::NaiveDate;
use log::{error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

const COMPANY_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.owner AS owner,
    c.name AS name,
    c.address AS address,
    c.city AS city,
    c.registered_at AS registered_at,
    e.position AS position,
    e.kind AS kind,
    e.agent AS agent,
    e.measure AS measure,
    e.quantity AS quantity,
    e.registered_at AS equipment_registered_at,
    e.expires_at AS expires_at
FROM companies c
LEFT JOIN equipment e ON e.company_id = c.id";

const COMPANY_ORDER_SQL: &str =
    "ORDER BY c.registered_at ASC, c.name ASC, c.id ASC, e.position ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for company persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CompanyValidationError),
    /// Store unreachable or SQL failure.
    Db(DbError),
    /// Company does not exist for the requesting owner.
    NotFound(CompanyId),
    /// The owner already has a company with this normalized name.
    DuplicateName(String),
    /// Persisted data cannot be converted to a valid company.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "company not found: {id}"),
            Self::DuplicateName(name) => {
                write!(f, "a company named `{name}` is already registered")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted company data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompanyValidationError> for RepoError {
    fn from(value: CompanyValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store interface consumed by company and report services.
pub trait CompanyRepository {
    /// Inserts one company with all of its equipment atomically.
    fn insert_company(&mut self, company: &Company) -> RepoResult<CompanyId>;
    /// Lists every company of `owner` with equipment, in stable order.
    fn find_by_owner(&self, owner: &OwnerId) -> RepoResult<Vec<Company>>;
    /// Loads one company if it exists and belongs to `owner`.
    fn get_company(&self, id: CompanyId, owner: &OwnerId) -> RepoResult<Option<Company>>;
    /// Appends equipment after the existing items of an owned company.
    fn append_equipment(
        &mut self,
        id: CompanyId,
        owner: &OwnerId,
        items: &[EquipmentItem],
    ) -> RepoResult<()>;
    /// Deletes the owner's company with this name; returns rows removed.
    fn delete_by_name_and_owner(&mut self, name: &str, owner: &OwnerId) -> RepoResult<usize>;
    /// Deletes the owner's company with this id; returns rows removed.
    fn delete_by_id_and_owner(&mut self, id: CompanyId, owner: &OwnerId) -> RepoResult<usize>;
}

/// SQLite-backed company store.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_company_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn insert_company(&mut self, company: &Company) -> RepoResult<CompanyId> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let duplicate: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM companies WHERE owner = ?1 AND name = ?2
            );",
            params![company.owner().as_str(), company.name()],
            |row| row.get(0),
        )?;
        if duplicate == 1 {
            return Err(RepoError::DuplicateName(company.name().to_string()));
        }

        tx.execute(
            "INSERT INTO companies (
                id,
                owner,
                name,
                address,
                city,
                registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                company.id().to_string(),
                company.owner().as_str(),
                company.name(),
                company.address(),
                company.city(),
                company.registered_at(),
            ],
        )?;
        insert_equipment_rows(&tx, company.id(), 0, company.equipment())?;
        tx.commit()?;

        info!(
            "event=company_insert module=repo status=ok company_id={} equipment_count={} duration_ms={}",
            company.id(),
            company.equipment().len(),
            started_at.elapsed().as_millis()
        );
        Ok(company.id())
    }

    fn find_by_owner(&self, owner: &OwnerId) -> RepoResult<Vec<Company>> {
        let companies = query_companies(
            self.conn,
            "WHERE c.owner = ?",
            vec![Value::Text(owner.as_str().to_string())],
        )?;
        info!(
            "event=company_find module=repo status=ok company_count={}",
            companies.len()
        );
        Ok(companies)
    }

    fn get_company(&self, id: CompanyId, owner: &OwnerId) -> RepoResult<Option<Company>> {
        let mut companies = query_companies(
            self.conn,
            "WHERE c.owner = ? AND c.id = ?",
            vec![
                Value::Text(owner.as_str().to_string()),
                Value::Text(id.to_string()),
            ],
        )?;
        Ok(companies.pop())
    }

    fn append_equipment(
        &mut self,
        id: CompanyId,
        owner: &OwnerId,
        items: &[EquipmentItem],
    ) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owned: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM companies WHERE id = ?1 AND owner = ?2
            );",
            params![id.to_string(), owner.as_str()],
            |row| row.get(0),
        )?;
        if owned == 0 {
            return Err(RepoError::NotFound(id));
        }

        let next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM equipment WHERE company_id = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        insert_equipment_rows(&tx, id, next_position, items)?;
        tx.commit()?;

        info!(
            "event=equipment_append module=repo status=ok company_id={} equipment_count={}",
            id,
            items.len()
        );
        Ok(())
    }

    fn delete_by_name_and_owner(&mut self, name: &str, owner: &OwnerId) -> RepoResult<usize> {
        let Some(normalized) = normalize_text(name) else {
            return Ok(0);
        };

        let deleted = self.conn.execute(
            "DELETE FROM companies WHERE owner = ?1 AND name = ?2;",
            params![owner.as_str(), normalized],
        )?;
        log_delete("name", deleted);
        Ok(deleted)
    }

    fn delete_by_id_and_owner(&mut self, id: CompanyId, owner: &OwnerId) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM companies WHERE owner = ?1 AND id = ?2;",
            params![owner.as_str(), id.to_string()],
        )?;
        log_delete("id", deleted);
        Ok(deleted)
    }
}

fn log_delete(lookup: &str, deleted: usize) {
    match deleted {
        0 => info!("event=company_delete module=repo status=ok lookup={lookup} deleted_count=0"),
        1 => info!("event=company_delete module=repo status=ok lookup={lookup} deleted_count=1"),
        other => warn!(
            "event=company_delete module=repo status=ok lookup={lookup} deleted_count={other}"
        ),
    }
}

fn insert_equipment_rows(
    tx: &Transaction<'_>,
    company_id: CompanyId,
    first_position: i64,
    items: &[EquipmentItem],
) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO equipment (
            company_id,
            position,
            kind,
            agent,
            measure,
            quantity,
            registered_at,
            expires_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
    )?;

    let company_id = company_id.to_string();
    for (offset, item) in (0_i64..).zip(items) {
        stmt.execute(params![
            company_id.as_str(),
            first_position + offset,
            item.kind().as_str(),
            item.agent().map(ExtinguisherAgent::as_str),
            item.capacity_or_length().to_string(),
            i64::from(item.quantity()),
            item.registered_at(),
            item.explicit_expiration(),
        ])?;
    }
    Ok(())
}

fn query_companies(
    conn: &Connection,
    where_sql: &str,
    bind_values: Vec<Value>,
) -> RepoResult<Vec<Company>> {
    let sql = format!("{COMPANY_SELECT_SQL} {where_sql} {COMPANY_ORDER_SQL};");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;

    let mut companies = Vec::new();
    let mut current: Option<CompanyRecord> = None;

    while let Some(row) = rows.next()? {
        let id = parse_company_id(row)?;
        if current.as_ref().map(|record| record.id) != Some(id) {
            if let Some(done) = current.take() {
                companies.push(finish_company(done)?);
            }
            current = Some(parse_company_row(row, id)?);
        }

        if let Some(item) = parse_equipment_columns(row)? {
            if let Some(record) = current.as_mut() {
                record.equipment.push(item);
            }
        }
    }
    if let Some(done) = current.take() {
        companies.push(finish_company(done)?);
    }

    Ok(companies)
}

fn finish_company(record: CompanyRecord) -> RepoResult<Company> {
    let id = record.id;
    Company::try_new(record)
        .map_err(|err| RepoError::InvalidData(format!("company {id} failed validation: {err}")))
}

fn parse_company_id(row: &Row<'_>) -> RepoResult<CompanyId> {
    let id_text: String = row.get("id")?;
    Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in companies.id"))
    })
}

fn parse_company_row(row: &Row<'_>, id: CompanyId) -> RepoResult<CompanyRecord> {
    let owner_text: String = row.get("owner")?;
    let owner = OwnerId::new(owner_text)
        .map_err(|_| RepoError::InvalidData(format!("blank owner on company {id}")))?;

    Ok(CompanyRecord {
        id,
        name: row.get("name")?,
        address: row.get("address")?,
        city: row.get("city")?,
        owner,
        registered_at: row.get("registered_at")?,
        equipment: Vec::new(),
    })
}

fn parse_equipment_columns(row: &Row<'_>) -> RepoResult<Option<EquipmentItem>> {
    if row.get::<_, Option<i64>>("position")?.is_none() {
        return Ok(None);
    }

    let kind_text: String = row.get("kind")?;
    let kind = EquipmentKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid equipment kind `{kind_text}` in equipment.kind"))
    })?;

    let agent = match row.get::<_, Option<String>>("agent")? {
        Some(value) => Some(ExtinguisherAgent::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid agent `{value}` in equipment.agent"))
        })?),
        None => None,
    };

    let measure_text: String = row.get("measure")?;
    let measure = measure_text.parse::<Measure>().map_err(|err| {
        RepoError::InvalidData(format!("{err} in equipment.measure"))
    })?;

    let quantity_raw: i64 = row.get("quantity")?;
    let quantity = u32::try_from(quantity_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid quantity `{quantity_raw}` in equipment.quantity"
        ))
    })?;

    let registered_at: NaiveDate = row.get("equipment_registered_at")?;
    let expiration: Option<NaiveDate> = row.get("expires_at")?;

    let item = EquipmentItem::try_new(NewEquipmentItem {
        kind,
        agent,
        capacity_or_length: measure,
        quantity,
        registered_at,
        expiration,
    })
    .map_err(|err| RepoError::InvalidData(format!("invalid equipment row: {err}")))?;
    Ok(Some(item))
}

fn ensure_company_connection_ready(conn: &Connection) -> RepoResult<()> {
    ensure_schema_ready(conn).map_err(|err| {
        error!("event=repo_init module=repo status=error error={err}");
        RepoError::Db(err)
    })
}
