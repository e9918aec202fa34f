//! [`SqliteLedger`] — the SQLite implementation of the ledger and registry
//! traits.
//!
//! Every mutating operation runs inside one IMMEDIATE transaction in a
//! single [`tokio_rusqlite::Connection::call`] closure: existence checks,
//! exclusivity pre-checks, temporal validation, then the write. The
//! pre-checks produce precise error kinds; the schema's unique indexes are
//! the authoritative guard, and a constraint hit behind a stale pre-check
//! surfaces as `ConcurrentConflict`.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use tenure_core::{
  Error as DomainError, Result,
  assignment::Assignment,
  directory::{HolderDirectory, HolderRecord, ResourceCatalog, ResourceRecord},
  holder::{Holder, HolderKind},
  interval::validate_interval,
  ledger::{AssignmentQuery, ReservationLedger, SupervisionLedger, SupervisionQuery},
  supervision::{Supervision, Theme},
};

use crate::{
  encode::{
    RawAssignment, RawHolderRecord, RawResource, RawSupervision, decode_date,
    encode_date, encode_dt, encode_uuid,
  },
  error::{domain, from_db, map_constraint},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tenure ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteLedger {
  conn: tokio_rusqlite::Connection,
}

impl SqliteLedger {
  /// Open (or create) a ledger at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(from_db)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory ledger — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(from_db)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(from_db)
  }

  async fn register_holder(
    &self,
    kind: HolderKind,
    code: &str,
    display_name: &str,
  ) -> Result<HolderRecord> {
    let table = registry_table(kind);
    let code = code.to_owned();
    let name = display_name.to_owned();
    let now_str = encode_dt(Utc::now());

    let raw: RawHolderRecord = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} (code, display_name, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET display_name = excluded.display_name"
          ),
          rusqlite::params![code, name, now_str],
        )?;
        let raw = conn.query_row(
          &format!("SELECT code, display_name, created_at FROM {table} WHERE code = ?1"),
          rusqlite::params![code],
          read_holder_row,
        )?;
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_record(kind)
  }

  async fn list_holders(&self, kind: HolderKind) -> Result<Vec<HolderRecord>> {
    let table = registry_table(kind);

    let raws: Vec<RawHolderRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT code, display_name, created_at FROM {table} ORDER BY code"
        ))?;
        let rows = stmt
          .query_map([], read_holder_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(|raw| raw.into_record(kind)).collect()
  }
}

// ─── ReservationLedger impl ──────────────────────────────────────────────────

impl ReservationLedger for SqliteLedger {
  async fn reserve(
    &self,
    resource: &str,
    holder: Holder,
    assigned_on: NaiveDate,
  ) -> Result<Assignment> {
    let assignment = Assignment {
      assignment_id: Uuid::new_v4(),
      resource_code: resource.to_owned(),
      holder,
      assigned_on,
      returned_on: None,
      recorded_at: Utc::now(),
    };

    let id_str       = encode_uuid(assignment.assignment_id);
    let resource     = assignment.resource_code.clone();
    let kind         = assignment.holder.kind();
    let code         = assignment.holder.code().to_owned();
    let holder       = assignment.holder.clone();
    let assigned_str = encode_date(assignment.assigned_on);
    let recorded_str = encode_dt(assignment.recorded_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !holder_registered(&tx, kind, &code)? {
          return Err(domain(DomainError::UnknownHolder(holder)));
        }
        if !resource_registered(&tx, &resource)? {
          return Err(domain(DomainError::UnknownResource(resource)));
        }
        if open_assignment_exists(&tx, &resource, None)? {
          return Err(domain(DomainError::ResourceBusy { resource }));
        }
        if assignment_row(&tx, &resource, kind, &code)?.is_some() {
          return Err(domain(DomainError::DuplicateAssignment { resource, holder }));
        }

        tx.execute(
          "INSERT INTO assignments
             (assignment_id, resource_code, holder_kind, holder_code,
              assigned_on, returned_on, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
          rusqlite::params![
            id_str,
            resource,
            kind.as_str(),
            code,
            assigned_str,
            recorded_str,
          ],
        )
        .map_err(map_constraint)?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_db)?;

    Ok(assignment)
  }

  async fn close(
    &self,
    resource: &str,
    holder: &Holder,
    returned_on: NaiveDate,
  ) -> Result<Assignment> {
    let resource     = resource.to_owned();
    let kind         = holder.kind();
    let code         = holder.code().to_owned();
    let holder       = holder.clone();
    let returned_str = encode_date(returned_on);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut raw) = assignment_row(&tx, &resource, kind, &code)? else {
          return Err(domain(DomainError::AssignmentNotFound { resource, holder }));
        };

        let assigned_on = decode_date(&raw.assigned_on).map_err(domain)?;
        validate_interval(assigned_on, Some(returned_on)).map_err(domain)?;

        tx.execute(
          "UPDATE assignments SET returned_on = ?1 WHERE assignment_id = ?2",
          rusqlite::params![returned_str, raw.assignment_id],
        )?;

        tx.commit()?;
        raw.returned_on = Some(returned_str);
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_assignment()
  }

  async fn reopen(&self, resource: &str, holder: &Holder) -> Result<Assignment> {
    let resource = resource.to_owned();
    let kind     = holder.kind();
    let code     = holder.code().to_owned();
    let holder   = holder.clone();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut raw) = assignment_row(&tx, &resource, kind, &code)? else {
          return Err(domain(DomainError::AssignmentNotFound { resource, holder }));
        };

        if open_assignment_exists(&tx, &resource, Some(&raw.assignment_id))? {
          return Err(domain(DomainError::ResourceBusy { resource }));
        }

        tx.execute(
          "UPDATE assignments SET returned_on = NULL WHERE assignment_id = ?1",
          rusqlite::params![raw.assignment_id],
        )
        .map_err(map_constraint)?;

        tx.commit()?;
        raw.returned_on = None;
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_assignment()
  }

  async fn delete(&self, resource: &str, holder: &Holder) -> Result<()> {
    let resource = resource.to_owned();
    let kind     = holder.kind();
    let code     = holder.code().to_owned();
    let holder   = holder.clone();

    self
      .conn
      .call(move |conn| {
        let deleted = conn.execute(
          "DELETE FROM assignments
           WHERE resource_code = ?1 AND holder_kind = ?2 AND holder_code = ?3",
          rusqlite::params![resource, kind.as_str(), code],
        )?;
        if deleted == 0 {
          return Err(domain(DomainError::AssignmentNotFound { resource, holder }));
        }
        Ok(())
      })
      .await
      .map_err(from_db)
  }

  async fn list_open_for(&self, resource: &str) -> Result<Vec<Assignment>> {
    let resource = resource.to_owned();

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT assignment_id, resource_code, holder_kind, holder_code,
                  assigned_on, returned_on, recorded_at
           FROM assignments
           WHERE resource_code = ?1 AND returned_on IS NULL
           ORDER BY recorded_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![resource], read_assignment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn assignment_history(&self, query: &AssignmentQuery) -> Result<Vec<Assignment>> {
    let resource = query.resource.clone();
    let kind_str = query.holder_kind.map(HolderKind::as_str).map(str::to_owned);
    let code     = query.holder_code.clone();
    let limit    = query.limit.unwrap_or(100) as i64;
    let offset   = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; ?4/?5 anchor the parameter count.
        let mut conds: Vec<&'static str> = vec![];
        if resource.is_some() {
          conds.push("resource_code = ?1");
        }
        if kind_str.is_some() {
          conds.push("holder_kind = ?2");
        }
        if code.is_some() {
          conds.push("holder_code = ?3");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT assignment_id, resource_code, holder_kind, holder_code,
                  assigned_on, returned_on, recorded_at
           FROM assignments
           {where_clause}
           ORDER BY recorded_at
           LIMIT ?4 OFFSET ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              resource.as_deref(),
              kind_str.as_deref(),
              code.as_deref(),
              limit,
              offset,
            ],
            read_assignment_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }
}

// ─── SupervisionLedger impl ──────────────────────────────────────────────────

impl SupervisionLedger for SqliteLedger {
  async fn create_supervision(
    &self,
    researcher: &str,
    student: &str,
    started_on: NaiveDate,
    theme: Theme,
  ) -> Result<Supervision> {
    let supervision = Supervision {
      supervision_id:  Uuid::new_v4(),
      researcher_code: researcher.to_owned(),
      student_code:    student.to_owned(),
      started_on,
      ended_on: None,
      theme,
      recorded_at: Utc::now(),
    };

    let id_str       = encode_uuid(supervision.supervision_id);
    let researcher   = supervision.researcher_code.clone();
    let student      = supervision.student_code.clone();
    let started_str  = encode_date(started_on);
    let theme_str    = supervision.theme.as_str().to_owned();
    let recorded_str = encode_dt(supervision.recorded_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !holder_registered(&tx, HolderKind::Researcher, &researcher)? {
          return Err(domain(DomainError::UnknownHolder(Holder::Researcher(
            researcher,
          ))));
        }
        if !holder_registered(&tx, HolderKind::DoctoralStudent, &student)? {
          return Err(domain(DomainError::UnknownHolder(Holder::DoctoralStudent(
            student,
          ))));
        }
        if supervision_row(&tx, &researcher, &student)?.is_some() {
          return Err(domain(DomainError::SupervisionAlreadyRecorded {
            researcher,
            student,
          }));
        }
        if researcher_has_open(&tx, &researcher, None)? {
          return Err(domain(DomainError::ResearcherAlreadySupervising { researcher }));
        }
        if student_has_open(&tx, &student, None)? {
          return Err(domain(DomainError::StudentAlreadySupervised { student }));
        }

        tx.execute(
          "INSERT INTO supervisions
             (supervision_id, researcher_code, student_code,
              started_on, ended_on, theme, recorded_at)
           VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6)",
          rusqlite::params![id_str, researcher, student, started_str, theme_str, recorded_str],
        )
        .map_err(map_constraint)?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_db)?;

    Ok(supervision)
  }

  async fn close_supervision(
    &self,
    researcher: &str,
    student: &str,
    ended_on: NaiveDate,
  ) -> Result<Supervision> {
    let researcher = researcher.to_owned();
    let student    = student.to_owned();
    let ended_str  = encode_date(ended_on);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut raw) = supervision_row(&tx, &researcher, &student)? else {
          return Err(domain(DomainError::SupervisionNotFound { researcher, student }));
        };

        let started_on = decode_date(&raw.started_on).map_err(domain)?;
        validate_interval(started_on, Some(ended_on)).map_err(domain)?;

        tx.execute(
          "UPDATE supervisions SET ended_on = ?1 WHERE supervision_id = ?2",
          rusqlite::params![ended_str, raw.supervision_id],
        )?;

        tx.commit()?;
        raw.ended_on = Some(ended_str);
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_supervision()
  }

  async fn reopen_supervision(&self, researcher: &str, student: &str) -> Result<Supervision> {
    let researcher = researcher.to_owned();
    let student    = student.to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut raw) = supervision_row(&tx, &researcher, &student)? else {
          return Err(domain(DomainError::SupervisionNotFound { researcher, student }));
        };

        if researcher_has_open(&tx, &researcher, Some(&raw.supervision_id))? {
          return Err(domain(DomainError::ResearcherAlreadySupervising { researcher }));
        }
        if student_has_open(&tx, &student, Some(&raw.supervision_id))? {
          return Err(domain(DomainError::StudentAlreadySupervised { student }));
        }

        tx.execute(
          "UPDATE supervisions SET ended_on = NULL WHERE supervision_id = ?1",
          rusqlite::params![raw.supervision_id],
        )
        .map_err(map_constraint)?;

        tx.commit()?;
        raw.ended_on = None;
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_supervision()
  }

  async fn update_theme(
    &self,
    researcher: &str,
    student: &str,
    theme: Theme,
  ) -> Result<Supervision> {
    let researcher = researcher.to_owned();
    let student    = student.to_owned();
    let theme_str  = theme.as_str().to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut raw) = supervision_row(&tx, &researcher, &student)? else {
          return Err(domain(DomainError::SupervisionNotFound { researcher, student }));
        };

        tx.execute(
          "UPDATE supervisions SET theme = ?1 WHERE supervision_id = ?2",
          rusqlite::params![theme_str, raw.supervision_id],
        )?;

        tx.commit()?;
        raw.theme = theme_str;
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_supervision()
  }

  async fn delete_supervision(&self, researcher: &str, student: &str) -> Result<()> {
    let researcher = researcher.to_owned();
    let student    = student.to_owned();

    self
      .conn
      .call(move |conn| {
        let deleted = conn.execute(
          "DELETE FROM supervisions WHERE researcher_code = ?1 AND student_code = ?2",
          rusqlite::params![researcher, student],
        )?;
        if deleted == 0 {
          return Err(domain(DomainError::SupervisionNotFound { researcher, student }));
        }
        Ok(())
      })
      .await
      .map_err(from_db)
  }

  async fn open_for_researcher(&self, researcher: &str) -> Result<Vec<Supervision>> {
    self
      .open_supervisions("researcher_code", researcher.to_owned())
      .await
  }

  async fn open_for_student(&self, student: &str) -> Result<Vec<Supervision>> {
    self
      .open_supervisions("student_code", student.to_owned())
      .await
  }

  async fn supervision_history(&self, query: &SupervisionQuery) -> Result<Vec<Supervision>> {
    let researcher = query.researcher.clone();
    let student    = query.student.clone();
    let limit      = query.limit.unwrap_or(100) as i64;
    let offset     = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawSupervision> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if researcher.is_some() {
          conds.push("researcher_code = ?1");
        }
        if student.is_some() {
          conds.push("student_code = ?2");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT supervision_id, researcher_code, student_code,
                  started_on, ended_on, theme, recorded_at
           FROM supervisions
           {where_clause}
           ORDER BY recorded_at
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![researcher.as_deref(), student.as_deref(), limit, offset],
            read_supervision_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(RawSupervision::into_supervision).collect()
  }
}

impl SqliteLedger {
  async fn open_supervisions(
    &self,
    column: &'static str,
    code: String,
  ) -> Result<Vec<Supervision>> {
    let raws: Vec<RawSupervision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT supervision_id, researcher_code, student_code,
                  started_on, ended_on, theme, recorded_at
           FROM supervisions
           WHERE {column} = ?1 AND ended_on IS NULL
           ORDER BY recorded_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![code], read_supervision_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(RawSupervision::into_supervision).collect()
  }
}

// ─── HolderDirectory impl ────────────────────────────────────────────────────

impl HolderDirectory for SqliteLedger {
  async fn lookup_holder(&self, holder: &Holder) -> Result<Option<HolderRecord>> {
    let kind  = holder.kind();
    let code  = holder.code().to_owned();
    let table = registry_table(kind);

    let raw: Option<RawHolderRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT code, display_name, created_at FROM {table} WHERE code = ?1"),
              rusqlite::params![code],
              read_holder_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(from_db)?;

    raw.map(|raw| raw.into_record(kind)).transpose()
  }

  async fn register_researcher(&self, code: &str, display_name: &str) -> Result<HolderRecord> {
    self
      .register_holder(HolderKind::Researcher, code, display_name)
      .await
  }

  async fn register_student(&self, code: &str, display_name: &str) -> Result<HolderRecord> {
    self
      .register_holder(HolderKind::DoctoralStudent, code, display_name)
      .await
  }

  async fn list_researchers(&self) -> Result<Vec<HolderRecord>> {
    self.list_holders(HolderKind::Researcher).await
  }

  async fn list_students(&self) -> Result<Vec<HolderRecord>> {
    self.list_holders(HolderKind::DoctoralStudent).await
  }
}

// ─── ResourceCatalog impl ────────────────────────────────────────────────────

impl ResourceCatalog for SqliteLedger {
  async fn lookup_resource(&self, code: &str) -> Result<Option<ResourceRecord>> {
    let code = code.to_owned();

    let raw: Option<RawResource> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT code, label, created_at FROM resources WHERE code = ?1",
              rusqlite::params![code],
              read_resource_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(from_db)?;

    raw.map(RawResource::into_record).transpose()
  }

  async fn register_resource(&self, code: &str, label: &str) -> Result<ResourceRecord> {
    let code    = code.to_owned();
    let label   = label.to_owned();
    let now_str = encode_dt(Utc::now());

    let raw: RawResource = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO resources (code, label, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(code) DO UPDATE SET label = excluded.label",
          rusqlite::params![code, label, now_str],
        )?;
        let raw = conn.query_row(
          "SELECT code, label, created_at FROM resources WHERE code = ?1",
          rusqlite::params![code],
          read_resource_row,
        )?;
        Ok(raw)
      })
      .await
      .map_err(from_db)?;

    raw.into_record()
  }

  async fn list_resources(&self) -> Result<Vec<ResourceRecord>> {
    let raws: Vec<RawResource> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT code, label, created_at FROM resources ORDER BY code")?;
        let rows = stmt
          .query_map([], read_resource_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(from_db)?;

    raws.into_iter().map(RawResource::into_record).collect()
  }
}

// ─── In-transaction helpers ──────────────────────────────────────────────────

fn registry_table(kind: HolderKind) -> &'static str {
  match kind {
    HolderKind::Researcher => "researchers",
    HolderKind::DoctoralStudent => "doctoral_students",
  }
}

fn holder_registered(
  conn: &rusqlite::Connection,
  kind: HolderKind,
  code: &str,
) -> rusqlite::Result<bool> {
  let table = registry_table(kind);
  let found: Option<bool> = conn
    .query_row(
      &format!("SELECT 1 FROM {table} WHERE code = ?1"),
      rusqlite::params![code],
      |_| Ok(true),
    )
    .optional()?;
  Ok(found.unwrap_or(false))
}

fn resource_registered(conn: &rusqlite::Connection, code: &str) -> rusqlite::Result<bool> {
  let found: Option<bool> = conn
    .query_row(
      "SELECT 1 FROM resources WHERE code = ?1",
      rusqlite::params![code],
      |_| Ok(true),
    )
    .optional()?;
  Ok(found.unwrap_or(false))
}

/// Is there an open assignment for `resource`, under either holder kind,
/// excluding the row being updated?
fn open_assignment_exists(
  conn: &rusqlite::Connection,
  resource: &str,
  exclude: Option<&str>,
) -> rusqlite::Result<bool> {
  let found: Option<bool> = match exclude {
    Some(assignment_id) => conn
      .query_row(
        "SELECT 1 FROM assignments
         WHERE resource_code = ?1 AND returned_on IS NULL AND assignment_id != ?2
         LIMIT 1",
        rusqlite::params![resource, assignment_id],
        |_| Ok(true),
      )
      .optional()?,
    None => conn
      .query_row(
        "SELECT 1 FROM assignments
         WHERE resource_code = ?1 AND returned_on IS NULL
         LIMIT 1",
        rusqlite::params![resource],
        |_| Ok(true),
      )
      .optional()?,
  };
  Ok(found.unwrap_or(false))
}

fn researcher_has_open(
  conn: &rusqlite::Connection,
  researcher: &str,
  exclude: Option<&str>,
) -> rusqlite::Result<bool> {
  let found: Option<bool> = match exclude {
    Some(supervision_id) => conn
      .query_row(
        "SELECT 1 FROM supervisions
         WHERE researcher_code = ?1 AND ended_on IS NULL AND supervision_id != ?2
         LIMIT 1",
        rusqlite::params![researcher, supervision_id],
        |_| Ok(true),
      )
      .optional()?,
    None => conn
      .query_row(
        "SELECT 1 FROM supervisions
         WHERE researcher_code = ?1 AND ended_on IS NULL
         LIMIT 1",
        rusqlite::params![researcher],
        |_| Ok(true),
      )
      .optional()?,
  };
  Ok(found.unwrap_or(false))
}

fn student_has_open(
  conn: &rusqlite::Connection,
  student: &str,
  exclude: Option<&str>,
) -> rusqlite::Result<bool> {
  let found: Option<bool> = match exclude {
    Some(supervision_id) => conn
      .query_row(
        "SELECT 1 FROM supervisions
         WHERE student_code = ?1 AND ended_on IS NULL AND supervision_id != ?2
         LIMIT 1",
        rusqlite::params![student, supervision_id],
        |_| Ok(true),
      )
      .optional()?,
    None => conn
      .query_row(
        "SELECT 1 FROM supervisions
         WHERE student_code = ?1 AND ended_on IS NULL
         LIMIT 1",
        rusqlite::params![student],
        |_| Ok(true),
      )
      .optional()?,
  };
  Ok(found.unwrap_or(false))
}

fn assignment_row(
  conn: &rusqlite::Connection,
  resource: &str,
  kind: HolderKind,
  code: &str,
) -> rusqlite::Result<Option<RawAssignment>> {
  conn
    .query_row(
      "SELECT assignment_id, resource_code, holder_kind, holder_code,
              assigned_on, returned_on, recorded_at
       FROM assignments
       WHERE resource_code = ?1 AND holder_kind = ?2 AND holder_code = ?3",
      rusqlite::params![resource, kind.as_str(), code],
      read_assignment_row,
    )
    .optional()
}

fn supervision_row(
  conn: &rusqlite::Connection,
  researcher: &str,
  student: &str,
) -> rusqlite::Result<Option<RawSupervision>> {
  conn
    .query_row(
      "SELECT supervision_id, researcher_code, student_code,
              started_on, ended_on, theme, recorded_at
       FROM supervisions
       WHERE researcher_code = ?1 AND student_code = ?2",
      rusqlite::params![researcher, student],
      read_supervision_row,
    )
    .optional()
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_assignment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAssignment> {
  Ok(RawAssignment {
    assignment_id: row.get(0)?,
    resource_code: row.get(1)?,
    holder_kind:   row.get(2)?,
    holder_code:   row.get(3)?,
    assigned_on:   row.get(4)?,
    returned_on:   row.get(5)?,
    recorded_at:   row.get(6)?,
  })
}

fn read_supervision_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSupervision> {
  Ok(RawSupervision {
    supervision_id:  row.get(0)?,
    researcher_code: row.get(1)?,
    student_code:    row.get(2)?,
    started_on:      row.get(3)?,
    ended_on:        row.get(4)?,
    theme:           row.get(5)?,
    recorded_at:     row.get(6)?,
  })
}

fn read_holder_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawHolderRecord> {
  Ok(RawHolderRecord {
    code:         row.get(0)?,
    display_name: row.get(1)?,
    created_at:   row.get(2)?,
  })
}

fn read_resource_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawResource> {
  Ok(RawResource {
    code:       row.get(0)?,
    label:      row.get(1)?,
    created_at: row.get(2)?,
  })
}
