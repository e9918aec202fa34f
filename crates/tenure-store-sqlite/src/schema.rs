//! SQL schema for the Tenure SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.
//!
//! The exclusivity invariants live here, not in application code:
//!
//! - `assignments_open_idx` — at most one open assignment per resource,
//!   across both holder kinds (one table, `holder_kind` discriminator);
//! - the `assignments` UNIQUE — a `(holder, resource)` pair is recorded at
//!   most once, open or closed;
//! - `supervisions_open_researcher_idx` / `supervisions_open_student_idx` —
//!   at most one open supervision per researcher and per student;
//! - the `supervisions` UNIQUE — a pair is recorded at most once.
//!
//! A write that violates one of these fails atomically inside its
//! transaction, which is what closes the check-then-act race between
//! concurrent writers.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS researchers (
    code          TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS doctoral_students (
    code          TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS resources (
    code          TEXT PRIMARY KEY,
    label         TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assignments (
    assignment_id TEXT PRIMARY KEY,
    resource_code TEXT NOT NULL REFERENCES resources(code),
    holder_kind   TEXT NOT NULL,   -- 'researcher' | 'doctoral_student'
    holder_code   TEXT NOT NULL,
    assigned_on   TEXT NOT NULL,   -- ISO 8601 date
    returned_on   TEXT,            -- NULL while the resource is held
    recorded_at   TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    UNIQUE (resource_code, holder_kind, holder_code)
);

-- One open assignment per resource, either holder kind.
CREATE UNIQUE INDEX IF NOT EXISTS assignments_open_idx
    ON assignments(resource_code) WHERE returned_on IS NULL;

CREATE TABLE IF NOT EXISTS supervisions (
    supervision_id  TEXT PRIMARY KEY,
    researcher_code TEXT NOT NULL REFERENCES researchers(code),
    student_code    TEXT NOT NULL REFERENCES doctoral_students(code),
    started_on      TEXT NOT NULL,
    ended_on        TEXT,          -- NULL while the supervision is active
    theme           TEXT NOT NULL,
    recorded_at     TEXT NOT NULL,
    UNIQUE (researcher_code, student_code)
);

-- One active supervision per researcher, and one per student.
CREATE UNIQUE INDEX IF NOT EXISTS supervisions_open_researcher_idx
    ON supervisions(researcher_code) WHERE ended_on IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS supervisions_open_student_idx
    ON supervisions(student_code) WHERE ended_on IS NULL;

CREATE INDEX IF NOT EXISTS assignments_resource_idx
    ON assignments(resource_code);
CREATE INDEX IF NOT EXISTS assignments_holder_idx
    ON assignments(holder_kind, holder_code);
CREATE INDEX IF NOT EXISTS supervisions_researcher_idx
    ON supervisions(researcher_code);
CREATE INDEX IF NOT EXISTS supervisions_student_idx
    ON supervisions(student_code);

PRAGMA user_version = 1;
";
