//! SQL schema for the FlexCrew SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS teams (
    team_id  TEXT PRIMARY KEY,
    name     TEXT NOT NULL UNIQUE
);

-- current_employees is written only by an assignment commit.
-- version is bumped on every write to the row.
CREATE TABLE IF NOT EXISTS schedules (
    schedule_id       TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    start_time        TEXT NOT NULL,   -- HH:MM:SS
    end_time          TEXT NOT NULL,
    max_employees     INTEGER,         -- NULL reads as 0
    current_employees INTEGER,         -- NULL reads as 0
    version           INTEGER NOT NULL DEFAULT 0
);

-- team_id and schedule_id are weak references: no FOREIGN KEY, so deleting
-- a team or schedule never cascades into employees.
CREATE TABLE IF NOT EXISTS employees (
    employee_id    TEXT PRIMARY KEY,
    names          TEXT NOT NULL,
    first_surname  TEXT NOT NULL,
    second_surname TEXT,
    email          TEXT NOT NULL UNIQUE,
    password_hash  TEXT NOT NULL DEFAULT '',
    team_id        TEXT,
    schedule_id    TEXT
);

CREATE TABLE IF NOT EXISTS projects (
    project_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL DEFAULT 'OPEN',
    created_at  TEXT NOT NULL,     -- ISO 8601 UTC
    due_date    TEXT
);

CREATE TABLE IF NOT EXISTS project_required_teams (
    required_team_id TEXT PRIMARY KEY,
    project_id       TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    team_id          TEXT NOT NULL,
    required_count   INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS project_assignments (
    assignment_id TEXT PRIMARY KEY,
    project_id    TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    employee_id   TEXT NOT NULL,
    assigned_at   TEXT NOT NULL,
    notes         TEXT,
    UNIQUE (project_id, employee_id)
);

CREATE TABLE IF NOT EXISTS issues (
    issue_id      TEXT PRIMARY KEY,
    status        TEXT NOT NULL,     -- 'Punctual' | 'Late' | 'Early' | 'Missed' | ...
    delay_minutes INTEGER NOT NULL DEFAULT 0,
    description   TEXT
);

CREATE TABLE IF NOT EXISTS records (
    record_id   TEXT PRIMARY KEY,
    employee_id TEXT NOT NULL,
    schedule_id TEXT NOT NULL,
    issue_id    TEXT NOT NULL REFERENCES issues(issue_id),
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS employees_team_idx     ON employees(team_id);
CREATE INDEX IF NOT EXISTS employees_schedule_idx ON employees(schedule_id);
CREATE INDEX IF NOT EXISTS required_project_idx   ON project_required_teams(project_id);
CREATE INDEX IF NOT EXISTS assignment_project_idx ON project_assignments(project_id);
CREATE INDEX IF NOT EXISTS records_issue_idx      ON records(issue_id);

PRAGMA user_version = 1;
";
