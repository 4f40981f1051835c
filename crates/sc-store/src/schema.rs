//! Database schema, applied idempotently when a store is opened.

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS scenarios (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    pediatric   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS baselines (
    scenario_id      INTEGER PRIMARY KEY REFERENCES scenarios(id) ON DELETE CASCADE,
    blood_pressure   TEXT,
    heart_rate       INTEGER,
    respiratory_rate INTEGER,
    temperature      REAL,
    spo2             INTEGER,
    fio2             INTEGER,
    oxygen_flow      REAL,
    etco2            INTEGER,
    monitor          TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS vascular_accesses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    scenario_id INTEGER NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
    kind        TEXT    NOT NULL CHECK (kind IN ('venous', 'arterial')),
    category    TEXT    NOT NULL DEFAULT '',
    site        TEXT    NOT NULL DEFAULT '',
    side        TEXT    NOT NULL DEFAULT '',
    gauge       INTEGER
);

CREATE TABLE IF NOT EXISTS timeline_nodes (
    scenario_id        INTEGER NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
    node_index         INTEGER NOT NULL CHECK (node_index >= 0),
    blood_pressure     TEXT,
    heart_rate         INTEGER,
    respiratory_rate   INTEGER,
    temperature        REAL,
    spo2               INTEGER,
    fio2               INTEGER,
    oxygen_flow        REAL,
    etco2              INTEGER,
    action             TEXT    NOT NULL DEFAULT '',
    on_action_done     INTEGER NOT NULL DEFAULT 0,
    on_action_not_done INTEGER NOT NULL DEFAULT 0,
    notes              TEXT,
    caregiver_role     TEXT,
    timer_s            INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (scenario_id, node_index)
);

-- No reference to timeline_nodes: baseline-level parameters live at node 0
-- even when the scenario has no timeline.
CREATE TABLE IF NOT EXISTS additional_parameters (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    scenario_id INTEGER NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
    node_index  INTEGER NOT NULL,
    name        TEXT    NOT NULL,
    value       TEXT    NOT NULL,
    unit        TEXT    NOT NULL DEFAULT '',
    UNIQUE (scenario_id, node_index, name)
);
"#;
