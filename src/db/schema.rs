/// Tables are created in place on every start. There are no foreign keys;
/// the data context keeps references consistent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS people (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    primary_city_id TEXT,
    additional_city_ids TEXT,
    tier TEXT NOT NULL,
    notes TEXT,
    last_contacted_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cities (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    state TEXT,
    country TEXT
);

CREATE TABLE IF NOT EXISTS contact_methods (
    id TEXT PRIMARY KEY NOT NULL,
    person_id TEXT NOT NULL,
    platform TEXT NOT NULL,
    value TEXT NOT NULL,
    deep_link TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS trips (
    id TEXT PRIMARY KEY NOT NULL,
    city_id TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    source TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_contact_method_person ON contact_methods(person_id);
"#;
