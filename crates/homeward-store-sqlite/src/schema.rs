//! SQL schema for the Homeward SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Structural roles, seeded once at startup and never deleted.
CREATE TABLE IF NOT EXISTS roles (
    name TEXT PRIMARY KEY   -- 'ROLE_USER' | 'ROLE_ADMIN' | ...
);

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    role_name TEXT NOT NULL REFERENCES roles(name),
    UNIQUE (user_id, role_name)
);

CREATE TABLE IF NOT EXISTS vets (
    vet_id     TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    id_number  TEXT UNIQUE,
    authorized INTEGER NOT NULL DEFAULT 0,
    user_id    TEXT UNIQUE REFERENCES users(user_id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS visitors (
    visitor_id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    phone      TEXT NOT NULL UNIQUE,
    address    TEXT NOT NULL,
    sex        TEXT NOT NULL,
    age        INTEGER NOT NULL,
    bio        TEXT,
    user_id    TEXT UNIQUE REFERENCES users(user_id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shelters (
    shelter_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    address    TEXT,
    city       TEXT,
    phone      TEXT,
    authorized INTEGER NOT NULL DEFAULT 0,
    user_id    TEXT UNIQUE REFERENCES users(user_id),
    vet_id     TEXT REFERENCES vets(vet_id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS animals (
    animal_id          TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    species            TEXT NOT NULL,
    breed              TEXT,
    age_years          INTEGER,
    age_months         INTEGER,
    sex                TEXT NOT NULL,
    status             TEXT NOT NULL,   -- 'available' | 'pending' | 'adopted'
    vaccinated         INTEGER NOT NULL DEFAULT 0,
    neutered           INTEGER NOT NULL DEFAULT 0,
    photo_url          TEXT,
    description        TEXT,
    shelter_id         TEXT NOT NULL REFERENCES shelters(shelter_id),
    accepted           INTEGER NOT NULL DEFAULT 0,
    adopted_by         TEXT REFERENCES visitors(visitor_id),
    planned_visitor_id TEXT REFERENCES visitors(visitor_id),
    visit_requested    INTEGER NOT NULL DEFAULT 0,
    visit_approved     INTEGER NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS animals_species_idx ON animals(species);
CREATE INDEX IF NOT EXISTS animals_status_idx  ON animals(status);
CREATE INDEX IF NOT EXISTS animals_shelter_idx ON animals(shelter_id);
CREATE INDEX IF NOT EXISTS shelters_name_idx   ON shelters(name);

PRAGMA user_version = 1;
";
