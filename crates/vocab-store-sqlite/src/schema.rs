//! SQL schema for the vocabularium SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are soft-deleted through deleted_at; nothing is ever DELETEd.
CREATE TABLE IF NOT EXISTS author (
    author_id   TEXT PRIMARY KEY,   -- uuid v5 of name
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,
    modified_at TEXT NOT NULL,
    deleted_at  TEXT
);

CREATE TABLE IF NOT EXISTS work (
    work_id     TEXT PRIMARY KEY,   -- uuid v5 of '<author>_<title>'
    author_id   TEXT NOT NULL REFERENCES author(author_id),
    title       TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    modified_at TEXT NOT NULL,
    deleted_at  TEXT,
    UNIQUE (author_id, title)
);

-- Shared across works. `known` belongs to the reader.
CREATE TABLE IF NOT EXISTS word (
    word_id         TEXT PRIMARY KEY,   -- uuid v5 of '<lemma_rich> <translation>'
    lemma_raw       TEXT NOT NULL,
    lemma_rich      TEXT NOT NULL,
    translation     TEXT NOT NULL,
    lasla_frequency INTEGER NOT NULL DEFAULT 0,
    known           INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    modified_at     TEXT NOT NULL,
    deleted_at      TEXT,
    UNIQUE (lemma_raw, lemma_rich)
);

CREATE TABLE IF NOT EXISTS work_word (
    work_word_id   TEXT PRIMARY KEY,   -- uuid v4, fresh per insert
    work_id        TEXT NOT NULL REFERENCES work(work_id),
    word_id        TEXT NOT NULL REFERENCES word(word_id),
    word_index     INTEGER NOT NULL,
    sentence_index INTEGER NOT NULL,
    original_form  TEXT NOT NULL,
    tag            TEXT NOT NULL,
    morph_analysis TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    modified_at    TEXT NOT NULL,
    deleted_at     TEXT,
    UNIQUE (work_id, word_index)
);

CREATE INDEX IF NOT EXISTS work_author_idx    ON work(author_id);
CREATE INDEX IF NOT EXISTS work_word_word_idx ON work_word(word_id);

PRAGMA user_version = 1;
";
