//! SQL schema for the feed mirror's SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS posts (
    graph_api_id  TEXT PRIMARY KEY,
    message       TEXT,
    created_time  TEXT NOT NULL      -- RFC 3339, original offset kept
);

-- Children are removed with their post; re-saving a post replaces its tree.
CREATE TABLE IF NOT EXISTS attachments (
    attachment_id TEXT PRIMARY KEY,
    post_id       TEXT NOT NULL REFERENCES posts(graph_api_id) ON DELETE CASCADE,
    position      INTEGER NOT NULL,
    media_type    TEXT,
    kind          TEXT,
    media_json    TEXT,              -- JSON-encoded Media or NULL
    UNIQUE (post_id, position)
);

CREATE TABLE IF NOT EXISTS sub_attachments (
    sub_attachment_id TEXT PRIMARY KEY,
    attachment_id     TEXT NOT NULL REFERENCES attachments(attachment_id) ON DELETE CASCADE,
    position          INTEGER NOT NULL,
    kind              TEXT,
    url               TEXT,
    media_json        TEXT,
    target_json       TEXT,
    UNIQUE (attachment_id, position)
);

-- At most one token row exists.
CREATE TABLE IF NOT EXISTS access_token (
    id           INTEGER PRIMARY KEY CHECK (id = 1),
    access_token TEXT NOT NULL,
    token_type   TEXT NOT NULL,
    expires_at   TEXT NOT NULL       -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS attachments_post_idx    ON attachments(post_id);
CREATE INDEX IF NOT EXISTS sub_attachments_att_idx ON sub_attachments(attachment_id);

PRAGMA user_version = 1;
";
