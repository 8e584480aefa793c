//! DDL for the tables the factories populate

pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS "users" (
    "id" BIGSERIAL PRIMARY KEY,
    "name" VARCHAR(255) NOT NULL,
    "email" VARCHAR(255) NOT NULL UNIQUE,
    "email_verified_at" TIMESTAMPTZ NULL,
    "password" VARCHAR(255) NOT NULL,
    "remember_token" VARCHAR(100) NULL,
    "created_at" TIMESTAMPTZ NULL,
    "updated_at" TIMESTAMPTZ NULL
)"#;

pub const CREATE_ARTICLES: &str = r#"
CREATE TABLE IF NOT EXISTS "articles" (
    "id" BIGSERIAL PRIMARY KEY,
    "user_id" BIGINT NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
    "title" VARCHAR(255) NOT NULL,
    "content" TEXT NOT NULL,
    "excerpt" TEXT NOT NULL,
    "state" VARCHAR(16) NOT NULL CHECK ("state" IN ('draft', 'published')),
    "created_at" TIMESTAMPTZ NULL,
    "updated_at" TIMESTAMPTZ NULL
)"#;

/// Statements in dependency order (parents first)
pub fn create_statements() -> [&'static str; 2] {
    [CREATE_USERS, CREATE_ARTICLES]
}

/// Tables in the order they can be truncated without violating foreign keys
pub fn tables_children_first() -> [&'static str; 2] {
    ["articles", "users"]
}
