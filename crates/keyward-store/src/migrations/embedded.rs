//! Schema migrations compiled into the binary, in application order

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Ids are recorded in `schema_version`; never rename or reorder them
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    },
    Migration {
        id: "002_append_only_guards",
        sql: include_str!("../../migrations/002_append_only_guards.sql"),
    },
];
