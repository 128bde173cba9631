use crate::client::DatabaseEngine;

/// A value bound to a `$N` placeholder.
#[derive(Clone, Debug)]
pub enum BindValue {
    Bytes(Vec<u8>),
    OptBytes(Option<Vec<u8>>),
    Int(i64),
    OptInt(Option<i64>),
    Text(String),
}

/// A conjunction of optional predicates over one output table, collected by
/// the per-kind query composers and executed by `select`.
#[derive(Clone, Debug)]
pub struct FilteredOutputQuery {
    pub(crate) table: &'static str,
    pub(crate) conditions: Vec<String>,
    pub(crate) binds: Vec<BindValue>,
    pub(crate) limit: Option<i64>,
}

impl FilteredOutputQuery {
    pub fn new(table: &'static str) -> Self {
        FilteredOutputQuery { table, conditions: Vec::new(), binds: Vec::new(), limit: None }
    }

    /// Adds a predicate without bound values, e.g. `native_token_count > 0`.
    pub fn condition(&mut self, expr: &str) {
        self.conditions.push(expr.to_string());
    }

    /// Adds a predicate with one bound value; `{}` in the template is
    /// replaced with the next placeholder.
    pub fn bind_condition(&mut self, template: &str, value: BindValue) {
        let placeholder = format!("${}", self.binds.len() + 1);
        self.conditions.push(template.replacen("{}", &placeholder, 1));
        self.binds.push(value);
    }

    pub fn limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }
}

/// Pagination request accompanying a filtered query. A page size of zero
/// disables pagination; the cursor, when present, is the 76-character form.
#[derive(Clone, Debug, Default)]
pub struct Pagination {
    pub page_size: u32,
    pub cursor: Option<String>,
}

/// Raw outcome of a filtered read: matching output ids in query order, the
/// ledger index the read is consistent with and the lower-cased resumption
/// cursor when more rows exist.
#[derive(Clone, Debug, Default)]
pub struct FilteredResults {
    pub output_ids: Vec<Vec<u8>>,
    pub ledger_index: u32,
    pub next_cursor: Option<String>,
}

/// Dialect expression projecting `(created_at, output_id)` into the ordered
/// fixed-length hex string used both in the select list and in the cursor
/// comparison. SQLite yields upper-case hex, PostgreSQL lower-case; the
/// cursor exposed externally is always lower-cased afterwards.
pub(crate) fn cursor_expression(engine: DatabaseEngine) -> &'static str {
    match engine {
        DatabaseEngine::Sqlite => "printf('%08X', created_at) || hex(output_id)",
        DatabaseEngine::Postgres => "lpad(to_hex(created_at), 8, '0') || encode(output_id, 'hex')",
    }
}
