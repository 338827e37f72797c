use tokio_postgres::types::ToSql;

use crate::api::{BookPatch, Isbn};

type SqlParam<'a> = &'a (dyn ToSql + Sync);

/// Assignments of an `UPDATE ... SET` statement for the fields present in a [`BookPatch`].
///
/// Columns are appended in a fixed order (title, author_first, author_last, inventory)
/// and only when the patch carries a value for them. Column names are constants and
/// every value is bound positionally, so nothing from the request ends up in the SQL text.
pub(crate) struct SetClause<'a> {
    assignments: Vec<(&'static str, SqlParam<'a>)>,
}

impl<'a> SetClause<'a> {
    pub(crate) fn from_patch(patch: &'a BookPatch) -> Self {
        let mut clause = Self {
            assignments: Vec::with_capacity(4),
        };
        if let Some(title) = &patch.title {
            clause.push("title", title);
        }
        if let Some(author_first) = &patch.author_first {
            clause.push("author_first", author_first);
        }
        if let Some(author_last) = &patch.author_last {
            clause.push("author_last", author_last);
        }
        if let Some(inventory) = &patch.inventory {
            clause.push("inventory", inventory);
        }
        clause
    }

    fn push(&mut self, column: &'static str, value: SqlParam<'a>) {
        self.assignments.push((column, value));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders `UPDATE <table> SET a = $1, b = $2 WHERE isbn = $3 RETURNING isbn`.
    /// Must not be called on an empty clause.
    pub(crate) fn update_statement(&self, table: &str) -> String {
        let assignments = self
            .assignments
            .iter()
            .enumerate()
            .map(|(idx, (column, _))| format!("{} = ${}", column, idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE isbn = ${} RETURNING isbn",
            table,
            assignments,
            self.assignments.len() + 1
        )
    }

    /// Values in placeholder order, the isbn of the WHERE clause last
    pub(crate) fn params(&self, isbn: &'a Isbn) -> Vec<SqlParam<'a>> {
        self.assignments
            .iter()
            .map(|(_, value)| *value)
            .chain(std::iter::once(isbn as SqlParam<'a>))
            .collect()
    }
}
