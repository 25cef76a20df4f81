//! Named parameters for native SQL.
//!
//! Native statements are written once with `:name` placeholders and bound per backend:
//! PostgreSQL takes numbered `$n` markers, MySQL and SQLite take `?`.

use crate::LateralErr;
use sea_orm::{DbBackend, Statement, Value};
use std::collections::BTreeMap;

/// Rewrite every `:name` placeholder in `sql` into the backend's positional form and bind the
/// matching values in placeholder order.
///
/// `::` casts, comments and anything inside quotes are left alone; on MySQL a backslash escapes
/// the next character of a quoted literal. A placeholder without a value, or a value without a
/// placeholder, is an error.
///
/// ```
/// use sea_orm::DbBackend;
/// use sea_orm_lateral::bind_named;
///
/// let stmt = bind_named(
///     DbBackend::Postgres,
///     "SELECT id::text FROM post_details WHERE created_by = :createdBy",
///     [("createdBy", "Vlad Mihalcea".into())],
/// )
/// .unwrap();
///
/// assert_eq!(
///     stmt.sql,
///     "SELECT id::text FROM post_details WHERE created_by = $1"
/// );
/// ```
pub fn bind_named<I, K>(backend: DbBackend, sql: &str, params: I) -> Result<Statement, LateralErr>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let params: BTreeMap<String, Value> = params
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();
    let mut used = vec![false; params.len()];
    let mut values = Vec::new();
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') if backend == DbBackend::MySql => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            (Some(q), c) if c == q => {
                quote = None;
                out.push(c);
            }
            (Some(_), c) => out.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push(c);
            }
            (None, '-') if chars.peek() == Some(&'-') => {
                out.push(c);
                for c in chars.by_ref() {
                    out.push(c);
                    if c == '\n' {
                        break;
                    }
                }
            }
            (None, '/') if chars.peek() == Some(&'*') => {
                out.push(c);
                chars.next();
                out.push('*');
                let mut prev = None;
                for c in chars.by_ref() {
                    out.push(c);
                    if prev == Some('*') && c == '/' {
                        break;
                    }
                    prev = Some(c);
                }
            }
            (None, ':') => match chars.peek() {
                Some(':') => {
                    out.push_str("::");
                    chars.next();
                }
                Some(&n) if n.is_ascii_alphabetic() || n == '_' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let (index, value) = params
                        .iter()
                        .enumerate()
                        .find_map(|(i, (k, v))| (*k == name).then_some((i, v)))
                        .ok_or_else(|| LateralErr::MissingParam(name.clone()))?;
                    used[index] = true;
                    values.push(value.clone());
                    match backend {
                        DbBackend::Postgres => {
                            out.push('$');
                            out.push_str(&values.len().to_string());
                        }
                        DbBackend::MySql | DbBackend::Sqlite => out.push('?'),
                    }
                }
                _ => out.push(':'),
            },
            (None, c) => out.push(c),
        }
    }

    if let Some(name) = params
        .keys()
        .zip(used)
        .find_map(|(name, used)| (!used).then(|| name.clone()))
    {
        return Err(LateralErr::UnusedParam(name));
    }

    Ok(Statement::from_sql_and_values(backend, &out, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SQL: &str = "SELECT title FROM post p JOIN post_details pd ON p.id = pd.id \
                       WHERE pd.created_by = :createdBy OR p.title = :createdBy";

    #[test]
    fn postgres_numbers_each_occurrence() {
        let stmt = bind_named(DbBackend::Postgres, SQL, [("createdBy", "Vlad".into())]).unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT title FROM post p JOIN post_details pd ON p.id = pd.id \
             WHERE pd.created_by = $1 OR p.title = $2"
        );
        assert_eq!(
            stmt.values.unwrap().0,
            vec![Value::from("Vlad"), Value::from("Vlad")]
        );
    }

    #[test]
    fn mysql_and_sqlite_use_question_marks() {
        for backend in [DbBackend::MySql, DbBackend::Sqlite] {
            let stmt = bind_named(backend, SQL, [("createdBy", "Vlad".into())]).unwrap();
            assert_eq!(
                stmt.sql,
                "SELECT title FROM post p JOIN post_details pd ON p.id = pd.id \
                 WHERE pd.created_by = ? OR p.title = ?"
            );
            assert_eq!(stmt.values.unwrap().0.len(), 2);
        }
    }

    #[test]
    fn casts_and_literals_untouched() {
        let stmt = bind_named(
            DbBackend::Postgres,
            r#"SELECT ':skip', "odd:name", id::text FROM post WHERE id = :id"#,
            [("id", 1i64.into())],
        )
        .unwrap();

        assert_eq!(
            stmt.sql,
            r#"SELECT ':skip', "odd:name", id::text FROM post WHERE id = $1"#
        );
        assert_eq!(stmt.values.unwrap().0, vec![Value::from(1i64)]);
    }

    #[test]
    fn mysql_backslash_escapes_stay_in_literal() {
        let stmt = bind_named(
            DbBackend::MySql,
            r"SELECT 'it\'s :x', 'c:\\' FROM t WHERE a = :a",
            [("a", 1i64.into())],
        )
        .unwrap();

        assert_eq!(stmt.sql, r"SELECT 'it\'s :x', 'c:\\' FROM t WHERE a = ?");
        assert_eq!(stmt.values.unwrap().0, vec![Value::from(1i64)]);
    }

    #[test]
    fn comments_untouched() {
        let stmt = bind_named(
            DbBackend::Postgres,
            "SELECT 1 -- see :note\nFROM post /* :skip */ WHERE id = :id /*/ :also */",
            [("id", 1i64.into())],
        )
        .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT 1 -- see :note\nFROM post /* :skip */ WHERE id = $1 /*/ :also */"
        );

        let stmt = bind_named(
            DbBackend::Postgres,
            "SELECT 1 -- see :note\n",
            Vec::<(String, Value)>::new(),
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT 1 -- see :note\n");
    }

    #[test]
    fn no_placeholders_no_values() {
        let stmt = bind_named(DbBackend::Sqlite, "SELECT 1", Vec::<(String, Value)>::new()).unwrap();
        assert_eq!(stmt.sql, "SELECT 1");
        assert!(stmt.values.map_or(true, |values| values.0.is_empty()));
    }

    #[test]
    fn missing_value() {
        let err = bind_named(DbBackend::Postgres, SQL, Vec::<(String, Value)>::new()).unwrap_err();
        assert!(matches!(err, LateralErr::MissingParam(name) if name == "createdBy"));
    }

    #[test]
    fn unused_value() {
        let err = bind_named(
            DbBackend::Postgres,
            SQL,
            [("createdBy", "Vlad".into()), ("title", "x".into())],
        )
        .unwrap_err();
        assert!(matches!(err, LateralErr::UnusedParam(name) if name == "title"));
    }
}
