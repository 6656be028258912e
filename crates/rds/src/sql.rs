//! Pure INSERT/UPDATE statement builders.
//!
//! Column maps are ordered ([`IndexMap`]) so generated statements are
//! deterministic. Filters are AND-ed together after a `WHERE 1=1` anchor;
//! null values compare with `IS NULL`.

use indexmap::IndexMap;

use crate::value::SqlValue;

/// Build `INSERT INTO schema.table (cols...) VALUES (literals...)`.
pub fn build_insert(schema: &str, table: &str, columns: &IndexMap<String, SqlValue>) -> String {
    let column_clause = columns.keys().cloned().collect::<Vec<_>>().join(", ");
    let value_clause = columns
        .values()
        .map(SqlValue::to_literal)
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO {schema}.{table} ({column_clause}) VALUES ({value_clause})")
}

/// Build `UPDATE schema.table SET ... WHERE 1=1 AND ...`.
pub fn build_update(
    schema: &str,
    table: &str,
    set_values: &IndexMap<String, SqlValue>,
    filter_conditions: &IndexMap<String, SqlValue>,
) -> String {
    format!(
        "UPDATE {schema}.{table} SET {} WHERE 1=1{}",
        build_set_clause(set_values),
        build_filter_clause(filter_conditions)
    )
}

fn build_set_clause(set_values: &IndexMap<String, SqlValue>) -> String {
    set_values
        .iter()
        .map(|(column, value)| format!("{column} = {}", value.to_literal()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_filter_clause(filter_conditions: &IndexMap<String, SqlValue>) -> String {
    let mut clause = String::new();
    for (column, value) in filter_conditions {
        if value.is_null() {
            clause.push_str(&format!(" AND {column} IS NULL"));
        } else {
            clause.push_str(&format!(" AND {column} = {}", value.to_literal()));
        }
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(pairs: &[(&str, SqlValue)]) -> IndexMap<String, SqlValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_preserves_column_order() {
        let cols = columns(&[
            ("batch_id", SqlValue::from("20240301093015")),
            ("config_no", SqlValue::from(3)),
            ("job_status", SqlValue::from("IN-PROGRESS")),
        ]);

        assert_eq!(
            build_insert("audit", "job_log", &cols),
            "INSERT INTO audit.job_log (batch_id, config_no, job_status) \
             VALUES ('20240301093015', 3, 'IN-PROGRESS')"
        );
    }

    #[test]
    fn update_anchors_where_clause() {
        let set = columns(&[("job_status", SqlValue::from("FAILED"))]);
        let filter = columns(&[
            ("batch_id", SqlValue::from("20240301093015")),
            ("job_name", SqlValue::from("daily_load")),
        ]);

        assert_eq!(
            build_update("audit", "job_log", &set, &filter),
            "UPDATE audit.job_log SET job_status = 'FAILED' \
             WHERE 1=1 AND batch_id = '20240301093015' AND job_name = 'daily_load'"
        );
    }

    #[test]
    fn null_filter_uses_is_null() {
        let set = columns(&[("job_status", SqlValue::from("FAILED"))]);
        let filter = columns(&[("end_time", SqlValue::Null)]);

        let sql = build_update("audit", "job_log", &set, &filter);
        assert!(sql.ends_with("WHERE 1=1 AND end_time IS NULL"), "got: {sql}");
        assert!(!sql.contains("= NULL"));
    }

    #[test]
    fn null_set_value_renders_null_literal() {
        let set = columns(&[("error_message", SqlValue::Null)]);
        let filter = columns(&[("batch_id", SqlValue::from("b1"))]);

        let sql = build_update("audit", "job_log", &set, &filter);
        assert!(sql.contains("SET error_message = NULL"), "got: {sql}");
    }

    #[test]
    fn multiple_set_values_comma_separated() {
        let set = columns(&[
            ("job_status", SqlValue::from("SUCCESSFUL")),
            ("rows_loaded", SqlValue::from(42)),
        ]);
        let filter = columns(&[("batch_id", SqlValue::from("b1"))]);

        let sql = build_update("audit", "job_log", &set, &filter);
        assert!(
            sql.contains("SET job_status = 'SUCCESSFUL', rows_loaded = 42"),
            "got: {sql}"
        );
    }
}
