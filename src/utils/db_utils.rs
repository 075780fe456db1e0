use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::MySqlPool;
use std::str::FromStr;

/// SQL bindable value enum. Monetary columns are DECIMAL, so string
/// payload values that parse as a decimal number bind as Decimal rather
/// than VARCHAR; clients send amounts as strings to avoid float drift.
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// SQL update container
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build a dynamic UPDATE from a JSON object of column -> new value.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else if looks_like_amount(s) {
                    // unwrap is safe: looks_like_amount only matched parseable input
                    values.push(SqlValue::Decimal(Decimal::from_str(s).unwrap()));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// "2000", "2000.50", "-13.37" — digits with an optional sign and one
/// fractional part. Anything else (codes, phone numbers with spaces,
/// dates) stays a plain string.
fn looks_like_amount(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    !body.is_empty()
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.chars().filter(|c| *c == '.').count() <= 1
        && Decimal::from_str(s).is_ok()
}

/// Execute the update
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_set_clause_and_binds_id_last() {
        let payload = json!({ "status": "inactive" });
        let update = build_update_sql("employees", &payload, "id", 7).unwrap();

        assert_eq!(update.sql, "UPDATE employees SET status = ? WHERE id = ?");
        assert_eq!(update.values.len(), 2);
        assert!(matches!(update.values[1], SqlValue::I64(7)));
    }

    #[test]
    fn amount_strings_bind_as_decimal() {
        let payload = json!({ "base_monthly": "2147.89" });
        let update = build_update_sql("contracts", &payload, "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::Decimal(_)));
    }

    #[test]
    fn date_strings_bind_as_dates() {
        let payload = json!({ "hire_date": "2024-02-29" });
        let update = build_update_sql("employees", &payload, "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }

    #[test]
    fn phone_like_strings_stay_strings() {
        let payload = json!({ "phone": "+34600123456" });
        let update = build_update_sql("employees", &payload, "id", 1).unwrap();
        assert!(matches!(update.values[0], SqlValue::String(_)));
    }

    #[test]
    fn empty_payload_rejected() {
        let payload = json!({});
        assert!(build_update_sql("employees", &payload, "id", 1).is_err());
    }

    #[test]
    fn non_object_payload_rejected() {
        let payload = json!([1, 2, 3]);
        assert!(build_update_sql("employees", &payload, "id", 1).is_err());
    }
}
