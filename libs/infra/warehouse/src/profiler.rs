// [libs/infra/warehouse/src/profiler.rs]
use serde_json::{json, Value};
use sync_domain_models::FieldType;
use tracing::{instrument, warn};

use crate::client::WarehouseClient;
use crate::errors::WarehouseError;
use crate::identifiers::validate_identifier;

/// Produces the nested `{field -> stats}` map spec.md §4.5 describes for one
/// staging table. The first query is always `total_rows`; if it is zero, the
/// whole profile collapses to a single `_meta` entry and no per-field query
/// is issued at all. A failure profiling one field is caught and surfaces as
/// `{field: {"error": message}}` rather than aborting the remaining fields
/// (spec.md §4.5: "does not abort profiling of other fields").
#[instrument(skip(client, schema))]
pub async fn profile_table(
    client: &WarehouseClient,
    table: &str,
    schema: &[(&str, FieldType)],
) -> Result<Value, WarehouseError> {
    let validated = validate_identifier(table)?;
    let total_rows = total_row_count(client, validated).await?;

    let mut out = serde_json::Map::new();
    out.insert("_meta".to_string(), json!({ "total_rows": total_rows }));

    if total_rows == 0 {
        return Ok(Value::Object(out));
    }

    for (column, field_type) in schema {
        if matches!(field_type, FieldType::Skip) {
            continue;
        }
        let column = match validate_identifier(column) {
            Ok(c) => c,
            Err(e) => {
                out.insert(column.to_string(), json!({ "error": e.to_string() }));
                continue;
            }
        };
        let stats = match field_type {
            FieldType::Numeric => numeric_stats(client, validated, column, total_rows).await,
            FieldType::Categorical => categorical_stats(client, validated, column, total_rows).await,
            FieldType::Date => date_stats(client, validated, column, total_rows).await,
            FieldType::String => string_stats(client, validated, column, total_rows).await,
            FieldType::Skip => unreachable!(),
        };
        let stats = stats.unwrap_or_else(|e| {
            warn!(column, error = %e, "profiling query failed for field, recording error and continuing");
            json!({ "error": e.to_string() })
        });
        out.insert(column.to_string(), stats);
    }

    Ok(Value::Object(out))
}

async fn total_row_count(client: &WarehouseClient, table: &str) -> Result<i64, WarehouseError> {
    let rows = client.query_rows(&format!("SELECT count() AS n FROM {table}")).await?;
    Ok(rows.first().and_then(|v| v.get("n")).and_then(|v| v.as_i64()).unwrap_or(0))
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn null_ratio(null_count: i64, total_rows: i64) -> f64 {
    if total_rows == 0 {
        0.0
    } else {
        round4(null_count as f64 / total_rows as f64)
    }
}

async fn null_count(client: &WarehouseClient, table: &str, column: &str) -> Result<i64, WarehouseError> {
    let sql = format!("SELECT countIf({column} IS NULL) AS n FROM {table}");
    let rows = client.query_rows(&sql).await?;
    Ok(rows.first().and_then(|v| v.get("n")).and_then(|v| v.as_i64()).unwrap_or(0))
}

/// min, max, avg, population stddev, null_count, null_ratio (spec.md §4.5).
async fn numeric_stats(
    client: &WarehouseClient,
    table: &str,
    column: &str,
    total_rows: i64,
) -> Result<Value, WarehouseError> {
    let sql = format!(
        "SELECT min({column}) AS lo, max({column}) AS hi, avg({column}) AS mean, \
         stddevPop({column}) AS sd FROM {table}"
    );
    let rows = client.query_rows(&sql).await?;
    let row = rows.first().cloned().unwrap_or(Value::Null);
    let nulls = null_count(client, table, column).await?;
    let as_rounded = |key: &str| -> Option<f64> { row.get(key).and_then(|v| v.as_f64()).map(round4) };
    Ok(json!({
        "min": as_rounded("lo"),
        "max": as_rounded("hi"),
        "avg": as_rounded("mean"),
        "stddev": as_rounded("sd"),
        "null_count": nulls,
        "null_ratio": null_ratio(nulls, total_rows),
    }))
}

/// unique_count (exact), null_count, null_ratio, most_frequent value/count/pct.
async fn categorical_stats(
    client: &WarehouseClient,
    table: &str,
    column: &str,
    total_rows: i64,
) -> Result<Value, WarehouseError> {
    let unique_sql = format!("SELECT uniqExact({column}) AS u FROM {table}");
    let unique_rows = client.query_rows(&unique_sql).await?;
    let unique_count = unique_rows.first().and_then(|v| v.get("u")).and_then(|v| v.as_i64()).unwrap_or(0);

    let top_sql = format!(
        "SELECT {column} AS value, count() AS n FROM {table} \
         WHERE {column} IS NOT NULL GROUP BY {column} ORDER BY n DESC LIMIT 1"
    );
    let top_rows = client.query_rows(&top_sql).await?;
    let (most_frequent_value, most_frequent_count) = match top_rows.first() {
        Some(row) => (row.get("value").cloned().unwrap_or(Value::Null), row.get("n").and_then(|v| v.as_i64()).unwrap_or(0)),
        None => (Value::Null, 0),
    };
    let most_frequent_pct = if total_rows == 0 {
        0.0
    } else {
        round4(most_frequent_count as f64 / total_rows as f64 * 100.0)
    };

    let nulls = null_count(client, table, column).await?;
    Ok(json!({
        "unique_count": unique_count,
        "null_count": nulls,
        "null_ratio": null_ratio(nulls, total_rows),
        "most_frequent_value": most_frequent_value,
        "most_frequent_count": most_frequent_count,
        "most_frequent_pct": most_frequent_pct,
    }))
}

/// min, max (ISO strings), null_count, null_ratio.
async fn date_stats(
    client: &WarehouseClient,
    table: &str,
    column: &str,
    total_rows: i64,
) -> Result<Value, WarehouseError> {
    let sql = format!("SELECT min({column}) AS lo, max({column}) AS hi FROM {table}");
    let rows = client.query_rows(&sql).await?;
    let row = rows.first().cloned().unwrap_or(Value::Null);
    let nulls = null_count(client, table, column).await?;
    Ok(json!({
        "min": row.get("lo"),
        "max": row.get("hi"),
        "null_count": nulls,
        "null_ratio": null_ratio(nulls, total_rows),
    }))
}

/// unique_count, null-or-empty count and ratio. "Null-or-empty" folds the
/// empty string into the same bucket as SQL NULL, since upstream feeds use
/// both interchangeably for a missing string field.
async fn string_stats(
    client: &WarehouseClient,
    table: &str,
    column: &str,
    total_rows: i64,
) -> Result<Value, WarehouseError> {
    let unique_sql = format!("SELECT uniqExact({column}) AS u FROM {table}");
    let unique_rows = client.query_rows(&unique_sql).await?;
    let unique_count = unique_rows.first().and_then(|v| v.get("u")).and_then(|v| v.as_i64()).unwrap_or(0);

    let blank_sql = format!("SELECT countIf({column} IS NULL OR {column} = '') AS n FROM {table}");
    let blank_rows = client.query_rows(&blank_sql).await?;
    let blank_count = blank_rows.first().and_then(|v| v.get("n")).and_then(|v| v.as_i64()).unwrap_or(0);

    Ok(json!({
        "unique_count": unique_count,
        "null_or_empty_count": blank_count,
        "null_or_empty_ratio": null_ratio(blank_count, total_rows),
    }))
}
