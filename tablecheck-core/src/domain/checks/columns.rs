// tablecheck-core/src/domain/checks/columns.rs
//
// Per-table column checks: row shape, presence, undeclared columns, type
// conformance, nullability and numeric ranges. Row-level violations are
// aggregated into one result per rule and column.

use crate::domain::report::{CheckResult, Rule};
use crate::domain::schema::{ColumnSpec, TableSchema};
use crate::domain::table::{LoadedTable, Value};

/// Distinct raw values quoted in a type-mismatch message.
const MISMATCH_SAMPLE: usize = 5;

pub struct ColumnChecker;

impl ColumnChecker {
    pub fn check(schema: &TableSchema, table: &LoadedTable) -> Vec<CheckResult> {
        let mut results = Self::check_presence(schema, table);

        if table.ragged_rows > 0 {
            results.push(
                CheckResult::warn(
                    Rule::RowShape,
                    &schema.name,
                    format!(
                        "{} row(s) do not have {} field(s); short rows padded with nulls, extra fields ignored",
                        table.ragged_rows,
                        table.headers.len()
                    ),
                )
                .with_count(table.ragged_rows),
            );
        }

        // Undeclared columns get a single warning and no per-row checks.
        for header in &table.headers {
            if !schema.has_column(header) {
                results.push(
                    CheckResult::warn(
                        Rule::UnexpectedColumn,
                        &schema.name,
                        format!("Unexpected column not declared in schema: {}", header),
                    )
                    .on_column(header),
                );
            }
        }

        for spec in &schema.columns {
            let Some(values) = table.column(&spec.name) else {
                continue;
            };
            let values: Vec<&Value> = values.collect();
            results.push(Self::check_type(&schema.name, spec, &values));
            if !spec.nullable {
                results.push(Self::check_not_null(&schema.name, spec, &values));
            }
            if spec.range.is_some_and(|r| !r.is_empty()) {
                results.push(Self::check_range(&schema.name, spec, &values));
            }
        }

        results
    }

    fn check_presence(schema: &TableSchema, table: &LoadedTable) -> Vec<CheckResult> {
        let mut results = Vec::new();
        let mut missing_required = 0;

        for spec in &schema.columns {
            if table.has_column(&spec.name) {
                continue;
            }
            if spec.required {
                missing_required += 1;
                results.push(
                    CheckResult::fail(
                        Rule::RequiredColumn,
                        &schema.name,
                        format!("Missing required column: {}", spec.name),
                    )
                    .on_column(&spec.name),
                );
            } else {
                results.push(
                    CheckResult::warn(
                        Rule::OptionalColumn,
                        &schema.name,
                        format!("Optional column absent from file: {}", spec.name),
                    )
                    .on_column(&spec.name),
                );
            }
        }

        if missing_required == 0 {
            let required = schema.columns.iter().filter(|c| c.required).count();
            results.push(CheckResult::pass(
                Rule::RequiredColumn,
                &schema.name,
                format!("All {} required column(s) present", required),
            ));
        }

        results
    }

    fn check_type(table: &str, spec: &ColumnSpec, values: &[&Value]) -> CheckResult {
        let mut bad = 0;
        let mut sample: Vec<&str> = Vec::new();
        for value in values {
            if let Value::Invalid(raw) = value {
                bad += 1;
                if sample.len() < MISMATCH_SAMPLE && !sample.contains(&raw.as_str()) {
                    sample.push(raw);
                }
            }
        }

        if bad == 0 {
            return CheckResult::pass(
                Rule::Dtype,
                table,
                format!("All values conform to {}", spec.column_type),
            )
            .on_column(&spec.name);
        }

        let quoted: Vec<String> = sample.iter().map(|s| format!("{:?}", s)).collect();
        CheckResult::warn(
            Rule::Dtype,
            table,
            format!(
                "{} value(s) do not parse as {} (e.g. {})",
                bad,
                spec.column_type,
                quoted.join(", ")
            ),
        )
        .on_column(&spec.name)
        .with_count(bad)
    }

    fn check_not_null(table: &str, spec: &ColumnSpec, values: &[&Value]) -> CheckResult {
        // Cells that failed coercion count as nulls here as well.
        let nulls = values.iter().filter(|v| v.is_missing()).count();
        if nulls == 0 {
            return CheckResult::pass(Rule::NotNull, table, "No nulls in non-nullable column")
                .on_column(&spec.name);
        }
        CheckResult::fail(
            Rule::NotNull,
            table,
            format!("Non-nullable column has {} null(s)", nulls),
        )
        .on_column(&spec.name)
        .with_count(nulls)
    }

    fn check_range(table: &str, spec: &ColumnSpec, values: &[&Value]) -> CheckResult {
        let range = spec.range.unwrap_or_default();
        let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
        let outside = numbers.iter().filter(|n| !range.contains(**n)).count();

        if outside == 0 {
            return CheckResult::pass(Rule::Range, table, format!("All values within {}", range))
                .on_column(&spec.name);
        }

        let observed_min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let observed_max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        CheckResult::warn(
            Rule::Range,
            table,
            format!(
                "{} value(s) outside {} (observed min: {}, max: {})",
                outside, range, observed_min, observed_max
            ),
        )
        .on_column(&spec.name)
        .with_count(outside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::Severity;
    use crate::domain::schema::ColumnType;
    use crate::domain::table::DEFAULT_NULL_MARKERS;

    fn load(schema: &TableSchema, csv_rows: &[&[&str]]) -> LoadedTable {
        let markers: Vec<String> = DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect();
        let headers: Vec<String> = csv_rows[0].iter().map(|s| s.to_string()).collect();
        let records: Vec<Vec<String>> = csv_rows[1..]
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        LoadedTable::from_records(schema, headers, records, &markers)
    }

    fn find<'a>(results: &'a [CheckResult], rule: Rule, column: &str) -> Vec<&'a CheckResult> {
        results
            .iter()
            .filter(|r| r.rule == rule && r.column.as_deref() == Some(column))
            .collect()
    }

    fn accounts() -> TableSchema {
        TableSchema::new(
            "accounts",
            vec![
                ColumnSpec::new("account_id", ColumnType::Int),
                ColumnSpec::new("balance", ColumnType::Float).with_range(Some(0.0), Some(1000.0)),
                ColumnSpec::new("memo", ColumnType::String).nullable(),
            ],
        )
    }

    #[test]
    fn test_clean_table_only_passes() {
        let schema = accounts();
        let table = load(
            &schema,
            &[&["account_id", "balance", "memo"], &["1", "10.5", ""], &["2", "0", "x"]],
        );
        let results = ColumnChecker::check(&schema, &table);
        assert!(results.iter().all(|r| r.severity == Severity::Pass));
        // presence + (dtype, not_null) x2 + range + memo dtype
        assert_eq!(results.len(), 7);
    }

    #[test]
    fn test_nulls_aggregate_into_one_failure() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo"],
                &["", "1", "a"],
                &["NA", "2", "b"],
                &["3", "3", "c"],
                &["", "4", "d"],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);
        let not_null = find(&results, Rule::NotNull, "account_id");
        assert_eq!(not_null.len(), 1);
        assert_eq!(not_null[0].severity, Severity::Fail);
        assert_eq!(not_null[0].count, Some(3));
    }

    #[test]
    fn test_unexpected_column_warns_once_without_row_checks() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo", "legacy_flag"],
                &["1", "1", "", ""],
                &["2", "2", "", "oops"],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);
        let about_extra: Vec<_> = results
            .iter()
            .filter(|r| r.column.as_deref() == Some("legacy_flag"))
            .collect();
        assert_eq!(about_extra.len(), 1);
        assert_eq!(about_extra[0].rule, Rule::UnexpectedColumn);
        assert_eq!(about_extra[0].severity, Severity::Warn);
    }

    #[test]
    fn test_missing_columns() {
        let schema = accounts();
        let table = load(&schema, &[&["balance"], &["1"]]);
        let results = ColumnChecker::check(&schema, &table);

        let required = find(&results, Rule::RequiredColumn, "account_id");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].severity, Severity::Fail);

        let optional = find(&results, Rule::OptionalColumn, "memo");
        assert_eq!(optional[0].severity, Severity::Warn);
        assert!(find(&results, Rule::NotNull, "account_id").is_empty());
    }

    #[test]
    fn test_type_mismatch_also_counts_as_null() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo"],
                &["abc", "1", ""],
                &["2", "2", ""],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);

        let dtype = find(&results, Rule::Dtype, "account_id");
        assert_eq!(dtype[0].severity, Severity::Warn);
        assert_eq!(dtype[0].count, Some(1));
        assert!(dtype[0].message.contains("\"abc\""));

        let not_null = find(&results, Rule::NotNull, "account_id");
        assert_eq!(not_null.len(), 1);
        assert_eq!(not_null[0].severity, Severity::Fail);
        assert_eq!(not_null[0].count, Some(1));
    }

    #[test]
    fn test_invalid_and_null_cells_share_one_failure() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo"],
                &["abc", "1", ""],
                &["", "2", ""],
                &["7", "3", ""],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);
        let not_null = find(&results, Rule::NotNull, "account_id");
        assert_eq!(not_null[0].count, Some(2));
    }

    #[test]
    fn test_ragged_rows_warn_once_and_keep_checking() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo"],
                &["1", "10", "x"],
                &["2"],
                &["3", "30", "z", "surplus"],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);

        let shape: Vec<_> = results.iter().filter(|r| r.rule == Rule::RowShape).collect();
        assert_eq!(shape.len(), 1);
        assert_eq!(shape[0].severity, Severity::Warn);
        assert_eq!(shape[0].count, Some(2));

        // The padded balance is a null in a non-nullable column.
        let not_null = find(&results, Rule::NotNull, "balance");
        assert_eq!(not_null[0].severity, Severity::Fail);
        assert_eq!(not_null[0].count, Some(1));
    }

    #[test]
    fn test_range_violations_aggregate() {
        let schema = accounts();
        let table = load(
            &schema,
            &[
                &["account_id", "balance", "memo"],
                &["1", "-5", ""],
                &["2", "500", ""],
                &["3", "2000", ""],
                &["4", "", ""],
            ],
        );
        let results = ColumnChecker::check(&schema, &table);
        let range = find(&results, Rule::Range, "balance");
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].severity, Severity::Warn);
        assert_eq!(range[0].count, Some(2));
        assert!(range[0].message.contains("observed min: -5, max: 2000"));
    }
}
