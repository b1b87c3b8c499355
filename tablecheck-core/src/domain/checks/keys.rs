// tablecheck-core/src/domain/checks/keys.rs
//
// Primary/composite key uniqueness within a table and referential integrity
// between tables. Referential checks need every table loaded first.

use std::collections::{HashMap, HashSet};

use crate::domain::report::{CheckResult, Rule, Severity};
use crate::domain::schema::{ForeignKeyRef, TableSchema};
use crate::domain::table::LoadedTable;

pub const DEFAULT_ORPHAN_THRESHOLD: f64 = 0.005;
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Pass at zero orphans, warn up to and including `threshold`, fail above it.
/// Rows with a null foreign key are not part of `total`.
pub fn orphan_severity(orphans: usize, total: usize, threshold: f64) -> Severity {
    if orphans == 0 || total == 0 {
        return Severity::Pass;
    }
    let rate = orphans as f64 / total as f64;
    if rate > threshold {
        Severity::Fail
    } else {
        Severity::Warn
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyChecker {
    pub orphan_threshold: f64,
    pub sample_size: usize,
}

impl Default for KeyChecker {
    fn default() -> Self {
        Self {
            orphan_threshold: DEFAULT_ORPHAN_THRESHOLD,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl KeyChecker {
    pub fn new(orphan_threshold: f64, sample_size: usize) -> Self {
        Self {
            orphan_threshold,
            sample_size,
        }
    }

    /// One result per table: count is the number of rows that belong to a
    /// duplicated key group. Rows with a null or invalid key part are skipped.
    pub fn check_primary_key(&self, schema: &TableSchema, table: &LoadedTable) -> Option<CheckResult> {
        if schema.primary_key.is_empty() {
            return None;
        }
        let indices: Vec<usize> = schema
            .primary_key
            .iter()
            .map(|col| table.column_index(col))
            .collect::<Option<_>>()?;
        let key_label = schema.primary_key.join(",");

        let mut groups: HashMap<Vec<String>, usize> = HashMap::new();
        let mut first_seen: Vec<Vec<String>> = Vec::new();
        let mut keyed_rows = 0;

        for row in &table.rows {
            let key: Option<Vec<String>> = indices
                .iter()
                .map(|&i| row.get(i).and_then(|v| v.key_repr()))
                .collect();
            let Some(key) = key else {
                continue;
            };
            keyed_rows += 1;
            let count = groups.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                first_seen.push(key);
            }
        }

        let duplicate_rows: usize = groups.values().filter(|&&c| c > 1).sum();
        if duplicate_rows == 0 {
            return Some(
                CheckResult::pass(
                    Rule::PrimaryKey,
                    &schema.name,
                    format!("Key ({}) unique across {} row(s)", key_label, keyed_rows),
                )
                .on_column(key_label),
            );
        }

        let sample: Vec<String> = first_seen
            .iter()
            .take(self.sample_size)
            .map(|k| format!("({})", k.join(", ")))
            .collect();
        Some(
            CheckResult::fail(
                Rule::PrimaryKey,
                &schema.name,
                format!(
                    "Key ({}): {} row(s) share {} duplicated key(s); sample: {}",
                    key_label,
                    duplicate_rows,
                    first_seen.len(),
                    sample.join(" ")
                ),
            )
            .on_column(key_label)
            .with_count(duplicate_rows),
        )
    }

    /// One result per declared foreign key whose local column is present.
    pub fn check_foreign_keys(
        &self,
        schema: &TableSchema,
        table: &LoadedTable,
        loaded: &HashMap<String, LoadedTable>,
    ) -> Vec<CheckResult> {
        schema
            .foreign_keys
            .iter()
            .filter(|fk| table.has_column(&fk.column))
            .map(|fk| self.check_foreign_key(&schema.name, fk, table, loaded))
            .collect()
    }

    fn check_foreign_key(
        &self,
        table_name: &str,
        fk: &ForeignKeyRef,
        table: &LoadedTable,
        loaded: &HashMap<String, LoadedTable>,
    ) -> CheckResult {
        let parent_values = loaded
            .get(&fk.ref_table)
            .and_then(|parent| parent.column(&fk.ref_column));
        let Some(parent_values) = parent_values else {
            return CheckResult::warn(
                Rule::ReferentialIntegrity,
                table_name,
                format!(
                    "Reference {}.{} not available; orphan check skipped",
                    fk.ref_table, fk.ref_column
                ),
            )
            .on_column(&fk.column);
        };
        let parent_keys: HashSet<String> = parent_values.filter_map(|v| v.key_repr()).collect();

        let mut total = 0;
        let mut orphans = 0;
        if let Some(values) = table.column(&fk.column) {
            for key in values.filter_map(|v| v.key_repr()) {
                total += 1;
                if !parent_keys.contains(&key) {
                    orphans += 1;
                }
            }
        }

        let rate = if total == 0 {
            0.0
        } else {
            orphans as f64 / total as f64
        };
        let severity = orphan_severity(orphans, total, self.orphan_threshold);
        let message = match severity {
            Severity::Pass => format!("{}: no orphans among {} row(s)", fk, total),
            Severity::Warn => format!(
                "{}: {} orphan(s) of {} ({:.2}%)",
                fk,
                orphans,
                total,
                rate * 100.0
            ),
            Severity::Fail => format!(
                "{}: {:.2}% orphan rate ({} of {} rows) exceeds {:.1}% threshold",
                fk,
                rate * 100.0,
                orphans,
                total,
                self.orphan_threshold * 100.0
            ),
        };

        let result = CheckResult::new(severity, Rule::ReferentialIntegrity, table_name, message)
            .on_column(&fk.column);
        if orphans > 0 {
            result.with_count(orphans)
        } else {
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{ColumnSpec, ColumnType};
    use crate::domain::table::Value;

    fn table_of(name: &str, header: &str, values: Vec<Value>) -> LoadedTable {
        let mut table = LoadedTable::new(name, vec![header.to_string()]);
        table.rows = values.into_iter().map(|v| vec![v]).collect();
        table
    }

    fn customers_schema() -> TableSchema {
        TableSchema::new(
            "customers",
            vec![ColumnSpec::new("customer_id", ColumnType::String)],
        )
        .with_primary_key(["customer_id"])
    }

    fn outflows_schema() -> TableSchema {
        TableSchema::new(
            "outflows",
            vec![ColumnSpec::new("customer_id", ColumnType::String).nullable()],
        )
        .with_foreign_key(ForeignKeyRef::new("customer_id", "customers", "customer_id"))
    }

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::Str(s.to_string())).collect()
    }

    #[test]
    fn test_orphan_rate_boundaries() {
        assert_eq!(orphan_severity(0, 1000, 0.005), Severity::Pass);
        assert_eq!(orphan_severity(0, 0, 0.005), Severity::Pass);
        assert_eq!(orphan_severity(3, 1000, 0.005), Severity::Warn);
        // exactly 0.5%
        assert_eq!(orphan_severity(5, 1000, 0.005), Severity::Warn);
        assert_eq!(orphan_severity(1, 200, 0.005), Severity::Warn);
        // 0.500001%
        assert_eq!(orphan_severity(500_001, 100_000_000, 0.005), Severity::Fail);
        assert_eq!(orphan_severity(6, 1000, 0.005), Severity::Fail);
    }

    #[test]
    fn test_duplicate_count_is_rows_not_keys() -> anyhow::Result<()> {
        let schema = customers_schema();
        let table = table_of(
            "customers",
            "customer_id",
            strs(&["c1", "c1", "c2", "c3", "c3", "c3", "c4"]),
        );
        let result = KeyChecker::default()
            .check_primary_key(&schema, &table)
            .ok_or_else(|| anyhow::anyhow!("expected a key result"))?;
        assert_eq!(result.severity, Severity::Fail);
        assert_eq!(result.count, Some(5));
        assert!(result.message.contains("(c1) (c3)"));
        Ok(())
    }

    #[test]
    fn test_two_rows_same_key_counts_two() -> anyhow::Result<()> {
        let table = table_of("customers", "customer_id", strs(&["c1", "c1"]));
        let result = KeyChecker::default()
            .check_primary_key(&customers_schema(), &table)
            .ok_or_else(|| anyhow::anyhow!("expected a key result"))?;
        assert_eq!(result.count, Some(2));
        Ok(())
    }

    #[test]
    fn test_duplicate_sample_is_bounded() -> anyhow::Result<()> {
        let mut ids = Vec::new();
        for i in 0..30 {
            ids.push(format!("k{i}"));
            ids.push(format!("k{i}"));
        }
        let values = ids.into_iter().map(Value::Str).collect();
        let table = table_of("customers", "customer_id", values);
        let result = KeyChecker::new(0.005, 3)
            .check_primary_key(&customers_schema(), &table)
            .ok_or_else(|| anyhow::anyhow!("expected a key result"))?;
        assert_eq!(result.count, Some(60));
        assert!(result.message.contains("sample: (k0) (k1) (k2)"));
        assert!(!result.message.contains("(k3)"));
        Ok(())
    }

    #[test]
    fn test_composite_key_and_null_parts() -> anyhow::Result<()> {
        let schema = TableSchema::new(
            "balances",
            vec![
                ColumnSpec::new("account", ColumnType::String),
                ColumnSpec::new("month", ColumnType::Int).nullable(),
            ],
        )
        .with_primary_key(["account", "month"]);
        let mut table = LoadedTable::new("balances", vec!["account".into(), "month".into()]);
        table.rows = vec![
            vec![Value::Str("a".into()), Value::Int(1)],
            vec![Value::Str("a".into()), Value::Int(2)],
            vec![Value::Str("a".into()), Value::Null],
            vec![Value::Str("a".into()), Value::Null],
        ];
        let result = KeyChecker::default()
            .check_primary_key(&schema, &table)
            .ok_or_else(|| anyhow::anyhow!("expected a key result"))?;
        assert_eq!(result.severity, Severity::Pass);
        assert_eq!(result.column.as_deref(), Some("account,month"));
        Ok(())
    }

    #[test]
    fn test_no_primary_key_no_result() {
        let table = table_of("outflows", "customer_id", strs(&["c1", "c1"]));
        assert!(
            KeyChecker::default()
                .check_primary_key(&outflows_schema(), &table)
                .is_none()
        );
    }

    #[test]
    fn test_orphans_warn_below_threshold() {
        let customers: Vec<String> = (0..100).map(|i| format!("c{i}")).collect();
        let parent = table_of(
            "customers",
            "customer_id",
            customers.iter().cloned().map(Value::Str).collect(),
        );

        let mut child_values: Vec<Value> = (0..997)
            .map(|i| Value::Str(format!("c{}", i % 100)))
            .collect();
        child_values.extend(strs(&["x1", "x2", "x3"]));
        // nulls never count as orphans
        child_values.extend(std::iter::repeat_n(Value::Null, 50));
        let child = table_of("outflows", "customer_id", child_values);

        let loaded = HashMap::from([("customers".to_string(), parent)]);
        let results = KeyChecker::default().check_foreign_keys(&outflows_schema(), &child, &loaded);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Warn);
        assert_eq!(results[0].count, Some(3));
        assert!(results[0].message.contains("(0.30%)"));
    }

    #[test]
    fn test_orphans_fail_above_threshold() {
        let parent = table_of("customers", "customer_id", strs(&["c1"]));
        let child = table_of("outflows", "customer_id", strs(&["c1", "c2"]));
        let loaded = HashMap::from([("customers".to_string(), parent)]);

        let results = KeyChecker::default().check_foreign_keys(&outflows_schema(), &child, &loaded);
        assert_eq!(results[0].severity, Severity::Fail);
        assert!(results[0].message.contains("50.00% orphan rate"));
    }

    #[test]
    fn test_missing_reference_table_warns() {
        let child = table_of("outflows", "customer_id", strs(&["c1"]));
        let results =
            KeyChecker::default().check_foreign_keys(&outflows_schema(), &child, &HashMap::new());
        assert_eq!(results[0].severity, Severity::Warn);
        assert!(results[0].message.contains("not available"));
    }

    #[test]
    fn test_keys_compare_across_types() {
        let parent = table_of("customers", "customer_id", vec![Value::Int(7)]);
        let child = table_of("outflows", "customer_id", strs(&["7"]));
        let loaded = HashMap::from([("customers".to_string(), parent)]);

        let results = KeyChecker::default().check_foreign_keys(&outflows_schema(), &child, &loaded);
        assert_eq!(results[0].severity, Severity::Pass);
    }
}
