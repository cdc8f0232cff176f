use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::Transaction;
use crate::report::{Comparison, Crosstab, Delta, Dimension, MeanTotals, Metric, SalesTotals};

pub(crate) type CountMatrix = BTreeMap<Vec<String>, BTreeMap<String, i64>>;

pub(crate) fn sum_by<K: Ord>(
    rows: &[&Transaction],
    key: impl Fn(&Transaction) -> K,
) -> BTreeMap<K, SalesTotals> {
    let mut grouped = BTreeMap::<K, SalesTotals>::new();
    for row in rows {
        let entry = grouped.entry(key(row)).or_default();
        entry.total += row.total;
        entry.quantity += row.quantity;
    }
    grouped
}

/// Arithmetic mean per key over the rows where `value` is present, alongside
/// the revenue and row count of every row under that key.
/// Keys whose rows all lack a value are left out.
pub(crate) fn mean_by<K: Ord>(
    rows: &[&Transaction],
    key: impl Fn(&Transaction) -> K,
    value: impl Fn(&Transaction) -> Option<f64>,
) -> BTreeMap<K, MeanTotals> {
    let mut accumulated = BTreeMap::<K, (f64, i64, MeanTotals)>::new();
    for row in rows {
        let entry = accumulated.entry(key(row)).or_default();
        entry.2.total += row.total;
        entry.2.transactions += 1;
        if let Some(value) = value(row) {
            entry.0 += value;
            entry.1 += 1;
        }
    }
    accumulated
        .into_iter()
        .filter(|(_, (_, count, _))| *count > 0)
        .map(|(key, (sum, count, totals))| {
            let mean = sum / count as f64;
            (key, MeanTotals { mean, ..totals })
        })
        .collect()
}

pub(crate) fn count_matrix(
    rows: &[&Transaction],
    row_dimensions: &[Dimension],
    column_dimension: Dimension,
) -> CountMatrix {
    let mut matrix = CountMatrix::new();
    for row in rows {
        let row_key = row_dimensions
            .iter()
            .map(|dimension| dimension.value(row).to_string())
            .collect::<Vec<String>>();
        *matrix
            .entry(row_key)
            .or_default()
            .entry(column_dimension.value(row).to_string())
            .or_insert(0) += 1;
    }
    matrix
}

/// Aligns `current` with `previous` and computes `current - previous`.
///
/// On a first day the key set is the current day's and every delta is N/A.
/// Otherwise both sides are reindexed to the key union, missing values read as zero.
pub(crate) fn compare<K: Ord + Clone, V: Metric>(
    current: BTreeMap<K, V>,
    previous: &BTreeMap<K, V>,
    first_day: bool,
) -> Comparison<K, V> {
    if first_day {
        let delta = current
            .keys()
            .map(|key| (key.clone(), Delta::NotApplicable))
            .collect();
        return Comparison { current, delta };
    }

    let keys = current
        .keys()
        .chain(previous.keys())
        .cloned()
        .collect::<BTreeSet<K>>();
    let mut aligned = BTreeMap::new();
    let mut delta = BTreeMap::new();
    for key in keys {
        let now = current.get(&key).copied().unwrap_or_default();
        let before = previous.get(&key).copied().unwrap_or_default();
        aligned.insert(key.clone(), now);
        delta.insert(key, Delta::Change(now - before));
    }
    Comparison {
        current: aligned,
        delta,
    }
}

pub(crate) fn compare_crosstab(
    row_dimensions: &[Dimension],
    column_dimension: Dimension,
    current: CountMatrix,
    previous: &CountMatrix,
    first_day: bool,
) -> Crosstab {
    let row_keys = if first_day {
        current.keys().cloned().collect::<Vec<Vec<String>>>()
    } else {
        current
            .keys()
            .chain(previous.keys())
            .cloned()
            .collect::<BTreeSet<Vec<String>>>()
            .into_iter()
            .collect()
    };

    let mut column_set = BTreeSet::new();
    for columns in current.values() {
        column_set.extend(columns.keys().cloned());
    }
    if !first_day {
        for columns in previous.values() {
            column_set.extend(columns.keys().cloned());
        }
    }
    let column_keys = column_set.into_iter().collect::<Vec<String>>();

    let lookup = |matrix: &CountMatrix, row: &Vec<String>, column: &String| {
        matrix
            .get(row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    };

    let mut current_cells = Vec::with_capacity(row_keys.len());
    let mut delta_cells = Vec::with_capacity(row_keys.len());
    for row in &row_keys {
        let mut current_row = Vec::with_capacity(column_keys.len());
        let mut delta_row = Vec::with_capacity(column_keys.len());
        for column in &column_keys {
            let now = lookup(&current, row, column);
            current_row.push(now);
            if first_day {
                delta_row.push(Delta::NotApplicable);
            } else {
                delta_row.push(Delta::Change(now - lookup(previous, row, column)));
            }
        }
        current_cells.push(current_row);
        delta_cells.push(delta_row);
    }

    Crosstab {
        row_dimensions: row_dimensions.to_vec(),
        column_dimension,
        row_keys,
        column_keys,
        current: current_cells,
        delta: delta_cells,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{compare, compare_crosstab, count_matrix, mean_by, sum_by};
    use crate::dataset::Transaction;
    use crate::dataset::testkit::sale;
    use crate::report::{Delta, Dimension};

    #[test]
    fn sum_by_adds_totals_and_quantities_per_key() {
        let rows = [
            sale("2026-01-05", "Manaus", 10.5, 1),
            sale("2026-01-05", "Manaus", 4.5, 2),
            sale("2026-01-05", "Rio de Janeiro", 7.0, 3),
        ];
        let refs = rows.iter().collect::<Vec<&Transaction>>();
        let grouped = sum_by(&refs, |row| row.city.clone());
        assert_eq!(grouped.get("Manaus").map(|totals| totals.total), Some(15.0));
        assert_eq!(grouped.get("Manaus").map(|totals| totals.quantity), Some(3));
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn mean_by_skips_missing_values_and_empty_keys() {
        let mut rated = sale("2026-01-05", "Manaus", 10.0, 1);
        rated.rating = Some(8.0);
        let mut rated_again = sale("2026-01-05", "Manaus", 10.0, 1);
        rated_again.rating = Some(6.0);
        let unrated = sale("2026-01-05", "Manaus", 10.0, 1);
        let mut unrated_elsewhere = sale("2026-01-05", "Manaus", 10.0, 1);
        unrated_elsewhere.product_line = "Esportes e Viagens".to_string();

        let rows = [rated, rated_again, unrated, unrated_elsewhere];
        let refs = rows.iter().collect::<Vec<&Transaction>>();
        let means = mean_by(&refs, |row| row.product_line.clone(), |row| row.rating);
        assert_eq!(means.get("Moda").map(|moda| moda.mean), Some(7.0));
        assert_eq!(means.get("Moda").map(|moda| moda.total), Some(30.0));
        assert_eq!(means.get("Moda").map(|moda| moda.transactions), Some(3));
        assert!(!means.contains_key("Esportes e Viagens"));
    }

    #[test]
    fn compare_fills_missing_keys_with_zero() {
        let current = BTreeMap::from([("a".to_string(), 5_i64)]);
        let previous = BTreeMap::from([("b".to_string(), 3_i64)]);
        let comparison = compare(current, &previous, false);
        assert_eq!(comparison.get(&"a".to_string()), Some((5, Delta::Change(5))));
        assert_eq!(comparison.get(&"b".to_string()), Some((0, Delta::Change(-3))));
    }

    #[test]
    fn compare_on_first_day_keeps_current_keys_only() {
        let current = BTreeMap::from([("a".to_string(), 5_i64)]);
        let comparison = compare(current, &BTreeMap::new(), true);
        assert_eq!(comparison.len(), 1);
        assert_eq!(
            comparison.get(&"a".to_string()),
            Some((5, Delta::NotApplicable))
        );
    }

    #[test]
    fn crosstab_covers_row_and_column_unions() {
        let mut member = sale("2026-01-06", "Manaus", 10.0, 1);
        member.customer_type = "Membro".to_string();
        let today = [member, sale("2026-01-06", "Manaus", 10.0, 1)];
        let yesterday = [sale("2026-01-05", "Rio de Janeiro", 10.0, 1)];
        let today_refs = today.iter().collect::<Vec<&Transaction>>();
        let yesterday_refs = yesterday.iter().collect::<Vec<&Transaction>>();

        let rows = [Dimension::City];
        let crosstab = compare_crosstab(
            &rows,
            Dimension::CustomerType,
            count_matrix(&today_refs, &rows, Dimension::CustomerType),
            &count_matrix(&yesterday_refs, &rows, Dimension::CustomerType),
            false,
        );
        assert_eq!(crosstab.row_keys.len(), 2);
        assert_eq!(crosstab.column_keys, vec!["Membro".to_string(), "Normal".to_string()]);
        assert_eq!(crosstab.cell(&["Manaus"], "Membro"), Some((1, Delta::Change(1))));
        assert_eq!(
            crosstab.cell(&["Rio de Janeiro"], "Normal"),
            Some((0, Delta::Change(-1)))
        );
        assert_eq!(
            crosstab.cell(&["Rio de Janeiro"], "Membro"),
            Some((0, Delta::Change(0)))
        );
    }
}
