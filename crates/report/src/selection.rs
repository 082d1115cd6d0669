//! Row selections and per-method grouping for the four charts.

use common::ReportResult;

use crate::model::{NormalizedRow, ReportTable};
use crate::units::allocated_to_kb;

pub const FILL_PATTERN: &str = "Fill";
pub const FOREACH_PATTERN: &str = "ForEach";
pub const READ_METHODS: [&str; 2] = ["GetRow", "GetColumn"];

/// Предикат отбора строк
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'p> {
    /// `Method` содержит подстроку (с учётом регистра)
    MethodContains(&'p str),
    /// `Method` точно совпадает с одним из имён
    MethodIn(&'p [&'p str]),
    /// Колонка `Allocated` заполнена
    AllocatedPresent,
}

impl Selector<'_> {
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        match self {
            Selector::MethodContains(pattern) => {
                row.method().is_some_and(|method| method.contains(*pattern))
            }
            Selector::MethodIn(names) => row
                .method()
                .is_some_and(|method| names.contains(&method)),
            Selector::AllocatedPresent => row.allocated().is_some(),
        }
    }

    /// Отобрать строки таблицы, сохраняя порядок
    pub fn select<'t>(&self, table: &'t ReportTable) -> Vec<&'t NormalizedRow> {
        table.rows().iter().filter(|row| self.matches(row)).collect()
    }
}

/// Строки одного метода внутри выборки, в порядке файла
#[derive(Debug, Clone, PartialEq)]
pub struct MethodGroup<'t> {
    pub method: &'t str,
    pub rows: Vec<&'t NormalizedRow>,
}

impl<'t> MethodGroup<'t> {
    /// Точки `(Size, Mean_us)`
    pub fn timings(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.rows.iter().map(|row| (row.size(), row.mean_us))
    }

    /// Точки `(Size, Allocated KB)`; строки без `Allocated` пропускаются
    pub fn allocations(&self) -> impl Iterator<Item = ReportResult<(u32, f64)>> + '_ {
        self.rows.iter().filter_map(|row| {
            row.allocated()
                .map(|allocated| allocated_to_kb(allocated).map(|kb| (row.size(), kb)))
        })
    }
}

/// Сгруппировать строки по значению `Method` в порядке первого появления.
/// Строки без `Method` не попадают ни в одну группу.
pub fn group_by_method<'t>(rows: &[&'t NormalizedRow]) -> Vec<MethodGroup<'t>> {
    let mut groups: Vec<MethodGroup<'t>> = Vec::new();

    for &row in rows {
        let Some(method) = row.method() else {
            continue;
        };
        match groups.iter_mut().find(|group| group.method == method) {
            Some(group) => group.rows.push(row),
            None => groups.push(MethodGroup {
                method,
                rows: vec![row],
            }),
        }
    }

    groups
}

/// Отобрать и сгруппировать за один шаг
pub fn select_groups<'t>(table: &'t ReportTable, selector: Selector<'_>) -> Vec<MethodGroup<'t>> {
    group_by_method(&selector.select(table))
}

/// Группы для графика памяти: методы Fill, пересечённые со строками,
/// где заполнено `Allocated`. Методы с пустым пересечением пропускаются.
pub fn memory_groups(table: &ReportTable) -> Vec<MethodGroup<'_>> {
    let allocated = Selector::AllocatedPresent.select(table);

    select_groups(table, Selector::MethodContains(FILL_PATTERN))
        .into_iter()
        .filter_map(|fill| {
            let rows: Vec<&NormalizedRow> = allocated
                .iter()
                .copied()
                .filter(|row| row.method() == Some(fill.method))
                .collect();
            if rows.is_empty() {
                tracing::debug!(method = fill.method, "No allocation data, skipping");
                None
            } else {
                Some(MethodGroup {
                    method: fill.method,
                    rows,
                })
            }
        })
        .collect()
}
