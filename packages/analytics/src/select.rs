//! Row selection by per-column accepted-value sets.

use dashbike_accident_models::Column;
use dashbike_analytics_models::{Restriction, Selection};
use dashbike_dataset::TableView;

use crate::AnalyticsError;

/// Keeps the rows that satisfy every restriction of `selection`.
///
/// Restrictions are combined with AND across columns and OR within one
/// column's accepted set. Unrestricted columns are skipped.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if an active restriction
/// targets a column absent from the table.
pub fn select<'a>(
    view: &TableView<'a>,
    selection: &Selection,
) -> Result<TableView<'a>, AnalyticsError> {
    let table = view.table();
    let active: Vec<(Column, &Restriction)> = selection.active().collect();

    if let Some((column, _)) = active.iter().find(|(c, _)| !table.has_column(*c)) {
        return Err(AnalyticsError::UnknownColumn {
            column: column.to_string(),
        });
    }

    if active.is_empty() {
        return Ok(view.clone());
    }

    let selected = view.retain(|record| {
        active
            .iter()
            .all(|(column, restriction)| restriction.accepts(record.key(*column).as_deref()))
    });

    log::trace!(
        "Selection over {} columns kept {} of {} rows",
        active.len(),
        selected.len(),
        view.len()
    );

    Ok(selected)
}

/// Builds a selection from multi-select controls.
///
/// A control left empty or set to "all" places no restriction on its
/// column; otherwise its values become the column's accepted set.
#[must_use]
pub fn build_selection<I>(controls: I) -> Selection
where
    I: IntoIterator<Item = (Column, Restriction)>,
{
    controls
        .into_iter()
        .fold(Selection::new(), |selection, (column, restriction)| {
            let restriction = match restriction {
                Restriction::OneOf(values) if values.is_empty() => Restriction::Unrestricted,
                other => other,
            };
            selection.with(column, restriction)
        })
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity};

    use super::*;
    use crate::fixtures::{record, table};

    #[test]
    fn killed_in_2020_among_noise() {
        let mut records: Vec<_> = (0..10)
            .map(|_| record(2020, Month::Juin, Severity::Killed))
            .collect();
        for i in 0..5000 {
            let severity = if i % 2 == 0 {
                Severity::Killed
            } else {
                Severity::LightlyInjured
            };
            let year = if i % 2 == 0 { 2019 } else { 2020 };
            records.push(record(year, Month::Juin, severity));
        }
        let table = table(records);

        let selection = Selection::new()
            .with_values(Column::Year, ["2020"])
            .with_values(Column::Severity, [Severity::Killed.to_string()]);
        let selected = select(&table.view(), &selection).unwrap();
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn filtering_never_grows_and_is_idempotent() {
        let table = table(vec![
            record(2019, Month::Mars, Severity::Killed),
            record(2020, Month::Mars, Severity::Uninjured),
            record(2021, Month::Avril, Severity::Killed),
        ]);
        let selection = Selection::new().with_values(Column::Month, ["mars"]);

        let once = select(&table.view(), &selection).unwrap();
        let twice = select(&once, &selection).unwrap();
        assert!(once.len() <= table.len());
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn empty_accepted_set_matches_nothing() {
        let table = table(vec![record(2019, Month::Mars, Severity::Killed)]);
        let selection =
            Selection::new().with(Column::Year, Restriction::one_of(Vec::<String>::new()));
        assert!(select(&table.view(), &selection).unwrap().is_empty());
    }

    #[test]
    fn unknown_column_fails() {
        let table = table(vec![record(2019, Month::Mars, Severity::Killed)]);
        let selection = Selection::new().with_values(Column::Weather, ["Normale"]);
        let err = select(&table.view(), &selection).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownColumn { ref column } if column == "atm"));

        let unrestricted = Selection::new().with(Column::Weather, Restriction::Unrestricted);
        assert_eq!(select(&table.view(), &unrestricted).unwrap().len(), 1);
    }

    #[test]
    fn controls_left_empty_are_unrestricted() {
        let selection = build_selection([
            (Column::Year, Restriction::one_of(["2020", "2021"])),
            (Column::Month, Restriction::one_of(Vec::<String>::new())),
            (Column::Weekday, Restriction::Unrestricted),
        ]);
        assert_eq!(selection.active().count(), 1);

        let table = table(vec![
            record(2020, Month::Mars, Severity::Killed),
            record(2019, Month::Mars, Severity::Killed),
        ]);
        assert_eq!(select(&table.view(), &selection).unwrap().len(), 1);
    }
}
