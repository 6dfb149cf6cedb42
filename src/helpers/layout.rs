use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Column labels of the attendance grid, Monday first.
pub const WEEKDAY_LABELS: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("la fecha final ({end}) es anterior a la fecha de inicio ({start})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive reporting period. `start <= end` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LayoutError> {
        if end < start {
            return Err(LayoutError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Period label as printed on the sheet, e.g. `01/10/2025 al 31/10/2025`.
    pub fn label(&self) -> String {
        format!(
            "{} al {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// One weekday slot of a week row. The date is present only when the day
/// falls inside the requested period; otherwise the cell renders as the
/// label alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub label: &'static str,
    pub date: Option<NaiveDate>,
}

/// A Monday-through-Friday span of five day cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub cells: [DayCell; 5],
}

impl WeekRow {
    fn from_monday(monday: NaiveDate, range: &DateRange) -> Self {
        let cells = std::array::from_fn(|i| {
            let day = monday + Duration::days(i as i64);
            DayCell {
                label: WEEKDAY_LABELS[i],
                date: range.contains(day).then_some(day),
            }
        });
        Self { cells }
    }

    fn placeholder() -> Self {
        let cells = std::array::from_fn(|i| DayCell {
            label: WEEKDAY_LABELS[i],
            date: None,
        });
        Self { cells }
    }
}

/// Monday anchor of the first row. A Saturday start moves forward to the
/// next Monday and a Sunday start to the next day, so no row ever begins in
/// a weekend; any weekday start backs up to its own week's Monday.
fn first_monday(start: NaiveDate) -> NaiveDate {
    match start.weekday().num_days_from_monday() {
        5 => start + Duration::days(2),
        6 => start + Duration::days(1),
        offset => start - Duration::days(i64::from(offset)),
    }
}

/// Builds the week grid covering `range`. Rows are emitted while their
/// Monday does not pass the end of the period, and each cell carries a date
/// only when it lies inside the period. The result is never empty: a range
/// that produces no row (a weekend-only period) yields a single all-blank
/// placeholder row.
pub fn build_grid(range: &DateRange) -> Vec<WeekRow> {
    let mut rows = Vec::new();
    let mut monday = first_monday(range.start);

    while monday <= range.end {
        rows.push(WeekRow::from_monday(monday, range));
        monday += Duration::days(7);
    }

    if rows.is_empty() {
        rows.push(WeekRow::placeholder());
    }

    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Date,
    Signature,
}

/// A physical render row: five cell texts plus its fixed height.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: [String; 5],
    pub height: f32,
    pub kind: RowKind,
}

/// Page dimensions and fixed band heights for one rendering pass.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub header_band_height: f32,
    pub date_row_height: f32,
    pub signature_row_height: f32,
    pub footer_reserve: f32,
}

impl Default for PageGeometry {
    /// US letter in points.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_left: 54.0,
            margin_right: 54.0,
            margin_top: 36.0,
            margin_bottom: 64.0,
            header_band_height: 22.0,
            date_row_height: 30.0,
            signature_row_height: 24.0,
            footer_reserve: 48.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }
}

/// Expands each week row into a dated row followed by a blank signature row
/// beneath it, so the printed grid can be signed day by day. Output length
/// is exactly twice the grid length.
pub fn expand_rows(grid: &[WeekRow], geometry: &PageGeometry) -> Vec<SheetRow> {
    let mut rows = Vec::with_capacity(grid.len() * 2);

    for week in grid {
        let cells = std::array::from_fn(|i| {
            let cell = &week.cells[i];
            match cell.date {
                Some(day) => format!("{}\n{}", cell.label, day.format("%d/%m/%Y")),
                None => cell.label.to_string(),
            }
        });
        rows.push(SheetRow {
            cells,
            height: geometry.date_row_height,
            kind: RowKind::Date,
        });
        rows.push(SheetRow {
            cells: Default::default(),
            height: geometry.signature_row_height,
            kind: RowKind::Signature,
        });
    }

    rows
}

/// One page worth of rows and the vertical space they consume.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub rows: Vec<SheetRow>,
    pub content_height: f32,
}

/// Greedy first-fit pagination. Rows accumulate on the current page while
/// their cumulative height stays within the available space minus the
/// reserved floor; a row that does not fit closes the page and opens the
/// next one with `available_rest`. Every page receives at least one row, so
/// the loop is bounded by the input length even when a single row is taller
/// than the page itself.
pub fn paginate(
    rows: Vec<SheetRow>,
    available_first: f32,
    available_rest: f32,
    reserve: f32,
) -> Vec<PageLayout> {
    let mut pages = Vec::new();
    let mut current: Vec<SheetRow> = Vec::new();
    let mut used = 0.0_f32;
    let mut available = available_first;

    for row in rows {
        let fits = used + row.height <= available - reserve;
        if !fits && !current.is_empty() {
            pages.push(PageLayout {
                rows: std::mem::take(&mut current),
                content_height: used,
            });
            used = 0.0;
            available = available_rest;
        }
        used += row.height;
        current.push(row);
    }

    if !current.is_empty() {
        pages.push(PageLayout {
            rows: current,
            content_height: used,
        });
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    fn in_range_dates(grid: &[WeekRow]) -> Vec<NaiveDate> {
        grid.iter()
            .flat_map(|row| row.cells.iter().filter_map(|c| c.date))
            .collect()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date(2025, 10, 2), date(2025, 10, 1)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRange { .. }));
    }

    #[test]
    fn mid_week_start_backs_up_to_monday() {
        // 2025-10-01 is a Wednesday; its week's Monday is 2025-09-29.
        let grid = build_grid(&range(date(2025, 10, 1), date(2025, 10, 31)));

        let first = &grid[0];
        assert_eq!(first.cells[0].date, None);
        assert_eq!(first.cells[1].date, None);
        assert_eq!(first.cells[2].date, Some(date(2025, 10, 1)));
    }

    #[test]
    fn saturday_start_skips_to_following_monday() {
        // 2025-11-01 is a Saturday; the first row starts 2025-11-03.
        let grid = build_grid(&range(date(2025, 11, 1), date(2025, 11, 30)));
        assert_eq!(grid[0].cells[0].date, Some(date(2025, 11, 3)));
    }

    #[test]
    fn sunday_start_skips_to_next_day() {
        // 2025-11-02 is a Sunday.
        let grid = build_grid(&range(date(2025, 11, 2), date(2025, 11, 14)));
        assert_eq!(grid[0].cells[0].date, Some(date(2025, 11, 3)));
    }

    #[test]
    fn in_range_cells_cover_every_weekday_exactly_once() {
        let period = range(date(2025, 10, 1), date(2025, 10, 31));
        let mut got = in_range_dates(&build_grid(&period));

        let mut expected: Vec<NaiveDate> = (0..31)
            .map(|i| period.start + Duration::days(i))
            .filter(|d| d.weekday().num_days_from_monday() < 5)
            .collect();

        got.sort();
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn single_monday_range_has_one_row_with_one_date() {
        // 2025-10-06 is a Monday.
        let grid = build_grid(&range(date(2025, 10, 6), date(2025, 10, 6)));

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].cells[0].date, Some(date(2025, 10, 6)));
        for cell in &grid[0].cells[1..] {
            assert_eq!(cell.date, None);
        }
    }

    #[test]
    fn weekend_only_range_yields_placeholder_row() {
        // Saturday through Sunday: no Monday lands inside the range.
        let grid = build_grid(&range(date(2025, 11, 1), date(2025, 11, 2)));

        assert_eq!(grid.len(), 1);
        assert!(grid[0].cells.iter().all(|c| c.date.is_none()));
        assert_eq!(grid[0].cells[0].label, "Lunes");
    }

    #[test]
    fn expander_doubles_rows_and_alternates_kinds() {
        let geometry = PageGeometry::default();
        let grid = build_grid(&range(date(2025, 10, 1), date(2025, 10, 31)));
        let rows = expand_rows(&grid, &geometry);

        assert_eq!(rows.len(), grid.len() * 2);
        for pair in rows.chunks(2) {
            assert_eq!(pair[0].kind, RowKind::Date);
            assert_eq!(pair[0].height, geometry.date_row_height);
            assert_eq!(pair[1].kind, RowKind::Signature);
            assert_eq!(pair[1].height, geometry.signature_row_height);
            assert!(pair[1].cells.iter().all(String::is_empty));
        }
    }

    #[test]
    fn expander_formats_dated_and_blank_cells() {
        let geometry = PageGeometry::default();
        let grid = build_grid(&range(date(2025, 10, 6), date(2025, 10, 6)));
        let rows = expand_rows(&grid, &geometry);

        assert_eq!(rows[0].cells[0], "Lunes\n06/10/2025");
        assert_eq!(rows[0].cells[1], "Martes");
    }

    #[test]
    fn paginator_partitions_input_in_order() {
        let geometry = PageGeometry::default();
        let grid = build_grid(&range(date(2025, 1, 6), date(2025, 6, 27)));
        let rows = expand_rows(&grid, &geometry);
        let original = rows.clone();

        let pages = paginate(rows, 400.0, 400.0, 48.0);
        assert!(pages.len() > 1);

        let rejoined: Vec<SheetRow> = pages.into_iter().flat_map(|p| p.rows).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn paginator_respects_reserve_floor() {
        let geometry = PageGeometry::default();
        let grid = build_grid(&range(date(2025, 10, 1), date(2025, 10, 31)));
        let rows = expand_rows(&grid, &geometry);

        let pages = paginate(rows, 100.0, 100.0, 40.0);
        for page in &pages {
            // Anything past the first row only fit inside available - reserve.
            if page.rows.len() > 1 {
                assert!(page.content_height <= 60.0);
            }
        }
    }

    #[test]
    fn paginator_places_one_row_per_page_when_nothing_fits() {
        let geometry = PageGeometry::default();
        let grid = build_grid(&range(date(2025, 10, 1), date(2025, 10, 31)));
        let rows = expand_rows(&grid, &geometry);
        let total = rows.len();

        // Degenerate available height: still terminates, one row per page.
        let pages = paginate(rows, 0.0, 0.0, 10.0);
        assert_eq!(pages.len(), total);
        assert!(pages.iter().all(|p| p.rows.len() == 1));
    }
}
