use super::month::MonthCursor;

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// The grid always shows six full weeks, whatever the month
pub(crate) const GRID_WEEKS: usize = 6;

pub(crate) const GRID_CELLS: usize = DAYS_IN_WEEK * GRID_WEEKS;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cell {
    /// Padding before day 1 or after the last day; never interactive
    Empty,
    Day(u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    cursor: MonthCursor,
    cells: [Cell; GRID_CELLS],
}

impl MonthGrid {
    pub(crate) fn new(cursor: MonthCursor) -> MonthGrid {
        // At most 6 leading cells + 31 days, so the trailing padding can
        // never go negative.
        let offset = usize::from(cursor.first_weekday_offset());
        let mut cells = [Cell::Empty; GRID_CELLS];
        for (slot, day) in cells[offset..].iter_mut().zip(1..=cursor.days_in_month()) {
            *slot = Cell::Day(day);
        }
        let grid = MonthGrid { cursor, cells };
        debug_assert_eq!(
            grid.leading_empty() + usize::from(cursor.days_in_month()) + grid.trailing_empty(),
            GRID_CELLS
        );
        grid
    }

    pub(crate) fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub(crate) fn cells(&self) -> &[Cell; GRID_CELLS] {
        &self.cells
    }

    pub(crate) fn leading_empty(&self) -> usize {
        usize::from(self.cursor.first_weekday_offset())
    }

    pub(crate) fn trailing_empty(&self) -> usize {
        GRID_CELLS - self.leading_empty() - usize::from(self.cursor.days_in_month())
    }

    pub(crate) fn day_at(&self, index: usize) -> Option<u8> {
        match self.cells.get(index) {
            Some(Cell::Day(day)) => Some(*day),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn index_of(&self, day: u8) -> Option<usize> {
        (1..=self.cursor.days_in_month())
            .contains(&day)
            .then(|| self.leading_empty() + usize::from(day) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn every_month() -> impl Iterator<Item = MonthCursor> {
        (1990..=2030).flat_map(|year| {
            (1..=12u8).map(move |m| {
                MonthCursor::new(year, Month::try_from(m).unwrap()).unwrap()
            })
        })
    }

    #[test]
    fn test_always_42_cells() {
        for cursor in every_month() {
            let grid = MonthGrid::new(cursor);
            assert_eq!(grid.cells().len(), GRID_CELLS);
            let days = grid
                .cells()
                .iter()
                .filter(|c| matches!(c, Cell::Day(_)))
                .count();
            assert_eq!(days, usize::from(cursor.days_in_month()), "{cursor}");
            assert_eq!(
                grid.leading_empty() + days + grid.trailing_empty(),
                GRID_CELLS,
                "{cursor}"
            );
        }
    }

    #[test]
    fn test_leading_cells_are_empty() {
        for cursor in every_month() {
            let grid = MonthGrid::new(cursor);
            let lead = grid.leading_empty();
            assert!(grid.cells()[..lead].iter().all(|&c| c == Cell::Empty));
            assert_eq!(grid.cells()[lead], Cell::Day(1));
            let tail = GRID_CELLS - grid.trailing_empty();
            assert!(grid.cells()[tail..].iter().all(|&c| c == Cell::Empty));
        }
    }

    #[test]
    fn test_leap_february() {
        let cursor = MonthCursor::new(2024, Month::February).unwrap();
        let grid = MonthGrid::new(cursor);
        assert_eq!(cursor.days_in_month(), 29);
        let numbered = grid
            .cells()
            .iter()
            .filter_map(|c| match c {
                Cell::Day(d) => Some(*d),
                Cell::Empty => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(numbered, (1..=29).collect::<Vec<_>>());
        // Thursday start
        assert_eq!(grid.leading_empty(), 4);
        assert_eq!(grid.trailing_empty(), 9);
    }

    #[test]
    fn test_index_of_and_day_at() {
        let cursor = MonthCursor::new(2024, Month::March).unwrap();
        let grid = MonthGrid::new(cursor);
        // March 2024 starts on a Friday
        assert_eq!(grid.index_of(1), Some(5));
        assert_eq!(grid.day_at(5), Some(1));
        assert_eq!(grid.index_of(31), Some(35));
        assert_eq!(grid.day_at(35), Some(31));
        assert_eq!(grid.index_of(32), None);
        assert_eq!(grid.index_of(0), None);
        assert_eq!(grid.day_at(0), None);
        assert_eq!(grid.day_at(41), None);
        assert_eq!(grid.day_at(42), None);
    }
}
