//! Single-pixel noise suppression.
//!
//! Differences are flagged row by row. A compared difference is kept only if
//! one of its 8 neighbors is flagged too; isolated pixels are retracted. Row
//! `y - 1` is finalized once row `y` has been scanned, so three rows of flags
//! are kept in a rotating window. [`NoiseFilter::finish`] flushes the last row
//! against its predecessor alone.

/// Flag state of one pixel in a [`DiffRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    Clean,
    /// Mismatch found by the comparator; may be retracted.
    Compared,
    /// Out of bounds of the smaller image; always kept.
    Forced,
}

/// Flags for one scanned row.
#[derive(Debug, Clone)]
pub(crate) struct DiffRow {
    marks: Vec<Mark>,
    /// Flagged x coordinates in ascending order.
    flagged: Vec<usize>,
}

impl DiffRow {
    fn new(width: usize) -> Self {
        Self {
            marks: vec![Mark::Clean; width],
            flagged: Vec::new(),
        }
    }

    fn clear(&mut self) {
        for &x in &self.flagged {
            self.marks[x] = Mark::Clean;
        }
        self.flagged.clear();
    }

    #[inline]
    fn is_flagged(&self, x: usize) -> bool {
        self.marks.get(x).is_some_and(|&m| m != Mark::Clean)
    }

    /// Whether any of `x - 1`, `x`, `x + 1` is flagged.
    fn any_near(&self, x: usize) -> bool {
        (x.saturating_sub(1)..=x + 1).any(|nx| self.is_flagged(nx))
    }
}

/// Outcome for one finalized row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FinalizedRow {
    pub y: usize,
    /// Differences that survive suppression.
    pub retained: Vec<usize>,
    /// Isolated compared differences to undo.
    pub retracted: Vec<usize>,
}

/// Three-row sliding window over flagged differences.
#[derive(Debug)]
pub(crate) struct NoiseFilter {
    /// `[y - 2, y - 1, y]` relative to the row being scanned.
    rows: [DiffRow; 3],
    /// Row currently being scanned.
    current: Option<usize>,
}

impl NoiseFilter {
    pub fn new(width: usize) -> Self {
        Self {
            rows: [DiffRow::new(width), DiffRow::new(width), DiffRow::new(width)],
            current: None,
        }
    }

    /// Starts row `y`. Rows must be started in increasing order without gaps.
    pub fn begin_row(&mut self, y: usize) {
        debug_assert_eq!(self.current.map_or(0, |c| c + 1), y);
        self.rows.rotate_left(1);
        self.rows[2].clear();
        self.current = Some(y);
    }

    /// Flags `x` in the current row.
    ///
    /// Returns `true` if an already flagged neighbor exists (left in the
    /// current row, or any of the three above), in which case both pixels are
    /// guaranteed to survive suppression.
    pub fn mark(&mut self, x: usize, mark: Mark) -> bool {
        debug_assert!(mark != Mark::Clean);
        let [_, previous, current] = &mut self.rows;
        let connected = previous.any_near(x) || (x > 0 && current.is_flagged(x - 1));
        current.marks[x] = mark;
        current.flagged.push(x);
        connected
    }

    /// Finishes the current row and finalizes the one before it.
    pub fn end_row(&mut self) -> Option<FinalizedRow> {
        let y = self.current?;
        let previous_y = y.checked_sub(1)?;
        let [above, middle, below] = &self.rows;
        Some(finalize(previous_y, Some(above), middle, Some(below)))
    }

    /// Finalizes the last scanned row against its predecessor.
    pub fn finish(&mut self) -> Option<FinalizedRow> {
        let y = self.current.take()?;
        let [_, above, last] = &self.rows;
        let above = (y > 0).then_some(above);
        Some(finalize(y, above, last, None))
    }
}

fn finalize(
    y: usize,
    above: Option<&DiffRow>,
    row: &DiffRow,
    below: Option<&DiffRow>,
) -> FinalizedRow {
    let mut result = FinalizedRow {
        y,
        ..FinalizedRow::default()
    };
    for &x in &row.flagged {
        let keep = row.marks[x] == Mark::Forced
            || (x > 0 && row.is_flagged(x - 1))
            || row.is_flagged(x + 1)
            || above.is_some_and(|r| r.any_near(x))
            || below.is_some_and(|r| r.any_near(x));
        if keep {
            result.retained.push(x);
        } else {
            result.retracted.push(x);
        }
    }
    result
}
