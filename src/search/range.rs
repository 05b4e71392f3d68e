use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

/// Inclusive date range. A range whose start is after its end matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Index of the first element whose date is not before `target`, or
/// `items.len()` when there is none. `items` must be date-ascending.
pub fn date_lower_bound<T>(items: &[T], target: NaiveDate, date_of: impl Fn(&T) -> NaiveDate) -> usize {
    let mut low = 0;
    let mut high = items.len();

    while low < high {
        let mid = low + (high - low) / 2;
        if date_of(&items[mid]) < target {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    low
}

/// Elements of a date-ascending slice that fall inside `range`.
///
/// Costs one binary search plus the size of the match.
pub fn range_scan<'a, T, F>(items: &'a [T], range: DateRange, date_of: F) -> impl Iterator<Item = &'a T> + 'a
where
    F: Fn(&T) -> NaiveDate + Copy + 'a,
{
    let first = if range.is_empty() {
        items.len()
    } else {
        date_lower_bound(items, range.start, date_of)
    };

    items[first..].iter().take_while(move |item| date_of(*item) <= range.end)
}

/// Sum and count of a stream of values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    pub sum: f64,
    pub count: usize,
}

impl RunningAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Zero when nothing was added.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl Extend<f64> for RunningAverage {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        for value in values {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for RunningAverage {
    fn from_iter<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut running = RunningAverage::new();
        running.extend(values);
        running
    }
}

/// The first `n` elements of a ranked slice, or all of them if there are fewer.
pub fn top_n<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..n.min(ranked.len())]
}
