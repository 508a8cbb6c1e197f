//! Chart series for temperature and heart rate trends.

use crate::model::HealthRecord;

const TEMPERATURE_PADDING: f64 = 0.5;
const HEART_RATE_PADDING: f64 = 5.0;

/// Plot-ready series over a record collection, in collection order.
///
/// The x coordinate of a point is the record's position; `labels` holds the
/// matching dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<(f64, f64)>,
    pub heart_rate: Vec<(f64, f64)>,
}

impl TrendSeries {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a HealthRecord>) -> Self {
        let mut series = Self::default();
        for (idx, record) in records.into_iter().enumerate() {
            let x = idx as f64;
            series.labels.push(record.date.clone());
            series.temperature.push((x, record.temperature));
            series.heart_rate.push((x, f64::from(record.heart_rate)));
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// X axis range; never zero-width so a single point still renders.
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.len().saturating_sub(1).max(1);
        [0.0, last as f64]
    }

    /// Padded temperature axis range.
    pub fn temperature_bounds(&self) -> [f64; 2] {
        padded_bounds(&self.temperature, TEMPERATURE_PADDING)
    }

    /// Padded heart rate axis range.
    pub fn heart_rate_bounds(&self) -> [f64; 2] {
        padded_bounds(&self.heart_rate, HEART_RATE_PADDING)
    }

    /// Min, max and mean of the temperature series.
    pub fn temperature_summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::of(&self.temperature)
    }

    /// Min, max and mean of the heart rate series.
    pub fn heart_rate_summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::of(&self.heart_rate)
    }
}

/// Basic statistics of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesSummary {
    fn of(points: &[(f64, f64)]) -> Option<Self> {
        let (min, max) = value_range(points)?;
        let total: f64 = points.iter().map(|(_, y)| y).sum();
        Some(Self {
            min,
            max,
            mean: total / points.len() as f64,
        })
    }
}

fn value_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    points.iter().fold(None, |range, (_, y)| match range {
        None => Some((*y, *y)),
        Some((min, max)) => Some((min.min(*y), max.max(*y))),
    })
}

fn padded_bounds(points: &[(f64, f64)], padding: f64) -> [f64; 2] {
    match value_range(points) {
        Some((min, max)) => [min - padding, max + padding],
        None => [0.0, 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::TrendSeries;
    use crate::model::{Category, HealthRecord, RecordId};
    use pretty_assertions::assert_eq;

    fn record(date: &str, temperature: f64, heart_rate: u32) -> HealthRecord {
        HealthRecord {
            id: RecordId::new(date),
            date: date.to_string(),
            category: Category::General,
            temperature,
            blood_pressure: "120/80".to_string(),
            heart_rate,
        }
    }

    #[test]
    fn builds_points_in_collection_order() {
        let records = vec![
            record("2024-01-02", 37.0, 80),
            record("2024-01-01", 36.0, 60),
        ];
        let series = TrendSeries::from_records(&records);
        assert_eq!(series.labels, vec!["2024-01-02", "2024-01-01"]);
        assert_eq!(series.temperature, vec![(0.0, 37.0), (1.0, 36.0)]);
        assert_eq!(series.heart_rate, vec![(0.0, 80.0), (1.0, 60.0)]);
        assert_eq!(series.temperature_bounds(), [35.5, 37.5]);
        assert_eq!(series.heart_rate_bounds(), [55.0, 85.0]);
        let summary = series.heart_rate_summary().expect("summary");
        assert_eq!(summary.mean, 70.0);
    }

    #[test]
    fn empty_and_single_point_series_have_usable_bounds() {
        let empty = TrendSeries::from_records(&Vec::<HealthRecord>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.x_bounds(), [0.0, 1.0]);
        assert_eq!(empty.temperature_summary(), None);

        let single = TrendSeries::from_records(&[record("2024-01-01", 36.5, 70)]);
        assert_eq!(single.x_bounds(), [0.0, 1.0]);
        assert_eq!(single.temperature_bounds(), [36.0, 37.0]);
    }
}
