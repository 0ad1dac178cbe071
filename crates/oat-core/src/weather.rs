use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of days looked back before a de-energization event.
pub const LOOKBACK_DAYS: usize = 5;

/// One daily row of a per-event weather file. Measurements may be absent for
/// individual days; an empty cell deserializes to `None` rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub time: NaiveDate,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub wspd: Option<f64>,
}

/// Measurements for a single lookback day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayMeasures {
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub wspd: Option<f64>,
}

/// The five-day lookback window for one event. `days[0]` is d-5 (five days
/// before the event) and `days[4]` is d-1. Days with no matching observation
/// keep all three fields `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherWindow {
    days: [DayMeasures; LOOKBACK_DAYS],
}

impl WeatherWindow {
    /// Measurements for the day `offset` days before the event (1..=LOOKBACK_DAYS).
    pub fn day(&self, offset: usize) -> Option<&DayMeasures> {
        if (1..=LOOKBACK_DAYS).contains(&offset) {
            Some(&self.days[LOOKBACK_DAYS - offset])
        } else {
            None
        }
    }

    /// Record an observation at `offset` days before the event. Offsets
    /// outside 1..=LOOKBACK_DAYS are ignored.
    pub fn record(&mut self, offset: i64, observation: &WeatherObservation) {
        if offset < 1 || offset > LOOKBACK_DAYS as i64 {
            return;
        }
        let day = &mut self.days[LOOKBACK_DAYS - offset as usize];
        day.tmin = observation.tmin;
        day.tmax = observation.tmax;
        day.wspd = observation.wspd;
    }

    /// Flatten to the canonical column order of
    /// [`crate::schema::weather_feature_columns`]: tmin/tmax/wspd for d-5
    /// first, d-1 last.
    pub fn values(&self) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(LOOKBACK_DAYS * 3);
        for day in &self.days {
            out.push(day.tmin);
            out.push(day.tmax);
            out.push(day.wspd);
        }
        out
    }
}

/// One assembled weather feature row: the event identity from the weather
/// file name plus its filled lookback window.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherEvent {
    pub index: i64,
    pub circuit_name: String,
    pub event_date: NaiveDate,
    pub window: WeatherWindow,
}
