//! Flight summary statistics
//!
//! Derived values shown as badges next to the chat: flight duration,
//! altitude range and battery voltage range. They are a pure function of
//! [`FlightData`] and are recomputed in full whenever the data changes.

use crate::flight_data::{FlightData, TelemetryRecord};
use serde::Serialize;

/// Message type carrying GPS fixes
pub const GPS: &str = "GPS";
/// Message type carrying attitude (and altitude)
pub const ATT: &str = "ATT";
/// Message type carrying battery readings
pub const BAT: &str = "BAT";
/// Message type carrying events
pub const EV: &str = "EV";

/// Inclusive min/max of a telemetry field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Min/max of `field` over the records that define it numerically
    ///
    /// Returns `None` when no record carries the field.
    pub fn of_field(records: &[TelemetryRecord], field: &str) -> Option<Self> {
        records
            .iter()
            .filter_map(|r| r.number(field))
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    Some(range) => Self {
                        min: range.min.min(v),
                        max: range.max.max(v),
                    },
                    None => Self { min: v, max: v },
                })
            })
    }

    /// Render as `"<min><unit> - <max><unit>"`
    ///
    /// # Examples
    ///
    /// ```
    /// use flightchat::summary::ValueRange;
    ///
    /// let range = ValueRange { min: 1.0, max: 5.25 };
    /// assert_eq!(range.label("m"), "1.0m - 5.25m");
    /// ```
    pub fn label(&self, unit: &str) -> String {
        format!(
            "{}{unit} - {}{unit}",
            format_measurement(self.min),
            format_measurement(self.max),
        )
    }
}

/// Render a measurement with one or two decimal places
///
/// Values are rounded to two decimals and trailing zeros are dropped, keeping
/// at least one decimal. Telemetry decoded from single-precision fields would
/// otherwise print its widening noise.
pub fn format_measurement(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Summary badges derived from a [`FlightData`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSummary {
    /// Seconds between the first and last GPS record
    pub duration: Option<f64>,
    /// Range of ATT `alt`, in meters
    pub altitude_range: Option<ValueRange>,
    /// Range of BAT `volt`, in volts
    pub battery_range: Option<ValueRange>,
    /// Number of GPS records
    pub gps_points: usize,
    /// Number of EV records
    pub event_count: usize,
}

impl FlightSummary {
    /// Compute the summary of a flight
    ///
    /// # Examples
    ///
    /// ```
    /// use flightchat::flight_data::FlightData;
    /// use flightchat::summary::FlightSummary;
    ///
    /// let data = FlightData::from_json_str(
    ///     r#"{"GPS": [{"timestamp": 10.0}, {"timestamp": 70.0}]}"#,
    /// ).unwrap();
    /// assert_eq!(FlightSummary::compute(&data).duration, Some(60.0));
    /// ```
    pub fn compute(data: &FlightData) -> Self {
        let gps = data.series(GPS).unwrap_or_default();
        let duration = match (gps.first(), gps.last()) {
            (Some(first), Some(last)) => match (first.timestamp(), last.timestamp()) {
                (Some(start), Some(end)) => Some(end - start),
                _ => None,
            },
            _ => None,
        };

        Self {
            duration,
            altitude_range: data
                .series(ATT)
                .and_then(|records| ValueRange::of_field(records, "alt")),
            battery_range: data
                .series(BAT)
                .and_then(|records| ValueRange::of_field(records, "volt")),
            gps_points: gps.len(),
            event_count: data.series(EV).map_or(0, <[_]>::len),
        }
    }

    /// Whether no badge has a value
    pub fn is_empty(&self) -> bool {
        self.duration.is_none() && self.altitude_range.is_none() && self.battery_range.is_none()
    }

    /// Duration badge, e.g. `"60.5s"`
    pub fn duration_label(&self) -> Option<String> {
        self.duration.map(|d| format!("{:.1}s", d))
    }

    /// Altitude badge, e.g. `"1.0m - 5.25m"`
    pub fn altitude_label(&self) -> Option<String> {
        self.altitude_range.map(|r| r.label("m"))
    }

    /// Battery badge, e.g. `"10.8V - 12.6V"`
    pub fn battery_label(&self) -> Option<String> {
        self.battery_range.map(|r| r.label("V"))
    }
}

/// Plain-text flight context, one fact per line
///
/// This is the same digest the chat backend hands to its language model,
/// so the user can see what the assistant knows about the flight.
pub fn flight_context(data: &FlightData) -> String {
    let summary = FlightSummary::compute(data);
    let mut context = Vec::new();

    if summary.gps_points > 0 {
        if let Some(duration) = summary.duration {
            context.push(format!("Flight duration: {:.1} seconds", duration));
        }
        context.push(format!("GPS points: {}", summary.gps_points));
    }

    if let Some(alt) = summary.altitude_range {
        context.push(format!("Altitude range: {:.1}m to {:.1}m", alt.min, alt.max));
    }

    if let Some(volt) = summary.battery_range {
        context.push(format!(
            "Battery voltage range: {:.1}V to {:.1}V",
            volt.min, volt.max
        ));
    }

    if summary.event_count > 0 {
        context.push(format!("Number of events: {}", summary.event_count));
    }

    context.join("\n")
}
