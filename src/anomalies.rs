//! Heuristic anomaly scan over decoded telemetry
//!
//! Flags attitude jumps, degraded GPS fixes, low battery voltage and weak RC
//! signal. Fields missing from a record read as `0`, so a record without
//! `fix_type` is reported as a GPS loss.

use crate::flight_data::FlightData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attitude change between consecutive ATT records, in degrees
pub const ATTITUDE_JUMP_DEGREES: f64 = 45.0;
/// GPS fix types below this are considered degraded (3 = 3D fix)
pub const MIN_GPS_FIX_TYPE: f64 = 3.0;
/// Low battery threshold, assuming a 3S LiPo pack
pub const LOW_BATTERY_VOLTS: f64 = 10.5;
/// Weak RC signal threshold, percent
pub const WEAK_RSSI_PERCENT: f64 = 50.0;

/// Kind of anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    SuddenAttitudeChange,
    GpsSignalLoss,
    LowBattery,
    RcSignalWeak,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SuddenAttitudeChange => "sudden_attitude_change",
            Self::GpsSignalLoss => "gps_signal_loss",
            Self::LowBattery => "low_battery",
            Self::RcSignalWeak => "rc_signal_weak",
        };
        f.write_str(name)
    }
}

/// Severity of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A single flagged event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub timestamp: f64,
    pub severity: Severity,
    pub description: String,
}

/// Scan flight data for anomalies
///
/// Each series is scanned from its second record onwards, so the first
/// record of a series never produces an anomaly on its own. Results are
/// grouped by series (ATT, GPS, BAT, RCIN) and ordered by record within each.
pub fn detect_anomalies(data: &FlightData) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    if let Some(att) = data.series("ATT") {
        for pair in att.windows(2) {
            let roll_diff = (pair[1].number_or_zero("roll") - pair[0].number_or_zero("roll")).abs();
            let pitch_diff =
                (pair[1].number_or_zero("pitch") - pair[0].number_or_zero("pitch")).abs();

            if roll_diff > ATTITUDE_JUMP_DEGREES || pitch_diff > ATTITUDE_JUMP_DEGREES {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::SuddenAttitudeChange,
                    timestamp: pair[1].number_or_zero("timestamp"),
                    severity: Severity::High,
                    description: format!(
                        "Sudden attitude change detected: roll={:.1}°, pitch={:.1}°",
                        roll_diff, pitch_diff
                    ),
                });
            }
        }
    }

    if let Some(gps) = data.series("GPS") {
        for record in gps.iter().skip(1) {
            let fix_type = record.number_or_zero("fix_type");
            if fix_type < MIN_GPS_FIX_TYPE {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::GpsSignalLoss,
                    timestamp: record.number_or_zero("timestamp"),
                    severity: Severity::Medium,
                    description: format!("GPS signal degraded or lost (fix_type={})", fix_type),
                });
            }
        }
    }

    if let Some(bat) = data.series("BAT") {
        for record in bat.iter().skip(1) {
            let volt = record.number_or_zero("volt");
            if volt < LOW_BATTERY_VOLTS {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::LowBattery,
                    timestamp: record.number_or_zero("timestamp"),
                    severity: Severity::High,
                    description: format!("Low battery voltage: {:.1}V", volt),
                });
            }
        }
    }

    if let Some(rcin) = data.series("RCIN") {
        for record in rcin.iter().skip(1) {
            let rssi = record.number_or_zero("rssi");
            if rssi < WEAK_RSSI_PERCENT {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::RcSignalWeak,
                    timestamp: record.number_or_zero("timestamp"),
                    severity: Severity::Medium,
                    description: format!("Weak RC signal: {}%", rssi),
                });
            }
        }
    }

    tracing::debug!(count = anomalies.len(), "Anomaly scan finished");
    anomalies
}
