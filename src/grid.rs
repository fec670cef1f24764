//! ### Grid
//! The daily time grid and the dense alignment of sparse samples
//! onto it. Ticks are epoch milliseconds throughout.

use crate::load::HeatPumpRecord;
use anyhow::{anyhow, bail};
use chrono::{Datelike, Local, TimeZone, Utc};
use std::collections::HashMap;

/// Ordered ticks stepping from `min` up to and including the first
/// value `>= max`. `min == max` yields a single tick.
pub fn time_grid(min: i64, max: i64, interval: i64) -> anyhow::Result<Vec<i64>> {
    if interval <= 0 {
        bail!("tickInterval must be positive, got {interval}");
    }
    if max < min {
        bail!("xAxis max {max} precedes min {min}");
    }
    let mut ticks = vec![min];
    let mut tick = min;
    while tick < max {
        tick += interval;
        ticks.push(tick);
    }
    Ok(ticks)
}

/// Timezone in which a tick becomes its day-of-month label. The
/// export's ticks are plain epoch milliseconds, so the same tick can
/// label differently across zones; `Local` reproduces what the portal
/// showed on the machine that exported the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelZone {
    Local,
    Utc,
}

impl LabelZone {
    /// Zero-padded two-digit day of month for one tick.
    pub fn day_label(self, tick: i64) -> anyhow::Result<String> {
        let day = match self {
            LabelZone::Local => Local.timestamp_millis_opt(tick).earliest().map(|dt| dt.day()),
            LabelZone::Utc => Utc.timestamp_millis_opt(tick).earliest().map(|dt| dt.day()),
        }
        .ok_or_else(|| anyhow!("tick {tick} has no representable time in {self:?}"))?;
        Ok(format!("{day:02}"))
    }

    pub fn day_labels(self, grid: &[i64]) -> anyhow::Result<Vec<String>> {
        grid.iter().map(|&tick| self.day_label(tick)).collect()
    }
}

/// Reindexes sparse samples onto the grid: output has the grid's
/// length and order, 0.0 wherever the grid tick carries no sample,
/// and the last sample wins when a tick repeats.
pub fn align_to_grid(sparse: &[(i64, f64)], grid: &[i64]) -> Vec<f64> {
    let samples: HashMap<i64, f64> = sparse.iter().copied().collect();
    grid.iter()
        .map(|tick| samples.get(tick).copied().unwrap_or(0.0))
        .collect()
}

/// Keyed variant of [`align_to_grid`] for the heat pump log: rows are
/// matched to grid positions by their two-digit day-of-month, and the
/// Wh cells come out as kWh. Returns (heating, hot water).
pub fn align_by_day(
    records: &[HeatPumpRecord],
    labels: &[String],
) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    let mut by_day: HashMap<&str, (f64, f64)> = HashMap::new();
    for rec in records {
        if rec.date.len() < 10 {
            bail!("heat pump date {:?} is shorter than YYYY-MM-DD", rec.date);
        }
        by_day.insert(&rec.date[8..10], (rec.heating_wh, rec.hot_water_wh));
    }

    let mut heating = Vec::with_capacity(labels.len());
    let mut hot_water = Vec::with_capacity(labels.len());
    for label in labels {
        let (heat_wh, water_wh) = by_day.get(label.as_str()).copied().unwrap_or((0.0, 0.0));
        heating.push(heat_wh / 1000.0);
        hot_water.push(water_wh / 1000.0);
    }
    Ok((heating, hot_water))
}
