//! ### Batch
//! Walks a `data/{year}/{month}.json` tree and renders one chart per
//! month found.

use crate::graph::{MonthChart, MonthSeries};
use crate::grid::{align_by_day, align_to_grid, time_grid, LabelZone};
use crate::load::{read_heat_pump_csv, MonthDocument};
use anyhow::{bail, Context};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed name of the per-year heat pump log next to the month files.
pub const HEAT_PUMP_CSV: &str = "wp_energy_data.csv";

const MONTH_NAMES: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub fn month_name(month: u32) -> anyhow::Result<&'static str> {
    if !(1..=12).contains(&month) {
        bail!("month {month} out of range 1-12");
    }
    Ok(MONTH_NAMES[(month - 1) as usize])
}

/// Builds and writes the chart for one month. Returns the path of the
/// written PNG.
pub fn render_month(
    json_path: &Path,
    csv_path: &Path,
    year: &str,
    month: u32,
    out_dir: &Path,
    zone: LabelZone,
) -> anyhow::Result<PathBuf> {
    let doc = MonthDocument::from_path(json_path)?;
    let pv = doc.pv_series()?;
    let axis = &doc.settings.x_axis;

    let grid = time_grid(axis.min, axis.max, axis.tick_interval)?;
    let labels = zone.day_labels(&grid)?;

    let records = read_heat_pump_csv(csv_path, year, &format!("{month:02}"))?;
    let (heating, hot_water) = align_by_day(&records, &labels)?;

    let series = MonthSeries {
        battery: align_to_grid(pv.battery, &grid),
        direct: align_to_grid(pv.direct, &grid),
        external: align_to_grid(pv.external, &grid),
        heating,
        hot_water,
        labels,
    };

    let title = format!("Stromverbrauch im {} {year}", month_name(month)?);
    let out_path = out_dir.join(format!("{}.png", title.replace(' ', "_")));
    MonthChart::new(&out_path).render(&series, &title)?;
    Ok(out_path)
}

/// Renders every `{year}/{month}.json` under `data_dir` into
/// `out_dir`, in sorted order, and returns the number of charts
/// written. The first failing month aborts the whole run.
pub fn run_batch(data_dir: &Path, out_dir: &Path, zone: LabelZone) -> anyhow::Result<usize> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rendered = 0;
    for year_dir in sorted_entries(data_dir)? {
        if !year_dir.is_dir() {
            continue;
        }
        let Some(year) = year_dir.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let csv_path = year_dir.join(HEAT_PUMP_CSV);

        for month_file in sorted_entries(&year_dir)? {
            if month_file.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let month: u32 = month_file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse().ok())
                .with_context(|| {
                    format!("month file {} lacks a numeric stem", month_file.display())
                })?;

            println!("processing {}", month_file.display());
            render_month(&month_file, &csv_path, year, month, out_dir, zone)?;
            rendered += 1;
        }
    }
    Ok(rendered)
}

fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(1).unwrap(), "Januar");
        assert_eq!(month_name(12).unwrap(), "Dezember");
        assert!(month_name(0).is_err());
        assert!(month_name(13).is_err());
    }

    #[test]
    fn empty_data_dir_renders_nothing() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        let rendered = run_batch(data.path(), out.path(), LabelZone::Utc).unwrap();
        assert_eq!(rendered, 0);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn year_dir_without_month_files_renders_nothing() {
        let data = tempdir().unwrap();
        fs::create_dir(data.path().join("2025")).unwrap();
        fs::write(data.path().join("2025").join(HEAT_PUMP_CSV), "h1;;\nh2;;\n").unwrap();
        let out = tempdir().unwrap();
        let rendered = run_batch(data.path(), out.path(), LabelZone::Utc).unwrap();
        assert_eq!(rendered, 0);
    }

    #[test]
    fn non_numeric_month_file_aborts_the_batch() {
        let data = tempdir().unwrap();
        let year = data.path().join("2025");
        fs::create_dir(&year).unwrap();
        fs::write(year.join("notes.json"), "{}").unwrap();
        let out = tempdir().unwrap();
        assert!(run_batch(data.path(), out.path(), LabelZone::Utc).is_err());
    }

    #[test]
    fn missing_heat_pump_csv_aborts_the_batch() {
        let data = tempdir().unwrap();
        let year = data.path().join("2025");
        fs::create_dir(&year).unwrap();
        fs::write(
            year.join("01.json"),
            r#"{ "settings": {
                "xAxis": { "min": 0, "max": 86400000, "tickInterval": 86400000 },
                "series": [ { "data": [] }, { "data": [] }, { "data": [] } ]
            } }"#,
        )
        .unwrap();
        let out = tempdir().unwrap();
        assert!(run_batch(data.path(), out.path(), LabelZone::Utc).is_err());
    }
}
