//! ### Load
//! Parsers for the raw monthly inputs: the PV portal's JSON chart
//! export and the heat pump's semicolon-delimited energy log.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One month of the PV portal's chart export. Only the `settings`
/// subtree is consumed; everything else in the document is ignored.
#[derive(Debug, Deserialize)]
pub struct MonthDocument {
    pub settings: Settings,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(rename = "xAxis")]
    pub x_axis: XAxis,
    pub series: Vec<SeriesEntry>,
}

/// Axis parameters, all in epoch milliseconds.
#[derive(Debug, Deserialize)]
pub struct XAxis {
    pub min: i64,
    pub max: i64,
    #[serde(rename = "tickInterval")]
    pub tick_interval: i64,
}

#[derive(Debug, Deserialize)]
pub struct SeriesEntry {
    pub data: Vec<(i64, f64)>,
}

/// The three consumption series of one month, in the positional order
/// the export emits them.
#[derive(Debug)]
pub struct PvSeries<'a> {
    pub battery: &'a [(i64, f64)],
    pub direct: &'a [(i64, f64)],
    pub external: &'a [(i64, f64)],
}

impl MonthDocument {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// The export carries the series positionally: `[0]` battery,
    /// `[1]` direct, `[2]` external. Nothing in the format names them,
    /// so the count is the only check available before the positions
    /// are trusted.
    pub fn pv_series(&self) -> anyhow::Result<PvSeries<'_>> {
        match self.settings.series.as_slice() {
            [battery, direct, external] => Ok(PvSeries {
                battery: &battery.data,
                direct: &direct.data,
                external: &external.data,
            }),
            other => bail!(
                "expected exactly 3 series (battery, direct, external), found {}",
                other.len()
            ),
        }
    }
}

/// One retained row of the heat pump CSV. `date` keeps the raw cell;
/// its first ten characters are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPumpRecord {
    pub date: String,
    pub heating_wh: f64,
    pub hot_water_wh: f64,
}

/// Reads the per-year heat pump CSV and keeps only the rows belonging
/// to `{year}-{month}` (month zero-padded to two digits).
pub fn read_heat_pump_csv(
    path: &Path,
    year: &str,
    month: &str,
) -> anyhow::Result<Vec<HeatPumpRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_heat_pump_rows(file, year, month)
        .with_context(|| format!("parsing {}", path.display()))
}

/// CSV body parser behind `read_heat_pump_csv`. Semicolon-delimited,
/// the first two rows are metadata and skipped, and only the first
/// three columns of each retained row are consumed.
pub fn parse_heat_pump_rows(
    input: impl Read,
    year: &str,
    month: &str,
) -> anyhow::Result<Vec<HeatPumpRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let prefix = format!("{year}-{month}");
    let mut rows = Vec::new();
    for line in reader.records().skip(2) {
        let line = line?;
        let Some(date) = line.get(0) else {
            continue;
        };
        if !date.starts_with(&prefix) {
            continue;
        }
        if line.len() < 3 {
            bail!("Unexpected csv row format: {line:?}");
        }
        let heating_wh = line[1]
            .parse::<f64>()
            .with_context(|| format!("non-numeric heating value in row {line:?}"))?;
        let hot_water_wh = line[2]
            .parse::<f64>()
            .with_context(|| format!("non-numeric hot water value in row {line:?}"))?;
        rows.push(HeatPumpRecord {
            date: date.to_string(),
            heating_wh,
            hot_water_wh,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WP_CSV: &str = "\
Anlage XY;;;
Datum;Heizen;Warmwasser;Gesamt
2025-01-05 00:00;1500;800;2300
2025-01-06 00:00;2000;900;2900
2025-02-01 00:00;500;400;900
";

    #[test]
    fn filters_rows_by_year_month_prefix() {
        let jan = parse_heat_pump_rows(WP_CSV.as_bytes(), "2025", "01").unwrap();
        assert_eq!(jan.len(), 2);
        assert_eq!(jan[0].date, "2025-01-05 00:00");
        assert_eq!(jan[0].heating_wh, 1500.0);
        assert_eq!(jan[0].hot_water_wh, 800.0);

        let feb = parse_heat_pump_rows(WP_CSV.as_bytes(), "2025", "02").unwrap();
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].heating_wh, 500.0);
    }

    #[test]
    fn skips_the_two_metadata_rows() {
        // A data-shaped line inside the skipped region must not leak through.
        let csv = "2025-01-01 00:00;1;2;3\n2025-01-02 00:00;4;5;6\n2025-01-03 00:00;7;8;9\n";
        let rows = parse_heat_pump_rows(csv.as_bytes(), "2025", "01").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2025-01-03 00:00");
    }

    #[test]
    fn non_numeric_cell_is_fatal() {
        let csv = "h1;;\nh2;;\n2025-01-05 00:00;abc;800\n";
        assert!(parse_heat_pump_rows(csv.as_bytes(), "2025", "01").is_err());
    }

    #[test]
    fn short_row_is_fatal() {
        let csv = "h1;;\nh2;;\n2025-01-05 00:00;1500\n";
        assert!(parse_heat_pump_rows(csv.as_bytes(), "2025", "01").is_err());
    }

    #[test]
    fn rows_outside_the_month_are_never_parsed() {
        // Malformed cells are only an error when the row is retained.
        let csv = "h1;;\nh2;;\n2025-03-05 00:00;abc;def\n2025-01-05 00:00;1500;800\n";
        let rows = parse_heat_pump_rows(csv.as_bytes(), "2025", "01").unwrap();
        assert_eq!(rows.len(), 1);
    }

    const MONTH_JSON: &str = r#"{
        "settings": {
            "xAxis": { "min": 0, "max": 172800000, "tickInterval": 86400000 },
            "series": [
                { "data": [[0, 5], [172800000, 3]] },
                { "data": [[0, 10.5]] },
                { "data": [] }
            ]
        }
    }"#;

    #[test]
    fn parses_month_document() {
        let doc: MonthDocument = serde_json::from_str(MONTH_JSON).unwrap();
        assert_eq!(doc.settings.x_axis.min, 0);
        assert_eq!(doc.settings.x_axis.max, 172_800_000);
        assert_eq!(doc.settings.x_axis.tick_interval, 86_400_000);

        let pv = doc.pv_series().unwrap();
        assert_eq!(pv.battery, &[(0, 5.0), (172_800_000, 3.0)]);
        assert_eq!(pv.direct, &[(0, 10.5)]);
        assert!(pv.external.is_empty());
    }

    #[test]
    fn wrong_series_count_is_rejected() {
        let doc: MonthDocument = serde_json::from_str(
            r#"{ "settings": {
                "xAxis": { "min": 0, "max": 0, "tickInterval": 1 },
                "series": [ { "data": [] }, { "data": [] } ]
            } }"#,
        )
        .unwrap();
        let err = doc.pv_series().unwrap_err();
        assert!(err.to_string().contains("exactly 3 series"));
    }
}
