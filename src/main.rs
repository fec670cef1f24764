use clap::Parser;
use pv_report::batch;
use pv_report::grid::LabelZone;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
enum Args {
    /// Walks a data directory laid out as `{year}/{month}.json` with a
    /// `wp_energy_data.csv` per year directory and renders one
    /// consumption chart per month into the output directory.
    // cargo run batch data results
    Batch {
        /// Root of the `{year}/{month}.json` tree
        data_dir: PathBuf,

        /// Directory the PNG charts are written to
        out_dir: PathBuf,

        /// Label days in UTC instead of the host's local timezone
        #[clap(long)]
        utc: bool,
    },

    /// Renders a single month from one PV JSON export and its year's
    /// heat pump CSV.
    // cargo run render-month data/2025/01.json data/2025/wp_energy_data.csv 2025 1 results
    RenderMonth {
        /// PV portal JSON export for the month
        json: PathBuf,

        /// Heat pump energy CSV for the year
        csv: PathBuf,

        /// Four-digit year, filters the CSV and titles the chart
        year: String,

        /// Month number, 1-12
        month: u32,

        /// Directory the PNG chart is written to
        out_dir: PathBuf,

        /// Label days in UTC instead of the host's local timezone
        #[clap(long)]
        utc: bool,
    },
}

fn label_zone(utc: bool) -> LabelZone {
    if utc {
        LabelZone::Utc
    } else {
        LabelZone::Local
    }
}

fn main() -> anyhow::Result<()> {
    match Args::parse() {
        Args::Batch {
            data_dir,
            out_dir,
            utc,
        } => {
            let rendered = batch::run_batch(&data_dir, &out_dir, label_zone(utc))?;
            println!("rendered {rendered} charts");
        }
        Args::RenderMonth {
            json,
            csv,
            year,
            month,
            out_dir,
            utc,
        } => {
            std::fs::create_dir_all(&out_dir)?;
            let written = batch::render_month(&json, &csv, &year, month, &out_dir, label_zone(utc))?;
            println!("wrote {}", written.display());
        }
    }
    Ok(())
}
