//! ### Graph
//! Renders one month of aligned consumption data as a stacked bar
//! chart with heat pump line overlays.

use plotters::backend::BitMapBackend;
use plotters::chart::ChartBuilder;
use plotters::chart::SeriesLabelPosition;
use plotters::drawing::IntoDrawingArea;
use plotters::prelude::Rectangle;
use plotters::series::Histogram;
use plotters::series::LineSeries;
use plotters::style::full_palette::GREY;
use plotters::style::Color;
use plotters::style::RGBColor;
use plotters::style::BLACK;
use plotters::style::BLUE;
use plotters::style::GREEN;
use plotters::style::RED;
use plotters::style::WHITE;
use plotters::style::YELLOW;
use std::path::Path;

/// The five dense series of one month, all the same length as
/// `labels`. Energies are kWh.
pub struct MonthSeries {
    pub labels: Vec<String>,
    pub direct: Vec<f64>,
    pub battery: Vec<f64>,
    pub external: Vec<f64>,
    pub heating: Vec<f64>,
    pub hot_water: Vec<f64>,
}

pub struct MonthChart<'a> {
    path: &'a Path,
}

impl<'a> MonthChart<'a> {
    const CHART_COLOR: RGBColor = WHITE;

    pub fn new(path: &'a Path) -> Self {
        MonthChart { path }
    }

    /// Draws the stacked bars (direct at the base, battery above,
    /// external on top) with the two heat pump lines overlaid, and
    /// writes the figure to `self.path`.
    pub fn render(&self, series: &MonthSeries, title: &str) -> anyhow::Result<()> {
        let root = BitMapBackend::new(self.path, (1080, 720)).into_drawing_area();
        root.fill(&Self::CHART_COLOR)?;

        let days = series.labels.len();
        let mut stack_two = Vec::with_capacity(days);
        let mut stack_top = Vec::with_capacity(days);
        let mut max_kwh = 0f64;
        for idx in 0..days {
            let two = series.direct[idx] + series.battery[idx];
            let top = two + series.external[idx];
            stack_two.push(two);
            stack_top.push(top);
            max_kwh = max_kwh
                .max(top)
                .max(series.heating[idx])
                .max(series.hot_water[idx]);
        }
        if max_kwh <= 0. {
            max_kwh = 1.;
        }

        let mut chart = ChartBuilder::on(&root)
            .x_label_area_size(72)
            .y_label_area_size(72)
            .margin(20)
            .caption(title, ("sans-serif", 40.))
            .build_cartesian_2d(0..days, 0f64..(max_kwh * 1.1))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .bold_line_style(WHITE.mix(0.3))
            .y_desc("kWh")
            .x_desc("Days")
            .axis_desc_style(("sans-serif", 30))
            .x_label_formatter(&|&idx| series.labels.get(idx).cloned().unwrap_or_default())
            .x_labels(days.max(1))
            .y_labels(10)
            .x_label_style(("sans-serif", 16))
            .y_label_style(("sans-serif", 16))
            .draw()?;

        // Histograms only fill from the zero baseline, so the stack is
        // drawn back to front with cumulative heights.
        let bars: [(&[f64], RGBColor, &str); 3] = [
            (&stack_top, GREY, "Externer Verbrauch"),
            (&stack_two, GREEN, "Baterie Verbrauch"),
            (&series.direct, YELLOW, "Direkt Verbrauch"),
        ];
        for (values, color, label) in bars {
            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(color.filled())
                        .data(values.iter().enumerate().map(|(idx, &val)| (idx, val))),
                )?
                .label(label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        let lines: [(&[f64], RGBColor, &str); 2] = [
            (&series.heating, BLUE, "WP Heizung Verbrauch"),
            (&series.hot_water, RED, "WP Warmwasser Verbrauch"),
        ];
        for (values, color, label) in lines {
            chart
                .draw_series(LineSeries::new(
                    values.iter().enumerate().map(|(idx, &val)| (idx, val)),
                    color.stroke_width(3),
                ))?
                .label(label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", 14))
            .draw()?;

        root.present()?;

        Ok(())
    }
}
