// Daily term-frequency time series.
//
// Per-post rows are bucketed by calendar day (UTC) and each tracked term's
// TF is averaged within the day. The chart is written as SVG so it works on
// headless machines; open it in any browser.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use plotters::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::term_freq::{PostTermRow, DATE_FORMAT};

/// Default chart title.
pub const DEFAULT_TITLE: &str = "Daily Average TF of Top Words";

const CHART_SIZE: (u32, u32) = (1200, 600);
const PALETTE: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];

/// Mean term frequencies for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    /// One value per term in [`DailySeries::terms`], same order
    pub values: Vec<f64>,
}

/// Daily averages for the terms that were present in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    pub terms: Vec<String>,
    /// Ascending by date
    pub days: Vec<DailyAverage>,
}

/// Group rows by day and average each tracked term's TF.
///
/// Terms the rows were not built with are left out. Rows whose
/// `created_date` does not parse are skipped.
pub fn daily_average_tf<S: AsRef<str>>(rows: &[PostTermRow], terms: &[S]) -> DailySeries {
    let terms: Vec<String> = terms
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| rows.first().is_some_and(|row| row.term(t).is_some()))
        .map(str::to_string)
        .collect();

    let mut buckets: BTreeMap<NaiveDate, (Vec<f64>, usize)> = BTreeMap::new();
    for row in rows {
        let date = match NaiveDateTime::parse_from_str(&row.created_date, DATE_FORMAT) {
            Ok(dt) => dt.date(),
            Err(e) => {
                warn!(post_id = %row.post_id, created_date = %row.created_date, error = %e, "Skipping row with unparseable date");
                continue;
            }
        };

        let (sums, count) = buckets
            .entry(date)
            .or_insert_with(|| (vec![0.0; terms.len()], 0));
        for (sum, term) in sums.iter_mut().zip(&terms) {
            *sum += row.term(term).map_or(0.0, |s| s.tf);
        }
        *count += 1;
    }

    let days = buckets
        .into_iter()
        .map(|(date, (sums, count))| DailyAverage {
            date,
            values: sums.into_iter().map(|s| s / count as f64).collect(),
        })
        .collect();

    DailySeries { terms, days }
}

/// Plot daily average TF of `terms` and write the chart to `path` as SVG.
pub fn plot_term_frequencies<S: AsRef<str>>(
    rows: &[PostTermRow],
    terms: &[S],
    title: &str,
    path: &Path,
) -> Result<()> {
    let series = daily_average_tf(rows, terms);
    if series.terms.is_empty() {
        anyhow::bail!("None of the requested terms are present in the table");
    }
    if series.days.is_empty() {
        anyhow::bail!("No dated posts to plot");
    }

    render_series(&series, title, path)?;

    info!(
        path = %path.display(),
        days = series.days.len(),
        terms = series.terms.len(),
        "Rendered term frequency chart"
    );
    Ok(())
}

/// Draw one line per term, with a marker per day and a legend.
fn render_series(series: &DailySeries, title: &str, path: &Path) -> Result<()> {
    let n_days = series.days.len();
    let labels: Vec<String> = series
        .days
        .iter()
        .map(|d| d.date.format("%Y-%m-%d").to_string())
        .collect();

    let max_tf = series
        .days
        .iter()
        .flat_map(|d| d.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let y_max = if max_tf > 0.0 { max_tf * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(100)
        .y_label_area_size(70)
        .build_cartesian_2d((0..n_days).into_segmented(), 0f64..y_max)
        .map_err(chart_error)?;

    let date_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .x_labels(n_days.min(31))
        .x_label_formatter(&date_label)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc("Date")
        .y_desc("Average TF")
        .draw()
        .map_err(chart_error)?;

    for (k, term) in series.terms.iter().enumerate() {
        let color = PALETTE[k % PALETTE.len()];
        let points: Vec<(SegmentValue<usize>, f64)> = series
            .days
            .iter()
            .enumerate()
            .map(|(i, day)| (SegmentValue::CenterOf(i), day.values[k]))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(chart_error)?
            .label(term.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 4, color.filled())),
            )
            .map_err(chart_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

fn chart_error<E: Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Chart rendering failed: {e}")
}
