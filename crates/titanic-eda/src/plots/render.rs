//! PNG rendering with `plotters`.
//!
//! Chart data is computed before a backend is opened, so an unusable table
//! never leaves a half-written file behind. Titles, axis labels, legends and
//! cell annotations need a system font; when drawing them fails the chart is
//! drawn again without any text.

use super::data::{
    BoxStats, GroupedCounts, Histogram, box_stats, grouped_counts, histogram, kde_curve,
    values_by_group,
};
use crate::error::{EdaError, Result};
use crate::stats::{CorrelationMatrix, correlation_matrix};
use crate::utils::f64_values;
use anyhow::{Context, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Points on the density curve.
const KDE_POINTS: usize = 200;

const PALETTE: [RGBColor; 3] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
];

const COOL: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const WARM: RGBColor = RGBColor(180, 4, 38);

/// The five charts of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    SurvivalByGender,
    SurvivalByClass,
    AgeDistribution,
    AgeVsSurvival,
    CorrelationHeatmap,
}

impl PlotKind {
    /// Rendering order.
    pub const ALL: [PlotKind; 5] = [
        Self::SurvivalByGender,
        Self::SurvivalByClass,
        Self::AgeDistribution,
        Self::AgeVsSurvival,
        Self::CorrelationHeatmap,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::SurvivalByGender => "survival_by_gender.png",
            Self::SurvivalByClass => "survival_by_class.png",
            Self::AgeDistribution => "age_distribution.png",
            Self::AgeVsSurvival => "age_vs_survival.png",
            Self::CorrelationHeatmap => "correlation_heatmap.png",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SurvivalByGender => "Survival Count by Gender",
            Self::SurvivalByClass => "Survival Count by Passenger Class",
            Self::AgeDistribution => "Age Distribution",
            Self::AgeVsSurvival => "Age vs Survival",
            Self::CorrelationHeatmap => "Correlation Heatmap",
        }
    }

    fn size(&self) -> (u32, u32) {
        match self {
            Self::CorrelationHeatmap => (800, 600),
            _ => (600, 400),
        }
    }
}

/// Writes charts for a cleaned train table into one directory.
pub struct PlotRenderer {
    output_dir: PathBuf,
    bins: usize,
}

impl PlotRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, bins: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            bins,
        }
    }

    /// Render every chart. Failures are logged and skipped; the paths of the
    /// charts that were written are returned.
    pub fn render_all(&self, df: &DataFrame) -> Vec<PathBuf> {
        let mut written = Vec::new();

        for kind in PlotKind::ALL {
            match self.render(kind, df) {
                Ok(path) => written.push(path),
                Err(e) => warn!("Skipping {}: {}", kind.file_name(), e),
            }
        }

        written
    }

    /// Render one chart to `<output_dir>/<file name>`.
    pub fn render(&self, kind: PlotKind, df: &DataFrame) -> Result<PathBuf> {
        let failed =
            |e: anyhow::Error| EdaError::PlotRenderingFailed(format!("{}: {:#}", kind.file_name(), e));

        debug!("Rendering {}", kind.title());
        let data = self.prepare(kind, df).map_err(failed)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(kind.file_name());

        if let Err(e) = draw(kind, &data, &path, true) {
            debug!("Labelled {} failed ({:#}), drawing without text", kind.file_name(), e);
            draw(kind, &data, &path, false).map_err(failed)?;
        }

        info!("Plot saved: {}", path.display());
        Ok(path)
    }

    fn prepare(&self, kind: PlotKind, df: &DataFrame) -> anyhow::Result<ChartData> {
        let data = match kind {
            PlotKind::SurvivalByGender => ChartData::Grouped {
                x_desc: "Sex",
                counts: grouped_counts(df, "Sex", "Survived")?,
            },
            PlotKind::SurvivalByClass => ChartData::Grouped {
                x_desc: "Pclass",
                counts: grouped_counts(df, "Pclass", "Survived")?,
            },
            PlotKind::AgeDistribution => {
                let ages = f64_values(
                    df.column("Age")
                        .context("Age column required")?
                        .as_materialized_series(),
                )?;
                let hist = histogram(&ages, self.bins).context("no Age values to bin")?;
                let curve = kde_curve(&ages, &hist, KDE_POINTS);
                ChartData::Histogram { hist, curve }
            }
            PlotKind::AgeVsSurvival => ChartData::Boxes(
                values_by_group(df, "Survived", "Age")?
                    .iter()
                    .filter_map(|(label, values)| box_stats(label, values))
                    .collect(),
            ),
            PlotKind::CorrelationHeatmap => ChartData::Heatmap(correlation_matrix(df)?),
        };

        data.check()?;
        Ok(data)
    }
}

/// Chart-ready numbers for one plot.
enum ChartData {
    Grouped {
        x_desc: &'static str,
        counts: GroupedCounts,
    },
    Histogram {
        hist: Histogram,
        curve: Vec<(f64, f64)>,
    },
    Boxes(Vec<BoxStats>),
    Heatmap(CorrelationMatrix),
}

impl ChartData {
    fn check(&self) -> anyhow::Result<()> {
        match self {
            Self::Grouped { x_desc, counts } if counts.categories.is_empty() => {
                bail!("no rows with both {} and Survived", x_desc)
            }
            Self::Boxes(boxes) if boxes.is_empty() => bail!("no groups to plot"),
            Self::Heatmap(matrix) if matrix.is_empty() => bail!("no numeric columns to correlate"),
            _ => Ok(()),
        }
    }
}

/// Draw prepared data to `path`. With `text` off no font is touched.
fn draw(kind: PlotKind, data: &ChartData, path: &Path, text: bool) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, kind.size()).into_drawing_area();
    root.fill(&WHITE)?;
    let title = kind.title();

    match data {
        ChartData::Grouped { x_desc, counts } => {
            draw_grouped_counts(&root, title, x_desc, "Survived", counts, text)?
        }
        ChartData::Histogram { hist, curve } => {
            draw_histogram(&root, title, "Age", hist, curve, text)?
        }
        ChartData::Boxes(boxes) => draw_boxplot(&root, title, "Survived", "Age", boxes, text)?,
        ChartData::Heatmap(matrix) => draw_heatmap(&root, title, matrix, text)?,
    }

    root.present()?;
    Ok(())
}

/// Chart builder with the shared margin; caption and label areas only with text.
fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    title: &str,
    label_areas: (u32, u32),
    text: bool,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(10);
    if text {
        builder
            .caption(title, ("sans-serif", 20))
            .x_label_area_size(label_areas.0)
            .y_label_area_size(label_areas.1);
    }
    builder
}

fn draw_grouped_counts<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    hue_desc: &str,
    data: &GroupedCounts,
    text: bool,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    // Each category takes one slot per hue plus a gap slot.
    let hues = data.hues.len();
    let slots = hues + 1;
    let x_max = (data.categories.len() * slots + 1) as i32;
    let y_max = (data.max_count() as f64 * 1.1).ceil() as i32 + 1;

    let mut chart =
        chart_builder(root, title, (40, 50), text).build_cartesian_2d(0..x_max, 0..y_max)?;

    let center = 1 + (hues / 2) as i32;
    let categories = &data.categories;
    let label = |x: &i32| -> String {
        let offset = x - center;
        if offset >= 0 && offset % slots as i32 == 0 {
            categories
                .get((offset / slots as i32) as usize)
                .cloned()
                .unwrap_or_default()
        } else {
            String::new()
        }
    };

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(x_max as usize + 1)
            .x_label_formatter(&label)
            .x_desc(x_desc)
            .y_desc("count")
            .draw()?;
    }

    for (j, hue) in data.hues.iter().enumerate() {
        let color = PALETTE[j % PALETTE.len()];
        chart
            .draw_series(data.counts.iter().enumerate().map(move |(i, row)| {
                let x0 = (i * slots + j + 1) as i32;
                Rectangle::new([(x0, 0), (x0 + 1, row[j] as i32)], color.filled())
            }))?
            .label(format!("{} = {}", hue_desc, hue))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if text {
        chart
            .configure_series_labels()
            .border_style(BLACK.stroke_width(1))
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    hist: &Histogram,
    curve: &[(f64, f64)],
    text: bool,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    let y_max = curve
        .iter()
        .map(|(_, y)| *y)
        .fold(hist.max_count() as f64, f64::max)
        * 1.1;

    let mut chart = chart_builder(root, title, (40, 50), text)
        .build_cartesian_2d(lo..hi, 0f64..y_max.max(1.0))?;

    if text {
        chart.configure_mesh().x_desc(x_desc).y_desc("Count").draw()?;
    }

    let bar_style = PALETTE[0].mix(0.6).filled();
    chart.draw_series(hist.counts.iter().zip(hist.edges.windows(2)).map(|(count, edge)| {
        Rectangle::new([(edge[0], 0.0), (edge[1], *count as f64)], bar_style)
    }))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(
            curve.iter().copied(),
            PALETTE[0].stroke_width(2),
        ))?;
    }

    Ok(())
}

fn draw_boxplot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    boxes: &[BoxStats],
    text: bool,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let (y_lo, y_hi) = boxes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            let b_lo = b.outliers.iter().copied().fold(b.lower_whisker, f64::min);
            let b_hi = b.outliers.iter().copied().fold(b.upper_whisker, f64::max);
            (lo.min(b_lo), hi.max(b_hi))
        });
    let pad = ((y_hi - y_lo) * 0.05).max(1.0);
    let n = boxes.len();

    let mut chart = chart_builder(root, title, (40, 50), text)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), (y_lo - pad)..(y_hi + pad))?;

    let label = |x: &f64| -> String {
        let r = x.round();
        if (x - r).abs() < 1e-9 && r >= 0.0 && (r as usize) < n {
            boxes[r as usize].label.clone()
        } else {
            String::new()
        }
    };

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n * 2 + 1)
            .x_label_formatter(&label)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;
    }

    for (i, b) in boxes.iter().enumerate() {
        let x = i as f64;
        let color = PALETTE[i % PALETTE.len()];

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, b.q3), (x + 0.3, b.q1)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, b.q3), (x + 0.3, b.q1)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series([
            PathElement::new(vec![(x - 0.3, b.median), (x + 0.3, b.median)], BLACK.stroke_width(2)),
            PathElement::new(vec![(x, b.q3), (x, b.upper_whisker)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, b.q1), (x, b.lower_whisker)], BLACK.stroke_width(1)),
            PathElement::new(
                vec![(x - 0.15, b.upper_whisker), (x + 0.15, b.upper_whisker)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(x - 0.15, b.lower_whisker), (x + 0.15, b.lower_whisker)],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            b.outliers
                .iter()
                .map(|&v| Circle::new((x, v), 3, BLACK.stroke_width(1))),
        )?;
    }

    Ok(())
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Diverging blue-grey-red scale over [-1, 1].
fn coolwarm(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = ((r + 1.0) / 2.0).clamp(0.0, 1.0);
    if t < 0.5 {
        lerp(COOL, NEUTRAL, t * 2.0)
    } else {
        lerp(NEUTRAL, WARM, (t - 0.5) * 2.0)
    }
}

fn segment_label(names: &[String], value: &SegmentValue<i32>, flip: bool) -> String {
    match value {
        SegmentValue::CenterOf(i) if *i >= 0 && (*i as usize) < names.len() => {
            let idx = if flip { names.len() - 1 - *i as usize } else { *i as usize };
            names[idx].clone()
        }
        _ => String::new(),
    }
}

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    matrix: &CorrelationMatrix,
    text: bool,
) -> anyhow::Result<()>
where
    DB::ErrorType: 'static,
{
    let k = matrix.len();
    let kk = k as i32;

    let mut chart = chart_builder(root, title, (60, 100), text)
        .build_cartesian_2d((0..kk).into_segmented(), (0..kk).into_segmented())?;

    let names = &matrix.columns;
    let x_label = |v: &SegmentValue<i32>| segment_label(names, v, false);
    let y_label = |v: &SegmentValue<i32>| segment_label(names, v, true);

    if text {
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(k)
            .y_labels(k)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .draw()?;
    }

    // Row 0 is drawn at the top.
    let cells = move || (0..k).flat_map(move |i| (0..k).map(move |j| (i, j)));

    chart.draw_series(cells().map(|(i, j)| {
        let x = j as i32;
        let y = kk - 1 - i as i32;
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            coolwarm(matrix.values[i][j]).filled(),
        )
    }))?;

    if !text {
        return Ok(());
    }

    let font = ("sans-serif", 14).into_font();
    chart.draw_series(cells().map(|(i, j)| {
        let r = matrix.values[i][j];
        let text = if r.is_nan() {
            "nan".to_string()
        } else {
            format!("{:.2}", r)
        };
        let color: &'static RGBColor = if r.abs() > 0.6 { &WHITE } else { &BLACK };
        let style = TextStyle::from(font.clone())
            .color(color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        Text::new(
            text,
            (
                SegmentValue::CenterOf(j as i32),
                SegmentValue::CenterOf(kk - 1 - i as i32),
            ),
            style,
        )
    }))?;

    Ok(())
}
