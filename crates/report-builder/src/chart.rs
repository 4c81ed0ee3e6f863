//! Technical chart rendering: three stacked SVG panels (price with trend
//! overlays, MACD, RSI) sized for the report page.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use indicator_engine::IndicatorSeries;
use report_core::{ChartBlock, ReportError};

pub const CHART_WIDTH: u32 = 700;
pub const CHART_HEIGHT: u32 = 800;

const PRICE_PANEL_HEIGHT: u32 = 400;
const MACD_PANEL_HEIGHT: u32 = 200;

const ORANGE: RGBColor = RGBColor(255, 140, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const GRAY: RGBColor = RGBColor(128, 128, 128);

const RSI_OVERBOUGHT_LINE: f64 = 70.0;
const RSI_OVERSOLD_LINE: f64 = 30.0;

/// Render the three technical panels to an inline SVG block
pub fn render_technical_chart(series: &IndicatorSeries) -> Result<ChartBlock, ReportError> {
    if series.is_empty() {
        return Err(ReportError::RenderingError(
            "no price data to chart".to_string(),
        ));
    }

    let mut svg = String::new();
    draw_panels(series, &mut svg).map_err(|e| ReportError::RenderingError(e.to_string()))?;

    Ok(ChartBlock {
        svg,
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
    })
}

fn draw_panels(series: &IndicatorSeries, svg: &mut String) -> Result<()> {
    let root = SVGBackend::with_string(svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (price_area, lower) = root.split_vertically(PRICE_PANEL_HEIGHT);
    let (macd_area, rsi_area) = lower.split_vertically(MACD_PANEL_HEIGHT);

    let n = series.len() as i32;
    draw_price_panel(series, n, &price_area)?;
    draw_macd_panel(series, n, &macd_area)?;
    draw_rsi_panel(series, n, &rsi_area)?;

    root.present()?;
    Ok(())
}

fn draw_price_panel(
    series: &IndicatorSeries,
    n: i32,
    area: &DrawingArea<SVGBackend<'_>, Shift>,
) -> Result<()> {
    let mut low = f64::MAX;
    let mut high = f64::MIN;
    for &close in &series.close {
        low = low.min(close);
        high = high.max(close);
    }
    for &band in series.bb_lower.iter().flatten() {
        low = low.min(band);
    }
    for &band in series.bb_upper.iter().flatten() {
        high = high.max(band);
    }
    let pad = ((high - low) * 0.05).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(0..n, (low - pad)..(high + pad))?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx| date_label(series, *idx))
        .y_desc("Price (₹)")
        .draw()?;

    // Bollinger channel as one translucent polygon: upper band forward,
    // lower band back
    let upper = defined_points(&series.bb_upper);
    let mut band_lower = defined_points(&series.bb_lower);
    if !upper.is_empty() && !band_lower.is_empty() {
        let mut band = upper;
        band_lower.reverse();
        band.extend(band_lower);
        chart.draw_series(std::iter::once(Polygon::new(band, &GRAY.mix(0.1))))?;
    }

    chart
        .draw_series(LineSeries::new(
            series.close.iter().enumerate().map(|(i, v)| (i as i32, *v)),
            &BLUE,
        ))?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_series(LineSeries::new(defined_points(&series.sma_50), &ORANGE))?
        .label("50-Day SMA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], ORANGE));

    chart
        .draw_series(LineSeries::new(defined_points(&series.sma_200), &RED))?
        .label("200-Day SMA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

fn draw_macd_panel(
    series: &IndicatorSeries,
    n: i32,
    area: &DrawingArea<SVGBackend<'_>, Shift>,
) -> Result<()> {
    let line = defined_points(&series.macd_line);
    let signal = defined_points(&series.macd_signal);
    let histogram = defined_points(&series.macd_histogram);

    // Keep the zero baseline in range so histogram bars have an anchor
    let mut low = 0.0f64;
    let mut high = 0.0f64;
    for &(_, v) in line.iter().chain(&signal).chain(&histogram) {
        low = low.min(v);
        high = high.max(v);
    }
    let pad = ((high - low) * 0.1).max(0.1);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(0..n, (low - pad)..(high + pad))?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx| date_label(series, *idx))
        .y_desc("MACD")
        .draw()?;

    chart.draw_series(
        histogram
            .iter()
            .map(|&(i, v)| Rectangle::new([(i, 0.0), (i + 1, v)], GRAY.mix(0.5).filled())),
    )?;

    chart
        .draw_series(LineSeries::new(line, &BLUE))?
        .label("MACD")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_series(LineSeries::new(signal, &RED))?
        .label("Signal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

fn draw_rsi_panel(
    series: &IndicatorSeries,
    n: i32,
    area: &DrawingArea<SVGBackend<'_>, Shift>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(0..n, 0.0..100.0)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx| date_label(series, *idx))
        .y_desc("RSI")
        .draw()?;

    chart.draw_series(LineSeries::new(defined_points(&series.rsi), &PURPLE))?;
    chart.draw_series(LineSeries::new(
        (0..n).map(|x| (x, RSI_OVERBOUGHT_LINE)),
        &RED.mix(0.6),
    ))?;
    chart.draw_series(LineSeries::new(
        (0..n).map(|x| (x, RSI_OVERSOLD_LINE)),
        &GREEN.mix(0.6),
    ))?;

    Ok(())
}

/// Collect the defined values of an aligned series as chart points
fn defined_points(values: &[Option<f64>]) -> Vec<(i32, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as i32, v)))
        .collect()
}

fn date_label(series: &IndicatorSeries, idx: i32) -> String {
    series
        .dates
        .get(idx as usize)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}
