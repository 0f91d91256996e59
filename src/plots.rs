use std::ops::Range;

use itertools::{Itertools, MinMaxResult};
use ndarray::{Array1, Array2};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::datasets::{ClassLabels, LabeledPoints};
use crate::error::{Error, Result};

pub const BOUNDARY_X: [f64; 4] = [-2., -1., 0., 1.];

/// Blue for the first label of the alphabet, red for the second.
pub fn label_color(label: f64, class_labels: &ClassLabels) -> RGBColor {
    if label == class_labels.first() {
        BLUE
    } else {
        RED
    }
}

/// Slope `-w0 / w1` of the decision boundary through the origin.
pub fn boundary_slope(weights: &Array1<f64>) -> Result<f64> {
    if weights.len() < 2 {
        return Err(Error::dimension_mismatch(2, weights.len(), "boundary weights"));
    }
    if weights[1] == 0. {
        return Err(Error::DegenerateBoundary {
            weights: weights.to_vec(),
        });
    }

    Ok(-weights[0] / weights[1])
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    match values.filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements => -1.0..1.0,
        MinMaxResult::OneElement(v) => v - 1.0..v + 1.0,
        MinMaxResult::MinMax(min, max) => {
            let pad = ((max - min) * 0.1).max(1e-3);
            min - pad..max + pad
        }
    }
}

fn scatter_chart<'a, DB>(
    caption: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    drawing_area: &'a DrawingArea<DB, Shift>,
) -> std::result::Result<
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    Box<dyn std::error::Error>,
>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(x_range, y_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("x")
        .y_labels(10)
        .y_desc("y")
        .draw()?;

    Ok(chart_context)
}

fn draw_points<DB>(
    chart_context: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    data: &LabeledPoints,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let class_labels = data.class_labels;
    chart_context.draw_series(data.iter().map(|((x, y), label)| {
        Circle::new((x, y), 3, label_color(label, &class_labels).filled())
    }))?;

    Ok(())
}

pub fn plot_labeled_points<DB>(
    data: &LabeledPoints,
    caption: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let x_range = padded_range(data.iter().map(|((x, _), _)| x));
    let y_range = padded_range(data.iter().map(|((_, y), _)| y));

    let mut chart_context = scatter_chart(caption, x_range, y_range, drawing_area)?;
    draw_points(&mut chart_context, data)?;

    Ok(())
}

/// Training points, the decision boundary and an arrow along the weights.
pub fn plot_boundary<DB>(
    data: &LabeledPoints,
    weights: &Array1<f64>,
    caption: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let slope = boundary_slope(weights)?;
    let (w0, w1) = (weights[0], weights[1]);

    let LabeledPoints { points, labels, .. } = data;
    if points.nrows() < 2 {
        return Err(Error::dimension_mismatch(2, points.nrows(), "boundary data rows").into());
    }
    if labels.len() != points.ncols() {
        return Err(Error::dimension_mismatch(points.ncols(), labels.len(), "boundary labels").into());
    }

    let boundary: Vec<(f64, f64)> = BOUNDARY_X.iter().map(|&x| (x, slope * x)).collect();

    let x_range = padded_range(
        points.row(0)
            .iter()
            .copied()
            .chain(BOUNDARY_X)
            .chain([0., w0]),
    );
    let y_range = padded_range(
        points.row(1)
            .iter()
            .copied()
            .chain(boundary.iter().map(|&(_, y)| y))
            .chain([0., w1]),
    );

    let mut chart_context = scatter_chart(caption, x_range, y_range, drawing_area)?;

    draw_points(&mut chart_context, data)?;

    chart_context
        .draw_series(LineSeries::new(boundary, BLACK.stroke_width(2)))?
        .label("decision boundary")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart_context
        .draw_series([
            PathElement::new(vec![(0., 0.), (w0, w1)], GREEN.stroke_width(2)),
        ])?
        .label("weights")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart_context.draw_series([TriangleMarker::new((w0, w1), 6, GREEN.filled())])?;

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

pub fn plot_time_series<DB>(
    series: &Array1<f64>,
    caption: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let y_range = padded_range(series.iter().copied());

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(70)
        .margin(50)
        .build_cartesian_2d(0f64..series.len().max(1) as f64, y_range)?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("t")
        .y_labels(10)
        .y_desc("x(t)")
        .y_label_formatter(&|y| format!("{:.2}", y))
        .draw()?;

    chart_context.draw_series(LineSeries::new(
        series.iter().enumerate().map(|(i, &x)| (i as f64, x)),
        BLUE.filled(),
    ))?;

    Ok(())
}

// largest value black, smallest white, row 0 at the top
pub fn plot_sparse_pattern<DB>(
    data: &Array2<f64>,
    caption: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let (rows, cols) = data.dim();

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption(caption, ("Arial", 20))
        .set_all_label_area_size(50)
        .margin(50)
        .build_cartesian_2d(0f64..cols.max(1) as f64, 0f64..rows.max(1) as f64)?;

    chart_context
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols.max(1))
        .y_labels(rows.max(1))
        .draw()?;

    let (min, max) = match data.iter().copied().minmax() {
        MinMaxResult::MinMax(min, max) => (min, max),
        _ => (0., 1.),
    };
    let span = if max > min { max - min } else { 1. };

    chart_context.draw_series(data.indexed_iter().map(|((i, j), &v)| {
        let top = (rows - i) as f64;
        Rectangle::new(
            [(j as f64, top - 1.), (j as f64 + 1., top)],
            BLACK.mix((v - min) / span).filled(),
        )
    }))?;

    Ok(())
}
