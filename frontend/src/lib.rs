mod app;

pub use app::RightSizing;
use egui::{Color32, RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, AxisHints, HPlacement, Legend, Line, LineStyle, Plot, PlotPoints, Points,
};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DURATION_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
pub const COST_COLOR: Color32 = Color32::from_rgb(255, 127, 14);

const DURATION_SERIES: &str = "Duration";
const COST_SERIES: &str = "Estimated Cost";

// Axis formatters are plain fns, so the cost scaling of the chart on screen lives here.
static COST_SCALE: AtomicU64 = AtomicU64::new(0);

/// Factor that stretches the cost series so its peak meets the duration peak.
pub fn cost_scale(durations: &[[f64; 2]], costs: &[[f64; 2]]) -> f64 {
    let peak = |points: &[[f64; 2]]| points.iter().map(|[_, y]| *y).fold(0.0, f64::max);
    let (duration_peak, cost_peak) = (peak(durations), peak(costs));

    if duration_peak > 0.0 && cost_peak > 0.0 {
        duration_peak / cost_peak
    } else {
        1.0
    }
}

fn cost_tick(value: f64, _max_digits: usize, _range: &RangeInclusive<f64>) -> String {
    let scale = f64::from_bits(COST_SCALE.load(Ordering::Relaxed));
    let scale = if scale > 0.0 { scale } else { 1.0 };

    format!("{:.8}", value / scale)
}

/// Draws duration against the left axis and estimated cost against the right
/// one, both over memory in result order.
pub fn draw_graph(
    ui: &mut Ui,
    durations: Vec<[f64; 2]>,
    costs: Vec<[f64; 2]>,
    height: f32,
    line_width: f32,
) {
    let scale = cost_scale(&durations, &costs);
    COST_SCALE.store(scale.to_bits(), Ordering::Relaxed);

    let scaled_costs: Vec<[f64; 2]> = costs.iter().map(|[x, y]| [*x, y * scale]).collect();

    let _ = Plot::new("graph_performance_vs_cost")
        .legend(Legend::default())
        .width(ui.available_width())
        .height(height)
        .x_axis_label("Memory (MB)")
        .custom_y_axes(vec![
            AxisHints::default().label(RichText::new("Duration (ms)").color(DURATION_COLOR)),
            AxisHints::default()
                .label(RichText::new("Estimated Cost ($)").color(COST_COLOR))
                .formatter(cost_tick)
                .placement(HPlacement::Right),
        ])
        .auto_bounds_x()
        .auto_bounds_y()
        .x_grid_spacer(uniform_grid_spacer(|_| [1024.0, 128.0, 12.8]))
        .label_formatter(move |name, value| match name {
            DURATION_SERIES => format!("{:.0} (MB) | {:.2} (ms)", value.x, value.y),
            COST_SERIES => format!("{:.0} (MB) | {:.8} ($)", value.x, value.y / scale),
            _ => format!("{:.0} (MB)", value.x),
        })
        .show(ui, |plot| {
            for (name, color, points) in [
                (DURATION_SERIES, DURATION_COLOR, durations),
                (COST_SERIES, COST_COLOR, scaled_costs),
            ] {
                plot.line(
                    Line::new(PlotPoints::new(points.clone()))
                        .name(name)
                        .color(color)
                        .style(LineStyle::Solid)
                        .width(line_width),
                );
                plot.points(
                    Points::new(PlotPoints::new(points))
                        .name(name)
                        .color(color)
                        .radius(line_width + 1.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_peak_meets_duration_peak() {
        let durations = [[128.0, 50.0], [512.0, 20.0], [1024.0, 45.0]];
        let costs = [[128.0, 1.0e-7], [512.0, 1.6e-7], [1024.0, 7.5e-7]];

        let scale = cost_scale(&durations, &costs);

        assert!((7.5e-7 * scale - 50.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_are_left_unscaled() {
        assert_eq!(cost_scale(&[[128.0, 10.0]], &[[128.0, 0.0]]), 1.0);
        assert_eq!(cost_scale(&[], &[]), 1.0);
    }

    #[test]
    fn right_axis_shows_unscaled_cost() {
        let durations = [[1024.0, 1000.0]];
        let costs = [[1024.0, 0.0000166667]];
        let scale = cost_scale(&durations, &costs);
        COST_SCALE.store(scale.to_bits(), Ordering::Relaxed);

        assert_eq!(cost_tick(1000.0, 5, &(0.0..=1000.0)), "0.00001667");
        assert_eq!(cost_tick(0.0, 5, &(0.0..=1000.0)), "0.00000000");
    }
}
