use gaze_plot_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

const MAJOR_TICK_LENGTH: f64 = 6.0;
const MINOR_TICK_LENGTH: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;
const LABEL_GAP: f64 = 14.0;
const MIN_MAJOR_SPACING_PX: f64 = 80.0;

/// Render an elapsed-time axis along the bottom edge of `plot`.
///
/// `span_ms` is the elapsed time the plot's full width represents. Major
/// ticks are labelled and get a gridline across the plot; minor ticks
/// subdivide them.
pub fn render_time_axis(plot: &Rect, span_ms: f64) -> Vec<RenderCommand> {
    if span_ms <= 0.0 || plot.w <= 0.0 {
        return Vec::new();
    }

    let x_scale = plot.w / span_ms;
    let baseline = plot.bottom();
    let (major_interval, subdivisions) = nice_interval(span_ms, plot.w);
    let minor_interval = major_interval / f64::from(subdivisions);

    let mut commands = Vec::with_capacity(64);
    commands.push(RenderCommand::BeginGroup {
        id: "time-axis".to_string(),
        label: None,
    });

    commands.push(RenderCommand::DrawLine {
        from: Point::new(plot.x, baseline),
        to: Point::new(plot.right(), baseline),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    // Minor ticks
    let mut step = 0u32;
    loop {
        let t = f64::from(step) * minor_interval;
        if t > span_ms {
            break;
        }
        if step % subdivisions != 0 {
            let x = plot.x + t * x_scale;
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, baseline),
                to: Point::new(x, baseline + MINOR_TICK_LENGTH),
                color: ThemeToken::TextMuted,
                width: 0.5,
            });
        }
        step += 1;
    }

    // Major ticks with labels + gridlines
    let mut step = 0u32;
    loop {
        let t = f64::from(step) * major_interval;
        if t > span_ms {
            break;
        }
        let x = plot.x + t * x_scale;

        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, plot.y),
            to: Point::new(x, baseline),
            color: ThemeToken::GridLine,
            width: 0.5,
        });
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, baseline),
            to: Point::new(x, baseline + MAJOR_TICK_LENGTH),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, baseline + MAJOR_TICK_LENGTH + LABEL_GAP - 4.0),
            text: format_time_label(t),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            vertical: false,
        });
        step += 1;
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Choose a "nice" major tick interval in milliseconds given the elapsed
/// span and pixel width. Returns (major_interval_ms, subdivisions).
fn nice_interval(span_ms: f64, width_px: f64) -> (f64, u32) {
    // Target: roughly one major tick per MIN_MAJOR_SPACING_PX pixels
    let target_count = (width_px / MIN_MAJOR_SPACING_PX).max(2.0);
    let raw_interval = span_ms / target_count;

    let nice_values: &[(f64, u32)] = &[
        (1.0, 2),
        (2.0, 2),
        (5.0, 5),
        (10.0, 2),
        (20.0, 2),
        (50.0, 5),
        (100.0, 2),
        (200.0, 2),
        (500.0, 5),
        (1_000.0, 2),   // 1s
        (2_000.0, 2),
        (5_000.0, 5),
        (10_000.0, 2),  // 10s
        (20_000.0, 2),
        (30_000.0, 3),  // 30s
        (60_000.0, 2),  // 1min
        (120_000.0, 2),
        (300_000.0, 5), // 5min
        (600_000.0, 2),
    ];

    for &(interval, subs) in nice_values {
        if interval >= raw_interval {
            return (interval, subs);
        }
    }

    // Fallback for sessions longer than the table covers
    let magnitude = 10.0_f64.powf(raw_interval.log10().ceil());
    (magnitude, 2)
}

/// Axis labels are plain milliseconds; the axis title carries the unit.
fn format_time_label(ms: f64) -> String {
    if ms.fract() == 0.0 {
        format!("{ms:.0}")
    } else {
        format!("{ms:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_interval_selects_reasonable_value() {
        // 10 seconds in 800px → ~10 major ticks → 1s intervals
        let (interval, _subs) = nice_interval(10_000.0, 800.0);
        assert!((500.0..=2_000.0).contains(&interval), "interval={interval}");

        let (huge, _) = nice_interval(1.0e8, 800.0);
        assert!(huge >= 1.0e8 / 10.0);
    }

    #[test]
    fn renders_ticks_labels_and_gridlines() {
        let plot = Rect::new(50.0, 20.0, 800.0, 400.0);
        let cmds = render_time_axis(&plot, 4_000.0);

        let labels: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.first().copied(), Some("0"));
        assert!(labels.len() >= 3);

        let gridlines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { color: ThemeToken::GridLine, .. }))
            .count();
        assert_eq!(gridlines, labels.len());
    }

    #[test]
    fn empty_span_renders_nothing() {
        let plot = Rect::new(0.0, 0.0, 800.0, 400.0);
        assert!(render_time_axis(&plot, 0.0).is_empty());
    }

    #[test]
    fn format_labels() {
        assert_eq!(format_time_label(0.0), "0");
        assert_eq!(format_time_label(2_500.0), "2500");
        assert_eq!(format_time_label(2.5), "2.5");
    }
}
