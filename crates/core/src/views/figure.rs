use gaze_plot_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::time_axis::render_time_axis;
use crate::analysis::CommitPlot;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 52.0;
const POINT_RADIUS: f64 = 1.5;
const FONT_SIZE: f64 = 11.0;
const TICK_FONT_SIZE: f64 = 10.0;
const MIN_ROW_LABEL_SPACING_PX: f64 = 24.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_LINE_HEIGHT: f64 = 18.0;

/// Area of the viewport the bars and points are drawn in.
pub fn plot_area(viewport: &Viewport) -> Rect {
    Rect::new(
        MARGIN_LEFT,
        MARGIN_TOP,
        (viewport.width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0),
        (viewport.height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0),
    )
}

/// Render one commit's figure: a horizontal bar per row colored by line
/// type, the gaze samples scattered over it, axes and a legend.
///
/// Row 0 is at the top. X = elapsed milliseconds, spanning the whole plot.
pub fn render_commit_figure(plot: &CommitPlot, viewport: &Viewport) -> Vec<RenderCommand> {
    let area = plot_area(viewport);
    let rows = plot.row_count();
    if area.w <= 0.0 || area.h <= 0.0 {
        return Vec::new();
    }

    let row_height = area.h / rows.max(1) as f64;
    let span = if plot.span_ms > 0.0 { plot.span_ms } else { 1.0 };
    let x_scale = area.w / span;

    let mut commands = Vec::with_capacity(rows + plot.points.len() + 64);

    commands.push(RenderCommand::DrawText {
        position: Point::new(area.x, MARGIN_TOP / 2.0 + 4.0),
        text: plot.href.clone(),
        color: ThemeToken::TextPrimary,
        font_size: FONT_SIZE + 2.0,
        align: TextAlign::Left,
        vertical: false,
    });

    // Bars
    commands.push(RenderCommand::BeginGroup {
        id: "rows".to_string(),
        label: Some("Diff rows".to_string()),
    });
    for (row, color) in plot.row_colors.iter().enumerate() {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(area.x, area.y + row as f64 * row_height, area.w, row_height),
            color: *color,
            border_color: None,
            label: None,
            row: Some(row as i64),
        });
    }
    commands.push(RenderCommand::EndGroup);

    commands.extend(render_time_axis(&area, plot.span_ms));
    commands.extend(render_row_axis(&area, rows, row_height));

    // Points; sentinel rows fall outside the clip
    commands.push(RenderCommand::BeginGroup {
        id: "gaze".to_string(),
        label: Some("Gaze samples".to_string()),
    });
    commands.push(RenderCommand::SetClip { rect: area });
    for point in &plot.points {
        commands.push(RenderCommand::DrawPoint {
            center: Point::new(
                area.x + point.elapsed_ms * x_scale,
                area.y + (point.row as f64 + 0.5) * row_height,
            ),
            radius: POINT_RADIUS,
            color: ThemeToken::GazePoint,
        });
    }
    commands.push(RenderCommand::ClearClip);
    commands.push(RenderCommand::EndGroup);

    commands.extend(render_frame(&area));
    commands.extend(render_axis_titles(&area));
    commands.extend(render_legend(&area));
    commands
}

fn render_frame(area: &Rect) -> Vec<RenderCommand> {
    let corners = [
        Point::new(area.x, area.y),
        Point::new(area.right(), area.y),
        Point::new(area.right(), area.bottom()),
        Point::new(area.x, area.bottom()),
    ];
    (0..4)
        .map(|i| RenderCommand::DrawLine {
            from: corners[i],
            to: corners[(i + 1) % 4],
            color: ThemeToken::PlotBorder,
            width: 1.0,
        })
        .collect()
}

/// Row numbers down the left edge, thinned out to stay readable.
fn render_row_axis(area: &Rect, rows: usize, row_height: f64) -> Vec<RenderCommand> {
    if rows == 0 {
        return Vec::new();
    }
    let step = row_label_step(row_height);
    let mut commands = Vec::with_capacity(2 * rows / step + 2);

    for row in (0..rows).step_by(step) {
        let y = area.y + (row as f64 + 0.5) * row_height;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(area.x - 5.0, y),
            to: Point::new(area.x, y),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(area.x - 8.0, y + TICK_FONT_SIZE / 3.0),
            text: row.to_string(),
            color: ThemeToken::TextPrimary,
            font_size: TICK_FONT_SIZE,
            align: TextAlign::Right,
            vertical: false,
        });
    }
    commands
}

/// Smallest of 1, 2, 5, 10, 20, 50, … rows keeping labels apart.
fn row_label_step(row_height: f64) -> usize {
    let mut magnitude = 1;
    loop {
        for factor in [1, 2, 5] {
            let step = magnitude * factor;
            if step as f64 * row_height >= MIN_ROW_LABEL_SPACING_PX || step >= 1_000_000 {
                return step;
            }
        }
        magnitude *= 10;
    }
}

fn render_axis_titles(area: &Rect) -> Vec<RenderCommand> {
    vec![
        RenderCommand::DrawText {
            position: Point::new(area.x + area.w / 2.0, area.bottom() + MARGIN_BOTTOM - 8.0),
            text: "Relative timestamp (ms)".to_string(),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            vertical: false,
        },
        RenderCommand::DrawText {
            position: Point::new(16.0, area.y + area.h / 2.0),
            text: "Diff line".to_string(),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            vertical: true,
        },
    ]
}

fn render_legend(area: &Rect) -> Vec<RenderCommand> {
    let x = area.right() + 12.0;
    let height = LEGEND_LINE_HEIGHT * ThemeToken::LEGEND.len() as f64 + 8.0;
    let mut commands = vec![
        RenderCommand::BeginGroup {
            id: "legend".to_string(),
            label: Some("Legend".to_string()),
        },
        RenderCommand::DrawRect {
            rect: Rect::new(x, area.y, MARGIN_RIGHT - 20.0, height),
            color: ThemeToken::LegendBackground,
            border_color: Some(ThemeToken::LegendBorder),
            label: None,
            row: None,
        },
    ];

    for (i, (token, label)) in ThemeToken::LEGEND.iter().enumerate() {
        let y = area.y + 6.0 + i as f64 * LEGEND_LINE_HEIGHT;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x + 6.0, y, LEGEND_SWATCH, LEGEND_SWATCH),
            color: *token,
            border_color: Some(ThemeToken::LegendBorder),
            label: None,
            row: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + 12.0 + LEGEND_SWATCH, y + LEGEND_SWATCH - 2.0),
            text: (*label).to_string(),
            color: ThemeToken::TextPrimary,
            font_size: TICK_FONT_SIZE,
            align: TextAlign::Left,
            vertical: false,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::timeline::SamplePoint;

    fn plot() -> CommitPlot {
        CommitPlot {
            href: "/o/r/commit/abc".into(),
            origin_ms: 5_000.0,
            span_ms: 100.0,
            points: vec![
                SamplePoint {
                    elapsed_ms: 0.0,
                    row: 0,
                },
                SamplePoint {
                    elapsed_ms: 50.0,
                    row: 2,
                },
                SamplePoint {
                    elapsed_ms: 60.0,
                    row: -1,
                },
            ],
            row_colors: vec![
                ThemeToken::LineUnchanged,
                ThemeToken::DiffSeparator,
                ThemeToken::LineAddition,
            ],
            row_kinds: vec!["unchanged".into(), "separator".into(), "addition".into()],
            intervals: Vec::new(),
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 400.0)
    }

    #[test]
    fn one_bar_per_row_top_down() {
        let cmds = render_commit_figure(&plot(), &viewport());
        let bars: Vec<(i64, f64, ThemeToken)> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    rect,
                    color,
                    row: Some(row),
                    ..
                } => Some((*row, rect.y, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 3);
        assert!(bars.windows(2).all(|w| w[0].1 < w[1].1));
        assert_eq!(bars[1].2, ThemeToken::DiffSeparator);
    }

    #[test]
    fn points_land_on_their_rows() {
        let vp = viewport();
        let area = plot_area(&vp);
        let cmds = render_commit_figure(&plot(), &vp);
        let centers: Vec<Point> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawPoint { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert_eq!(centers.len(), 3);

        let row_height = area.h / 3.0;
        assert_eq!(centers[0].x, area.x);
        assert!((centers[1].y - (area.y + 2.5 * row_height)).abs() < 1e-9);
        assert!((centers[1].x - (area.x + area.w / 2.0)).abs() < 1e-9);
        // Sentinel row sits above the plot and is clipped away.
        assert!(!area.contains(centers[2]));
    }

    #[test]
    fn legend_lists_all_five_colors() {
        let cmds = render_commit_figure(&plot(), &viewport());
        let texts: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        for label in ["Addition", "Deletion", "Unchanged", "Expandable", "Diff separator"] {
            assert!(texts.contains(&label), "missing {label}");
        }
        assert!(texts.contains(&"Relative timestamp (ms)"));
        assert!(texts.contains(&"Diff line"));
    }

    #[test]
    fn row_labels_thin_out() {
        assert_eq!(row_label_step(30.0), 1);
        assert_eq!(row_label_step(10.0), 5);
        assert_eq!(row_label_step(1.0), 50);
    }

    #[test]
    fn tiny_viewport_renders_nothing() {
        assert!(render_commit_figure(&plot(), &Viewport::new(100.0, 50.0)).is_empty());
    }
}
