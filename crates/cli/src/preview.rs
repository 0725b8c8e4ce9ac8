use std::io::stdout;

use anyhow::Result;
use crossterm::{execute, style::Print, terminal};
use gaze_plot_core::CommitPlot;
use gaze_plot_core::svg::resolve_color;
use gaze_plot_core::views::figure::render_commit_figure;
use gaze_plot_protocol::{
    Point, Rect as FigureRect, RenderCommand, TextAlign, ThemeToken, Viewport as FigureViewport,
};
use ratatui::{
    Terminal, TerminalOptions, Viewport,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

/// Figure pixels one terminal cell stands for.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
const FALLBACK_ROWS: u16 = 40;

/// Same palette as the SVG output.
fn theme_to_color(token: ThemeToken) -> Color {
    resolve_color(token).parse().unwrap_or(Color::Reset)
}

/// Print `plot`'s figure below the cursor as one inline frame.
pub fn show(plot: &CommitPlot) -> Result<()> {
    let rows = terminal::size().map_or(FALLBACK_ROWS, |(_, rows)| rows);
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(rows.saturating_sub(1).max(1)),
        },
    )?;

    let area = terminal
        .draw(|frame| {
            let area = frame.area();
            let figure = FigureViewport::new(
                f64::from(area.width) * CELL_WIDTH,
                f64::from(area.height) * CELL_HEIGHT,
            );
            rasterise(&render_commit_figure(plot, &figure), area, frame.buffer_mut());
        })?
        .area;

    terminal.set_cursor_position((0, area.bottom().saturating_sub(1)))?;
    execute!(terminal.backend_mut(), Print("\r\n"))?;
    Ok(())
}

/// Terminal cell under figure point `p`, if it is inside `area` and `clip`.
fn cell_at(p: Point, area: Rect, clip: Option<FigureRect>) -> Option<(u16, u16)> {
    if clip.is_some_and(|c| !c.contains(p)) || p.x < 0.0 || p.y < 0.0 {
        return None;
    }
    let col = (p.x / CELL_WIDTH) as u16;
    let row = (p.y / CELL_HEIGHT) as u16;
    (col < area.width && row < area.height).then(|| (area.x + col, area.y + row))
}

/// Draw figure commands onto the cells of `area`.
///
/// Rects become cell backgrounds, points and text become glyphs. Lines and
/// vertical titles are too fine for character cells and are left out.
fn rasterise(commands: &[RenderCommand], area: Rect, buf: &mut Buffer) {
    buf.set_style(
        area,
        Style::default()
            .bg(theme_to_color(ThemeToken::Background))
            .fg(theme_to_color(ThemeToken::TextPrimary)),
    );
    let mut clip: Option<FigureRect> = None;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect { rect, color, .. } => {
                let bg = theme_to_color(*color);
                for row in 0..area.height {
                    for col in 0..area.width {
                        let center = Point::new(
                            (f64::from(col) + 0.5) * CELL_WIDTH,
                            (f64::from(row) + 0.5) * CELL_HEIGHT,
                        );
                        if rect.contains(center)
                            && let Some(pos) = cell_at(center, area, clip)
                        {
                            buf[pos].set_bg(bg);
                        }
                    }
                }
            }
            RenderCommand::DrawPoint { center, color, .. } => {
                if let Some(pos) = cell_at(*center, area, clip) {
                    buf[pos].set_char('•').set_fg(theme_to_color(*color));
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                vertical: false,
                ..
            } => {
                let width = text.chars().count() as f64 * CELL_WIDTH;
                let x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - width / 2.0,
                    TextAlign::Right => position.x - width,
                };
                let fg = theme_to_color(*color);
                for (i, ch) in text.chars().enumerate() {
                    let p = Point::new(x + i as f64 * CELL_WIDTH, position.y - CELL_HEIGHT / 2.0);
                    if let Some(pos) = cell_at(p, area, clip) {
                        buf[pos].set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::SetClip { rect } => clip = Some(*rect),
            RenderCommand::ClearClip => clip = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_svg_output() {
        assert_eq!(
            theme_to_color(ThemeToken::LineAddition),
            Color::Rgb(0xc1, 0xe9, 0xc1)
        );
        assert_eq!(theme_to_color(ThemeToken::DiffSeparator), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn rects_fill_cells_and_points_respect_clip() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        rasterise(
            &[
                RenderCommand::DrawRect {
                    rect: FigureRect::new(0.0, 0.0, 40.0, 32.0),
                    color: ThemeToken::LineDeletion,
                    border_color: None,
                    label: None,
                    row: Some(0),
                },
                RenderCommand::SetClip {
                    rect: FigureRect::new(0.0, 16.0, 80.0, 48.0),
                },
                RenderCommand::DrawPoint {
                    center: Point::new(4.0, 8.0),
                    radius: 1.0,
                    color: ThemeToken::GazePoint,
                },
                RenderCommand::DrawPoint {
                    center: Point::new(12.0, 24.0),
                    radius: 1.0,
                    color: ThemeToken::GazePoint,
                },
                RenderCommand::ClearClip,
            ],
            area,
            &mut buf,
        );

        let deletion = theme_to_color(ThemeToken::LineDeletion);
        assert_eq!(buf[(0, 0)].bg, deletion);
        assert_eq!(buf[(4, 1)].bg, deletion);
        assert_eq!(buf[(5, 0)].bg, theme_to_color(ThemeToken::Background));
        // First point is outside the clip rect, second lands on column 1, row 1.
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(1, 1)].symbol(), "•");
    }

    #[test]
    fn text_is_aligned_on_cells() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        rasterise(
            &[RenderCommand::DrawText {
                position: Point::new(80.0, 24.0),
                text: "abc".into(),
                color: ThemeToken::TextPrimary,
                font_size: 10.0,
                align: TextAlign::Right,
                vertical: false,
            }],
            area,
            &mut buf,
        );
        let row: String = (0..10).map(|x| buf[(x, 1)].symbol()).collect();
        assert_eq!(row, "       abc");
    }

    #[test]
    fn offset_area_shifts_cells() {
        let area = Rect::new(2, 5, 4, 2);
        let mut buf = Buffer::empty(area);
        rasterise(
            &[RenderCommand::DrawPoint {
                center: Point::new(0.0, 0.0),
                radius: 1.0,
                color: ThemeToken::GazePoint,
            }],
            area,
            &mut buf,
        );
        assert_eq!(buf[(2, 5)].symbol(), "•");
    }
}
