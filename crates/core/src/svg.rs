//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use gaze_plot_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 96 + 512);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background),
    ));

    let mut clip_count = 0usize;
    let mut clip_open = false;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let fill = resolve_color(*color);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(
                        r#" stroke="{}" stroke-width="0.5""#,
                        resolve_color(*border)
                    ));
                }
                match label {
                    Some(label) => svg.push_str(&format!(
                        "><title>{}</title></rect>",
                        escape_xml(label)
                    )),
                    None => svg.push_str("/>"),
                }
            }
            RenderCommand::DrawPoint {
                center,
                radius,
                color,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                    center.x,
                    center.y,
                    resolve_color(*color),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
                vertical,
            } => {
                let fill = resolve_color(*color);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let rotate = if *vertical {
                    format!(
                        r#" transform="rotate(-90 {} {})""#,
                        position.x, position.y
                    )
                } else {
                    String::new()
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}"{rotate}>{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::SetClip { rect } => {
                if clip_open {
                    svg.push_str("</g>");
                }
                clip_count += 1;
                svg.push_str(&format!(
                    r#"<clipPath id="clip{clip_count}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_count})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                clip_open = true;
            }
            RenderCommand::ClearClip => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    if clip_open {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

/// Concrete figure palette.
pub fn resolve_color(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::LineAddition => "#c1e9c1",
        ThemeToken::LineDeletion => "#f1c0c0",
        ThemeToken::LineUnchanged => "#ffffff",
        ThemeToken::LineExpandable => "#e9f3ff",
        ThemeToken::DiffSeparator => "#000000",
        ThemeToken::LineUnknown => "#ffc0cb",
        ThemeToken::GazePoint => "#1f77b4",
        ThemeToken::Background | ThemeToken::LegendBackground => "#ffffff",
        ThemeToken::PlotBorder | ThemeToken::AxisLine | ThemeToken::TextPrimary => "#1a1a2e",
        ThemeToken::GridLine => "#dee2e6",
        ThemeToken::TextMuted => "#666677",
        ThemeToken::LegendBorder => "#adb5bd",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_plot_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::DrawRect {
                rect: Rect::new(10.0, 20.0, 100.0, 18.0),
                color: ThemeToken::LineAddition,
                border_color: None,
                label: Some("row 3".into()),
                row: Some(3),
            },
            RenderCommand::DrawPoint {
                center: Point::new(12.0, 29.0),
                radius: 1.5,
                color: ThemeToken::GazePoint,
            },
        ];
        let svg = render_svg(&commands, 800.0, 400.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("row 3"));
        assert!(svg.contains("#c1e9c1"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "/o/r/pull/1/files?w=1&diff=split".into(),
            color: ThemeToken::TextPrimary,
            font_size: 11.0,
            align: TextAlign::Left,
            vertical: false,
        }];
        let svg = render_svg(&commands, 400.0, 100.0);
        assert!(svg.contains("w=1&amp;diff=split"));
    }

    #[test]
    fn clip_groups_are_balanced() {
        let commands = vec![
            RenderCommand::SetClip {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
            RenderCommand::DrawPoint {
                center: Point::new(1.0, 1.0),
                radius: 1.0,
                color: ThemeToken::GazePoint,
            },
        ];
        let svg = render_svg(&commands, 10.0, 10.0);
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
        assert!(svg.contains(r#"clip-path="url(#clip1)""#));
    }

    #[test]
    fn vertical_text_is_rotated() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(16.0, 200.0),
            text: "Diff line".into(),
            color: ThemeToken::TextPrimary,
            font_size: 11.0,
            align: TextAlign::Center,
            vertical: true,
        }];
        let svg = render_svg(&commands, 100.0, 400.0);
        assert!(svg.contains(r#"transform="rotate(-90 16 200)""#));
    }

    #[test]
    fn unknown_rows_are_pink() {
        assert_eq!(resolve_color(ThemeToken::LineUnknown), "#ffc0cb");
        assert_eq!(resolve_color(ThemeToken::DiffSeparator), "#000000");
    }
}
