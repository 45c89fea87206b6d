use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::{hour_label, hour_ticks, BASE_OPACITY};
use crate::error::{LocError, Result};
use crate::page::{Page, Target};
use crate::scale::time_tick_label;
use crate::selection::Selection;
use crate::session::RenderSession;
use chrono::{DateTime, Utc};
use tracing::warn;

const TICK_COUNT: usize = 10;

pub const DOT_COLOR: RGBColor = RGBColor(0x4f, 0x6b, 0xed);
pub const SELECTED_COLOR: RGBColor = RGBColor(0xff, 0x6b, 0x6b);

type Chart<'a, 'b> = ChartContext<
    'a,
    SVGBackend<'b>,
    Cartesian2d<WithKeyPoints<RangedCoordf64>, WithKeyPoints<RangedCoordf64>>,
>;

fn chart_err<E: std::fmt::Display>(e: E) -> LocError {
    LocError::Chart(e.to_string())
}

/// Render the full chart into `#chart`, replacing whatever was there.
pub fn render_scatter_plot(
    page: &mut Page,
    session: &RenderSession,
    selected: &[bool],
    hovered: Option<usize>,
    brush: Option<&Selection>,
) {
    if !page.has(Target::Chart) {
        return;
    }
    match render_svg(session, selected, hovered, brush) {
        Ok(svg) => {
            page.set(Target::Chart, svg);
        }
        Err(e) => warn!(error = %e, "failed to render chart"),
    }
}

/// Standalone SVG markup for the scatter plot.
///
/// `selected` is indexed by commit, `hovered` by position in the plot's draw
/// order.
pub fn render_svg(
    session: &RenderSession,
    selected: &[bool],
    hovered: Option<usize>,
    brush: Option<&Selection>,
) -> Result<String> {
    let plot = &session.plot;
    let layout = plot.layout;
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, (layout.width as u32, layout.height as u32))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let (d0, d1) = plot.x.domain_millis();
        let (x0, x1) = if d0 == d1 {
            (d0 as f64 - 1.0, d1 as f64 + 1.0)
        } else {
            (d0 as f64, d1 as f64)
        };
        let x_keys: Vec<f64> = plot
            .x
            .ticks(TICK_COUNT)
            .iter()
            .map(|t| t.timestamp_millis() as f64)
            .collect();
        let y_keys: Vec<f64> = hour_ticks(2).collect();

        let mut chart = ChartBuilder::on(&root)
            .margin_top(layout.margin.top as u32)
            .margin_right(layout.margin.right as u32)
            .x_label_area_size(layout.margin.bottom as u32)
            .y_label_area_size(layout.margin.left as u32)
            .build_cartesian_2d(
                (x0..x1).with_key_points(x_keys),
                (0f64..24f64).with_key_points(y_keys),
            )
            .map_err(chart_err)?;

        let offset = plot.x.offset();
        let x_label = |ms: &f64| {
            DateTime::<Utc>::from_timestamp_millis(*ms as i64)
                .map(|t| time_tick_label(&t.with_timezone(&offset)))
                .unwrap_or_default()
        };
        let y_label = |h: &f64| hour_label(*h);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(BLACK.mix(0.15))
            .axis_style(BLACK.mix(0.8))
            .x_labels(TICK_COUNT)
            .y_labels(13)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .x_desc(format!("Date (UTC{offset})"))
            .label_style(("sans-serif", 10))
            .draw()
            .map_err(chart_err)?;

        if let Some(sel) = brush {
            draw_brush(&mut chart, session, sel)?;
        }

        chart
            .draw_series(plot.dots.iter().enumerate().map(|(i, dot)| {
                let color = if selected.get(dot.commit).copied().unwrap_or(false) {
                    SELECTED_COLOR
                } else {
                    DOT_COLOR
                };
                let opacity = if hovered == Some(i) { 1.0 } else { BASE_OPACITY };
                let hour = plot.y.invert(dot.cy);
                Circle::new(
                    (plot.x.invert_millis(dot.cx), hour),
                    dot.r.round() as i32,
                    color.mix(opacity).filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(out)
}

fn draw_brush(chart: &mut Chart<'_, '_>, session: &RenderSession, sel: &Selection) -> Result<()> {
    let plot = &session.plot;
    let corners = [
        (plot.x.invert_millis(sel.x0), plot.y.invert(sel.y0)),
        (plot.x.invert_millis(sel.x1), plot.y.invert(sel.y1)),
    ];
    chart
        .draw_series([
            Rectangle::new(corners, DOT_COLOR.mix(0.15).filled()),
            Rectangle::new(corners, ShapeStyle::from(&DOT_COLOR).stroke_width(1)),
        ])
        .map_err(chart_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::tests::sample_records;
    use crate::plot::PlotLayout;

    fn session() -> RenderSession {
        RenderSession::build(sample_records(), "", PlotLayout::default()).unwrap()
    }

    fn hex(c: RGBColor) -> String {
        format!("#{:02X}{:02X}{:02X}", c.0, c.1, c.2)
    }

    #[test]
    fn draws_one_circle_per_commit() {
        let s = session();
        let svg = render_svg(&s, &[false, false], None, None).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(&hex(DOT_COLOR)));
        assert!(!svg.contains(&hex(SELECTED_COLOR)));
    }

    #[test]
    fn labels_hours_and_local_dates() {
        let svg = render_svg(&session(), &[], None, None).unwrap();
        assert!(svg.contains("00:00"));
        assert!(svg.contains("12:00"));
        assert!(svg.contains("Wed 15"));
        assert!(svg.contains("Date (UTC-08:00)"));
    }

    #[test]
    fn marks_selection_and_draws_brush() {
        let s = session();
        let brush = Selection::from_corners((40.0, 10.0), (990.0, 570.0));
        let plain = render_svg(&s, &[false, true], None, None).unwrap();
        let brushed = render_svg(&s, &[false, true], Some(0), Some(&brush)).unwrap();
        assert_eq!(plain.matches(&hex(SELECTED_COLOR)).count(), 1);
        assert_eq!(
            brushed.matches("<rect").count(),
            plain.matches("<rect").count() + 2
        );
    }

    #[test]
    fn single_instant_domain_still_renders() {
        let records = vec![crate::commits::tests::record(
            "solo",
            "a.js",
            1,
            "js",
            "2025-01-15T10:00:00+00:00",
        )];
        let s = RenderSession::build(records, "", PlotLayout::default()).unwrap();
        let svg = render_svg(&s, &[false], None, None).unwrap();
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn skipped_without_chart_target() {
        let s = session();
        let mut page = Page::with_targets("meta", &[Target::Stats]);
        render_scatter_plot(&mut page, &s, &[], None, None);
        assert!(page.get(Target::Chart).is_none());
    }
}
