//! 内联 SVG 图表
//!
//! 涨跌幅横向柱状图与 7 天折线图，直接嵌入页面，不依赖前端脚本。

use super::html::escape;
use crate::types::{PercentChangeView, Timeframe};
use std::fmt::Write as _;

pub const POSITIVE_COLOR: &str = "#2ca02c";
pub const NEGATIVE_COLOR: &str = "#d62728";
const LINE_COLOR: &str = "#1f77b4";

const BAR_WIDTH: f64 = 420.0;
const BAR_ROW_HEIGHT: f64 = 18.0;
const BAR_LABEL_WIDTH: f64 = 70.0;
const BAR_VALUE_WIDTH: f64 = 70.0;

const LINE_WIDTH: f64 = 640.0;
const LINE_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 第 `index` 行的顶部坐标；视图第一行在最下方
fn bar_row_top(index: usize, rows: usize) -> f64 {
    5.0 + (rows - 1 - index) as f64 * BAR_ROW_HEIGHT
}

/// 按视图顺序从下往上绘制，升序排序时最大值在最上方；正值绿色、非正值红色
pub fn percent_change_bars(view: &PercentChangeView, timeframe: Timeframe) -> String {
    if view.rows.is_empty() {
        return "<p class=\"info\">No rows to plot.</p>".to_string();
    }

    let values: Vec<f64> = view.rows.iter().map(|r| finite(r.value(timeframe))).collect();
    let low = values.iter().cloned().fold(0.0_f64, f64::min);
    let high = values.iter().cloned().fold(0.0_f64, f64::max);
    let span = if high - low > 0.0 { high - low } else { 1.0 };

    let scale = |v: f64| BAR_LABEL_WIDTH + (v - low) / span * BAR_WIDTH;
    let zero_x = scale(0.0);

    let width = BAR_LABEL_WIDTH + BAR_WIDTH + BAR_VALUE_WIDTH;
    let height = BAR_ROW_HEIGHT * view.rows.len() as f64 + 10.0;

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg class=\"bar-chart\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\" data-column=\"{col}\">",
        w = width,
        h = height,
        col = timeframe.column_name()
    );

    for (i, (row, value)) in view.rows.iter().zip(values.iter()).enumerate() {
        let y = bar_row_top(i, view.rows.len());
        let x = scale(*value);
        let (left, bar) = if x >= zero_x {
            (zero_x, x - zero_x)
        } else {
            (x, zero_x - x)
        };
        let color = if row.is_positive(timeframe) {
            POSITIVE_COLOR
        } else {
            NEGATIVE_COLOR
        };

        let _ = write!(
            svg,
            "<g class=\"bar\" data-symbol=\"{sym}\"><text x=\"{lx:.1}\" y=\"{ty:.1}\" font-size=\"11\" text-anchor=\"end\">{sym}</text>\
<rect x=\"{left:.2}\" y=\"{y:.1}\" width=\"{bar:.2}\" height=\"{bh:.1}\" fill=\"{color}\"/>\
<text x=\"{vx:.1}\" y=\"{ty:.1}\" font-size=\"10\">{value:.2}</text></g>",
            sym = escape(&row.symbol),
            lx = BAR_LABEL_WIDTH - 6.0,
            ty = y + BAR_ROW_HEIGHT * 0.7,
            left = left,
            y = y + 2.0,
            bar = bar,
            bh = BAR_ROW_HEIGHT - 4.0,
            color = color,
            vx = BAR_LABEL_WIDTH + BAR_WIDTH + 4.0,
            value = value,
        );
    }

    let _ = write!(
        svg,
        "<line x1=\"{x:.2}\" y1=\"0\" x2=\"{x:.2}\" y2=\"{h:.0}\" stroke=\"#444\" stroke-width=\"1\"/></svg>",
        x = zero_x,
        h = height
    );
    svg
}

/// x 轴为第 1..=n 天的折线图
pub fn day_series_line(title: &str, y_label: &str, points: &[f64]) -> String {
    if points.is_empty() {
        return "<p class=\"info\">No data available for the selected coin.</p>".to_string();
    }

    let values: Vec<f64> = points.iter().map(|v| finite(*v)).collect();
    let mut low = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if high - low <= 0.0 {
        low -= 1.0;
        high += 1.0;
    }

    let plot_w = LINE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = LINE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let steps = (values.len().max(2) - 1) as f64;

    let x_at = |i: usize| MARGIN_LEFT + i as f64 / steps * plot_w;
    let y_at = |v: f64| MARGIN_TOP + (high - v) / (high - low) * plot_h;

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg class=\"line-chart\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\
<text x=\"{tx:.1}\" y=\"22\" font-size=\"15\" text-anchor=\"middle\">{title}</text>",
        w = LINE_WIDTH,
        h = LINE_HEIGHT,
        tx = LINE_WIDTH / 2.0,
        title = escape(title)
    );

    // axes
    let _ = write!(
        svg,
        "<line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#444\"/>\
<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#444\"/>",
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + plot_w,
        t = MARGIN_TOP,
        b = MARGIN_TOP + plot_h
    );

    for i in 0..values.len() {
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"11\" text-anchor=\"middle\">{day}</text>",
            x = x_at(i),
            y = MARGIN_TOP + plot_h + 16.0,
            day = i + 1
        );
    }

    for v in [high, low] {
        let _ = write!(
            svg,
            "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"10\" text-anchor=\"end\">{v}</text>",
            x = MARGIN_LEFT - 6.0,
            y = y_at(v) + 4.0,
            v = format_axis_value(v)
        );
    }

    let _ = write!(
        svg,
        "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"middle\">Days</text>\
<text x=\"14\" y=\"{my:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 14 {my:.1})\">{label}</text>",
        x = MARGIN_LEFT + plot_w / 2.0,
        y = LINE_HEIGHT - 10.0,
        my = MARGIN_TOP + plot_h / 2.0,
        label = escape(y_label)
    );

    let path: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.2},{:.2}", x_at(i), y_at(*v)))
        .collect();
    let _ = write!(
        svg,
        "<polyline fill=\"none\" stroke=\"{c}\" stroke-width=\"2\" points=\"{p}\"/>",
        c = LINE_COLOR,
        p = path.join(" ")
    );
    for (i, v) in values.iter().enumerate() {
        let _ = write!(
            svg,
            "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"3.5\" fill=\"{c}\"><title>Day {d}: {v}</title></circle>",
            x = x_at(i),
            y = y_at(*v),
            c = LINE_COLOR,
            d = i + 1,
            v = v
        );
    }

    svg.push_str("</svg>");
    svg
}

fn format_axis_value(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PercentChangeRow;

    fn row(symbol: &str, change_7d: f64) -> PercentChangeRow {
        PercentChangeRow {
            symbol: symbol.to_string(),
            percent_change_1h: 0.0,
            percent_change_24h: 0.0,
            percent_change_7d: change_7d,
            positive_percent_change_1h: false,
            positive_percent_change_24h: false,
            positive_percent_change_7d: change_7d > 0.0,
        }
    }

    #[test]
    fn test_bar_colors_follow_sign() {
        let view = PercentChangeView {
            rows: vec![row("UP", 4.0), row("DOWN", -3.0)],
        };
        let svg = percent_change_bars(&view, Timeframe::SevenDays);

        let up = svg.find("data-symbol=\"UP\"").unwrap();
        let down = svg.find("data-symbol=\"DOWN\"").unwrap();
        assert!(up < down);
        assert!(svg[up..down].contains(POSITIVE_COLOR));
        assert!(svg[down..].contains(NEGATIVE_COLOR));
        assert!(svg.contains("data-column=\"percent_change_7d\""));
    }

    #[test]
    fn test_first_row_drawn_at_bottom() {
        let view = PercentChangeView {
            rows: vec![row("LOW", -3.0), row("MID", 0.5), row("HIGH", 4.0)],
        };
        let svg = percent_change_bars(&view, Timeframe::SevenDays);

        let bar_y = |symbol: &str| -> f64 {
            let start = svg.find(&format!("data-symbol=\"{}\"", symbol)).unwrap();
            let rect = start + svg[start..].find("<rect").unwrap();
            let attr = rect + svg[rect..].find(" y=\"").unwrap() + 4;
            let end = attr + svg[attr..].find('"').unwrap();
            svg[attr..end].parse().unwrap()
        };

        assert!(bar_y("HIGH") < bar_y("MID"));
        assert!(bar_y("MID") < bar_y("LOW"));
        assert_eq!(bar_row_top(2, 3), 5.0);
        assert_eq!(bar_row_top(0, 3), 5.0 + 2.0 * BAR_ROW_HEIGHT);
    }

    #[test]
    fn test_empty_bar_chart() {
        let svg = percent_change_bars(&PercentChangeView::default(), Timeframe::OneHour);
        assert!(svg.contains("No rows to plot"));
    }

    #[test]
    fn test_line_chart_has_one_marker_per_day() {
        let svg = day_series_line("BTC - 24h Volume", "Volume", &[1.0, 2.0, 3.0, 2.5, 2.0, 1.0, 4.0]);
        assert_eq!(svg.matches("<circle").count(), 7);
        assert!(svg.contains("Day 7: 4"));
        assert!(svg.contains("BTC - 24h Volume"));
    }

    #[test]
    fn test_flat_line_chart_does_not_divide_by_zero() {
        let svg = day_series_line("flat", "Volume", &[5.0; 7]);
        assert!(!svg.contains("NaN"));
    }
}
