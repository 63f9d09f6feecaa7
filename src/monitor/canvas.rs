use std::f64::consts::PI;

use anyhow::{anyhow, bail, Result};
use chrono::Duration;
use humantime::format_duration;
use leptos::{html::Canvas, HtmlElement};
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use web_sys::CanvasRenderingContext2d;

use crate::use_canvas::CanvasSize;

use super::{
    chart::{
        closest_present, index_to_x, isolated_points, label_stride, segments, value_to_y,
        x_to_index, y_margin, PLOT_PADDING,
    },
    series::WindowedSeries,
};

const BACKGROUND: &str = "#13171f";
const FOREGROUND: &str = "white";
const LINE_COLOR: &str = "#00b8ff";
const TICK_LENGTH: f64 = 6.0;
const DOT_RADIUS: f64 = 3.0;

pub struct MonitorCanvas {
    ctx: CanvasRenderingContext2d,
    show_stats: bool,
}

impl MonitorCanvas {
    pub fn try_new(node: &HtmlElement<Canvas>) -> Result<Self> {
        #[derive(serde::Serialize)]
        struct ContextOptions {
            alpha: bool,
        }

        let ctx = node
            .get_context_with_context_options(
                "2d",
                &serde_wasm_bindgen::to_value(&ContextOptions { alpha: false })
                    .map_err(|err| anyhow!("context options serialization error: {err}"))?,
            )
            .map_err(|err| anyhow!("{err:?}"))?;
        let Some(ctx) = ctx else {
            bail!("canvas' 2d context not found");
        };

        let ctx = ctx
            .dyn_into()
            .map_err(|err| anyhow!("context dyn conversion error: {err:?}"))?;

        Ok(Self {
            ctx,
            show_stats: cfg!(debug_assertions),
        })
    }

    pub fn render(
        &mut self,
        series: &WindowedSeries,
        window: Duration,
        size: CanvasSize,
        mouse_x: Option<f64>,
    ) {
        debug!(points = series.len(), ?size, "rendering");

        if !size.is_drawable() {
            return;
        }

        let CanvasSize { width, height, dpr } = size;

        self.ctx.save();
        if let Err(err) = self.ctx.scale(dpr, dpr) {
            error!(dpr, "context scaling failed: {err:?}");
        };
        self.ctx.set_font("14px Arial");
        self.ctx.set_fill_style(&BACKGROUND.into());
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style(&FOREGROUND.into());

        match series.max_value() {
            Some(max_value) => {
                self.render_axis(series, width, height);
                self.render_line(series, max_value, width, height);
                if let Some(mouse_x) = mouse_x {
                    self.render_hover(series, max_value, width, height, mouse_x);
                }
            }
            None if series.is_empty() => self.render_empty("No checks recorded yet", width, height),
            None => self.render_empty("No response times in the last 24 hours", width, height),
        }

        if self.show_stats {
            self.render_stats(series, window);
        }

        self.ctx.restore();
    }

    fn render_axis(&mut self, series: &WindowedSeries, width: f64, height: f64) {
        debug!("rendering axis");

        let y = height - y_margin(height);

        self.ctx.begin_path();
        self.ctx.move_to(PLOT_PADDING, y);
        self.ctx.line_to(width - PLOT_PADDING, y);
        self.ctx.set_stroke_style(&FOREGROUND.into());
        self.ctx.stroke();

        let count = series.len();
        let stride = label_stride(count, width);

        for (index, label) in series.time_labels.iter().enumerate().step_by(stride) {
            if label.is_empty() {
                continue;
            }

            let x = index_to_x(index, count, width);

            self.ctx.begin_path();
            self.ctx.move_to(x, y);
            self.ctx.line_to(x, y + TICK_LENGTH);
            self.ctx.stroke();

            let text_width = self
                .ctx
                .measure_text(label)
                .map(|metrics| metrics.width())
                .unwrap_or_default();

            if let Err(err) = self
                .ctx
                .fill_text(label, x - text_width / 2.0, y + TICK_LENGTH * 3.0)
            {
                error!("fill text error: {err:?}");
            }
        }
    }

    fn render_line(&mut self, series: &WindowedSeries, max_value: f64, width: f64, height: f64) {
        debug!("rendering line");

        let count = series.len();
        self.ctx.set_stroke_style(&LINE_COLOR.into());

        let segments = segments(&series.chart_data);

        for segment in segments.iter().filter(|segment| segment.len() > 1) {
            self.ctx.begin_path();

            for &(index, value) in segment {
                let x = index_to_x(index, count, width);
                let y = value_to_y(value, max_value, height);
                self.ctx.line_to(x, y);
            }

            self.ctx.stroke();
        }

        self.ctx.set_fill_style(&LINE_COLOR.into());
        for (index, value) in isolated_points(&segments) {
            let x = index_to_x(index, count, width);
            let y = value_to_y(value, max_value, height);
            self.render_dot(x, y);
        }
        self.ctx.set_fill_style(&FOREGROUND.into());

        if let Err(err) = self
            .ctx
            .fill_text(&format!("{max_value:.0} ms"), 4.0, y_margin(height))
        {
            error!("fill text error: {err:?}");
        }

        self.ctx.set_stroke_style(&FOREGROUND.into());
    }

    fn render_hover(
        &mut self,
        series: &WindowedSeries,
        max_value: f64,
        width: f64,
        height: f64,
        mouse_x: f64,
    ) {
        let count = series.len();
        let Some(index) = x_to_index(mouse_x, count, width) else {
            return;
        };
        let Some((index, value)) = closest_present(&series.chart_data, index) else {
            return;
        };

        let x = index_to_x(index, count, width);
        let y = value_to_y(value, max_value, height);

        self.ctx.set_fill_style(&LINE_COLOR.into());
        self.render_dot(x, y);
        self.ctx.set_fill_style(&FOREGROUND.into());

        let label = series
            .time_labels
            .get(index)
            .map(String::as_str)
            .unwrap_or_default();
        if let Err(err) = self
            .ctx
            .fill_text(&format!("{label} {value:.0} ms"), x + 8.0, y - 8.0)
        {
            error!("fill text error: {err:?}");
        }
    }

    fn render_dot(&mut self, x: f64, y: f64) {
        self.ctx.begin_path();
        if let Err(err) = self.ctx.arc(x, y, DOT_RADIUS, 0.0, 2.0 * PI) {
            error!("arc drawing error: {err:?}");
        }
        self.ctx.fill();
    }

    fn render_empty(&mut self, text: &str, width: f64, height: f64) {
        debug!(text, "rendering empty chart");

        let text_width = self
            .ctx
            .measure_text(text)
            .map(|metrics| metrics.width())
            .unwrap_or_default();

        if let Err(err) = self
            .ctx
            .fill_text(text, (width - text_width) / 2.0, height / 2.0)
        {
            error!("fill text error: {err:?}");
        }
    }

    fn render_stats(&mut self, series: &WindowedSeries, window: Duration) {
        let summary = series.summary();

        let window = match window.to_std() {
            Ok(window) => format_duration(window).to_string(),
            Err(err) => {
                error!(%window, "duration couldn't be converted to std duration: {err:?}");
                "unknown".to_string()
            }
        };

        let lines = [
            format!("rendering {} of {} points", summary.samples, series.len()),
            format!("window {window}"),
            format!(
                "start {}",
                series
                    .window_start
                    .map_or_else(|| "none".to_string(), |start| start.to_rfc3339())
            ),
        ];

        for (line, text) in (1_u8..).zip(lines) {
            if let Err(err) = self.ctx.fill_text(&text, PLOT_PADDING, 16.0 * f64::from(line)) {
                error!("fill text error: {err:?}");
            }
        }
    }
}
