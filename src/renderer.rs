//! # Terminal Chart Rendering
//!
//! Renders a [`TideReport`] as an ASCII line chart: one column per classified
//! event, a y-axis in meters, `H` for high water, `•` for everything else,
//! and an `X` with a dashed rule where the current sample sits.
//!
//! Rendering is split in two so tests can look at content: [`chart_lines`]
//! builds the chart as plain strings and [`draw_ascii`] prints them.

use crate::{classify, TideKind, TideReport};

const ROWS: usize = 24;
const Y_AXIS_WIDTH: usize = 5; // Space for Y-axis labels

/// Render `report` to stdout.
pub fn draw_ascii(report: &TideReport) {
    for line in chart_lines(report) {
        println!("{line}");
    }
}

/// Build the chart for `report`, one string per terminal row.
///
/// Layout: header, chart grid, tick row, time labels, footer. An empty
/// report renders the header plus a short notice instead of a grid.
pub fn chart_lines(report: &TideReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} (fetched {})",
        report.location.name,
        report.fetched_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if report.events.is_empty() {
        lines.push("No tide samples for this window.".to_string());
        return lines;
    }
    lines.push(String::new());

    let event_count = report.events.len();
    let (min_height, max_height) = report
        .events
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), event| {
            (min.min(event.height), max.max(event.height))
        });
    let range = max_height - min_height;

    // A flat series has no vertical extent to scale into; park it mid-chart.
    let tide_to_row = |height: f64| -> usize {
        if range <= f64::EPSILON {
            return ROWS / 2;
        }
        let normalized = (height - min_height) / range;
        ((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; event_count + Y_AXIS_WIDTH]; ROWS];

    // Y-axis labels in meters, finer steps for small ranges. Heights come
    // straight off the wire, so label values are derived by index with at
    // most one label per row, never accumulated until they cross the top.
    let height_step = if range > 4.0 { 1.0 } else { 0.5 };
    let first_label = (min_height / height_step).floor() * height_step;

    for index in 0..ROWS {
        let label_height = first_label + height_step * index as f64;
        if label_height > max_height {
            break;
        }
        let row = tide_to_row(label_height);

        if row < ROWS {
            let label = format_height(label_height);
            let padded_label = format!("{:<width$}", label, width = Y_AXIS_WIDTH - 1);

            for (i, ch) in padded_label.chars().enumerate() {
                if i < Y_AXIS_WIDTH - 1 {
                    grid[row][i] = ch;
                }
            }
            grid[row][Y_AXIS_WIDTH - 1] = '│'; // Vertical axis line
        }
    }

    for (column, event) in report.events.iter().enumerate() {
        let row = tide_to_row(event.height);
        grid[row][column + Y_AXIS_WIDTH] = match event.kind {
            TideKind::High => 'H',
            TideKind::Low => '•',
        };
    }

    // The event backing `current_height`: same first-within-tolerance scan
    // the classifier uses, so chart and report always agree.
    let current_column = report.events.iter().position(|event| {
        (event.time - report.fetched_at).num_seconds().abs() < classify::CURRENT_TOLERANCE_SECS
    });

    if let Some(column) = current_column {
        let row = tide_to_row(report.events[column].height);
        for (offset, cell) in grid[row].iter_mut().skip(Y_AXIS_WIDTH).enumerate() {
            if *cell == ' ' && offset % 2 == 0 {
                *cell = '-';
            }
        }
        grid[row][column + Y_AXIS_WIDTH] = 'X';
    }

    for row in grid {
        lines.push(row.into_iter().collect());
    }

    // Tick row below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let ticks: String = (0..event_count)
        .map(|i| if i % 6 == 0 { '|' } else { ' ' })
        .collect();
    lines.push(format!("{padding}{ticks}"));

    lines.push(format!("{padding}{}", time_labels(report, current_column)));
    lines.push(String::new());
    lines.push(match report.current_height {
        Some(height) => format!("Current height: {height:.2} m"),
        None => "Current height unavailable (no sample near now)".to_string(),
    });

    lines
}

/// Time labels under the chart: first and last sample clock times, with
/// `now` centered under the current column when one exists.
fn time_labels(report: &TideReport, current_column: Option<usize>) -> String {
    let event_count = report.events.len();
    let first = report.events[0].time.format("%H:%M").to_string();
    let last = report.events[event_count - 1].time.format("%H:%M").to_string();

    match current_column {
        Some(column) => {
            let now_text = "now";
            let now_offset = now_text.len() / 2;
            let left_width = column.saturating_sub(now_offset);
            let left_part = format!("{:<width$}", first, width = left_width);
            let right_width =
                event_count.saturating_sub(column + now_text.len() - now_offset);
            let right_part = format!("{:>width$}", last, width = right_width);
            format!("{left_part}{now_text}{right_part}")
        }
        None => {
            let width = event_count.saturating_sub(first.len());
            format!("{first}{last:>width$}")
        }
    }
}

/// Format a height label in meters with the smallest useful precision.
fn format_height(height: f64) -> String {
    if height.fract() == 0.0 {
        format!("{height:.0}")
    } else {
        format!("{height:.1}")
    }
}
