//! Output formatting utilities for text and JSON output.

use std::fmt::Write as _;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use airsight_core::{Classification, SessionState, Thresholds};
use airsight_types::{AirQualityReading, ForecastPoint, HistoryEntry, ThemePreference, WeatherReading};

/// Shown in place of any value the provider omitted.
pub const UNAVAILABLE: &str = "unavailable";

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Palette to use when colors are enabled.
    pub theme: ThemePreference,
}

impl FormatOptions {
    pub fn new(no_color: bool, theme: ThemePreference) -> Self {
        Self { no_color, theme }
    }

    /// Serialize value to a pretty JSON string.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }

    /// Heading text in the theme's accent color.
    fn heading(&self, text: &str) -> String {
        match (self.no_color, self.theme) {
            (true, _) => text.to_string(),
            (false, ThemePreference::Dark) => text.bright_cyan().bold().to_string(),
            (false, ThemePreference::Light) => text.blue().bold().to_string(),
        }
    }

    /// Secondary text (labels, hints).
    fn muted(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }

    /// Text in the band's color.
    fn banded(&self, text: &str, class: &Classification) -> String {
        match (self.no_color, parse_hex(class.color_token)) {
            (false, Some((r, g, b))) => text.truecolor(r, g, b).bold().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Parse a `#rrggbb` color token.
fn parse_hex(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Format an optional measurement, rendering absence as [`UNAVAILABLE`].
pub fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.1}"),
        Some(v) => format!("{v:.1} {unit}"),
        None => UNAVAILABLE.to_string(),
    }
}

/// Format an index for display (whole numbers, as providers report them).
pub fn format_index(index: Option<f64>) -> String {
    match index {
        Some(v) => format!("{v:.0}"),
        None => UNAVAILABLE.to_string(),
    }
}

/// Short description of a WMO weather interpretation code.
pub fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        56 | 57 => "freezing drizzle",
        61 | 63 | 65 => "rain",
        66 | 67 => "freezing rain",
        71 | 73 | 75 | 77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95 => "thunderstorm",
        96 | 99 => "thunderstorm with hail",
        _ => "unknown conditions",
    }
}

// ============================================================================
// Session state
// ============================================================================

/// Format a session state as human-readable text.
pub fn format_state_text(state: &SessionState, thresholds: &Thresholds, opts: &FormatOptions) -> String {
    match state {
        SessionState::Idle => format!("{}\n", opts.muted("Nothing requested yet")),
        SessionState::Loading => format!("{}\n", opts.muted("Loading...")),
        SessionState::Failed { message, .. } => format!("{message}\n"),
        SessionState::Ready {
            location,
            coordinate,
            air_quality,
            forecast,
            weather,
        } => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{}  {}",
                opts.heading(location),
                opts.muted(&format!("({coordinate})"))
            );
            out.push('\n');
            out.push_str(&format_air_quality(air_quality, thresholds, opts));
            if let Some(weather) = weather {
                out.push('\n');
                out.push_str(&format_weather(weather, opts));
            }
            if !forecast.is_empty() {
                out.push('\n');
                out.push_str(&format_forecast(forecast, thresholds, opts));
            }
            out
        }
    }
}

fn format_air_quality(reading: &AirQualityReading, thresholds: &Thresholds, opts: &FormatOptions) -> String {
    let class = thresholds.classify(reading.index);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "  {:<8} {}  {} {}",
        opts.muted("AQI"),
        opts.banded(&format_index(reading.index), &class),
        class.emoji,
        opts.banded(class.label, &class)
    );
    if !class.advisory.is_empty() {
        let _ = writeln!(out, "  {:<8} {}", "", class.advisory);
    }

    let pollutants = [
        ("PM2.5", reading.pm2_5),
        ("PM10", reading.pm10),
        ("NO2", reading.nitrogen_dioxide),
        ("CO", reading.carbon_monoxide),
    ];
    for (label, value) in pollutants {
        let _ = writeln!(out, "  {:<8} {}", opts.muted(label), format_value(value, "µg/m³"));
    }
    out
}

fn format_weather(weather: &WeatherReading, opts: &FormatOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<8} {:.1}°C (feels like {:.1}°C), {}",
        opts.muted("Weather"),
        weather.temperature,
        weather.apparent_temperature,
        weather_description(weather.weather_code)
    );
    let _ = writeln!(
        out,
        "  {:<8} humidity {:.0}%, wind {:.1} km/h, {:.1} hPa",
        "", weather.humidity_pct, weather.wind_speed, weather.pressure
    );
    out
}

fn format_forecast(forecast: &[ForecastPoint], thresholds: &Thresholds, opts: &FormatOptions) -> String {
    let mut out = format!("  {}\n", opts.heading("24h forecast"));
    for point in forecast {
        let class = thresholds.classify(point.index);
        let _ = writeln!(
            out,
            "  {}  {:>11}  {}",
            opts.muted(&point.time_label),
            opts.banded(&format_index(point.index), &class),
            class.label
        );
    }
    out
}

// ============================================================================
// History and theme
// ============================================================================

/// Format the history list, most recent first, numbered from 1.
pub fn format_history_text(entries: &[HistoryEntry], opts: &FormatOptions) -> String {
    if entries.is_empty() {
        return format!("{}\n", opts.muted("No recent locations"));
    }
    let mut out = format!("{}\n", opts.heading("Recent locations"));
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  {}",
            i + 1,
            entry.name,
            opts.muted(&format!("({})", entry.coordinate))
        );
    }
    out
}

/// Theme as a JSON object.
#[derive(Debug, Serialize)]
pub struct ThemeOutput {
    pub theme: ThemePreference,
}
