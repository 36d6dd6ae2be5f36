//! Render targets for search results
//!
//! The dashboard never formats anything itself; it hands a [`WeatherBundle`]
//! or an error to a [`RenderTarget`].

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::error::ErrorBody;
use crate::models::{CityTemperature, QuickConditions, WeatherBundle};
use crate::{Result, WeatherDashError};

const SUMMARY_CHARS: usize = 150;
const DEFAULT_FORECAST_WINDOW: usize = 6;

const WEATHER_TIPS: [(&str, &str); 4] = [
    (
        "☀️ Summer Safety",
        "Stay hydrated and avoid direct sunlight during peak hours (10 AM - 4 PM)",
    ),
    (
        "🌧️ Monsoon Preparedness",
        "Keep umbrellas handy and avoid waterlogged areas during heavy rains",
    ),
    (
        "❄️ Winter Care",
        "Dress in layers and protect yourself from cold winds and fog",
    ),
    (
        "🌫️ Air Quality",
        "Check AQI levels daily and wear masks when pollution levels are high",
    ),
];

/// Anything that can present dashboard results
pub trait RenderTarget {
    fn render(&mut self, bundle: &WeatherBundle) -> Result<()>;

    /// Present a failed search; no partial weather content is shown
    fn render_error(&mut self, error: &WeatherDashError) -> Result<()>;

    fn render_quick(&mut self, conditions: &QuickConditions) -> Result<()>;

    fn render_comparison(&mut self, rows: &[CityTemperature]) -> Result<()>;
}

/// Human-readable text output
pub struct TerminalRenderer<W: Write> {
    writer: W,
    tz: Option<Tz>,
    forecast_window: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            tz: None,
            forecast_window: DEFAULT_FORECAST_WINDOW,
        }
    }

    /// Clock times in `tz` instead of the system timezone
    #[must_use]
    pub fn with_timezone(mut self, tz: Option<Tz>) -> Self {
        self.tz = tz;
        self
    }

    #[must_use]
    pub fn with_forecast_window(mut self, forecast_window: usize) -> Self {
        self.forecast_window = forecast_window;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn clock(&self, time: DateTime<Utc>) -> String {
        match self.tz {
            Some(tz) => time.with_timezone(&tz).format("%H:%M").to_string(),
            None => time.with_timezone(&Local).format("%H:%M").to_string(),
        }
    }

    fn date(&self, time: DateTime<Utc>) -> String {
        match self.tz {
            Some(tz) => time.with_timezone(&tz).format("%d/%m/%Y").to_string(),
            None => time.with_timezone(&Local).format("%d/%m/%Y").to_string(),
        }
    }

    fn write_current(&mut self, bundle: &WeatherBundle) -> Result<()> {
        let current = &bundle.current;
        let insights = &bundle.insights;
        let w = &mut self.writer;

        writeln!(w, "{}", insights.greeting)?;
        writeln!(w, "📍 {}", bundle.location.display_name())?;
        writeln!(
            w,
            "🌡️ {} (feels like {:.1}°C)",
            current.format_temperature(),
            current.feels_like_c
        )?;
        writeln!(w, "{} - {}", current.condition_main, current.condition_description)?;
        writeln!(w, "💡 {}", insights.advice)?;
        writeln!(
            w,
            "💧 Humidity: {}%   🌬️ Wind: {}   ☁️ Cloudiness: {}%   🌡️ Pressure: {}",
            current.humidity_pct,
            current.format_wind(),
            current.cloudiness_pct,
            current.format_pressure()
        )?;

        let scene = if insights.scene.windy {
            format!("{}, windy", insights.scene.category)
        } else {
            insights.scene.category.to_string()
        };
        writeln!(w, "Scene: {scene}")?;
        writeln!(w)?;

        writeln!(
            w,
            "🌫️ Air Quality Index: {} ({})",
            bundle.air_quality.display_level(),
            insights.aqi.label
        )?;
        writeln!(
            w,
            "PM2.5: {} µg/m³   PM10: {} µg/m³",
            bundle.air_quality.pm25, bundle.air_quality.pm10
        )?;
        Ok(())
    }

    fn write_details(&mut self, bundle: &WeatherBundle) -> Result<()> {
        let Some(details) = &bundle.insights.details else {
            return Ok(());
        };

        let sunrise = details.sunrise.map_or_else(|| "N/A".to_string(), |t| self.clock(t));
        let sunset = details.sunset.map_or_else(|| "N/A".to_string(), |t| self.clock(t));
        let w = &mut self.writer;

        writeln!(w)?;
        writeln!(w, "🌅 Sunrise: {sunrise}   🌇 Sunset: {sunset}")?;
        writeln!(w, "☀️ UV Index: {} ({})", details.uv.index, details.uv.level)?;
        writeln!(
            w,
            "👁️ Visibility: {} ({})",
            details.visibility.format_distance(),
            details.visibility.bucket
        )?;

        if details.alerts.is_empty() {
            writeln!(w, "✅ No weather alerts")?;
        } else {
            for alert in &details.alerts {
                writeln!(w, "⚠️ {}", alert.message)?;
            }
        }
        Ok(())
    }

    fn write_forecast(&mut self, bundle: &WeatherBundle) -> Result<()> {
        let rows: Vec<String> = bundle
            .forecast
            .iter()
            .map(|entry| {
                format!(
                    "  {}  {:.1}°C  {}",
                    self.clock(entry.timestamp),
                    entry.temperature_c,
                    entry.condition_main
                )
            })
            .collect();

        writeln!(self.writer)?;
        writeln!(self.writer, "🕰️ Next {} Hours", self.forecast_window)?;
        for row in rows {
            writeln!(self.writer, "{row}")?;
        }
        Ok(())
    }

    fn write_news(&mut self, bundle: &WeatherBundle) -> Result<()> {
        let dates: Vec<String> = bundle
            .news
            .iter()
            .map(|article| self.date(article.published_at))
            .collect();
        let w = &mut self.writer;

        writeln!(w)?;
        writeln!(w, "🌐 Latest Weather & Climate News")?;

        if bundle.news.is_empty() {
            writeln!(w, "🌤️ Weather Tips & Information")?;
            for (title, tip) in WEATHER_TIPS {
                writeln!(w, "  {title}: {tip}")?;
            }
            return Ok(());
        }

        for (article, date) in bundle.news.iter().zip(dates) {
            writeln!(w, "  • {}", article.title)?;
            writeln!(w, "    {}", article.summary(SUMMARY_CHARS))?;
            match &article.url {
                Some(url) => writeln!(w, "    {date} · {url}")?,
                None => writeln!(w, "    {date}")?,
            }
        }
        Ok(())
    }
}

impl<W: Write> RenderTarget for TerminalRenderer<W> {
    fn render(&mut self, bundle: &WeatherBundle) -> Result<()> {
        self.write_current(bundle)?;
        self.write_details(bundle)?;
        self.write_forecast(bundle)?;
        self.write_news(bundle)?;
        self.writer.flush()?;
        Ok(())
    }

    fn render_error(&mut self, error: &WeatherDashError) -> Result<()> {
        writeln!(self.writer, "❌ Unable to fetch weather data")?;
        writeln!(self.writer, "{}", error.user_message())?;
        writeln!(self.writer, "Details: {error}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn render_quick(&mut self, conditions: &QuickConditions) -> Result<()> {
        writeln!(self.writer, "📍 {}", conditions.location.display_name())?;
        writeln!(
            self.writer,
            "🌡️ {:.1}°C   🌬️ {} km/h",
            conditions.temperature_c, conditions.wind_speed_kmh
        )?;
        if let Some(observed) = conditions.observed_at {
            writeln!(self.writer, "🕒 Observed {}", observed.format("%Y-%m-%d %H:%M"))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn render_comparison(&mut self, rows: &[CityTemperature]) -> Result<()> {
        for row in rows {
            writeln!(self.writer, "{:<12} {}", row.city, row.format_temperature())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Pretty-printed JSON output
pub struct JsonRenderer<W: Write> {
    writer: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_value<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value).map_err(std::io::Error::from)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> RenderTarget for JsonRenderer<W> {
    fn render(&mut self, bundle: &WeatherBundle) -> Result<()> {
        self.write_value(bundle)
    }

    fn render_error(&mut self, error: &WeatherDashError) -> Result<()> {
        self.write_value(&ErrorBody::from(error))
    }

    fn render_quick(&mut self, conditions: &QuickConditions) -> Result<()> {
        self.write_value(conditions)
    }

    fn render_comparison(&mut self, rows: &[CityTemperature]) -> Result<()> {
        self.write_value(rows)
    }
}
