//! Descriptive text renderer

use super::{ChartFrame, Renderer};
use crate::registry::{AssetSnapshot, Direction};
use chrono::Local;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

/// Format an amount as en-US dollars, e.g. `-$1,234.50`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Identifier with its first letter capitalized, e.g. `Bitcoin`
pub fn display_name(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One-line overview of an asset, e.g. for end-of-run summaries
pub fn summary_line(snapshot: &AssetSnapshot) -> String {
    let price = |p: Option<Decimal>| p.map(format_usd).unwrap_or_else(|| "-".to_string());
    let change = match snapshot.delta() {
        Some(delta) if delta.direction == Direction::Flat => "0".to_string(),
        Some(delta) => format!(
            "{}{}",
            if delta.direction == Direction::Up { "+" } else { "-" },
            format_usd(delta.magnitude)
        ),
        None => "-".to_string(),
    };

    format!(
        "{:<10} current {:>14}  high {:>14}  low {:>14}  change {:>12}  ({} observations)",
        snapshot.identifier,
        price(snapshot.current_price),
        price(snapshot.highest_price),
        price(snapshot.lowest_price),
        change,
        snapshot.observation_count
    )
}

/// Writes a headline, the change since the first price and the session range
pub struct TextRenderer<W: Write> {
    out: W,
    /// Sparkline width in points; 0 disables it
    sparkline_width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sparkline_width: 0,
        }
    }

    /// Append a sparkline of the most recent `width` points
    pub fn with_sparkline(mut self, width: usize) -> Self {
        self.sparkline_width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn change_line(snapshot: &AssetSnapshot) -> Option<String> {
        let delta = snapshot.delta()?;
        Some(match delta.direction {
            Direction::Up => format!("Up +{}", format_usd(delta.magnitude)),
            Direction::Down => format!("Down -{}", format_usd(delta.magnitude)),
            Direction::Flat => "Unchanged = 0".to_string(),
        })
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &AssetSnapshot) -> anyhow::Result<()> {
        let name = display_name(&snapshot.identifier);
        let (Some(current), Some(latest)) = (snapshot.current_price, snapshot.history.last())
        else {
            writeln!(self.out, "{}: waiting for prices...", name)?;
            return Ok(());
        };

        let local_time = latest.timestamp.with_timezone(&Local);
        writeln!(
            self.out,
            "{} price at {}: {} USD",
            name,
            local_time.format("%Y-%m-%d %H:%M:%S"),
            format_usd(current)
        )?;

        if let Some(change) = Self::change_line(snapshot) {
            writeln!(self.out, "{}", change)?;
        }

        if let (Some(high), Some(low)) = (snapshot.highest_price, snapshot.lowest_price) {
            writeln!(
                self.out,
                "High {} / Low {} ({} observations)",
                format_usd(high),
                format_usd(low),
                snapshot.observation_count
            )?;
        }

        if self.sparkline_width > 0 {
            if let Some(chart) = ChartFrame::from_snapshot(snapshot) {
                writeln!(self.out, "{}", chart.sparkline(self.sparkline_width))?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
