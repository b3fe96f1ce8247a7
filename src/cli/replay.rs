//! Replay command implementation

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::feed::{CoinCapFeed, PriceFrame};
use crate::registry::PriceRegistry;
use crate::render::{summary_line, Renderer, TextRenderer};
use crate::telemetry::{self, CounterMetric};
use anyhow::Context;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File with one JSON price frame per line
    pub file: PathBuf,

    /// Asset to display while replaying
    #[arg(short, long)]
    pub select: Option<String>,

    /// Only print the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Outcome of a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Frames applied to the dashboard
    pub frames: usize,
    /// Lines that failed to decode
    pub malformed: usize,
}

/// Decode each non-blank line and feed it through the dashboard
///
/// Malformed lines are logged and skipped, like malformed frames on the live
/// stream.
pub fn replay_frames<R: Renderer>(input: &str, dashboard: &mut Dashboard<R>) -> ReplayStats {
    let mut stats = ReplayStats::default();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match CoinCapFeed::decode_frame(line) {
            Ok(prices) => {
                telemetry::increment(CounterMetric::Frames);
                dashboard.handle_frame(&PriceFrame::now(prices));
                stats.frames += 1;
            }
            Err(e) => {
                telemetry::increment(CounterMetric::DecodeErrors);
                tracing::warn!(line = number + 1, error = %e, "Skipping malformed frame");
                stats.malformed += 1;
            }
        }
    }

    stats
}

impl ReplayArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let input = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("reading {}", self.file.display()))?;

        let registry = PriceRegistry::new(&config.feed.assets, config.history.policy())?;
        let selected = self
            .select
            .as_deref()
            .or(config.dashboard.selected.as_deref());
        let out: Box<dyn Write> = if self.quiet {
            Box::new(std::io::sink())
        } else {
            Box::new(std::io::stdout())
        };
        let mut dashboard = Dashboard::new(registry, selected, TextRenderer::new(out))?;

        let stats = replay_frames(&input, &mut dashboard);
        tracing::info!(
            frames = stats.frames,
            malformed = stats.malformed,
            "Replay finished"
        );

        let mut stdout = std::io::stdout().lock();
        for snapshot in dashboard.snapshots() {
            writeln!(stdout, "{}", summary_line(&snapshot))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HistoryRetention;
    use rust_decimal_macros::dec;

    #[test]
    fn test_replay_skips_malformed_lines() {
        let registry =
            PriceRegistry::new(["bitcoin", "ethereum"], HistoryRetention::Unbounded).unwrap();
        let mut dashboard =
            Dashboard::new(registry, None, TextRenderer::new(std::io::sink())).unwrap();

        let input = r#"
            {"bitcoin":"100"}
            not json
            {"bitcoin":"90","ethereum":"1800.5"}

            {"bitcoin":95}
        "#;

        let stats = replay_frames(input, &mut dashboard);

        assert_eq!(
            stats,
            ReplayStats {
                frames: 3,
                malformed: 1
            }
        );
        let bitcoin = dashboard.registry().snapshot("bitcoin").unwrap();
        assert_eq!(bitcoin.current_price, Some(dec!(95)));
        assert_eq!(bitcoin.history.len(), 3);
    }
}
