//! Run command implementation

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::feed::{CoinCapFeed, PriceFeed};
use crate::registry::PriceRegistry;
use crate::render::TextRenderer;
use anyhow::Context;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Asset to display first (defaults to the configured selection)
    #[arg(short, long)]
    pub select: Option<String>,

    /// Sparkline width in points (0 disables it)
    #[arg(long, default_value_t = 40)]
    pub sparkline: usize,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let registry = PriceRegistry::new(&config.feed.assets, config.history.policy())?;
        let selected = self
            .select
            .as_deref()
            .or(config.dashboard.selected.as_deref());
        let renderer = TextRenderer::new(std::io::stdout()).with_sparkline(self.sparkline);
        let mut dashboard = Dashboard::new(registry, selected, renderer)?;

        let feed = CoinCapFeed::from_config(&config.feed);
        let mut subscription = feed.subscribe().await?;
        tracing::info!(selected = %dashboard.selected(), "Dashboard running");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                frame = subscription.frames.recv() => match frame {
                    Some(frame) => {
                        dashboard.handle_frame(&frame);
                    }
                    None => break,
                },
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => {
                        let asset = line.trim();
                        if asset.is_empty() {
                            continue;
                        }
                        if let Err(e) = dashboard.select(asset) {
                            tracing::warn!(error = %e, "Ignoring selection");
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "Stdin unreadable, selection disabled");
                        stdin_open = false;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    return Ok(());
                }
            }
        }

        subscription
            .finish()
            .await
            .context("price feed stopped")?;
        Ok(())
    }
}
