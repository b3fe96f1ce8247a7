//! End-to-end integration tests

use price_pulse::cli::{replay_frames, ReplayStats};
use price_pulse::config::Config;
use price_pulse::dashboard::Dashboard;
use price_pulse::registry::PriceRegistry;
use price_pulse::render::TextRenderer;

#[test]
fn test_example_config_replay() {
    let config = Config::parse(include_str!("../../config.toml.example")).unwrap();
    let registry = PriceRegistry::new(&config.feed.assets, config.history.policy()).unwrap();
    let mut dashboard = Dashboard::new(
        registry,
        config.dashboard.selected.as_deref(),
        TextRenderer::new(Vec::new()),
    )
    .unwrap();

    let input = [
        r#"{"bitcoin":"100"}"#,
        r#"{"ethereum":"1800.5"}"#,
        r#"{"bitcoin":"90"}"#,
        r#"{"bitcoin":"95","monero":"150"}"#,
    ]
    .join("\n");

    let stats = replay_frames(&input, &mut dashboard);
    assert_eq!(
        stats,
        ReplayStats {
            frames: 4,
            malformed: 0
        }
    );
    assert_eq!(dashboard.selected(), "bitcoin");
    assert_eq!(dashboard.snapshots()[0].history.len(), 3);
}

#[test]
fn test_selected_updates_are_rendered() {
    let registry = PriceRegistry::new(
        ["bitcoin", "ethereum"],
        price_pulse::registry::HistoryRetention::Unbounded,
    )
    .unwrap();
    let mut dashboard = Dashboard::new(registry, None, TextRenderer::new(Vec::new())).unwrap();

    replay_frames(
        "{\"bitcoin\":\"100\"}\n{\"ethereum\":\"5\"}\n{\"bitcoin\":\"110\"}",
        &mut dashboard,
    );
    dashboard.select("ethereum").unwrap();

    // Two pushes for bitcoin plus one pull for ethereum
    let dashboard_text = render_output(dashboard);
    let headlines: Vec<_> = dashboard_text
        .lines()
        .filter(|line| line.contains(" price at "))
        .collect();
    assert_eq!(headlines.len(), 3);
    assert!(headlines[2].starts_with("Ethereum price at "));
    assert!(dashboard_text.contains("Up +$10.00"));
}

fn render_output(dashboard: Dashboard<TextRenderer<Vec<u8>>>) -> String {
    String::from_utf8(dashboard.into_renderer().into_inner()).unwrap()
}
