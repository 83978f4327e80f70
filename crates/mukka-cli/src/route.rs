//! `route` command: one-shot route planning printed to stdout.

use std::time::Duration;

use mukka_core::{AppConfig, MatcherPolicy};
use mukka_exdata::{ExdataClient, SnapshotStore};
use mukka_kakao::KakaoClient;
use mukka_routes::RoutePlanner;

pub(crate) async fn run(
    config: &AppConfig,
    start: &str,
    destination: &str,
    json: bool,
) -> anyhow::Result<()> {
    let kakao = KakaoClient::new(&config.kakao_rest_api_key, config.http_timeout_secs)?
        .with_retry(config.http_max_retries, config.http_retry_backoff_base_ms);
    let exdata = ExdataClient::new(&config.expressway_api_key, config.http_timeout_secs)?;
    let snapshot = SnapshotStore::new(
        &config.snapshot_path,
        Duration::from_secs(config.snapshot_ttl_secs),
    );
    let planner = RoutePlanner::new(kakao, exdata, snapshot, MatcherPolicy::default());

    let origin = planner.resolve_endpoint(start, None).await?;
    let dest = planner.resolve_endpoint(destination, None).await?;
    let options = planner.plan(origin, dest).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    if options.is_empty() {
        println!("no drivable route found between '{start}' and '{destination}'");
        return Ok(());
    }

    for option in &options {
        println!("{}", option.summary);
        if option.stops.is_empty() {
            println!("  (no rest areas along this route)");
            continue;
        }
        for stop in &option.stops {
            println!("  - {} · {}", stop.name, stop.top_items.join(", "));
            println!("    {}", stop.description);
        }
    }
    Ok(())
}
