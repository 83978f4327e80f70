//! `refresh` command: rebuilds the local rest-index snapshot from the live
//! open-data endpoints so request handlers never pay the paged-fetch cost.

use mukka_core::AppConfig;
use mukka_exdata::{write_snapshot, ExdataClient, RestDataSet};

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let client = ExdataClient::new(&config.expressway_api_key, config.http_timeout_secs)?;

    tracing::info!("fetching rest-area registry and signature-food rows");
    let (food_rows, rest_rows) =
        futures::try_join!(client.fetch_food_rows(), client.fetch_rest_area_rows())?;

    if rest_rows.is_empty() && food_rows.is_empty() {
        anyhow::bail!("both open-data endpoints returned zero rows; keeping the existing snapshot");
    }

    let data = RestDataSet {
        rest_rows,
        food_rows,
        popular_rows: Vec::new(),
    };
    write_snapshot(&config.snapshot_path, &data).await?;

    println!(
        "snapshot written to {}: {} rest areas, {} food rows",
        config.snapshot_path.display(),
        data.rest_rows.len(),
        data.food_rows.len()
    );
    Ok(())
}
