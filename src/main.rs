// src/main.rs

use jobchat::app::App;
use jobchat::config::{get_config, initialize_config};
use jobchat::logging::initialize_logging;
use jobchat::ui::run_ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    initialize_config()?;
    let _logger = initialize_logging()?;

    let config = get_config();
    log::info!("starting jobchat against {}", config.search_url);

    let app = App::new(&config);
    run_ui(app).await
}
