use profiles_app::{app::App, config::Config, db::Db};

use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::parse();
    let db = Db::init(&config.database_url, config.max_connections).await?;

    profiles_app::serve(App {
        config: Arc::new(config),
        db,
    })
    .await?;

    Ok(())
}
