use std::error::Error;

use database::{DatabaseConnectionInfo, PgDatabase};
use directory::Client;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let connection_info = DatabaseConnectionInfo::from_env()
        .ok_or("missing database connection settings in environment")?;
    let database = PgDatabase::connect(connection_info).await?;
    log::info!("database connection established");

    let state = WebState {
        directory_client: Client::new(database),
    };
    start_web_server(state).await?;

    Ok(())
}
