mod cli;
mod infra;
mod report;
mod routes;
mod server;
mod views;

use district_score::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
