mod cli;
mod demo;
mod infra;

use listing_wizard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
