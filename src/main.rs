use anyhow::Result;
use remote_job_boards::{conf::Settings, logger, server};

#[actix_web::main]
async fn main() -> Result<()> {
    logger::init();

    let settings = Settings::new()?;
    server::run(settings).await
}
