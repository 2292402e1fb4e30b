use flashcards_client::logger::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "flashcards_client=debug,logger_demo=trace".to_string(),
    };
    logger.reload_from_config(&config)?;
    trace!("client trace log");
    debug!(path = "/api/v0/cards", "client debug log");
    info!("client info log");

    Ok(())
}
