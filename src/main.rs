#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = gabarito_api::run().await {
        eprintln!("gabarito-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
