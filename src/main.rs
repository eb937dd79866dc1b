#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = kuis_rust::run().await {
        eprintln!("kuis-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
