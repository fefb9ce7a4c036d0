#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelfscan_server::start().await
}
