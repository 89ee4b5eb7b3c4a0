#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gyro_cli::run().await
}
