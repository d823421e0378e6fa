#[tokio::main]
async fn main() -> anyhow::Result<()> {
    empathic_companion::run().await
}
