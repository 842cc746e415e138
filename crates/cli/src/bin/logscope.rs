use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    logscope_cli::main_entry().await
}
