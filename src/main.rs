use clap::Parser;
use tokio::io::{AsyncWriteExt, BufWriter, Stdout};

use salesdash::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level);

    CliApp::new("salesdash")
        .run(|writer| run_dashboard(args, writer))
        .await
}

/// Ingest the data file and print the selected views
async fn run_dashboard(args: Args, mut writer: BufWriter<Stdout>) -> Result<(), AppError> {
    args.validate()?;

    let store = AggregateStore::with_config(args.pipeline_config());
    let snapshot = store.ingest(&args.data_file).await?;

    write_report(&snapshot, args.view, &mut writer).await?;
    writer.flush().await?;

    Ok(())
}
