use clap::Parser;
use tracing_subscriber::EnvFilter;

use reqhelper::{call, Parsed, ReqwestExecutor};

mod args;

use args::Args;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Request(#[from] reqhelper::Error),

    #[error("Failed to render response: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_logging(args: &Args) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(args.log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut executor = ReqwestExecutor::new(args.timeout())?;
    if let Some(base_url) = &args.base_url {
        executor = executor.with_base_url(base_url)?;
    }

    let config = args.request_config().on_error(|response| {
        eprintln!("{}", String::from_utf8_lossy(&response.body));
    });

    match call(&executor, &args.url, config).await? {
        Some(Parsed::Json(value)) => println!("{}", serde_json::to_string_pretty(&value)?),
        Some(Parsed::Text(text)) => print!("{}", text),
        None => tracing::info!("non-success status suppressed by --no-throw"),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
