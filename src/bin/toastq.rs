#[path = "toastq/app.rs"]
mod app;
#[path = "toastq/cli.rs"]
mod cli;
#[path = "toastq/input.rs"]
mod input;
#[path = "toastq/render.rs"]
mod render;

use std::error::Error as StdError;

use cli::Cli;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse_args();
    match app::run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            std::process::ExitCode::from(1)
        }
    }
}

fn report_error(err: &toastq::error::Error) {
    tracing::error!(error = %err, "toastq terminated");
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
