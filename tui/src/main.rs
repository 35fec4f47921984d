mod app;
mod net;
mod ui;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "todo-tui")]
#[command(version)]
#[command(about = "Terminal client for the todo API")]
struct Args {
    /// Base URL of the API, including the /api prefix
    #[arg(long, default_value = "http://127.0.0.1:5000/api")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let terminal = ratatui::init();
    let result = app::App::new(&args.server).run(terminal).await;
    ratatui::restore();
    result
}
