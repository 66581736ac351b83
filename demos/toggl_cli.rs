use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use toggl_report::{Client, DEFAULT_USER_AGENT};

#[derive(Debug, Parser)]
#[command(name = "toggl-cli", about = "CLI wrapper for the Toggl reports API")]
struct Cli {
    /// API key; falls back to TOGGL_API_KEY env var
    #[arg(long, env = "TOGGL_API_KEY")]
    api_key: String,

    /// Print the row count of downloaded reports
    #[arg(long)]
    debug: bool,

    /// Contact string sent with report requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List workspaces visible to the API key
    Workspaces,
    /// Download the detailed CSV report for one month
    Report {
        #[arg(long)]
        workspace_id: String,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Write the CSV here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut client = Client::builder(cli.api_key)
        .debug(cli.debug)
        .user_agent(cli.user_agent)
        .on_row_count(|rows| eprintln!("Report has length {rows}"))
        .build()?;

    match cli.command {
        Commands::Workspaces => {
            for ws in client.list_workspaces().await? {
                println!("{}\t{}", ws.id, ws.name);
            }
        }
        Commands::Report {
            workspace_id,
            year,
            month,
            output,
        } => {
            let report = client
                .download_detailed_report(&workspace_id, year, month)
                .await;
            match report {
                Ok(csv) => write_report(csv, output)?,
                Err(e) if e.is_empty_report() => {
                    eprintln!("No time entries for {year}-{month:02}");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    client.close();
    Ok(())
}

fn write_report(csv: String, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(&path, &csv)?;
            println!("Wrote {} bytes to {}", csv.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
