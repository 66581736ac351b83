use chrono::Datelike;
use std::env;
use toggl_report::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let api_key = env::var("TOGGL_API_KEY")
        .map_err(|_| "Set TOGGL_API_KEY in your environment or .env file")?;

    let mut client = Client::builder(api_key).debug(true).build()?;

    // Report the previous month of the first workspace.
    let workspaces = client.list_workspaces().await?;
    let workspace = workspaces.first().ok_or("No workspaces visible to this API key")?;
    let today = chrono::Utc::now().date_naive();
    let (year, month) = match today.month() {
        1 => (today.year() - 1, 12),
        m => (today.year(), m - 1),
    };

    match client
        .download_detailed_report(&workspace.id.to_string(), year, month)
        .await
    {
        Ok(report) => print!("{report}"),
        Err(e) if e.is_empty_report() => {
            println!("No time tracked in {} for {year}-{month:02}", workspace.name)
        }
        Err(e) => return Err(e.into()),
    }

    client.close();
    Ok(())
}
