use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Query a running catalog service", long_about = None)]
struct Cli {
    /// Base URL of the catalog service (or gateway prefix, e.g. http://localhost:8080/api)
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service name and version
    Info,
    /// Check service health
    Health,
    /// List every product
    List,
    /// Fetch one product by id
    Get { id: i64 },
    /// Search products by name (case-insensitive substring)
    Search { query: String },
}

impl Commands {
    fn segments(&self) -> Vec<String> {
        match self {
            Commands::Info => vec![],
            Commands::Health => vec!["health".into()],
            Commands::List => vec!["products".into()],
            Commands::Get { id } => vec!["products".into(), id.to_string()],
            Commands::Search { query } => {
                vec!["products".into(), "search".into(), query.clone()]
            }
        }
    }
}

/// Append path segments to `base`, percent-encoding each one.
fn endpoint(base: &str, segments: &[String]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| format!("{base} cannot be used as a base URL"))?;
        if !segments.is_empty() {
            path.pop_if_empty().extend(segments);
        }
    }
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = endpoint(&cli.url, &cli.command.segments())?;
    let res = client.get(url).send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: catalog service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_is_percent_encoded() {
        let cmd = Commands::Search {
            query: "smart watch".into(),
        };
        let url = endpoint("http://localhost:3000", &cmd.segments()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/products/search/smart%20watch"
        );
    }

    #[test]
    fn gateway_base_path_is_kept() {
        let url = endpoint("http://localhost:8080/api", &Commands::List.segments()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/products");
    }

    #[test]
    fn info_hits_root() {
        let url = endpoint("http://localhost:3000", &Commands::Info.segments()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/");
    }
}
