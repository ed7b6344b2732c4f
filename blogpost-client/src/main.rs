use anyhow::{anyhow, Context};
use blogpost_core::{FunctionResponse, PublishRequest};
use blogpost_publisher::{GitHubDevToPublisher, PublisherConfig};
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::process;

#[derive(Parser)]
#[command(name = "blogpost")]
#[command(about = "Publish GitHub repositories to dev.to as draft articles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health
    Health,

    /// Ask the server to publish a repository
    Publish {
        /// Repository (e.g., owner/repo or https://github.com/owner/repo)
        repo: String,
    },

    /// Publish a repository from this machine using GITHUB_API_KEY and DEV_TO_API_KEY
    Run {
        /// Repository (e.g., owner/repo or https://github.com/owner/repo)
        repo: String,
    },

    /// Print the article a repository would produce without publishing it
    Preview {
        /// Repository (e.g., owner/repo or https://github.com/owner/repo)
        repo: String,

        /// Print the full request body as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Health => {
            let url = format!("{}/health", cli.server);
            let response = Client::new().get(&url).send().await?;
            if response.status().is_success() {
                println!("Server is healthy");
                process::exit(0);
            } else {
                eprintln!("Server is unhealthy");
                process::exit(1);
            }
        }
        Commands::Publish { repo } => {
            let request = parse_repo_identifier(&repo)?;
            let response = publish_remote(&Client::new(), &cli.server, &request).await?;
            report(&response);
        }
        Commands::Run { repo } => {
            let request = parse_repo_identifier(&repo)?;
            let publisher = GitHubDevToPublisher::from_config(&PublisherConfig::from_env())?;
            let response = publisher.publish(&request).await;
            report(&response);
        }
        Commands::Preview { repo, json } => {
            let request = parse_repo_identifier(&repo)?;
            let publisher = GitHubDevToPublisher::from_config(&PublisherConfig::from_env())?;
            let article = publisher.prepare_article(&request).await?;

            if json {
                let envelope = blogpost_core::ArticleEnvelope::from(article);
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                println!("Title: {}", article.title);
                println!("Description: {}", article.description.as_deref().unwrap_or(""));
                println!("Tags: {}", article.tags.join(", "));
                println!("Published: {}", article.published);
                println!("Cover image: {}", article.main_image);
                println!("\n{}", article.body_markdown);
            }
        }
    }

    Ok(())
}

async fn publish_remote(
    client: &Client,
    server: &str,
    request: &PublishRequest,
) -> anyhow::Result<FunctionResponse> {
    let url = format!("{}/api/BlogPostPublisher", server.trim_end_matches('/'));
    let response = client
        .post(&url)
        .json(request)
        .send()
        .await
        .with_context(|| format!("Failed to reach server at {}", server))?;

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    Ok(FunctionResponse { status, body })
}

fn report(response: &FunctionResponse) {
    if response.is_success() {
        println!("✓ {}", response.body);
    } else {
        eprintln!("✗ [{}] {}", response.status, response.body);
        process::exit(1);
    }
}

/// Accepts `owner/repo` or a GitHub URL
fn parse_repo_identifier(repo: &str) -> anyhow::Result<PublishRequest> {
    let trimmed = repo
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_start_matches("github.com/")
        .trim_end_matches('/')
        .trim_end_matches(".git");

    let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [owner, name] => Ok(PublishRequest::new(*owner, *name)),
        _ => Err(anyhow!(
            "Invalid repository '{}': expected owner/repo or https://github.com/owner/repo",
            repo
        )),
    }
}
