use clap::{Parser, Subcommand};
use docs_helmet::config::{Environment, LanguageConfig, RuntimeMode};
use docs_helmet::dispatch::{Dispatcher, LanguageCodes};
use docs_helmet::policy::PolicyName;
use docs_helmet::security::HelmetState;
use serde_json::json;

#[derive(Parser)]
#[command(name = "helmet-cli")]
#[command(about = "Inspect the docs security policies", long_about = None)]
struct Cli {
    /// Runtime mode to build the catalog for.
    #[arg(short, long, default_value = "production")]
    mode: String,

    /// Support portal URL (ignored in production).
    #[arg(long)]
    support_portal_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a policy configuration as JSON
    Show { policy: PolicyName },
    /// Print the response headers a policy produces
    Headers { policy: PolicyName },
    /// Show which policy a request path gets
    Resolve { path: String },
    /// Print the dispatch rules in precedence order
    Rules,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let env = Environment::new(RuntimeMode::parse(&cli.mode), cli.support_portal_url);
    let dispatcher = Dispatcher::standard(LanguageCodes::new(LanguageConfig::default().codes));
    let state = HelmetState::new(&env, dispatcher)?;

    match cli.command {
        Commands::Show { policy } => {
            let config = state.catalog().get(policy);
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        Commands::Headers { policy } => {
            for (name, value) in state.handler(policy).headers() {
                println!("{}: {}", name, value.to_str()?);
            }
        }
        Commands::Resolve { path } => {
            let request = axum::http::Request::builder()
                .uri(path.as_str())
                .body(axum::body::Body::empty())?;
            let facts = state.dispatcher().facts_for(&request);
            let selection = state.dispatcher().select_facts(&facts);
            let report = json!({
                "path": path,
                "stripped_path": facts.stripped_path,
                "requested_version": facts.requested_version,
                "policy": selection.policy,
                "rule": selection.rule_label(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Rules => {
            println!("{}", serde_json::to_string_pretty(state.dispatcher().table())?);
        }
    }

    Ok(())
}
