//! Oceanic CLI - drive a compiled REST client from the command line

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use oceanic::naming::camel_case;
use oceanic::{Client, Page, Payload};
use oceanic_define::ApiDefinition;
use oceanic_definitions::define_digitalocean_api;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oceanic", version)]
#[command(about = "Call REST APIs compiled from declarative resource definitions", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Bearer token [default: DIGITALOCEAN_TOKEN or the definition's env chain]
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Override the definition's base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Load the API definition from a JSON or YAML file instead of using
    /// the built-in DigitalOcean definition
    #[arg(long, global = true, value_name = "FILE")]
    definition: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every resource with its collection and item methods
    Resources,

    /// List a collection
    List {
        /// Resource name (e.g. droplets, floating_ips)
        resource: String,

        /// Maximum number of pages to pull
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Call a collection method
    Call {
        /// Resource name
        resource: String,

        /// Method name (e.g. id, create, create_for_region)
        method: String,

        /// Positional arguments, parsed as JSON when valid
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Fetch an item by identity and call one of its methods
    Item {
        /// Resource name
        resource: String,

        /// The item's id (or ip for floating IPs)
        identity: String,

        /// Item method or action (e.g. reboot, power_cycle, snapshots)
        method: String,

        /// Positional arguments, parsed as JSON when valid
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,oceanic=info,oceanic_cli=info".to_string(),
            2 => "info,oceanic=debug,oceanic_cli=debug".to_string(),
            _ => "debug,oceanic=trace,oceanic_cli=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Reads a definition document, choosing the format by extension.
fn load_definition(path: &Path) -> Result<ApiDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let definition = if is_yaml {
        ApiDefinition::from_yaml_str(&content)
    } else {
        ApiDefinition::from_json_str(&content)
    };
    definition.with_context(|| format!("invalid definition in {}", path.display()))
}

fn build_client(cli: &Cli) -> Result<Client> {
    let definition = match &cli.definition {
        Some(path) => load_definition(path)?,
        None => define_digitalocean_api(),
    };
    debug!(api = %definition.name, "using definition");

    let mut builder = Client::builder(definition).token_from_env();
    if let Some(token) = &cli.token {
        builder = builder.token(token);
    }
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url);
    }
    Ok(builder.build()?)
}

/// Parses a positional argument as JSON, falling back to a plain string.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_page(page: &Page) -> Result<()> {
    let rendered = match &page.payload {
        Payload::One(item) => serde_json::to_string_pretty(item)?,
        Payload::Many(items) => serde_json::to_string_pretty(items)?,
        Payload::Empty => return Ok(()),
    };
    println!("{rendered}");
    Ok(())
}

fn print_resources(client: &Client) {
    for (name, endpoint) in client.endpoints() {
        println!("{name} ({})", endpoint.noun());

        let methods: Vec<_> = std::iter::once("list")
            .chain(endpoint.method_names().filter(|name| *name != "list"))
            .collect();
        println!("  methods: {}", methods.join(", "));

        let Some(spec) = endpoint.item_spec() else {
            continue;
        };
        for (label, entries) in [
            ("item", &spec.methods),
            ("actions", &spec.actions),
            ("records", &spec.records),
        ] {
            if entries.is_empty() {
                continue;
            }
            let names: Vec<_> = entries
                .iter()
                .map(|(key, _)| camel_case(key, false))
                .collect();
            println!("  {label}: {}", names.join(", "));
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = build_client(&cli)?;

    match cli.command {
        Commands::Resources => print_resources(&client),
        Commands::List { resource, pages } => {
            let endpoint = client.endpoint(&resource)?;
            let mut pager = endpoint.list().await?.into_pages();
            let mut pulled = 0;
            while pulled < pages {
                let Some(page) = pager.next().await else {
                    break;
                };
                print_page(&page?)?;
                pulled += 1;
            }
            if !pager.is_done() {
                info!(pulled, "more pages available");
            }
        }
        Commands::Call {
            resource,
            method,
            args,
        } => {
            let endpoint = client.endpoint(&resource)?;
            let args = args.iter().map(|raw| parse_arg(raw)).collect();
            let page = endpoint.call(&method, args).await?;
            print_page(&page)?;
        }
        Commands::Item {
            resource,
            identity,
            method,
            args,
        } => {
            let endpoint = client.endpoint(&resource)?;
            let fetched = endpoint.call("id", vec![parse_arg(&identity)]).await?;
            let item = fetched
                .item()
                .ok_or_else(|| eyre!("no {resource} item with identity {identity}"))?;
            let args = args.iter().map(|raw| parse_arg(raw)).collect();
            let page = item.call(&method, args).await?;
            print_page(&page)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json_logs);

    run(cli).await
}
