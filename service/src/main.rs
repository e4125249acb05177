#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use guests_adapter::{
    config::Config,
    guests::{construct_name_query, Guest, GuestsAdapter, SearchFilter},
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Query and update guest records through the guests service.
#[derive(Debug, Parser)]
#[command(name = "guests-adapter", version)]
struct Cli {
    /// Correlation id propagated to the guests service (random when omitted).
    #[arg(long, global = true)]
    correlation_id: Option<String>,

    /// Path to the YAML config file.
    #[arg(long, global = true, default_value = "config.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one guest by id.
    Retrieve { id: String },
    /// Search with a raw filter.
    Search {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Search by email address.
    ByEmail {
        email: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Search by phone number (normalised per configuration).
    ByPhone {
        phone: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Search by marketing id.
    ByMarketingId {
        marketing_id: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fuzzy search by first/last name.
    ByName {
        #[command(flatten)]
        name: NameArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Send a partial update; the body is a JSON document.
    Patch { body: String },
    /// Print the name query for a guest without contacting the service.
    NameQuery {
        #[command(flatten)]
        name: NameArgs,
    },
}

#[derive(Debug, clap::Args)]
struct FilterArgs {
    /// Extra search parameter as key=value (repeatable).
    #[arg(long = "filter", value_parser = parse_key_value)]
    entries: Vec<(String, String)>,
}

impl FilterArgs {
    fn into_filter(self) -> SearchFilter {
        self.entries.into_iter().collect()
    }
}

#[derive(Debug, clap::Args)]
struct NameArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// Alternate first name (repeatable, order preserved).
    #[arg(long = "alt-name")]
    alt_names: Vec<String>,
}

impl NameArgs {
    fn into_guest(self) -> Guest {
        Guest::new(self.first_name, self.last_name).with_alt_names(self.alt_names)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Offline; needs no configuration.
    if let Command::NameQuery { name } = cli.command {
        return print_json(&construct_name_query(&name.into_guest()));
    }

    // Load and validate configuration first (fail-fast)
    let config = Config::load_from(&cli.config).map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    let correlation_id = cli
        .correlation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.guests.base_url,
        %correlation_id,
        "guests-adapter starting"
    );

    let adapter = GuestsAdapter::from_config(&config)?;
    let cid = correlation_id.as_str();

    let result = match cli.command {
        Command::Retrieve { id } => adapter.retrieve_by_id(&id, cid).await?,
        Command::Search { filter } => adapter.search(filter.into_filter(), cid).await?,
        Command::ByEmail { email, filter } => {
            adapter
                .search_by_email(&email, filter.into_filter(), cid)
                .await?
        }
        Command::ByPhone { phone, filter } => {
            adapter
                .search_by_phone(&phone, filter.into_filter(), cid)
                .await?
        }
        Command::ByMarketingId {
            marketing_id,
            filter,
        } => {
            adapter
                .search_by_marketing_id(&marketing_id, filter.into_filter(), cid)
                .await?
        }
        Command::ByName { name, filter } => {
            adapter
                .search_by_name(&name.into_guest(), filter.into_filter(), cid)
                .await?
        }
        Command::Patch { body } => {
            let body: Value = serde_json::from_str(&body)?;
            adapter.patch(&body, cid).await?
        }
        Command::NameQuery { .. } => return Ok(()),
    };

    print_json(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_value_boundaries() {
        let cases = [
            ("sort=x", Some(("sort", "x")), "simple pair"),
            ("a=b=c", Some(("a", "b=c")), "value keeps later equals"),
            ("limit=", Some(("limit", "")), "empty value"),
            ("=x", None, "empty key"),
            ("novalue", None, "missing equals"),
        ];

        for (raw, expected, desc) in cases {
            let parsed = parse_key_value(raw).ok();
            let expected = expected.map(|(k, v): (&str, &str)| (k.to_string(), v.to_string()));
            assert_eq!(parsed, expected, "case '{desc}'");
        }
    }

    #[test]
    fn cli_parses_name_search() {
        let cli = Cli::try_parse_from([
            "guests-adapter",
            "by-name",
            "--first-name",
            "Alice",
            "--last-name",
            "Ng",
            "--alt-name",
            "Ali",
            "--filter",
            "property_code=NYC01",
            "--correlation-id",
            "cid-1",
        ])
        .expect("should parse");

        assert_eq!(cli.correlation_id.as_deref(), Some("cid-1"));
        let Command::ByName { name, filter } = cli.command else {
            unreachable!("parsed a different subcommand");
        };
        assert_eq!(
            name.into_guest(),
            Guest::new("Alice", "Ng").with_alt_names(["Ali"])
        );
        assert_eq!(filter.into_filter().get("property_code"), Some("NYC01"));
    }
}
