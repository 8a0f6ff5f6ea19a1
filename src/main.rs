//! kayako-probe - query a Kayako instance from the command line
//!
//! Resolves a service through the registry, calls it, and prints the result
//! as JSON on stdout. Logs go to stderr.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `KAYAKO_BASE_URL`: REST endpoint of the Kayako instance
//! - `KAYAKO_API_KEY`: API key
//! - `KAYAKO_SECRET_KEY`: shared secret
//! - `KAYAKO_TIMEOUT_SECS`: optional HTTP timeout
//!
//! # Usage
//!
//! ```bash
//! kayako-probe department          # list departments
//! kayako-probe user 12             # one user
//! kayako-probe ticket 7            # one ticket
//! kayako-probe ticket-list 3       # tickets of department 3
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use kayako::config::Config;
use kayako::logger::TracingLogger;
use kayako::models::TicketFilter;
use kayako::registry::{Service, ServiceRegistry};
use kayako::transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kayako=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        bail!("usage: kayako-probe <user|ticket|department|ticket-list> [id]");
    };
    let id = args
        .next()
        .map(|raw| raw.parse::<u64>().context("id must be a number"))
        .transpose()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let transport = HttpTransport::new(config.timeout).context("Failed to create HTTP client")?;
    let registry =
        ServiceRegistry::new(config.service_config(Arc::new(transport), Arc::new(TracingLogger)));

    let output = if command == "ticket-list" {
        let department = id.context("ticket-list needs a department id")?;
        let tickets = registry.tickets().list(&TicketFilter::department(department)).await?;
        serde_json::to_string_pretty(&tickets)?
    } else {
        run(registry.get(&command)?, id).await?
    };

    println!("{}", output);
    Ok(())
}

async fn run(service: Service, id: Option<u64>) -> Result<String> {
    tracing::info!(service = %service.kind(), "Querying Kayako");

    let json = match (service, id) {
        (Service::User(users), Some(id)) => serde_json::to_string_pretty(&users.get(id).await?)?,
        (Service::User(users), None) => serde_json::to_string_pretty(&users.list().await?)?,
        (Service::Ticket(tickets), Some(id)) => {
            serde_json::to_string_pretty(&tickets.get(id).await?)?
        }
        (Service::Ticket(_), None) => bail!("ticket needs an id; use ticket-list to list"),
        (Service::Department(departments), Some(id)) => {
            serde_json::to_string_pretty(&departments.get(id).await?)?
        }
        (Service::Department(departments), None) => {
            serde_json::to_string_pretty(&departments.list().await?)?
        }
    };
    Ok(json)
}
