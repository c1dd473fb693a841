use anyhow::{bail, Context};
use astroloyalty::{AstroClient, ClientConfig, Credentials};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: astroctl <command> [args]

commands:
    offers                                 list available offers
    status <customer_id>                   show a customer's status
    rewards <customer_id>                  show a customer's reward status
    search <email|phone>                   find a customer
    eligibility <customer_id> <item_code>  check redemption eligibility";

/// A single API call requested on the command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Offers,
    Status(String),
    Rewards(String),
    SearchEmail(String),
    SearchPhone(String),
    Eligibility { customer_id: String, item_code: String },
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["offers"] => Self::Offers,
            ["status", customer_id] => Self::Status(customer_id.to_string()),
            ["rewards", customer_id] => Self::Rewards(customer_id.to_string()),
            // Anything with an @ is an email address; otherwise assume a phone number.
            ["search", query] if query.contains('@') => Self::SearchEmail(query.to_string()),
            ["search", query] => Self::SearchPhone(query.to_string()),
            ["eligibility", customer_id, item_code] => Self::Eligibility {
                customer_id: customer_id.to_string(),
                item_code: item_code.to_string(),
            },
            _ => bail!("{USAGE}"),
        };
        Ok(command)
    }

    async fn run(&self, client: &AstroClient) -> astroloyalty::Result<Value> {
        match self {
            Self::Offers => client.list_offers().await,
            Self::Status(customer_id) => client.customer_status(customer_id).await,
            Self::Rewards(customer_id) => client.customer_reward_status(customer_id).await,
            Self::SearchEmail(email) => client.search_customer(Some(email), None).await,
            Self::SearchPhone(phone) => client.search_customer(None, Some(phone)).await,
            Self::Eligibility {
                customer_id,
                item_code,
            } => {
                client
                    .check_redemption_eligibility(customer_id, item_code)
                    .await
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Credentials may just as well come from the real environment.
    if let Err(err) = dotenvy::dotenv() {
        debug!(error = %err, "no .env file loaded");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let credentials = Credentials::from_env().context("unable to read credentials")?;
    let config = ClientConfig::from_env().context("unable to read configuration")?;
    let client = AstroClient::with_config(credentials, config)
        .await
        .context("unable to authenticate")?;

    let payload = command.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
