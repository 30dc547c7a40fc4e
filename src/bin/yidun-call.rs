use std::path::PathBuf;

use clap::Parser;
use yidun_sdk::{
    ApiResponse, ClientConfig, Endpoint, Env, RequestParams, SignatureMethod, SignedRequestClient,
};

/// Exit status when the service answers with a non-200 `code`.
const APPLICATION_FAILURE_EXIT: i32 = 2;

/// Send one signed request and print the JSON reply.
#[derive(Debug, Parser)]
#[command(name = "yidun-call", version)]
struct Args {
    /// Endpoint path (e.g. /v1/image/query/task) or absolute url.
    #[arg(long)]
    endpoint: String,
    /// Value of the `version` parameter the endpoint expects.
    #[arg(long = "api-version")]
    api_version: String,
    /// Business parameter as key=value; repeatable.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
    /// Skip `businessId` for endpoints that do not take one.
    #[arg(long)]
    no_business_id: bool,
    /// Dotenv file with YIDUN_* settings, layered over the process env.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Sign with SM3 instead of MD5.
    #[arg(long)]
    sm3: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Pretty envelope plus the process exit status for it.
fn render(response: &ApiResponse) -> serde_json::Result<(String, i32)> {
    let body = serde_json::to_string_pretty(response)?;
    let code = if response.is_success() {
        0
    } else {
        APPLICATION_FAILURE_EXIT
    };
    Ok((body, code))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let env = match args.env_file.as_ref() {
        Some(path) => Env::load_dotenv(path).await?,
        None => Env::default(),
    };
    let mut config = ClientConfig::from_env(&env)?;
    if args.sm3 {
        config = config.with_signature_method(SignatureMethod::Sm3);
    }
    let client = SignedRequestClient::new(config)?;

    let mut endpoint = Endpoint::custom(args.endpoint, args.api_version);
    if args.no_business_id {
        endpoint = endpoint.without_business_id();
    }
    let params: RequestParams = args.params.into_iter().collect();

    let response = client.call(&endpoint, params).await?;
    let (body, code) = render(&response)?;
    println!("{body}");
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
