use clap::Parser;
use std::path::PathBuf;

use oam_publisher::config::load_or_default;
use oam_publisher::dictionary::DictionaryClient;
use oam_publisher::observability::logging;

#[derive(Parser)]
#[command(name = "oam-dict")]
#[command(about = "Load and print the OAM reference dictionaries", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with an error if any dictionary failed to load
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    let client = DictionaryClient::new(config.dictionary.clone())?;
    let dictionary = client.load().await;

    println!("{}", serde_json::to_string_pretty(&dictionary)?);

    if cli.strict && !dictionary.errors.is_empty() {
        return Err(format!(
            "{} of 4 dictionaries failed to load",
            dictionary.errors.count()
        )
        .into());
    }
    Ok(())
}
