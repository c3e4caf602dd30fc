use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelbox::{
    config::Config,
    contact::{self, AppState, ContactClient, ContactForm, SendGridMailer, SubmissionOutcome},
    media::Normalizer,
    modal::{build_image_content, build_media_content},
};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the contact mail endpoint
    Serve {
        /// Address to listen on, overriding the config file
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Classify and normalize a media reference
    Embed {
        url: String,
        #[arg(short, long, default_value = "Media")]
        title: String,
        /// Print the modal fragment instead of the embed target
        #[arg(long)]
        html: bool,
    },
    /// Print the lightbox fragment for an image
    Image {
        src: String,
        #[arg(short, long, default_value = "Image preview")]
        alt: String,
    },
    /// Submit the contact form, falling back to a mail client draft
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// Contact API URL, overriding the config file
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/reelbox/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/reelbox/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = get_config_path(&args);
    let config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match &config_path {
        Some(path) => info!("Loaded config from: {}", path),
        None => info!("No config file found, using defaults"),
    }

    let normalizer = Normalizer::from_base(&config.site.base_url)?;

    match args.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let mailer = SendGridMailer::from_env(&config.contact.sendgrid_url)?;
            let state = AppState::new(Arc::new(mailer), config.contact.clone());
            contact::serve(&bind, state).await?;
        }
        Command::Embed { url, title, html } => {
            if html {
                println!("{}", build_media_content(&normalizer, &url, &title).to_html());
            } else {
                let target = normalizer.resolve(&url);
                println!("{}", serde_json::to_string_pretty(&target)?);
            }
        }
        Command::Image { src, alt } => {
            println!("{}", build_image_content(&src, &alt).to_html());
        }
        Command::Contact {
            name,
            email,
            message,
            endpoint,
        } => {
            let mut client = ContactClient::new(&config.contact);
            if let Some(endpoint) = endpoint {
                client = client.with_endpoint(&endpoint);
            }

            match client.submit(&ContactForm::new(&name, &email, &message)).await {
                SubmissionOutcome::Invalid { note, .. } => anyhow::bail!(note),
                SubmissionOutcome::Sent { note } => println!("{}", note),
                SubmissionOutcome::Fallback { note, mailto } => {
                    println!("{}", note);
                    println!("{}", mailto);
                }
            }
        }
    }

    Ok(())
}
