//! sighting-cli: headless host for the sighting client
//!
//! Runs one page lifetime against a server: load, optionally sign in with a
//! credential token, perform one command, print the resulting marker set.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use sighting_client::{
    ClientConfig, ConsoleUi, Coordinates, CredentialToken, DeleteOutcome, FixedGeolocation,
    HeadlessMap, HttpSightingApi, ReportOutcome, SightingApp, SightingId, TokenIdentity,
};

#[derive(Parser)]
#[command(name = "sighting-cli")]
#[command(about = "Headless client for the wildlife sighting map")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sighting-client.toml")]
    config: String,

    /// Server base URL (overrides config file)
    #[arg(long, env = "SIGHTING_SERVER_URL")]
    server_url: Option<String>,

    /// Identity-provider credential to sign in with
    #[arg(long, env = "SIGHTING_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every sighting on the map
    List,
    /// Show who is signed in
    Status,
    /// Report a sighting
    Report {
        /// Device latitude
        #[arg(long, requires = "lng", conflicts_with = "center")]
        lat: Option<f64>,
        /// Device longitude
        #[arg(long, requires = "lat", conflicts_with = "center")]
        lng: Option<f64>,
        /// Report at the configured map center
        #[arg(long)]
        center: bool,
    },
    /// Delete one of your sightings
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sighting_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config)?;
    if let Some(url) = cli.server_url {
        config.server.base_url = url;
    }
    info!("Server: {}", config.server.base_url);

    let geolocation = match &cli.command {
        Command::Report {
            lat: Some(lat),
            lng: Some(lng),
            ..
        } => FixedGeolocation::at(Coordinates::new(*lat, *lng)),
        _ => FixedGeolocation::unsupported(),
    };

    let api = Arc::new(HttpSightingApi::new(&config.server)?);
    let mut app = SightingApp::new(
        config,
        api,
        HeadlessMap::new(),
        Arc::new(geolocation),
        Arc::new(ConsoleUi),
    );

    let mut identity = TokenIdentity::new();
    app.register_identity(&mut identity);
    app.start().await;

    if let Some(token) = cli.token {
        identity.complete_sign_in(CredentialToken::new(token));
        app.process_credentials().await;
        if !app.session().is_logged_in() {
            anyhow::bail!("sign-in failed");
        }
    }

    match cli.command {
        Command::List => print_sightings(&app),
        Command::Status => match app.session().user_id() {
            Some(user) => println!("Signed in as {}", user),
            None => println!("Not signed in"),
        },
        Command::Report { center, .. } => {
            let outcome = if center {
                app.report_from_map_center().await
            } else {
                app.report_from_device().await
            };
            match outcome {
                ReportOutcome::Reported(sighting) => {
                    println!("Reported {} at {}", sighting.id, sighting.timestamp)
                }
                ReportOutcome::LocationFailed(e) => anyhow::bail!("no location: {}", e),
                ReportOutcome::Failed(e) => anyhow::bail!("report failed: {}", e),
            }
        }
        Command::Delete { id } => {
            match app.delete_sighting(&SightingId::new(id)).await {
                DeleteOutcome::Deleted => print_sightings(&app),
                DeleteOutcome::NotOwner => anyhow::bail!("not your report"),
                DeleteOutcome::Failed(e) => anyhow::bail!("delete failed: {}", e),
            }
        }
    }

    Ok(())
}

fn print_sightings(app: &SightingApp<HeadlessMap>) {
    let session = app.session();
    for sighting in app.store().iter() {
        let marker = if session.owns(sighting) { "*" } else { " " };
        println!(
            "{} {:<36} {:>10.6} {:>11.6}  {}",
            marker, sighting.id, sighting.lat, sighting.lng, sighting.timestamp
        );
    }
    println!("{} sightings (* = yours)", app.store().len());
}
