use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use solar_core::{Config, Revision, SolarForm, form_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "solar", version, about = "Annual solar irradiance lookup (NREL)")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the NREL API key and default revision.
    Configure,

    /// Run a single query and print the result.
    Query {
        /// Latitude, passed to the service as typed.
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude, passed to the service as typed.
        #[arg(long, allow_hyphen_values = true)]
        lon: String,

        /// API key; overrides the configured key.
        #[arg(long)]
        api_key: Option<String>,

        /// Form revision: dni-only, dni-ghi or user-credential.
        #[arg(long)]
        revision: Option<String>,

        /// Print the result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Fill in the form interactively.
    Form {
        /// Form revision: dni-only, dni-ghi or user-credential.
        #[arg(long)]
        revision: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Query { lat, lon, api_key, revision, json } => {
                let revision = resolve_revision(revision.as_deref(), &config)?;
                query(&config, revision, lat, lon, api_key, json).await
            }
            Command::Form { revision } => {
                let revision = resolve_revision(revision.as_deref(), &config)?;
                interactive_form(&config, revision).await
            }
        }
    }
}

fn resolve_revision(flag: Option<&str>, config: &Config) -> Result<Revision> {
    match flag {
        Some(s) => Revision::try_from(s),
        None => config.default_revision(),
    }
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("NREL API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current = config.default_revision()?;
    let start = Revision::all().iter().position(|r| *r == current).unwrap_or(0);
    let revision = Select::new("Default form revision:", Revision::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default revision")?;

    config.set_api_key(api_key.trim().to_string());
    config.set_default_revision(revision);
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn query(
    config: &Config,
    revision: Revision,
    lat: String,
    lon: String,
    api_key: Option<String>,
    json: bool,
) -> Result<()> {
    let mut form = match api_key {
        Some(key) => {
            let mut form = SolarForm::new(revision, solar_core::client_from_config(config));
            form.set_credential(key);
            form
        }
        None => form_from_config(revision, config)?,
    };
    form.set_latitude(lat);
    form.set_longitude(lon);

    let outcome = form.submit().await.cloned();

    match outcome {
        Ok(result) if json => {
            let text = serde_json::to_string_pretty(&result)
                .context("Failed to serialize result to JSON")?;
            println!("{text}");
        }
        _ => print_rendered(&form),
    }

    Ok(())
}

async fn interactive_form(config: &Config, revision: Revision) -> Result<()> {
    let mut form = form_from_config(revision, config)?;
    println!("Solar Energy Potential Calculator ({revision})");

    loop {
        let latitude = Text::new("Latitude:")
            .with_placeholder("Enter latitude")
            .with_initial_value(&form.query().latitude)
            .prompt()
            .context("Failed to read latitude")?;
        form.set_latitude(latitude);

        let longitude = Text::new("Longitude:")
            .with_placeholder("Enter longitude")
            .with_initial_value(&form.query().longitude)
            .prompt()
            .context("Failed to read longitude")?;
        form.set_longitude(longitude);

        if revision.collects_credential() {
            let key = Password::new("API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()
                .context("Failed to read API key")?;
            form.set_credential(key);
        }

        tokio::select! {
            _ = form.submit() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("request abandoned");
                println!("Request cancelled.");
            }
        }

        print_rendered(&form);

        let again = Confirm::new("Query another location?")
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if !again {
            return Ok(());
        }
    }
}

fn print_rendered(form: &SolarForm) {
    let rendered = form.render();
    if let Some(err) = &rendered.error {
        eprintln!("{err}");
    }
    for line in &rendered.result {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "solar", "query", "--lat", "40.0", "--lon", "-105.0", "--revision", "dni-ghi",
        ])
        .unwrap();

        match cli.command {
            Command::Query { lat, lon, revision, json, .. } => {
                assert_eq!(lat, "40.0");
                assert_eq!(lon, "-105.0");
                assert_eq!(revision.as_deref(), Some("dni-ghi"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = Cli::try_parse_from(["solar", "form", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn revision_flag_beats_config() {
        let mut cfg = Config::default();
        cfg.set_default_revision(Revision::DniOnly);

        assert_eq!(resolve_revision(Some("dni-ghi"), &cfg).unwrap(), Revision::DniGhi);
        assert_eq!(resolve_revision(None, &cfg).unwrap(), Revision::DniOnly);
        assert!(resolve_revision(Some("bogus"), &cfg).is_err());
    }
}
