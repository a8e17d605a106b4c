//! CLI command handling.
//!
//! Provides subcommands for:
//! - Filling in and submitting the device form (`submit`)
//! - Checking a school or technician name (`validate`)
//! - Running the location autofill on its own (`locate`)

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ColorChoice, Parser, Subcommand};

use crate::config::Config;
use crate::form::{FilePart, Form, device_form, prefill_from_scan_url};
use crate::geolocation::{
    AutofillOutcome, Coordinates, FixedGeolocation, Geolocation, LocationAutofill,
};
use crate::notify::ConsoleNotifier;
use crate::submit::{SubmitEvent, SubmitHandler, SubmitOutcome};
use crate::transport::HttpTransport;
use crate::validation::is_valid_name;

#[derive(Parser, Debug)]
#[command(name = "looma-scan")]
#[command(about = "Register a scanned device: fill in location, validate names and submit")]
#[command(
    long_about = "looma-scan submits the device registration form from a terminal.\nExamples:\n  looma-scan submit --school 'Saint Marys' --technician 'John Smith'\n  looma-scan validate 'St. Marys'"
)]
#[command(version)]
#[command(color = ColorChoice::Auto)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Form action URL (overrides SCAN_FORM_ACTION)
    #[arg(long, global = true)]
    pub action: Option<String>,

    /// Form method (overrides SCAN_FORM_METHOD)
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Use this latitude instead of the configured geolocation provider
    #[arg(
        long,
        global = true,
        requires = "longitude",
        allow_hyphen_values = true,
        value_parser = parse_coordinate
    )]
    pub latitude: Option<f64>,

    /// Use this longitude instead of the configured geolocation provider
    #[arg(
        long,
        global = true,
        requires = "latitude",
        allow_hyphen_values = true,
        value_parser = parse_coordinate
    )]
    pub longitude: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill in the device form and submit it once
    #[command(
        about = "Submit the device form",
        long_about = "Prefills device identity from a scan link, autofills the location, then validates and submits.\nExample: looma-scan submit --school 'Saint Marys' --technician 'John Smith' --field condition=good"
    )]
    Submit(SubmitArgs),

    /// Check a name against the letters-and-spaces rule
    Validate {
        /// Name to check
        name: String,
    },

    /// Run the location autofill and print the result
    Locate,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// School name
    #[arg(long)]
    pub school: String,

    /// Technician name
    #[arg(long)]
    pub technician: String,

    /// Extra field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_key_val)]
    pub fields: Vec<(String, String)>,

    /// File field as NAME=PATH (repeatable)
    #[arg(long = "file", value_parser = parse_key_path)]
    pub files: Vec<(String, PathBuf)>,

    /// Scanned label URL to prefill serial, build date, location and lot
    #[arg(long, env = "SCAN_URL")]
    pub scan_url: Option<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("field name is empty in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_coordinate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite number"));
    }
    Ok(value)
}

fn parse_key_path(s: &str) -> Result<(String, PathBuf), String> {
    parse_key_val(s).map(|(k, v)| (k, PathBuf::from(v)))
}

/// Pick the geolocation capability: explicit coordinates win over config.
fn geolocation(cli: &Cli, config: &Config) -> Option<Arc<dyn Geolocation>> {
    match (cli.latitude, cli.longitude) {
        (Some(lat), Some(lon)) => Some(Arc::new(FixedGeolocation::new(Coordinates::new(
            lat, lon,
        )))),
        _ => config.geolocation.build(),
    }
}

/// Build the device form with every value from `args` applied.
pub async fn build_form(cli: &Cli, args: &SubmitArgs, config: &Config) -> anyhow::Result<Form> {
    let action = match &cli.action {
        Some(action) => action.as_str(),
        None => config.form.require_action()?,
    };
    let method = cli.method.as_deref().unwrap_or(&config.form.method);

    let mut form = device_form(action, method)?;
    for (name, _) in &args.fields {
        if form.field(name).is_none() {
            form.add_text(name.clone());
        }
    }
    for (name, path) in &args.files {
        let handle = match form.file(name) {
            Some(handle) => handle,
            None => form.add_file(name.clone()),
        };
        handle.select(FilePart::from_path(name, path).await?);
    }

    if let Some(scan_url) = &args.scan_url {
        prefill_from_scan_url(&form, scan_url)?;
    }

    form.set("school", args.school.clone())?;
    form.set("technician", args.technician.clone())?;
    for (name, value) in &args.fields {
        form.set(name, value.clone())?;
    }

    Ok(form)
}

/// Dispatch a parsed command line. Returns whether the command succeeded.
///
/// The environment configuration is resolved only by the commands that use
/// it, so `validate` keeps working when it is malformed.
pub async fn run(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Command::Submit(args) => {
            let config = Config::from_env()?;
            Ok(run_submit_command(cli, args, &config).await?.is_success())
        }
        Command::Validate { name } => Ok(run_validate_command(name)),
        Command::Locate => {
            let config = Config::from_env()?;
            run_locate_command(cli, &config).await;
            Ok(true)
        }
    }
}

/// Autofill the location, then submit once over HTTP.
pub async fn run_submit_command(
    cli: &Cli,
    args: &SubmitArgs,
    config: &Config,
) -> anyhow::Result<SubmitOutcome> {
    let form = build_form(cli, args, config).await?;

    // The page fills location on load, before the user can press submit.
    LocationAutofill::for_form(geolocation(cli, config), &form)
        .run()
        .await;

    let handler = SubmitHandler::new(
        form,
        Arc::new(HttpTransport::new()),
        Arc::new(ConsoleNotifier),
    );
    Ok(handler.handle(&SubmitEvent::new()).await)
}

/// Print whether `name` is acceptable. Returns the verdict.
pub fn run_validate_command(name: &str) -> bool {
    let valid = is_valid_name(name);
    if valid {
        println!("valid: {:?}", name.trim());
    } else {
        println!("invalid: {:?} must contain only letters and spaces", name.trim());
    }
    valid
}

/// Run the autofill against scratch fields and print what it wrote.
pub async fn run_locate_command(cli: &Cli, config: &Config) -> AutofillOutcome {
    let autofill = LocationAutofill::new(
        geolocation(cli, config),
        Default::default(),
        Default::default(),
    );
    let outcome = autofill.run().await;
    if let AutofillOutcome::Filled(coords) = &outcome {
        println!(
            "latitude={} longitude={}",
            coords.latitude_text(),
            coords.longitude_text()
        );
    }
    outcome
}
