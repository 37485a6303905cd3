mod intake;
mod prompt;
mod spinner;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frontdesk_client::{ClientConfig, FrontDeskClient};
use frontdesk_core::lookup::{self, SearchOutcome};
use frontdesk_core::{
    AdvancedSearchForm, AuthApi, CurrentPatient, Credentials, Desk, MasterDataApi, Navigation,
    TracingNotifier, classify, load_patient, master,
};

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(about = "Hospital front-desk client")]
struct Cli {
    /// Backend base URL (overrides FRONTDESK_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
    /// Customer code (overrides FRONTDESK_CUSTOMER_CODE)
    #[arg(long)]
    customer_code: Option<String>,
    /// Username (overrides FRONTDESK_USERNAME)
    #[arg(long)]
    username: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a search query is classified, without searching
    Classify {
        /// Free-text query, e.g. `john doe 9876543210`
        query: Vec<String>,
    },
    /// Search patients by free text or by field
    Search {
        /// Free-text query; when given, the field options are ignored
        query: Vec<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        identity: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Result page, ten patients per page
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show a patient's saved details
    Show {
        patient_id: i64,
    },
    /// List a master-data code list
    MasterData {
        #[arg(value_enum)]
        kind: MasterDataArg,
    },
    /// Register a new patient through the intake wizard
    Register,
    /// Edit an existing patient through the intake wizard
    Edit {
        patient_id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MasterDataArg {
    Languages,
    Genders,
    IdentityTypes,
    AddressTypes,
    PhoneTypes,
    HealthVitals,
    States,
}

/// Main entry point for the front-desk CLI
///
/// # Environment Variables
/// - `FRONTDESK_API_BASE_URL`: backend base URL (default: "http://localhost:5000")
/// - `FRONTDESK_HTTP_TIMEOUT_SECS`: request timeout in seconds (default: 30)
/// - `FRONTDESK_CUSTOMER_CODE`, `FRONTDESK_USERNAME`, `FRONTDESK_PASSWORD`: login
///
/// # Returns
/// * `Ok(())` - If the command ran
/// * `Err(anyhow::Error)` - If configuration, login or the command failed
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("frontdesk=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'frontdesk --help' for commands");
        return Ok(());
    };

    if let Commands::Classify { query } = &command {
        for keyword in classify(&query.join(" ")) {
            println!("{:<16} {}", keyword.kind.label(), keyword.value);
        }
        return Ok(());
    }
    if let Commands::MasterData {
        kind: MasterDataArg::States,
    } = &command
    {
        for state in master::states() {
            println!("{:<4} {}", state.state_code, state.state_name);
        }
        return Ok(());
    }

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("FRONTDESK_API_BASE_URL").ok());
    let timeout = std::env::var("FRONTDESK_HTTP_TIMEOUT_SECS").ok();
    let config = ClientConfig::from_values(base_url.as_deref(), timeout.as_deref())?;
    tracing::info!("++ Using front-desk API at {}", config.base_url());

    let client = FrontDeskClient::new(config)?;
    let desk = Desk::new(Arc::new(TracingNotifier));
    let mut prompter = prompt::Prompter::new()?;

    login(&client, &mut prompter, cli.customer_code, cli.username).await?;

    let indicator = spinner::spawn(desk.busy().clone());
    let result = run_command(command, &client, &desk, &mut prompter).await;
    indicator.abort();
    client.logout().await;
    result
}

async fn login(
    client: &FrontDeskClient,
    prompter: &mut prompt::Prompter,
    customer_code: Option<String>,
    username: Option<String>,
) -> anyhow::Result<()> {
    let customer_code =
        match customer_code.or_else(|| std::env::var("FRONTDESK_CUSTOMER_CODE").ok()) {
            Some(code) => code,
            None => prompter.ask("Customer code", "")?,
        };
    let username = match username.or_else(|| std::env::var("FRONTDESK_USERNAME").ok()) {
        Some(name) => name,
        None => prompter.ask("Username", "")?,
    };
    let password = match std::env::var("FRONTDESK_PASSWORD") {
        Ok(password) => password,
        Err(_) => prompter.ask("Password", "")?,
    };

    let credentials = Credentials::new(&customer_code, &username, &password)
        .map_err(|errors| anyhow::anyhow!("invalid login: {errors}"))?;

    match client.login(&credentials).await.context("login failed")? {
        Some(_) => Ok(()),
        None => bail!("login rejected for {}", credentials.username()),
    }
}

async fn run_command(
    command: Commands,
    client: &FrontDeskClient,
    desk: &Desk,
    prompter: &mut prompt::Prompter,
) -> anyhow::Result<()> {
    match command {
        Commands::Classify { .. } => {}
        Commands::Search {
            query,
            first_name,
            last_name,
            dob,
            phone,
            identity,
            email,
            page,
        } => {
            let outcome = if query.is_empty() {
                let form = AdvancedSearchForm {
                    first_name: first_name.unwrap_or_default(),
                    last_name: last_name.unwrap_or_default(),
                    date_of_birth: dob,
                    phone_number: phone.unwrap_or_default(),
                    identity_number: identity.unwrap_or_default(),
                    email_address: email.unwrap_or_default(),
                };
                lookup::search_by_form(client, desk, &form).await
            } else {
                lookup::search_by_text(client, desk, &query.join(" ")).await
            };

            match outcome {
                SearchOutcome::Skipped => println!("Enter at least one search value."),
                SearchOutcome::NoResults | SearchOutcome::Failed => {}
                SearchOutcome::Found(results) => {
                    let pages = lookup::page_count(results.len());
                    for result in lookup::paginate(&results, page) {
                        println!(
                            "{:>8}  {:<10}  {:<30}  {:<10}  {}",
                            result.patient_id,
                            result.patient_code,
                            format!("{} {}", result.firstname, result.lastname),
                            result.date_of_birth.get(..10).unwrap_or(""),
                            result.phone_numbers_string
                        );
                    }
                    println!("Page {} of {pages} ({} patients)", page.max(1), results.len());
                }
            }
        }
        Commands::Show { patient_id } => {
            let patient = {
                let _busy = desk.begin_busy();
                load_patient(client, patient_id)
                    .await
                    .with_context(|| format!("failed to load patient {patient_id}"))?
            };
            print_patient(&patient);
        }
        Commands::MasterData { kind } => {
            let _busy = desk.begin_busy();
            print_master_data(client, kind).await?
        }
        Commands::Register => {
            let mut patient = CurrentPatient::default();
            run_intake(prompter, client, desk, &mut patient).await?;
        }
        Commands::Edit { patient_id } => {
            let mut patient = {
                let _busy = desk.begin_busy();
                load_patient(client, patient_id)
                    .await
                    .with_context(|| format!("failed to load patient {patient_id}"))?
            };
            run_intake(prompter, client, desk, &mut patient).await?;
        }
    }
    Ok(())
}

async fn run_intake(
    prompter: &mut prompt::Prompter,
    client: &FrontDeskClient,
    desk: &Desk,
    patient: &mut CurrentPatient,
) -> anyhow::Result<()> {
    let lookups = intake::Lookups::load(client).await;
    match intake::run(prompter, client, desk, patient, &lookups).await? {
        Navigation::Completed => {
            println!("\nIntake complete.");
            print_patient(patient);
        }
        _ => println!("\nIntake abandoned."),
    }
    Ok(())
}

async fn print_master_data(client: &FrontDeskClient, kind: MasterDataArg) -> anyhow::Result<()> {
    let rows: Vec<(String, String)> = match kind {
        MasterDataArg::Languages => client
            .languages()
            .await?
            .into_iter()
            .map(|l| (l.language_code, l.language_name))
            .collect(),
        MasterDataArg::Genders => client
            .genders()
            .await?
            .into_iter()
            .map(|g| (g.gender_code, g.gender_name))
            .collect(),
        MasterDataArg::IdentityTypes => client
            .identity_types()
            .await?
            .into_iter()
            .map(|t| (t.identity_type_code, t.identity_type_name))
            .collect(),
        MasterDataArg::AddressTypes => client
            .address_types()
            .await?
            .into_iter()
            .map(|t| (t.address_type_code, t.address_type_name))
            .collect(),
        MasterDataArg::PhoneTypes => client
            .phone_types()
            .await?
            .into_iter()
            .map(|t| (t.phone_type_code, t.phone_type_name))
            .collect(),
        MasterDataArg::HealthVitals => client
            .health_vitals()
            .await?
            .into_iter()
            .map(|v| {
                let name = format!("{} {}", v.health_vital_name, v.health_vital_unit);
                (v.health_vital_code, name)
            })
            .collect(),
        MasterDataArg::States => master::states()
            .into_iter()
            .map(|s| (s.state_code, s.state_name))
            .collect(),
    };

    for (code, name) in rows {
        println!("{code:<12} {}", name.trim());
    }
    Ok(())
}

fn print_patient(patient: &CurrentPatient) {
    if let Some(profile) = &patient.profile {
        println!("Patient {} ({})", profile.full_name(), profile.patient_code);
        println!("  Gender:        {}", profile.gender_code.as_deref().unwrap_or("-"));
        println!(
            "  Date of birth: {}",
            profile
                .birth_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into())
        );
    }
    if let Some(identity) = &patient.identity {
        println!(
            "  Identity:      {} {} (issued by {}, {})",
            identity.identity_type_code,
            identity.identity_number,
            identity.issued_by,
            identity.place_issued
        );
    }
    if let Some(address) = &patient.address {
        let lines: Vec<&str> = [
            Some(address.address_line1.as_str()),
            address.address_line2.as_deref(),
            address.address_line3.as_deref(),
            Some(address.city.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.trim().is_empty())
        .collect();
        println!(
            "  Address:       {}, {} {}",
            lines.join(", "),
            master::state_name(&address.state_code).unwrap_or(address.state_code.as_str()),
            address.pincode
        );
    }
    for phone in &patient.phones {
        println!("  Phone ({}):  {}", phone.phone_type_code, phone.phone_number);
    }
    if let Some(email) = &patient.email {
        println!("  Email:         {}", email.email_address);
    }
    for vital in &patient.vitals {
        println!(
            "  Vital:         {} {}",
            vital.health_vital_type_code, vital.health_vital_value
        );
    }
}
