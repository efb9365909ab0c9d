//! ssm-association CLI entrypoint.
//!
//! Drives one lifecycle operation per invocation and prints the resulting
//! record. State is never persisted; callers keep the printed JSON.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use ssm_association::cli::{Cli, Commands, OutputFormatter};
use ssm_association::config::ConfigParser;
use ssm_association::error::{Operation, ResourceError, Result};
use ssm_association::migrate::{AssociationStateMigrator, StateMigrator};
use ssm_association::planner::plan_change;
use ssm_association::resource::{
    AssociationResource, ManagedAssociation, ReadOutcome, RecordValidator,
};
use ssm_association::ssm::AwsSsmClient;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr so stdout carries
/// only command output.
fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let config = cli.config;

    let parser = ConfigParser::new();
    parser.load_dotenv()?;

    match cli.command {
        Commands::Validate { file, warnings } => cmd_validate(&parser, &file, warnings, &formatter),
        Commands::Plan {
            file,
            state,
            detailed,
        } => cmd_plan(
            &parser,
            file.as_deref(),
            state.as_deref(),
            detailed,
            &formatter,
        ),
        Commands::Create { file } => {
            cmd_create(&parser, config.as_deref(), &file, &formatter).await
        }
        Commands::Read { id } => cmd_read(&parser, config.as_deref(), &id, &formatter).await,
        Commands::Update { file, state } => {
            cmd_update(&parser, config.as_deref(), &file, &state, &formatter).await
        }
        Commands::Delete { id, yes } => {
            cmd_delete(&parser, config.as_deref(), &id, yes, &formatter).await
        }
        Commands::Migrate { state } => cmd_migrate(&parser, &state, &formatter),
        Commands::Schema => emit(&formatter.format_schema()),
    }
}

/// Validate a declared association.
fn cmd_validate(
    parser: &ConfigParser,
    file: &Path,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let record = parser.load_record(file)?;
    let validator = RecordValidator::new();

    emit(&formatter.format_validation(&validator.check(&record), show_warnings))?;

    // Fail the process on the first violation.
    validator.validate(&record)?;
    Ok(())
}

/// Show the change plan.
fn cmd_plan(
    parser: &ConfigParser,
    file: Option<&Path>,
    state: Option<&Path>,
    detailed: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let desired = file.map(|f| parser.load_record(f)).transpose()?;

    let prior = match state {
        Some(path) => {
            let managed = AssociationStateMigrator::new().upgrade(parser.load_state(path)?)?;
            managed.is_present().then_some(managed.record)
        }
        None => None,
    };

    let plan = plan_change(prior.as_ref(), desired.as_ref());
    debug!("Computed plan: {plan}");

    emit(&formatter.format_plan(&plan, detailed))
}

/// Create an association.
async fn cmd_create(
    parser: &ConfigParser,
    config: Option<&Path>,
    file: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut managed = ManagedAssociation::new(parser.load_record(file)?);
    let client = create_client(parser, config).await?;

    AssociationResource::new(&client).create(&mut managed).await?;

    emit(&formatter.format_record(&managed))
}

/// Read an association.
async fn cmd_read(
    parser: &ConfigParser,
    config: Option<&Path>,
    id: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut managed = ManagedAssociation::from_id(id);
    let client = create_client(parser, config).await?;

    if AssociationResource::new(&client).read(&mut managed).await? == ReadOutcome::Gone {
        info!("Association {id} does not exist");
    }

    emit(&formatter.format_record(&managed))
}

/// Update an association.
async fn cmd_update(
    parser: &ConfigParser,
    config: Option<&Path>,
    file: &Path,
    state: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    let desired = parser.load_record(file)?;
    let prior = AssociationStateMigrator::new().upgrade(parser.load_state(state)?)?;

    if !prior.is_present() {
        return Err(ResourceError::MissingIdentifier {
            operation: Operation::Update,
        }
        .into());
    }

    let mut managed = ManagedAssociation {
        id: prior.id.clone(),
        record: desired,
    };
    let client = create_client(parser, config).await?;

    AssociationResource::new(&client)
        .update(&prior.record, &mut managed)
        .await?;

    emit(&formatter.format_record(&managed))
}

/// Delete an association.
async fn cmd_delete(
    parser: &ConfigParser,
    config: Option<&Path>,
    id: &str,
    auto_approve: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    // Confirm
    if !auto_approve {
        eprint!("Association {id} will be deleted. Type 'delete' to confirm: ");
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim() != "delete" {
            eprintln!("Deletion cancelled.");
            return Ok(());
        }
    }

    let mut managed = ManagedAssociation::from_id(id);
    managed.record.association_id = Some(id.to_string());
    let client = create_client(parser, config).await?;

    AssociationResource::new(&client).delete(&mut managed).await?;

    emit(&formatter.message("success", &format!("Deleted association {id}")))
}

/// Upgrade persisted state.
fn cmd_migrate(parser: &ConfigParser, state: &Path, formatter: &OutputFormatter) -> Result<()> {
    let raw = parser.load_state(state)?;
    let from = raw.schema_version;

    let migrator = AssociationStateMigrator::new();
    let migrated = migrator.migrate(from, raw)?;

    // Make sure the result still decodes as a record.
    migrator.upgrade(migrated.clone())?;

    emit(&formatter.format_migration(from, &migrated))
}

/// Builds the SDK client from resolved settings.
async fn create_client(parser: &ConfigParser, config: Option<&Path>) -> Result<AwsSsmClient> {
    let settings = parser.resolve_settings(config)?;
    debug!("Client settings: {settings:?}");
    Ok(AwsSsmClient::new(&settings).await)
}

/// Writes command output to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
