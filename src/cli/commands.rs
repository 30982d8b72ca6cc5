//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{expand_path, global_config_path, OutputFormat, Settings};
use crate::domain::DomainError;
use crate::infrastructure::{InfraError, ServiceContainer};

/// Local config file created by `config init`.
pub const LOCAL_CONFIG_FILE: &str = "orgtree.toml";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        _completion(*shell);
        return Ok(());
    }

    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Hierarchy {
            file,
            format,
            compact,
            output,
        } => _hierarchy(&container, file, *format, *compact, output.as_deref()),
        Commands::Validate { file } => _validate(&container, file),
        Commands::Config { command } => _config(&container, cli, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn local_config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.as_deref().map(expand_path)
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local = local_config_path(cli);
    Ok(Settings::load(local.as_deref())?)
}

/// Build the hierarchy in `file` and render it in `format`.
///
/// `format` falls back to the configured output format.
pub fn render_hierarchy(
    container: &ServiceContainer,
    file: &Path,
    format: Option<OutputFormat>,
    compact: bool,
) -> CliResult<String> {
    let records = container.records.read(file)?;
    let format = format.unwrap_or(container.settings.output.format);
    debug!("render_hierarchy: {} records as {}", records.len(), format);

    match format.display_mode() {
        Some(mode) => Ok(container.hierarchy.get_rendered(&records, mode)?),
        None => {
            let hierarchy = container.hierarchy.get_hierarchy(&records)?;
            let json = if compact || !container.settings.output.pretty_json {
                serde_json::to_string(&hierarchy)
            } else {
                serde_json::to_string_pretty(&hierarchy)
            };
            json.map_err(|e| CliError::Internal(format!("serialize hierarchy: {e}")))
        }
    }
}

#[instrument(skip(container))]
fn _hierarchy(
    container: &ServiceContainer,
    file: &Path,
    format: Option<OutputFormat>,
    compact: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let rendered = render_hierarchy(container, file, format, compact)?;
    match output {
        Some(path) => {
            container
                .fs
                .write(path, &rendered)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Written", &path.display());
        }
        None => output::info(&rendered),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let records = container.records.read(file)?;
    let problems = container.hierarchy.check(&records);

    if let Some(first) = problems.first() {
        output::header(&format!("{} problem(s) in {}", problems.len(), file.display()));
        for problem in &problems {
            output::failure(problem);
        }
        return Err(ApplicationError::from(DomainError::InvalidInput(first.clone())).into());
    }

    // Structurally valid; the build still catches disconnected employees.
    let hierarchy = container.hierarchy.get_hierarchy(&records)?;
    output::success(&format!(
        "{} employees, {} layers, CEO: {}",
        hierarchy.len(),
        hierarchy.depth(),
        hierarchy.root().employee()
    ));
    Ok(())
}

#[instrument(skip(container, cli))]
fn _config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                PathBuf::from(LOCAL_CONFIG_FILE)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config file already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            let describe = |path: &Path| {
                let state = if container.fs.exists(path) {
                    "exists"
                } else {
                    "not found"
                };
                format!("{} ({})", path.display(), state)
            };
            match global_config_path() {
                Some(path) => output::action("Global", &describe(&path)),
                None => output::action("Global", "unavailable"),
            }
            if let Some(path) = local_config_path(cli) {
                output::action("Local", &describe(&path));
            }
            Ok(())
        }
    }
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
