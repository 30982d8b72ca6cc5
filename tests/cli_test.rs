//! Tests for the CLI layer: record decoding, rendering and exit codes

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tempfile::TempDir;

use orgtree::cli::args::ConfigCommands;
use orgtree::cli::{execute_command, render_hierarchy, Cli, CliError, Commands};
use orgtree::config::{OutputFormat, Settings};
use orgtree::exitcode;
use orgtree::infrastructure::traits::FileSystem;
use orgtree::infrastructure::{InfraError, RecordReader, ServiceContainer};
use orgtree::util::testing;

fn resource(name: &str) -> PathBuf {
    Path::new("tests/resources/employees").join(name)
}

fn container() -> ServiceContainer {
    testing::init_test_setup();
    ServiceContainer::new(Settings::default())
}

/// In-memory filesystem recording writes.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

// ============================================================
// Record decoding
// ============================================================

#[test]
fn given_json_file_when_reading_records_then_decodes_camel_case_fields() {
    let fs = Arc::new(MemoryFileSystem::with_file(
        "org.json",
        r#"[{"name": "Jamie", "employeeId": 150, "managerId": null},
            {"name": "Alan", "employeeId": 100, "managerId": 150}]"#,
    ));
    let reader = RecordReader::new(fs);

    let records = reader.read(Path::new("org.json")).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Jamie");
    assert_eq!(records[0].manager_id, None);
    assert_eq!(records[1].employee_id, 100);
    assert_eq!(records[1].manager_id, Some(150));
}

#[test]
fn given_reader_input_when_reading_records_then_decodes() {
    let reader = RecordReader::new(Arc::new(MemoryFileSystem::default()));
    let input = br#"[{"name": "Jamie", "employeeId": 1}]"#;

    let records = reader.read_from(&input[..], "stdin").unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].is_root());
}

#[test]
fn given_missing_file_when_reading_records_then_not_found() {
    let reader = RecordReader::new(Arc::new(MemoryFileSystem::default()));
    let err = reader.read(Path::new("missing.json")).unwrap_err();
    assert!(matches!(err, InfraError::NotFound(_)));
    assert_eq!(CliError::from(err).exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_object_instead_of_list_when_reading_records_then_decode_error() {
    let err = RecordReader::new(Arc::new(orgtree::infrastructure::traits::RealFileSystem))
        .read(&resource("not_a_list.json"))
        .unwrap_err();
    assert!(matches!(err, InfraError::Decode { .. }));
    assert_eq!(CliError::from(err).exit_code(), exitcode::DATAERR);
}

// ============================================================
// Rendering through the container
// ============================================================

#[test]
fn given_valid_file_when_rendering_json_then_ceo_object_with_subordinates() {
    let json = render_hierarchy(&container(), &resource("valid.json"), None, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let ceo = &value["ceo"];
    assert_eq!(ceo["name"], "Jamie");
    assert_eq!(ceo["employeeId"], 150);
    assert_eq!(ceo["subordinates"][0]["employeeId"], 100);
    assert_eq!(ceo["subordinates"][1]["employeeId"], 400);
    assert_eq!(ceo["subordinates"][0]["subordinates"][1]["name"], "Alex");
    assert_eq!(ceo["subordinates"][1]["subordinates"][0]["name"], "David");
    assert!(ceo["subordinates"][1]["subordinates"][0]
        .get("subordinates")
        .is_none());
}

#[test]
fn given_compact_flag_when_rendering_json_then_single_line() {
    let json = render_hierarchy(&container(), &resource("valid.json"), None, true).unwrap();
    assert_eq!(json.lines().count(), 1);
}

#[test]
fn given_text_format_when_rendering_then_table_rows() {
    let text = render_hierarchy(
        &container(),
        &resource("valid.json"),
        Some(OutputFormat::Text),
        false,
    )
    .unwrap();
    assert!(text.starts_with("Jamie\t|\n\t\t|Alan\t|\n"));
}

#[test]
fn given_configured_html_format_when_rendering_without_flag_then_html() {
    let mut settings = Settings::default();
    settings.output.format = OutputFormat::Html;
    let container = ServiceContainer::new(settings);

    let html = render_hierarchy(&container, &resource("valid.json"), None, false).unwrap();
    assert!(html.contains("<table>"));
}

// ============================================================
// Exit codes
// ============================================================

#[test]
fn given_duplicate_ids_when_rendering_then_data_error_exit_code() {
    let err = render_hierarchy(&container(), &resource("duplicate_id.json"), None, false)
        .unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_two_roots_when_rendering_then_data_error_exit_code() {
    let err =
        render_hierarchy(&container(), &resource("two_roots.json"), None, false).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_disconnected_employees_when_rendering_then_hierarchy_exit_code() {
    let err = render_hierarchy(&container(), &resource("disconnected.json"), None, false)
        .unwrap_err();
    assert_eq!(err.exit_code(), exitcode::HIERARCHY);
    assert!(err.to_string().contains("unreachable"));
}

#[test]
fn given_root_only_when_rendering_then_hierarchy_exit_code() {
    let err =
        render_hierarchy(&container(), &resource("root_only.json"), None, false).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::HIERARCHY);
}

// ============================================================
// Command dispatch
// ============================================================

#[test]
fn given_output_file_when_running_hierarchy_then_writes_rendering() {
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("org.html");
    let input = resource("valid.json");
    let cli = Cli::parse_from([
        "orgtree",
        "hierarchy",
        input.to_str().unwrap(),
        "--format",
        "html",
        "--output",
        out.to_str().unwrap(),
    ]);

    execute_command(&cli).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("<td>David</td>"));
}

#[test]
fn given_invalid_file_when_running_validate_then_data_error() {
    testing::init_test_setup();
    let input = resource("duplicate_id.json");
    let cli = Cli::parse_from(["orgtree", "validate", input.to_str().unwrap()]);

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_valid_file_when_running_validate_then_ok() {
    testing::init_test_setup();
    let input = resource("valid.json");
    let cli = Cli::parse_from(["orgtree", "validate", input.to_str().unwrap()]);

    assert!(execute_command(&cli).is_ok());
}

#[test]
fn given_missing_config_flag_file_when_running_then_config_exit_code() {
    testing::init_test_setup();
    let input = resource("valid.json");
    let cli = Cli::parse_from([
        "orgtree",
        "--config",
        "/nonexistent/orgtree.toml",
        "validate",
        input.to_str().unwrap(),
    ]);

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[test]
fn given_memory_fs_when_container_built_with_deps_then_reader_uses_it() {
    let fs = Arc::new(MemoryFileSystem::with_file(
        "org.json",
        r#"[{"name": "Ada", "employeeId": 1}, {"name": "Bob", "employeeId": 2, "managerId": 1}]"#,
    ));
    let container = ServiceContainer::with_deps(Settings::default(), fs);

    let text = render_hierarchy(
        &container,
        Path::new("org.json"),
        Some(OutputFormat::Text),
        false,
    )
    .unwrap();

    assert_eq!(text, "Ada\t|\n\t\t|Bob\t|\n");
}

#[test]
fn given_config_template_command_when_running_then_ok() {
    testing::init_test_setup();
    let cli = Cli::parse_from(["orgtree", "config", "template"]);

    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Template
        })
    ));
    assert!(execute_command(&cli).is_ok());
}
