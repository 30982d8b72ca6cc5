//! Decoding of employee lists from JSON input.
//!
//! The input is a JSON array of `{name, employeeId, managerId}` objects, read
//! from a file or from stdin when the path is `-`.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::EmployeeRecord;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

/// Path meaning "read from stdin".
pub const STDIN_PATH: &str = "-";

/// Reads employee records through the filesystem abstraction.
pub struct RecordReader {
    fs: Arc<dyn FileSystem>,
}

impl RecordReader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read records from `path`, or stdin for `-`.
    pub fn read(&self, path: &Path) -> InfraResult<Vec<EmployeeRecord>> {
        if path == Path::new(STDIN_PATH) {
            return self.read_from(std::io::stdin().lock(), "stdin");
        }
        if !self.fs.is_file(path) {
            return Err(InfraError::NotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        decode(&content, &path.display().to_string())
    }

    /// Read records from any reader; `context` names it in errors.
    pub fn read_from(&self, mut reader: impl Read, context: &str) -> InfraResult<Vec<EmployeeRecord>> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| InfraError::io(format!("read {context}"), e))?;
        decode(&content, context)
    }
}

/// Decode a JSON array of employee records.
pub fn decode(content: &str, context: &str) -> InfraResult<Vec<EmployeeRecord>> {
    let records: Vec<EmployeeRecord> =
        serde_json::from_str(content).map_err(|source| InfraError::Decode {
            context: context.to_string(),
            source,
        })?;
    debug!("decode: {} records from {}", records.len(), context);
    Ok(records)
}
