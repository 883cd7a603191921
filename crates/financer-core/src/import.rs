//! Spreadsheet statement import selection
//!
//! Holds at most one pending `.xlsx` file. Parsing happens server-side.

use crate::error::CoreError;
use std::path::{Path, PathBuf};

/// Media type accepted by the upload endpoint
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Multipart field name carrying the statement
pub const UPLOAD_FIELD: &str = "extrato";

const XLSX_EXTENSION: &str = "xlsx";

/// A local spreadsheet picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl SelectedFile {
    /// Validate that `path` is an existing `.xlsx` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();

        let is_xlsx = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(XLSX_EXTENSION))
            .unwrap_or(false);
        if !is_xlsx {
            return Err(CoreError::UnsupportedFile {
                path: path.to_path_buf(),
                reason: "Only .xlsx spreadsheets can be imported".to_string(),
            });
        }

        if !path.is_file() {
            return Err(CoreError::UnsupportedFile {
                path: path.to_path_buf(),
                reason: format!("File not found: {}", path.display()),
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extrato.xlsx".to_string());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
        })
    }

    /// Read the whole file for upload
    pub async fn read(&self) -> Result<Vec<u8>, CoreError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| CoreError::FileRead {
                path: self.path.clone(),
                source,
            })
    }
}

/// Pending import selection (zero or one file)
#[derive(Debug, Default, Clone)]
pub struct ImportSelection {
    selected: Option<SelectedFile>,
}

impl ImportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending file, returning the previous one
    pub fn select(&mut self, file: SelectedFile) -> Option<SelectedFile> {
        self.selected.replace(file)
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// File to submit, or a validation error when nothing is selected
    pub fn require(&self) -> Result<&SelectedFile, CoreError> {
        self.selected
            .as_ref()
            .ok_or_else(|| CoreError::validation("file", "Select a file first"))
    }
}
