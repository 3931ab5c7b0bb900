use crate::export::{ExportFormat, RecordLayout};
use crate::parse::InputLayout;
use std::path::{Path, PathBuf};

/// Run options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct QueryOptions {
    pub data_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>, // None -> per-query default in the working dir
    pub input_layout: Option<InputLayout>, // None -> detect from extension/content
    pub export_format: ExportFormat,
    pub record_layout: RecordLayout,
    pub progress: bool,               // show progress bar while reading input
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            data_path: None,
            output_path: None,
            input_layout: None,
            export_format: ExportFormat::Text,
            record_layout: RecordLayout::Concatenated,
            progress: false,
            progress_label: None,
            read_buffer_bytes: 64 * 1024,
            write_buffer_bytes: 64 * 1024,
        }
    }
}

impl QueryOptions {
    pub fn with_data_path(mut self, path: impl AsRef<Path>) -> Self {
        self.data_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_input_layout(mut self, layout: InputLayout) -> Self {
        self.input_layout = Some(layout);
        self
    }
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }
    pub fn with_record_layout(mut self, layout: RecordLayout) -> Self {
        self.record_layout = layout;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
