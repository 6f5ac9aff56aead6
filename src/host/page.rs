use std::collections::BTreeSet;

use super::{DEVICE_INPUT, EMPLOYEE_INPUT, FileDownload, HostError, HostSurface};

/// In-memory model of a rendered page: which elements exist, which one has
/// focus, and every file the page has been asked to save.
#[derive(Debug, Default)]
pub struct Page {
    elements: BTreeSet<String>,
    focused: Option<String>,
    downloads: Vec<FileDownload>,
}

impl Page {
    pub fn with_elements<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: selectors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The check-in screen with both scan inputs rendered.
    pub fn scan_screen() -> Self {
        Self::with_elements([EMPLOYEE_INPUT, DEVICE_INPUT])
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn downloads(&self) -> &[FileDownload] {
        &self.downloads
    }
}

impl HostSurface for Page {
    fn focus(&mut self, selector: &str) -> Result<(), HostError> {
        if !self.elements.contains(selector) {
            return Err(HostError::ElementNotFound(selector.to_string()));
        }
        self.focused = Some(selector.to_string());
        Ok(())
    }

    fn download(&mut self, file: FileDownload) -> Result<(), HostError> {
        tracing::debug!(file_name = %file.file_name, bytes = file.bytes.len(), "page download");
        self.downloads.push(file);
        Ok(())
    }
}
