//! Host surface: the capabilities the scan screen needs from whatever renders
//! it. The browser page moves keyboard focus and saves files; the HTTP server
//! only saves files, as response attachments.

use derive_more::Display;

pub mod attachment;
pub mod page;

pub use attachment::AttachmentSurface;
pub use page::Page;

/// Badge input on the scan screen.
pub const EMPLOYEE_INPUT: &str = "#employee-input input";
/// Device tag input on the scan screen.
pub const DEVICE_INPUT: &str = "#device-input input";

#[derive(Debug, Display, PartialEq, Eq)]
pub enum HostError {
    #[display(fmt = "element not found: {}", _0)]
    ElementNotFound(String),
    #[display(fmt = "a download is already pending on this surface")]
    DownloadPending,
}

impl std::error::Error for HostError {}

/// A file ready to be saved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait HostSurface {
    /// Move keyboard focus to the element matching `selector`.
    fn focus(&mut self, selector: &str) -> Result<(), HostError>;

    /// Hand `file` to the host for saving.
    fn download(&mut self, file: FileDownload) -> Result<(), HostError>;
}

pub fn focus_employee_input(host: &mut impl HostSurface) -> Result<(), HostError> {
    host.focus(EMPLOYEE_INPUT)
}

pub fn focus_device_input(host: &mut impl HostSurface) -> Result<(), HostError> {
    host.focus(DEVICE_INPUT)
}
