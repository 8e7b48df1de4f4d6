use std::fmt;

/// Short user-facing message shown by the host (alert, toast, snackbar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn permission_required() -> Self {
        Self::new(
            "Permission required",
            "Please allow storage access to download files",
        )
    }

    pub fn download_started() -> Self {
        Self::new("Download started", "Your file is being downloaded")
    }

    pub fn image_saved() -> Self {
        Self::new("Success", "Image saved to your gallery")
    }

    pub fn file_downloaded(location: &str) -> Self {
        Self::new("Success", format!("File downloaded to: {location}"))
    }

    pub fn download_failed() -> Self {
        Self::new("Error", "Failed to download file")
    }

    pub fn unsupported_content() -> Self {
        Self::new(
            "Unsupported Content",
            "This content cannot be downloaded directly. Please use the share button on the website if available.",
        )
    }

    pub fn no_external_handler(url: &str) -> Self {
        Self::new(
            "Cannot open link",
            format!("No installed application can open {url}"),
        )
    }

    pub fn external_open_failed() -> Self {
        Self::new("Error", "Could not open the link")
    }

    pub fn save_failed(detail: impl fmt::Display) -> Self {
        Self::new("Error", format!("Failed to save file: {detail}"))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
