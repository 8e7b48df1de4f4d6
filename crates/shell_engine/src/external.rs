use shell_core::Notice;
use shell_logging::{shell_error, shell_info, shell_warn};

use crate::platform::{ExternalOpener, PlatformError};
use crate::{EngineEvent, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOutcome {
    Opened,
    NoHandler,
}

/// Hands `url` to another installed application.
///
/// Failures never propagate: they are logged and shown as a notice, and the
/// browser surface keeps whatever it had loaded.
pub async fn open_external(
    opener: &dyn ExternalOpener,
    url: &str,
    sink: &dyn EventSink,
) -> Result<ExternalOutcome, PlatformError> {
    let result = try_open(opener, url).await;
    match &result {
        Ok(ExternalOutcome::Opened) => shell_info!("Opened {} externally", url),
        Ok(ExternalOutcome::NoHandler) => {
            shell_warn!("No handler can open {}", url);
            sink.emit(EngineEvent::Notice(Notice::no_external_handler(url)));
        }
        Err(err) => {
            shell_error!("Failed to open {} externally: {}", url, err);
            sink.emit(EngineEvent::Notice(Notice::external_open_failed()));
        }
    }
    result
}

async fn try_open(
    opener: &dyn ExternalOpener,
    url: &str,
) -> Result<ExternalOutcome, PlatformError> {
    if !opener.can_open(url).await? {
        return Ok(ExternalOutcome::NoHandler);
    }
    opener.open(url).await?;
    Ok(ExternalOutcome::Opened)
}
