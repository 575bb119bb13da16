//! The `upload` command: run one link and record it in the upload log.

use std::sync::Arc;

use super::{CommandError, CommandOutput};
use crate::debug_logger::DebugLogger;
use crate::process_link;
use crate::settings::Settings;
use crate::upload_log::UploadLog;

pub async fn handle_upload(
    settings: &Settings,
    link: &str,
    user: Option<String>,
    user_id: Option<u64>,
    show_diagnostics: bool,
) -> Result<CommandOutput, CommandError> {
    let logger = Arc::new(DebugLogger::new());
    let report = process_link(settings, link, logger.clone()).await?;

    let user = user.unwrap_or_else(|| settings.log_user.clone());
    if let Err(e) = UploadLog::new(settings.upload_log_file()).append(&user, user_id, link) {
        tracing::warn!(error = %e, "failed to append upload log");
    }

    let stderr = (show_diagnostics && logger.failure_count() > 0).then(|| logger.render());
    Ok(CommandOutput { stdout: report, stderr })
}
