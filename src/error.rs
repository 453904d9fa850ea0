/// Everything that can go wrong while serving a download request. Converting into a response is
/// the only place a failure leaves the handler.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("identifier is required")]
    MissingVideoId,
    #[error("invalid video identifier")]
    InvalidVideoId,
    /// yt-dlp exited with a non-zero status. Its output has already been logged
    #[error("audio download failed")]
    ToolFailed,
    /// yt-dlp claimed success but the mp3 isn't there
    #[error("audio file was not produced")]
    OutputMissing,
    #[error("audio download timed out after {}s", .0.as_secs())]
    TimedOut(std::time::Duration),
    #[error("failed to launch downloader: {0}")]
    Spawn(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            Self::MissingVideoId | Self::InvalidVideoId => StatusCode::BAD_REQUEST,
            Self::ToolFailed
            | Self::OutputMissing
            | Self::TimedOut(_)
            | Self::Spawn(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for DownloadError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("youtube download failed: {}", self);
        } else {
            log::info!("rejected youtube download request: {}", self);
        }

        (status, axum::Json(crate::json::ErrorBody { error: self.to_string() })).into_response()
    }
}
