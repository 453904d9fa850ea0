use crate::error::DownloadError;
use crate::json::YoutubeRequest;

fn validate_video_id(video_id: Option<String>) -> Result<String, DownloadError> {
    // The ID ends up both in a file name and in a URL
    static REGEX: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"^[A-Za-z0-9_-]+$").expect("impossible"));

    match video_id {
        None => Err(DownloadError::MissingVideoId),
        Some(id) if id.is_empty() => Err(DownloadError::MissingVideoId),
        Some(id) if !REGEX.is_match(&id) => Err(DownloadError::InvalidVideoId),
        Some(id) => Ok(id),
    }
}

pub async fn post_youtube(
    axum::extract::State(state): axum::extract::State<std::sync::Arc<crate::State>>,
    body: Result<axum::body::Bytes, axum::extract::rejection::BytesRejection>,
) -> Result<axum::response::Response, DownloadError> {
    use axum::response::IntoResponse as _;

    // A body that can't be read (too large, connection trouble) counts as one without an ID
    let body = body.unwrap_or_else(|e| {
        log::info!("ignoring unreadable request body: {}", e);
        axum::body::Bytes::new()
    });
    let video_id = validate_video_id(YoutubeRequest::parse_lenient(&body).video_id)?;
    let config = &state.config;

    let workspace = crate::utils::create_workspace(&config.workspace_dir)?;
    let file_name = format!("{}.mp3", video_id);
    let output_path = workspace.path().join(&file_name);

    log::info!("downloading audio for {} into {}", video_id, workspace.path().display());
    crate::ytdlp_download::download_audio(config, &video_id, &output_path).await?;

    let file = match tokio::fs::File::open(&output_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DownloadError::OutputMissing)
        }
        Err(e) => return Err(e.into()),
    };
    let len = file.metadata().await?.len();
    log::info!("sending {} ({} bytes)", file_name, len);

    let headers = [
        (axum::http::header::CONTENT_TYPE, "audio/mpeg".to_string()),
        (axum::http::header::CONTENT_LENGTH, len.to_string()),
        (
            axum::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    let body = axum::body::StreamBody::new(crate::utils::stream_file_from_workspace(file, workspace));
    Ok((headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_validation() {
        assert!(matches!(validate_video_id(None), Err(DownloadError::MissingVideoId)));
        assert!(matches!(validate_video_id(Some("".into())), Err(DownloadError::MissingVideoId)));
        for bad in ["../etc/passwd", "a b", "abc?list=1", "a/b", "ü"] {
            assert!(matches!(validate_video_id(Some(bad.into())), Err(DownloadError::InvalidVideoId)));
        }
        assert_eq!(validate_video_id(Some("dQw4w9WgXcQ".into())).unwrap(), "dQw4w9WgXcQ");
        assert_eq!(validate_video_id(Some("-_Ab9".into())).unwrap(), "-_Ab9");
    }
}
