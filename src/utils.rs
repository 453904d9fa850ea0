/// Creates a fresh, exclusively owned directory for one request. It is deleted with all its
/// contents when the returned guard is dropped.
pub fn create_workspace(parent: &std::path::Path) -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix("ytmp3-").tempdir_in(parent)
}

/// Streams `file` while keeping `workspace` alive.
///
/// The workspace is removed when the stream is dropped, i.e. after the body went out or the
/// client hung up.
pub fn stream_file_from_workspace(
    file: tokio::fs::File,
    workspace: tempfile::TempDir,
) -> impl futures::Stream<Item = std::io::Result<axum::body::Bytes>> + Send + 'static {
    use futures::StreamExt as _;

    tokio_util::io::ReaderStream::new(file).map(move |chunk| {
        let _workspace = &workspace;
        chunk
    })
}
