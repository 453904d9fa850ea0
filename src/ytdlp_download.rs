use crate::config::Config;
use crate::error::DownloadError;

fn command(
    config: &Config,
    video_id: &str,
    output_path: &std::path::Path,
) -> Result<tokio::process::Command, DownloadError> {
    let Some((program, leading_args)) = config.ytdlp.split_first() else {
        return Err(DownloadError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no downloader program configured",
        )));
    };

    let mut command = tokio::process::Command::new(program);
    command
        .args(leading_args)
        .args(["-f", "bestaudio[ext=m4a]"])
        .arg("--extract-audio")
        .args(["--audio-format", "mp3"])
        .args(["--audio-quality", "0"]) // 0 is best
        .arg("-o")
        .arg(output_path)
        .arg(config.source_url(video_id))
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        // A timed out or abandoned download must not keep running in the background
        .kill_on_drop(true);
    // Own process group, so ffmpeg started by yt-dlp can be killed along with it
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(command.as_std_mut(), 0);
    Ok(command)
}

/// SIGKILLs the process group of a running download when dropped. `kill_on_drop` only reaches
/// yt-dlp itself, not the ffmpeg it spawns.
struct ProcessGroupGuard(Option<u32>);

impl ProcessGroupGuard {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        let Some(pgid) = self.0.take() else { return };

        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};

            match killpg(nix::unistd::Pid::from_raw(pgid as i32), Signal::SIGKILL) {
                Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
                Err(e) => log::warn!("failed to kill process group {}: {}", pgid, e),
            }
        }
        #[cfg(not(unix))]
        let _ = pgid;
    }
}

/// Runs yt-dlp once to write the audio of `video_id` as mp3 to `output_path`.
///
/// Only the exit status is checked here. Whether the file actually exists is up to the caller.
pub async fn download_audio(
    config: &Config,
    video_id: &str,
    output_path: &std::path::Path,
) -> Result<(), DownloadError> {
    let child = command(config, video_id, output_path)?.spawn().map_err(DownloadError::Spawn)?;
    // Dropped on timeout or when the request goes away, taking the whole group down
    let guard = ProcessGroupGuard(child.id());

    let output = tokio::time::timeout(config.timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            log::warn!("yt-dlp for {} didn't finish within {:?}, killing it", video_id, config.timeout);
            DownloadError::TimedOut(config.timeout)
        })??;
    guard.disarm();

    if !output.status.success() {
        log::error!(
            "yt-dlp for {} exited with {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            video_id,
            output.status,
            String::from_utf8_lossy(&output.stdout).trim_end(),
            String::from_utf8_lossy(&output.stderr).trim_end(),
        );
        return Err(DownloadError::ToolFailed);
    }

    Ok(())
}
