use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the master playlist ffmpeg writes into the output directory.
pub const MASTER_PLAYLIST: &str = "master.m3u8";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("ffmpeg could not be started: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("ffmpeg exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("ffmpeg exceeded the {0}s deadline and was killed")]
    Timeout(u64),
}

/// Argument list for the three-rung HLS ladder: 1080p @ 5000k, 720p @ 3000k
/// and 480p @ 1500k, all cut into 4-second VOD segments with a shared master
/// playlist.
pub fn build_args(input: &Path, output_dir: &Path) -> Vec<String> {
    let variant_playlist = output_dir.join("output_%v.m3u8");

    let args: Vec<&str> = vec![
        "-i",
        "{input}",
        "-filter_complex",
        "[0:v]split=3[v1][v2][v3]",
        "-map",
        "[v1]",
        "-map",
        "[v2]",
        "-map",
        "[v3]",
        "-map",
        "0:a",
        "-preset",
        "fast",
        "-g",
        "48",
        "-sc_threshold",
        "0",
        "-s:v:0",
        "1920x1080",
        "-b:v:0",
        "5000k",
        "-s:v:1",
        "1280x720",
        "-b:v:1",
        "3000k",
        "-s:v:2",
        "854x480",
        "-b:v:2",
        "1500k",
        "-c:v:0",
        "libx264",
        "-c:a:0",
        "aac",
        "-movflags",
        "+faststart",
        "-f",
        "hls",
        "-hls_time",
        "4",
        "-hls_playlist_type",
        "vod",
        "-master_pl_name",
        MASTER_PLAYLIST,
        "-var_stream_map",
        "v:0,a:0 v:1,a:0 v:2,a:0",
        "{output}",
    ];

    args.into_iter()
        .map(|a| match a {
            "{input}" => input.to_string_lossy().into_owned(),
            "{output}" => variant_playlist.to_string_lossy().into_owned(),
            other => other.to_string(),
        })
        .collect()
}

/// Runs the full transcode and returns the path of the master playlist.
///
/// The child is killed if it outlives `timeout_secs`; stderr is captured so
/// failures can be stored alongside the video record.
pub async fn run(
    ffmpeg_bin: &str,
    input: &Path,
    output_dir: &Path,
    timeout_secs: u64,
) -> Result<PathBuf, TranscodeError> {
    let args = build_args(input, output_dir);
    debug!("running {} {}", ffmpeg_bin, args.join(" "));

    // kill_on_drop so a timed-out child does not linger after the wait
    // future is dropped
    let child = Command::new(ffmpeg_bin)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let output_future = child.wait_with_output();
    let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), output_future).await
    {
        Ok(result) => result?,
        Err(_) => {
            warn!(
                "ffmpeg exceeded {}s deadline, process will be killed",
                timeout_secs
            );
            return Err(TranscodeError::Timeout(timeout_secs));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TranscodeError::Failed {
            status: output.status.to_string(),
            stderr: truncate_stderr(&stderr),
        });
    }

    Ok(output_dir.join(MASTER_PLAYLIST))
}

/// Keeps the tail of ffmpeg's stderr, which is where the actual error lands.
fn truncate_stderr(stderr: &str) -> String {
    const MAX: usize = 2000;
    let trimmed = stderr.trim();
    if trimmed.len() <= MAX {
        return trimmed.to_string();
    }
    let start = trimmed.len() - MAX;
    let start = trimmed
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| i >= start)
        .unwrap_or(0);
    format!("...{}", &trimmed[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_covers_three_renditions() {
        let args = build_args(Path::new("/tmp/in.mp4"), Path::new("/tmp/out"));

        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/tmp/in.mp4");
        assert!(args.contains(&"1920x1080".to_string()));
        assert!(args.contains(&"1280x720".to_string()));
        assert!(args.contains(&"854x480".to_string()));
        assert!(args.contains(&"v:0,a:0 v:1,a:0 v:2,a:0".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out/output_%v.m3u8"));
    }

    #[test]
    fn segments_are_four_second_vod() {
        let args = build_args(Path::new("in.mp4"), Path::new("out"));
        let hls_time = args.iter().position(|a| a == "-hls_time").map(|i| &args[i + 1]);
        assert_eq!(hls_time.map(String::as_str), Some("4"));
        let playlist_type = args
            .iter()
            .position(|a| a == "-hls_playlist_type")
            .map(|i| &args[i + 1]);
        assert_eq!(playlist_type.map(String::as_str), Some("vod"));
    }

    #[test]
    fn stderr_tail_is_kept() {
        let long = "x".repeat(5000);
        let tail = truncate_stderr(&long);
        assert!(tail.len() <= 2003);
        assert!(tail.starts_with("..."));

        assert_eq!(truncate_stderr("  short error \n"), "short error");
    }

    #[tokio::test]
    async fn nonzero_exit_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let result = run("false", Path::new("in.mp4"), dir.path(), 5).await;
        assert!(matches!(result, Err(TranscodeError::Failed { .. })));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let result = run(
            "definitely-not-ffmpeg-on-this-machine",
            Path::new("in.mp4"),
            Path::new("/tmp"),
            5,
        )
        .await;
        assert!(matches!(result, Err(TranscodeError::Unavailable(_))));
    }
}
