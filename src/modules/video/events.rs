use serde::{Deserialize, Serialize};

/// Queue message describing one transcode operation. Bitrate ladder and
/// segmentation are fixed constants shared by all jobs, so the message only
/// carries the asset reference and paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeJob {
    pub video_id: i64,
    pub source_path: String,
    pub output_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The wire format is shared with any out-of-process consumer; field
    // names are part of the contract.
    #[test]
    fn job_wire_format() {
        let job = TranscodeJob {
            video_id: 7,
            source_path: "./uploaded_videos/abc.mp4".to_string(),
            output_dir: "./uploaded_videos/7_hls".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&job).unwrap();
        assert_eq!(json["video_id"], 7);
        assert_eq!(json["source_path"], "./uploaded_videos/abc.mp4");
        assert_eq!(json["output_dir"], "./uploaded_videos/7_hls");
    }
}
