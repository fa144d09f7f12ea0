pub mod hls;
pub mod transcoder;
