// Media compression service - dispatcher, normalizer, and FFmpeg backend seam

pub mod config;
pub mod dispatch;
pub mod engine;
