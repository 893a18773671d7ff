pub mod platform;
pub mod transcoder;
