pub mod config;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod magick;
pub mod scan;
pub mod size;
