pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;

pub use config::Config;
pub use db::{Album, AlbumStorage};
pub use error::RecordingsError;
