pub mod config;
pub mod logging;

pub mod dispatch;
pub mod error;
pub mod ftp;
pub mod http;
pub mod parse;
pub mod request;
pub mod retry;
pub mod url_model;

pub use dispatch::dispatch;
pub use error::DownloadError;
pub use request::{Credentials, HttpMethod, TransferRequest};
