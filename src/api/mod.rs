pub mod client;
pub mod dto;
pub mod error;
#[cfg(test)]
pub mod scripted;
pub mod transport;
pub mod urls;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{ReqwestTransport, Transport};
pub use urls::Endpoints;
