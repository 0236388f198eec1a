pub mod client;
pub mod error;
pub mod request;

pub use client::Huddle01Client;
pub use error::{ApiError, ApiResult};
pub use request::{ApiRequest, HttpMethod};
