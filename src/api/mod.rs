mod client;
mod error;
mod types;

pub use client::{ApiClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use types::{Comment, CommentPage, PageToken, VideoDetails};
