//! Remote quiz service client.
//!
//! [`QuizApi`] is the seam the attempt controller talks through;
//! [`HttpQuizApi`] is the real implementation and [`MockQuizApi`] a
//! scriptable stand-in.

mod client;
mod error;
mod http;
pub mod mock;
mod session;

pub use client::QuizApi;
pub use error::ApiError;
pub use http::{AUTH_HEADER, HttpQuizApi};
pub use mock::{Endpoint, MockQuizApi};
pub use session::Session;
