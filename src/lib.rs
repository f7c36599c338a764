//! Participant introductions for a conference.
//!
//! People register a name and a short video, then look each other up by name
//! or at random. Replies to a presented participant are relayed without
//! revealing raw identifiers; the moderator can block anyone reported.
//!
//! The messaging transport lives outside this crate. It posts inbound events
//! to the webhook in [`webhook`] and performs the returned [`Outbound`] actions.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod identity;
pub mod matching;
pub mod moderation;
pub mod outbound;
pub mod participant;
pub mod registration;
pub mod relay;
pub mod webhook;

use axum::{extract::FromRef, http::StatusCode, response::{IntoResponse, Response}};
use tracing::error;

pub use bot::Bot;
pub use config::Config;
pub use db::Store;
pub use error::{Error, Result};
pub use event::Inbound;
pub use outbound::Outbound;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub bot: Bot,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        AppState {
            bot: Bot::new(store, config),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{:#}\n\n{}", self.0, self.0.backtrace());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
