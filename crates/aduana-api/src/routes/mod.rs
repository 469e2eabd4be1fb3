//! # Route Modules
//!
//! One module per API domain, each exposing `router() -> Router<AppState>`.
//! The modules are merged into the authenticated application router in
//! `lib.rs`.

pub mod compliance;
pub mod crossing;
pub mod declarations;
pub mod documents;
pub mod operations;
pub mod permits;

use serde::Deserialize;
use utoipa::IntoParams;

/// Actor query parameter for body-less mutations (DELETE endpoints).
#[derive(Debug, Deserialize, IntoParams)]
pub struct ActorQuery {
    /// Who performs the action. Defaults to `system`.
    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_actor() -> String {
    "system".to_string()
}
