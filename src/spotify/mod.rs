//! # Spotify Integration Module
//!
//! Integration layer between the wizard and the Spotify Web API: the OAuth
//! authorization-code flow and a thin client for the authenticated REST
//! endpoints the pipeline consumes.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow: builds the authorize
//!   redirect, exchanges the callback code for a token pair, and performs
//!   refresh exchanges against the token endpoint.
//! - [`client`] - [`client::WebApi`], the "call endpoint, get JSON or a
//!   classified error" capability everything above builds on. Carries the
//!   request timeout; no call may hang a session.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user identity for playlist creation
//! - `GET /me/playlists` - the user's playlists for selection
//! - `GET /playlists/{id}/tracks` - playlist contents
//! - `GET /audio-features/{id}` - per-track audio attributes
//! - `POST /users/{user_id}/playlists` - create the result playlist
//! - `POST /playlists/{playlist_id}/tracks` - write the filtered tracks
//! - `POST /api/token` - code exchange and refresh (accounts host)
//!
//! ## Error Handling
//!
//! Transport failures, timeouts, unexpected statuses and undecodable bodies
//! are classified into [`crate::error::RemoteCallError`]; the OAuth calls map
//! their failures into [`crate::error::AuthError`] instead so the web layer
//! can route the user back into the flow.

pub mod auth;
pub mod client;
