//! Playlist filtering web wizard for Spotify.
//!
//! The crate wires a linear flow: authorize with Spotify, pick playlists,
//! aggregate their tracks enriched with audio features, filter the aggregate
//! by attribute ranges, and save the result as a new playlist.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the wizard routes
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and its HTTP mapping
//! - `pipeline` - Aggregation, filtering and playlist write-back
//! - `server` - Router construction and serving
//! - `session` - Session-keyed state store and the auth state machine
//! - `spotify` - Spotify Web API client and OAuth flow
//! - `types` - Data structures and wire shapes
//! - `utils` - Session handles, cookie signing, form helpers

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Reserved for startup-fatal conditions (missing configuration, failure to
/// bind the listener). Never called once the server is accepting requests.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
