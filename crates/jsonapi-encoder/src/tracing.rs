//! # Tracing Setup
//!
//! Subscriber installation for binaries and tests that use the encoder. The encoder
//! itself only emits events; nothing is printed until a subscriber is installed.

/// Initializes the tracing/logging infrastructure for an application using the encoder.
///
/// This sets up structured logging using the `tracing` crate with:
/// - **Environment-based filtering**: Controlled via `RUST_LOG` environment variable
/// - **Pretty formatting**: Human-readable output with timestamps and log levels
///
/// # Environment Variables
///
/// - `RUST_LOG=info` - One line per encoded document
/// - `RUST_LOG=debug` - Every resource, schema instantiation and skipped duplicate
/// - `RUST_LOG=jsonapi_encoder=debug` - Debug only for this crate
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
