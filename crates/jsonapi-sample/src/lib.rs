//! # JSON:API Blog Sample
//!
//! This library exposes the blog application's modules for the demo binary and
//! integration testing.

pub mod lifecycle;
pub mod model;
pub mod schemas;
