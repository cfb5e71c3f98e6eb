//! Oceanic API Definitions
//!
//! This crate contains actual resource definitions that use the primitives
//! from `oceanic-define`. Each API is organized in its own module.
//!
//! ## Available APIs
//!
//! - [`digitalocean`] - DigitalOcean API v2
//!
//! ## Examples
//!
//! ```
//! use oceanic_definitions::define_digitalocean_api;
//!
//! let api = define_digitalocean_api();
//! assert_eq!(api.name, "DigitalOcean");
//! assert_eq!(api.resources.len(), 8);
//! ```

pub mod digitalocean;

pub use digitalocean::define_digitalocean_api;
