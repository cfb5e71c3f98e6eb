//! Oceanic: a REST client compiled from declarative resource definitions.
//!
//! A definition (see `oceanic-define`) describes each resource as a noun,
//! a set of collection methods and an optional `_item` block. This crate
//! compiles such a definition into [`Endpoint`]s whose methods validate
//! their arguments, resolve URL templates, dispatch through an injected
//! [`HttpTransport`](transport::HttpTransport) and wrap replies into
//! [`Item`]s with methods of their own.
//!
//! ## Modules
//!
//! - [`naming`] - Underscore to camelCase normalization
//! - [`decorate`] - Installing normalized properties and compiled methods
//! - [`method`] - The method compiler and its call forms
//! - [`template`] - `{placeholder}` substitution
//! - [`dispatch`] - URL resolution, auth header and hand-off to the transport
//! - [`transport`] - The HTTP seam, with `reqwest` and recording implementations
//! - [`process`] - Reply envelopes, pages and the caller-driven pager
//! - [`error`] - Layered error types
//!
//! ## Example Usage
//!
//! ```no_run
//! use oceanic::DigitalOcean;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), oceanic::error::ApiError> {
//! let api = DigitalOcean::builder().token_from_env().build()?;
//!
//! let mut pages = api.droplets.list().await?.into_pages();
//! while let Some(page) = pages.next().await {
//!     for droplet in page?.items() {
//!         println!("{}", droplet.get("name").unwrap_or(&json!(null)));
//!     }
//! }
//!
//! let droplet = api.droplets.call("id", vec![json!(3164494)]).await?;
//! if let Some(droplet) = droplet.item() {
//!     droplet.call("power_cycle", Vec::new()).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Callback form
//!
//! Every compiled method can also report through a callback. Without one, a
//! stand-in is used that panics naming the method once an outcome arrives.
//!
//! ```no_run
//! use oceanic::DigitalOcean;
//! use serde_json::json;
//!
//! # async fn run(api: DigitalOcean) {
//! let create = api.domains.method("create").unwrap();
//! create
//!     .call_with(
//!         vec![json!("example.com"), json!("1.2.3.4")],
//!         Some(Box::new(|result: Result<oceanic::Page, oceanic::ApiError>| match result {
//!             Ok(page) => println!("created {:?}", page.item().map(|d| d.fields())),
//!             Err(err) => eprintln!("{err}"),
//!         })),
//!     )
//!     .await;
//! # }
//! ```

pub mod client;
pub mod decorate;
pub mod digitalocean;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod item;
pub mod method;
pub mod naming;
pub mod process;
pub mod template;
pub mod token;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use digitalocean::{DigitalOcean, DigitalOceanBuilder};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use item::Item;
pub use method::{Callback, CompiledMethod, PageFuture};
pub use process::{Page, PageCursor, Pages, Payload};
pub use token::TokenStore;

pub use oceanic_define as define;
