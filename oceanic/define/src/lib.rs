//! Oceanic Definition Library
//!
//! This crate provides the declarative language used to describe REST
//! resources. A definition is pure data: which nouns exist, which methods each
//! collection and each returned item carries, which URL templates they target
//! and which parameters they require. The `oceanic` engine compiles these
//! definitions into callable endpoints.
//!
//! ## Core Types
//!
//! - [`ApiDefinition`] - A complete API: name, base URL, token env chain, resources
//! - [`ResourceSpec`] - One REST collection (e.g. `droplets`)
//! - [`ItemSpec`] - Methods, actions and records attached to every returned item
//! - [`MethodSpec`] - One callable: HTTP method, endpoint template, parameters
//! - [`ParamValue`] - A parameter marker: required (`"#"`) or a fixed value
//! - [`RestMethod`] - HTTP methods (GET, POST, PUT, etc.)
//!
//! ## Examples
//!
//! ```
//! use oceanic_define::{ApiDefinition, MethodSpec, ResourceSpec};
//!
//! let api = ApiDefinition {
//!     name: "Example".to_string(),
//!     description: "Example API".to_string(),
//!     base_url: "https://api.example.com/v1/".to_string(),
//!     docs_url: None,
//!     env_auth: vec!["EXAMPLE_TOKEN".to_string()],
//!     resources: vec![
//!         ResourceSpec::new("widgets")
//!             .method("id", MethodSpec::get().endpoint("{id}").required("id")),
//!     ],
//! };
//!
//! assert_eq!(api.resources.len(), 1);
//! assert_eq!(api.resources[0].methods[0].0, "id");
//! ```
//!
//! ## Loading definitions
//!
//! The same tree can be written as JSON or YAML, using the reserved keys
//! `_item`, `_actions` and `_records`:
//!
//! ```
//! use oceanic_define::ApiDefinition;
//!
//! let api = ApiDefinition::from_json_str(r##"{
//!     "name": "Example",
//!     "base_url": "https://api.example.com/v1/",
//!     "resources": [
//!         { "name": "widgets", "methods": {
//!             "id": { "endpoint": "{id}", "param": { "id": "#" } },
//!             "_item": { "_actions": { "spin": {} } }
//!         } }
//!     ]
//! }"##).unwrap();
//!
//! let item = api.resources[0].item.as_ref().unwrap();
//! assert_eq!(item.actions[0].0, "spin");
//! ```

pub mod error;
pub mod method;
pub mod prelude;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use error::SpecError;
pub use method::{MethodSpec, ParamValue, REQUIRED_MARKER};
pub use resource::{ItemSpec, ResourceSpec};
pub use types::{ApiDefinition, RestMethod};
