//! Convenient re-exports for writing resource definitions.
//!
//! ## Examples
//!
//! ```
//! use oceanic_define::prelude::*;
//!
//! let regions = ResourceSpec::new("regions");
//! assert!(regions.methods.is_empty());
//! ```

pub use crate::error::SpecError;
pub use crate::method::{MethodSpec, ParamValue};
pub use crate::resource::{ItemSpec, ResourceSpec};
pub use crate::types::{ApiDefinition, RestMethod};
