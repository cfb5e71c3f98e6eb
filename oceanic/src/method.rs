//! The method compiler.
//!
//! A [`MethodSpec`] is compiled once into a [`CompiledMethod`]: the spec plus
//! a resolver closure that knows how to turn a validated parameter set into a
//! request. Invoking the compiled method merges fixed parameters, consumes
//! positional arguments into the required parameters in declaration order,
//! and refuses to call the resolver while any required parameter is missing.

use std::fmt;
use std::sync::Arc;

use oceanic_define::{MethodSpec, ParamValue};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiError, ValidationError};
use crate::process::Page;
use crate::transport::BoxFuture;

/// A pending page of results.
pub type PageFuture = BoxFuture<'static, Result<Page, ApiError>>;

/// Turns a validated parameter set into a pending request.
///
/// Returning `Err` means the request could not even be dispatched (for
/// example because no token is set).
pub type Resolver =
    Arc<dyn Fn(Map<String, Value>) -> Result<PageFuture, ApiError> + Send + Sync>;

/// Receives the single outcome of a callback-style invocation.
pub type Callback = Box<dyn FnOnce(Result<Page, ApiError>) + Send>;

/// A callable compiled from a [`MethodSpec`].
#[derive(Clone)]
pub struct CompiledMethod {
    name: String,
    spec: MethodSpec,
    resolver: Resolver,
}

impl fmt::Debug for CompiledMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMethod")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl CompiledMethod {
    /// Compiles `spec` under `name` (the name as declared, used in messages).
    pub fn new(name: impl Into<String>, spec: MethodSpec, resolver: Resolver) -> Self {
        Self {
            name: name.into(),
            spec,
            resolver,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The spec this method was compiled from.
    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    /// Builds the working parameter set for `args`.
    ///
    /// Fixed values are copied from the spec; each required parameter takes
    /// the next positional argument. Arguments beyond the required
    /// parameters are ignored. The spec itself is never mutated.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::MissingArguments`] naming every required
    /// parameter left without an argument.
    pub fn bind(&self, args: Vec<Value>) -> Result<Map<String, Value>, ValidationError> {
        let mut params = Map::new();
        let mut args = args.into_iter();
        let mut missing = Vec::new();

        for (key, value) in &self.spec.params {
            match value {
                ParamValue::Fixed(fixed) => {
                    params.insert(key.clone(), fixed.clone());
                }
                ParamValue::Required => match args.next() {
                    Some(arg) => {
                        params.insert(key.clone(), arg);
                    }
                    None => missing.push(key.clone()),
                },
            }
        }

        if missing.is_empty() {
            Ok(params)
        } else {
            debug!(method = %self.name, ?missing, "rejecting call with missing arguments");
            Err(ValidationError::missing_arguments(&self.name, &missing))
        }
    }

    /// Validates `args` and dispatches the request.
    ///
    /// Validation and dispatch happen before this returns; only the reply
    /// is awaited through the returned future.
    ///
    /// ## Errors
    ///
    /// - [`ValidationError::MissingArguments`] when required parameters are
    ///   missing. The resolver is not called.
    /// - Any error the resolver reports while dispatching.
    pub fn invoke(&self, args: Vec<Value>) -> Result<PageFuture, ApiError> {
        let params = self.bind(args)?;
        (self.resolver)(params)
    }

    /// Async form of [`invoke`](Self::invoke) with both error stages
    /// flattened into the future's output.
    pub fn call(&self, args: Vec<Value>) -> PageFuture {
        match self.invoke(args) {
            Ok(pending) => pending,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }

    /// Callback form.
    ///
    /// A validation error is delivered to `callback` before this returns and
    /// the returned future does nothing. Otherwise the returned future must
    /// be driven to deliver the reply.
    ///
    /// Without a callback, a stand-in is used that panics naming this
    /// method the moment an outcome would have been delivered.
    ///
    /// ## Panics
    ///
    /// - When no token is set; the error is fatal and is raised here rather
    ///   than delivered.
    /// - When `callback` is `None` and an outcome is delivered.
    pub fn call_with(&self, args: Vec<Value>, callback: Option<Callback>) -> BoxFuture<'static, ()> {
        let callback = callback.unwrap_or_else(|| missing_callback(&self.name));
        deliver(self.invoke(args), callback)
    }
}

/// Routes the outcome of a dispatch attempt to `callback`.
///
/// Non-fatal dispatch errors reach the callback before this returns. A
/// fatal one panics instead of being delivered.
pub(crate) fn deliver(attempt: Result<PageFuture, ApiError>, callback: Callback) -> BoxFuture<'static, ()> {
    match attempt {
        Ok(pending) => Box::pin(async move { callback(pending.await) }),
        Err(err) if err.is_fatal() => panic!("{err}"),
        Err(err) => {
            callback(Err(err));
            Box::pin(async {})
        }
    }
}

/// The stand-in used when no callback was supplied for `name`.
pub(crate) fn missing_callback(name: &str) -> Callback {
    let name = name.to_string();
    Box::new(move |_| panic!("No callback function provided for {name} method"))
}
