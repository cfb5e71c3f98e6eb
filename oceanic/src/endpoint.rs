//! Endpoints: one REST collection with its compiled methods.

use std::sync::Arc;

use oceanic_define::{ItemSpec, MethodSpec, ResourceSpec, RestMethod};
use serde_json::{Map, Value};

use crate::decorate::{MethodTable, define_method};
use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ConfigError};
use crate::method::{Callback, CompiledMethod, PageFuture, Resolver, deliver, missing_callback};
use crate::process::{dispatch_and_process, join_path};
use crate::template::resolve;
use crate::transport::BoxFuture;

/// Name of the built-in collection listing.
const LIST: &str = "list";

/// A REST collection such as `droplets`.
///
/// Every declared method is compiled once, when the endpoint is built.
/// Replies are processed with the collection's noun, and every item they
/// yield is decorated with the resource's item spec.
#[derive(Debug, Clone)]
pub struct Endpoint {
    name: String,
    noun: String,
    methods: MethodTable,
    item_spec: Option<Arc<ItemSpec>>,
    dispatcher: Dispatcher,
}

impl Endpoint {
    /// Compiles `resource` against `dispatcher`.
    pub fn new(resource: &ResourceSpec, dispatcher: Dispatcher) -> Self {
        let item_spec = resource.item.clone().map(Arc::new);
        let mut methods = MethodTable::default();

        for (key, spec) in &resource.methods {
            let resolver = collection_resolver(
                &dispatcher,
                &resource.noun,
                key,
                spec,
                item_spec.clone(),
            );
            define_method(&mut methods, key, spec.clone(), resolver);
        }

        Self {
            name: resource.name.clone(),
            noun: resource.noun.clone(),
            methods,
            item_spec,
            dispatcher,
        }
    }

    /// Accessor name on the client root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// REST path segment of the collection.
    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// The spec every yielded item is decorated with.
    pub fn item_spec(&self) -> Option<&ItemSpec> {
        self.item_spec.as_deref()
    }

    /// Looks up a compiled method by raw or normalized name.
    pub fn method(&self, name: &str) -> Option<&CompiledMethod> {
        self.methods.get(name)
    }

    /// Normalized names of the compiled methods. The built-in `list` only
    /// appears when a method of that name was declared.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.names()
    }

    /// Dispatches the collection listing.
    ///
    /// A declared `list` method is used when there is one; otherwise this
    /// is a plain GET of the collection.
    ///
    /// ## Errors
    ///
    /// Fails before dispatch when no token is set, or when a declared `list`
    /// requires arguments.
    pub fn request_list(&self) -> Result<PageFuture, ApiError> {
        if let Some(method) = self.method(LIST) {
            return method.invoke(Vec::new());
        }
        dispatch_and_process(
            &self.dispatcher,
            RestMethod::Get,
            &self.noun,
            Map::new(),
            self.noun.clone(),
            self.item_spec.clone(),
        )
    }

    /// Lists the collection's first page. No parameters are taken.
    pub fn list(&self) -> PageFuture {
        match self.request_list() {
            Ok(pending) => pending,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }

    /// Callback form of [`list`](Self::list), with the same contract as
    /// [`CompiledMethod::call_with`].
    ///
    /// ## Panics
    ///
    /// - When no token is set.
    /// - When `callback` is `None` and an outcome is delivered.
    pub fn list_with(&self, callback: Option<Callback>) -> BoxFuture<'static, ()> {
        let callback = callback.unwrap_or_else(|| missing_callback(LIST));
        deliver(self.request_list(), callback)
    }

    /// Validates and dispatches a compiled method. An undeclared `list`
    /// falls back to the plain collection GET.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::UnknownMethod`] for an undeclared name, or any
    /// error of [`CompiledMethod::invoke`].
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<PageFuture, ApiError> {
        match self.method(name) {
            Some(method) => method.invoke(args),
            None if name == LIST => self.request_list(),
            None => Err(ConfigError::unknown_method(&self.name, name).into()),
        }
    }

    /// Calls a compiled method, awaiting its reply.
    pub fn call(&self, name: &str, args: Vec<Value>) -> PageFuture {
        match self.invoke(name, args) {
            Ok(pending) => pending,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }
}

/// Builds the resolver of a collection method.
///
/// The path is the resolved noun joined with the resolved endpoint template;
/// the template defaults to the method's own name.
fn collection_resolver(
    dispatcher: &Dispatcher,
    noun: &str,
    key: &str,
    spec: &MethodSpec,
    item_spec: Option<Arc<ItemSpec>>,
) -> Resolver {
    let dispatcher = dispatcher.clone();
    let noun = noun.to_string();
    let method = spec.http_method();
    let endpoint = spec.endpoint_or(key).to_string();

    Arc::new(move |mut params: Map<String, Value>| {
        let resolved_noun = resolve(&noun, &mut params, false);
        let resolved = resolve(&endpoint, &mut params, false);
        let path = join_path([resolved_noun.as_str(), resolved.as_str()]);
        dispatch_and_process(
            &dispatcher,
            method,
            &path,
            params,
            noun.clone(),
            item_spec.clone(),
        )
    })
}
