//! Items: immutable snapshots of one resource instance with bound methods.

use std::sync::Arc;

use oceanic_define::{ItemSpec, MethodSpec};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::decorate::{MethodTable, define_method, define_property};
use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ConfigError};
use crate::method::{CompiledMethod, PageFuture, Resolver};
use crate::naming::camel_case;
use crate::process::{dispatch_and_process, join_path};
use crate::template::resolve;

/// Field that identifies most resources.
const ID_FIELD: &str = "id";
/// Identity of resources without an `id`, such as floating IPs.
const ALT_ID_FIELD: &str = "ip";
/// Field naming the parent of nested records.
const NAME_FIELD: &str = "name";

/// One resource instance as received.
///
/// Field names are normalized at every depth. Methods compiled from the
/// owning endpoint's item spec are bound to this instance's identity, so
/// callers never pass the `id` (or `ip`) themselves.
#[derive(Debug, Clone)]
pub struct Item {
    noun: String,
    fields: Map<String, Value>,
    methods: MethodTable,
}

impl Item {
    /// Wraps `data` as an item of `noun`, decorated with `spec`.
    ///
    /// Non-object data produces an item without fields.
    pub fn new(
        dispatcher: &Dispatcher,
        noun: &str,
        data: Value,
        spec: Option<Arc<ItemSpec>>,
    ) -> Self {
        let mut fields = Map::new();
        if let Value::Object(raw) = data {
            for (key, value) in raw {
                define_property(&mut fields, &key, value);
            }
        }

        let mut item = Self {
            noun: noun.to_string(),
            fields,
            methods: MethodTable::default(),
        };
        if let Some(spec) = spec {
            item.methods = item.compile(dispatcher, &spec);
        }
        item
    }

    /// Binds the spec's methods to this item.
    ///
    /// Per-item methods and actions need an identity and records need a
    /// parent name; without one they are not bound at all, so calling them
    /// reports an unknown method instead of targeting an empty path segment.
    fn compile(&self, dispatcher: &Dispatcher, spec: &ItemSpec) -> MethodTable {
        let mut table = MethodTable::default();

        if let Some(id) = self.identity() {
            for (key, declared) in &spec.methods {
                let base = MethodSpec::new()
                    .endpoint(format!("{{id}}/{key}"))
                    .fixed(ID_FIELD, id.clone());
                let compiled = declared.overlay(base);
                let resolver = self.resolver(dispatcher, key, &compiled, false);
                define_method(&mut table, key, compiled, resolver);
            }

            for (key, declared) in &spec.actions {
                let base = MethodSpec::post()
                    .endpoint("{id}/actions")
                    .fixed(ID_FIELD, id.clone())
                    .fixed("type", key.to_lowercase());
                let compiled = declared.overlay(base);
                let resolver = self.resolver(dispatcher, key, &compiled, true);
                define_method(&mut table, key, compiled, resolver);
            }
        } else if !(spec.methods.is_empty() && spec.actions.is_empty()) {
            debug!(noun = %self.noun, "item has no identity, skipping per-item methods");
        }

        if let Some(name) = self.fields.get(NAME_FIELD).filter(|name| !name.is_null()) {
            for (key, declared) in &spec.records {
                let endpoint = join_path(["{name}/records", declared.endpoint_or("")]);
                let base = MethodSpec::new()
                    .endpoint(endpoint)
                    .fixed(NAME_FIELD, name.clone());
                let mut declared = declared.clone();
                declared.endpoint = None;
                let compiled = declared.overlay(base);
                let resolver = self.resolver(dispatcher, key, &compiled, false);
                define_method(&mut table, key, compiled, resolver);
            }
        }

        table
    }

    /// Builds the resolver of an item method. Replies are processed with the
    /// method's name as their noun and no further decoration.
    fn resolver(
        &self,
        dispatcher: &Dispatcher,
        key: &str,
        spec: &MethodSpec,
        preserve: bool,
    ) -> Resolver {
        let dispatcher = dispatcher.clone();
        let noun = self.noun.clone();
        let reply_noun = key.to_string();
        let method = spec.http_method();
        let endpoint = spec.endpoint_or("").to_string();

        Arc::new(move |mut params: Map<String, Value>| {
            let resolved = resolve(&endpoint, &mut params, preserve);
            let path = join_path([noun.as_str(), resolved.as_str()]);
            dispatch_and_process(&dispatcher, method, &path, params, reply_noun.clone(), None)
        })
    }

    /// The collection noun this item came from.
    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// All normalized fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a field; `key` is normalized first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(&camel_case(key, false))
    }

    /// The identifying value: `id`, or `ip` for resources without one.
    pub fn identity(&self) -> Option<&Value> {
        self.fields
            .get(ID_FIELD)
            .filter(|value| !value.is_null())
            .or_else(|| self.fields.get(ALT_ID_FIELD))
    }

    /// Looks up a bound method by raw or normalized name.
    pub fn method(&self, name: &str) -> Option<&CompiledMethod> {
        self.methods.get(name)
    }

    /// Normalized names of the bound methods.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.names()
    }

    /// Validates and dispatches a bound method.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::UnknownMethod`] for an unbound name, or any
    /// error of [`CompiledMethod::invoke`].
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<PageFuture, ApiError> {
        self.method(name)
            .ok_or_else(|| ConfigError::unknown_method(&self.noun, name))?
            .invoke(args)
    }

    /// Calls a bound method, awaiting its reply.
    pub fn call(&self, name: &str, args: Vec<Value>) -> PageFuture {
        match self.invoke(name, args) {
            Ok(pending) => pending,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
