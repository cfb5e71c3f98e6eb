//! Response processing and pagination.
//!
//! A success body is an envelope whose first key holds the payload:
//!
//! ```json
//! {
//!   "droplets": [{"id": 1}, {"id": 2}],
//!   "links": {"pages": {"next": "https://api.digitalocean.com/v2/droplets?page=2"}},
//!   "meta": {"total": 4}
//! }
//! ```
//!
//! An array payload becomes a sequence of [`Item`]s, anything else a single
//! one. A `links.pages.next` URL becomes a [`PageCursor`]. Nothing is fetched
//! until the caller asks for it.

use std::slice;
use std::sync::Arc;

use oceanic_define::{ItemSpec, RestMethod};
use serde_json::{Map, Value};
use tracing::trace;

use crate::dispatch::Dispatcher;
use crate::error::ApiError;
use crate::item::Item;
use crate::method::{Callback, PageFuture, deliver, missing_callback};
use crate::transport::BoxFuture;

/// What a reply carried.
#[derive(Debug, Clone)]
pub enum Payload {
    /// The payload key held a single object.
    One(Item),
    /// The payload key held an array.
    Many(Vec<Item>),
    /// The body was empty, not an object, or had no keys.
    Empty,
}

/// One processed reply.
#[derive(Debug, Clone)]
pub struct Page {
    /// The wrapped payload.
    pub payload: Payload,
    /// Continuation to the next page, if the server advertised one.
    pub next: Option<PageCursor>,
}

impl Page {
    /// The items of this page. A single item is a one-element slice.
    pub fn items(&self) -> &[Item] {
        match &self.payload {
            Payload::One(item) => slice::from_ref(item),
            Payload::Many(items) => items,
            Payload::Empty => &[],
        }
    }

    /// The single item, when the payload was one object.
    pub fn item(&self) -> Option<&Item> {
        match &self.payload {
            Payload::One(item) => Some(item),
            _ => None,
        }
    }

    /// Consumes the page, returning its items.
    pub fn into_items(self) -> Vec<Item> {
        match self.payload {
            Payload::One(item) => vec![item],
            Payload::Many(items) => items,
            Payload::Empty => Vec::new(),
        }
    }

    /// Returns `true` when another page can be fetched.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Turns this page into a caller-driven pager starting with this page.
    pub fn into_pages(self) -> Pages {
        Pages {
            state: PagerState::Ready(Box::new(self)),
        }
    }
}

/// Continuation to the next page of a collection.
///
/// Each fetch is a fresh, independent GET of the advertised URL; the cursor
/// can be fetched more than once.
#[derive(Debug, Clone)]
pub struct PageCursor {
    dispatcher: Dispatcher,
    noun: String,
    url: String,
    item_spec: Option<Arc<ItemSpec>>,
}

impl PageCursor {
    /// The next-page URL exactly as the server sent it.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Dispatches the next-page request.
    ///
    /// ## Errors
    ///
    /// Fails before dispatch when no token is set or the URL is invalid.
    pub fn request(&self) -> Result<PageFuture, ApiError> {
        dispatch_and_process(
            &self.dispatcher,
            RestMethod::Get,
            &self.url,
            Map::new(),
            self.noun.clone(),
            self.item_spec.clone(),
        )
    }

    /// Fetches the next page, processed with the same noun and item spec as
    /// the page it came from.
    pub fn fetch(&self) -> PageFuture {
        match self.request() {
            Ok(pending) => pending,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }

    /// Callback form of [`fetch`](Self::fetch), with the same contract as
    /// [`CompiledMethod::call_with`](crate::method::CompiledMethod::call_with).
    ///
    /// ## Panics
    ///
    /// - When no token is set.
    /// - When `callback` is `None` and an outcome is delivered.
    pub fn fetch_with(&self, callback: Option<Callback>) -> BoxFuture<'static, ()> {
        let callback = callback.unwrap_or_else(|| missing_callback("next"));
        deliver(self.request(), callback)
    }
}

/// A caller-driven sequence of pages.
///
/// Each call to [`next`](Self::next) yields one page; the first call yields
/// the page the pager was built from without any request, and every later
/// call fetches exactly one more page. The sequence ends after the last page
/// or after the first error.
///
/// ## Examples
///
/// ```rust,ignore
/// let mut pages = client.droplets.list().await?.into_pages();
/// while let Some(page) = pages.next().await {
///     for droplet in page?.items() {
///         println!("{}", droplet.get("name").unwrap_or_default());
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Pages {
    state: PagerState,
}

#[derive(Debug)]
enum PagerState {
    Ready(Box<Page>),
    Pending(PageCursor),
    Done,
}

impl Pages {
    /// Yields the next page, fetching it if needed.
    pub async fn next(&mut self) -> Option<Result<Page, ApiError>> {
        let page = match std::mem::replace(&mut self.state, PagerState::Done) {
            PagerState::Done => return None,
            PagerState::Ready(page) => *page,
            PagerState::Pending(cursor) => match cursor.fetch().await {
                Ok(page) => page,
                Err(err) => return Some(Err(err)),
            },
        };

        if let Some(cursor) = &page.next {
            self.state = PagerState::Pending(cursor.clone());
        }
        Some(Ok(page))
    }

    /// Returns `true` once the last page has been yielded.
    pub fn is_done(&self) -> bool {
        matches!(self.state, PagerState::Done)
    }
}

/// Interprets `body` as a reply for `noun`.
///
/// Every produced item is decorated with `item_spec`.
pub fn process(
    dispatcher: &Dispatcher,
    noun: &str,
    body: Value,
    item_spec: Option<Arc<ItemSpec>>,
) -> Page {
    let next = body
        .pointer("/links/pages/next")
        .and_then(Value::as_str)
        .map(|url| PageCursor {
            dispatcher: dispatcher.clone(),
            noun: noun.to_string(),
            url: url.to_string(),
            item_spec: item_spec.clone(),
        });

    let payload = match body {
        Value::Object(map) => match map.into_iter().next() {
            Some((_, Value::Array(elements))) => Payload::Many(
                elements
                    .into_iter()
                    .map(|data| Item::new(dispatcher, noun, data, item_spec.clone()))
                    .collect(),
            ),
            Some((_, data)) => Payload::One(Item::new(dispatcher, noun, data, item_spec)),
            None => Payload::Empty,
        },
        _ => Payload::Empty,
    };

    trace!(
        noun,
        items = match &payload {
            Payload::One(_) => 1,
            Payload::Many(items) => items.len(),
            Payload::Empty => 0,
        },
        has_next = next.is_some(),
        "processed reply"
    );

    Page { payload, next }
}

/// Sends a request and processes its reply for `noun`.
pub(crate) fn dispatch_and_process(
    dispatcher: &Dispatcher,
    method: RestMethod,
    path: &str,
    params: Map<String, Value>,
    noun: String,
    item_spec: Option<Arc<ItemSpec>>,
) -> Result<PageFuture, ApiError> {
    let reply = dispatcher.send(method, path, params)?;
    let dispatcher = dispatcher.clone();
    Ok(Box::pin(async move {
        let body = reply.await?;
        Ok(process(&dispatcher, &noun, body, item_spec))
    }))
}

/// Joins path segments with `/`, skipping empty ones.
pub(crate) fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
