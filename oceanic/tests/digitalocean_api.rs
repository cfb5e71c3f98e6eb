//! Integration tests for the compiled DigitalOcean client.
//!
//! These tests drive the real resource definitions through a
//! `RecordingTransport` and verify:
//! - Required arguments are validated before anything is sent
//! - Item actions and per-item methods are bound to the item's identity
//! - Replies are wrapped and paginated without automatic traversal
//! - Transport failures reach the caller unmodified

use std::sync::{Arc, Mutex};

use oceanic::define::RestMethod;
use oceanic::error::{ApiError, ClientError, ValidationError};
use oceanic::transport::RecordingTransport;
use oceanic::{DigitalOcean, Page};
use serde_json::{Value, json};

/// Builds a client with a token and a fresh recording transport.
fn api() -> (DigitalOcean, RecordingTransport) {
    let transport = RecordingTransport::new();
    let api = DigitalOcean::builder()
        .token("test-token")
        .transport(transport.clone())
        .build()
        .expect("client should build");
    (api, transport)
}

fn body(transport: &RecordingTransport) -> Value {
    Value::Object(
        transport
            .last_request()
            .and_then(|r| r.params)
            .unwrap_or_default(),
    )
}

#[test]
fn missing_arguments_send_nothing() {
    let (api, transport) = api();

    let err = api.domains.invoke("create", Vec::new()).err().unwrap();

    match err {
        ApiError::Validation(ValidationError::MissingArguments { id, message }) => {
            assert_eq!(id, "error_name_ip_address");
            assert_eq!(
                message,
                r#"Missing argument(s): "name", "ip_address" for create method"#
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[test]
fn missing_arguments_reach_the_callback_once() {
    let (api, transport) = api();
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&outcomes);

    let _ = api.keys.method("update").unwrap().call_with(
        Vec::new(),
        Some(Box::new(move |result: Result<Page, ApiError>| {
            let err = result.err().unwrap();
            let ApiError::Validation(validation) = &err else {
                panic!("unexpected error: {err:?}");
            };
            sink.lock()
                .unwrap()
                .push(serde_json::to_value(validation.as_object().unwrap()).unwrap());
        })),
    );

    assert_eq!(
        *outcomes.lock().unwrap(),
        vec![json!({
            "id": "error_id_name",
            "message": "Missing argument(s): \"id\", \"name\" for update method"
        })]
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn list_wraps_items_and_exposes_the_next_page() {
    let (api, transport) = api();
    let next = "https://api.digitalocean.com/v2/droplets?page=2";
    transport.reply(json!({
        "droplets": [{"id": 1}, {"id": 2}],
        "links": {"pages": {"next": next}}
    }));
    transport.reply(json!({"droplets": [{"id": 3}]}));

    let page = api.droplets.list().await.unwrap();

    let ids: Vec<_> = page.items().iter().map(|d| d.get("id").cloned()).collect();
    assert_eq!(ids, vec![Some(json!(1)), Some(json!(2))]);
    assert_eq!(transport.requests().len(), 1);

    let cursor = page.next.as_ref().expect("a next page is advertised");
    let second = cursor.fetch().await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, RestMethod::Get);
    assert_eq!(request.url.as_str(), next);
    assert_eq!(second.items()[0].get("id"), Some(&json!(3)));
    assert!(second.items()[0].method("power_cycle").is_some());
    assert!(!second.has_next());
}

#[tokio::test]
async fn droplet_action_posts_identity_and_type() {
    let (api, transport) = api();
    transport.reply(json!({"droplet": {"id": 3164494, "name": "example.com"}}));

    let page = api.droplets.call("id", vec![json!(3164494)]).await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().url.as_str(),
        "https://api.digitalocean.com/v2/droplets/3164494"
    );

    let droplet = page.item().unwrap();
    droplet.call("powerCycle", Vec::new()).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, RestMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://api.digitalocean.com/v2/droplets/3164494/actions"
    );
    assert_eq!(body(&transport), json!({"id": 3164494, "type": "power_cycle"}));
}

#[tokio::test]
async fn droplet_action_layers_declared_params() {
    let (api, transport) = api();
    transport.reply(json!({"droplet": {"id": 7}}));
    let page = api.droplets.call("id", vec![json!(7)]).await.unwrap();

    page.item()
        .unwrap()
        .call("rename", vec![json!("renamed")])
        .await
        .unwrap();

    assert_eq!(
        body(&transport),
        json!({"id": 7, "type": "rename", "name": "renamed"})
    );
}

#[tokio::test]
async fn floating_ip_actions_use_the_ip() {
    let (api, transport) = api();
    transport.reply(json!({"floating_ip": {"ip": "45.55.96.47", "region": {"slug": "nyc3"}}}));

    let page = api
        .floating_ips
        .call("id", vec![json!("45.55.96.47")])
        .await
        .unwrap();
    let ip = page.item().unwrap();
    assert_eq!(ip.identity(), Some(&json!("45.55.96.47")));

    ip.call("assign", vec![json!(8)]).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(
        request.url.as_str(),
        "https://api.digitalocean.com/v2/floating_ips/45.55.96.47/actions"
    );
    assert_eq!(
        body(&transport),
        json!({"id": "45.55.96.47", "type": "assign", "droplet_id": 8})
    );
}

#[tokio::test]
async fn domain_records_nest_under_the_domain() {
    let (api, transport) = api();
    transport.reply(json!({"domain": {"name": "example.com", "ttl": 1800}}));

    let page = api.domains.call("fetch", vec![json!("example.com")]).await.unwrap();
    let domain = page.item().unwrap();

    transport.reply(json!({"domain_record": {"id": 3352896, "type": "A"}}));
    let created = domain.call("create", vec![json!("A")]).await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, RestMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://api.digitalocean.com/v2/domains/example.com/records"
    );
    assert_eq!(body(&transport), json!({"type": "A"}));
    assert_eq!(created.item().unwrap().noun(), "create");
}

#[tokio::test]
async fn per_item_methods_get_their_own_noun() {
    let (api, transport) = api();
    transport.reply(json!({"droplet": {"id": 9}}));
    let page = api.droplets.call("id", vec![json!(9)]).await.unwrap();

    transport.reply(json!({"snapshots": [{"id": 11, "min_disk_size": 20}]}));
    let snapshots = page.item().unwrap().call("snapshots", Vec::new()).await.unwrap();

    assert_eq!(
        transport.last_request().unwrap().url.as_str(),
        "https://api.digitalocean.com/v2/droplets/9/snapshots"
    );
    let snapshot = &snapshots.items()[0];
    assert_eq!(snapshot.noun(), "snapshots");
    assert_eq!(snapshot.get("minDiskSize"), Some(&json!(20)));
}

#[tokio::test]
async fn keys_live_under_account() {
    let (api, transport) = api();

    api.keys
        .call("create", vec![json!("laptop"), json!("ssh-ed25519 AAAA")])
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, RestMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://api.digitalocean.com/v2/account/keys"
    );
    assert_eq!(
        body(&transport),
        json!({"name": "laptop", "public_key": "ssh-ed25519 AAAA"})
    );
}

#[tokio::test]
async fn transport_failures_are_forwarded_verbatim() {
    let (api, transport) = api();
    let failure = json!({"id": "unauthorized", "message": "Unable to authenticate you."});
    transport.fail(401, failure.clone());

    let err = api.regions.list().await.unwrap_err();

    match err {
        ApiError::Client(ClientError::HttpStatus { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, failure);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_is_fatal_and_sends_nothing() {
    let transport = RecordingTransport::new();
    let api = DigitalOcean::builder()
        .transport(transport.clone())
        .build()
        .unwrap();

    let err = api.sizes.list().await.unwrap_err();

    assert!(err.is_fatal());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
#[should_panic(expected = "No callback function provided for id method")]
async fn missing_callback_panics_when_the_reply_arrives() {
    let (api, transport) = api();
    transport.reply(json!({"action": {"id": 36804636}}));

    api.actions
        .method("id")
        .unwrap()
        .call_with(vec![json!(36804636)], None)
        .await;
}

#[test]
#[should_panic(expected = "Token not found")]
fn missing_token_panics_in_callback_form() {
    let api = DigitalOcean::builder()
        .transport(RecordingTransport::new())
        .build()
        .unwrap();

    let _ = api
        .images
        .method("id")
        .unwrap()
        .call_with(vec![json!(1)], Some(Box::new(|_: Result<Page, ApiError>| {})));
}
