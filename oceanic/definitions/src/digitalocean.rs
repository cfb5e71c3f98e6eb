//! DigitalOcean API v2 definition.
//!
//! Each resource is exposed as its own function so a client root can build
//! typed fields from them; [`define_digitalocean_api`] bundles them all.

use oceanic_define::{ApiDefinition, ItemSpec, MethodSpec, ResourceSpec};

/// Base URL of the DigitalOcean API v2.
pub const BASE_URL: &str = "https://api.digitalocean.com/v2/";

/// Environment variables checked, in order, for the bearer token.
pub const ENV_AUTH: [&str; 2] = ["DIGITALOCEAN_TOKEN", "DIGITALOCEAN_ACCESS_TOKEN"];

/// Creates the DigitalOcean API definition.
///
/// ## Resources
///
/// - `actions`, `domains`, `regions`, `sizes`, `droplets`, `images`,
///   `keys` (noun `account/keys`), `floating_ips`
///
/// ## Examples
///
/// ```rust
/// use oceanic_definitions::digitalocean::define_digitalocean_api;
///
/// let api = define_digitalocean_api();
/// let keys = api.resource("keys").unwrap();
/// assert_eq!(keys.noun, "account/keys");
/// ```
pub fn define_digitalocean_api() -> ApiDefinition {
    ApiDefinition {
        name: "DigitalOcean".to_string(),
        description: "DigitalOcean API v2".to_string(),
        base_url: BASE_URL.to_string(),
        docs_url: Some("https://docs.digitalocean.com/reference/api/".to_string()),
        env_auth: ENV_AUTH.iter().map(|v| v.to_string()).collect(),
        resources: vec![
            actions(),
            domains(),
            regions(),
            sizes(),
            droplets(),
            images(),
            keys(),
            floating_ips(),
        ],
    }
}

/// Looks up a single resource by id. Items carry no methods.
pub fn actions() -> ResourceSpec {
    ResourceSpec::new("actions").method("id", by_id())
}

/// Domains, with DNS records nested under each domain item.
pub fn domains() -> ResourceSpec {
    ResourceSpec::new("domains")
        .method(
            "create",
            MethodSpec::post()
                .endpoint("")
                .required("name")
                .required("ip_address"),
        )
        .method("fetch", MethodSpec::get().endpoint("{name}").required("name"))
        .method(
            "destroy",
            MethodSpec::delete().endpoint("{name}").required("name"),
        )
        .item(
            ItemSpec::new()
                .record("list", MethodSpec::new())
                .record("id", by_id())
                .record("create", MethodSpec::post().required("type"))
                .record("fetch", by_id())
                .record("destroy", MethodSpec::delete().endpoint("{id}").required("id")),
        )
}

/// Regions, list only.
pub fn regions() -> ResourceSpec {
    ResourceSpec::new("regions")
}

/// Sizes, list only.
pub fn sizes() -> ResourceSpec {
    ResourceSpec::new("sizes")
}

/// Droplets and their power, image and networking actions.
pub fn droplets() -> ResourceSpec {
    let item = ItemSpec::new()
        .method("kernels", MethodSpec::new())
        .method("snapshots", MethodSpec::new())
        .method("backups", MethodSpec::new())
        .method("actions", MethodSpec::new())
        .method("destroy", MethodSpec::delete().endpoint("{id}"))
        .action("reboot", MethodSpec::new())
        .action("power_cycle", MethodSpec::new())
        .action("shutdown", MethodSpec::new())
        .action("power_on", MethodSpec::new())
        .action("power_off", MethodSpec::new())
        .action("password_reset", MethodSpec::new())
        .action("resize", MethodSpec::new().required("size"))
        .action("restore", MethodSpec::new().required("image"))
        .action("rebuild", MethodSpec::new().required("image"))
        .action("rename", MethodSpec::new().required("name"))
        .action("change_kernel", MethodSpec::new().required("kernel"))
        .action("enable_IPv6", MethodSpec::new())
        .action("disable_backups", MethodSpec::new())
        .action("enable_private_networking", MethodSpec::new());

    ResourceSpec::new("droplets").method("id", by_id()).item(item)
}

/// Images and their update, transfer and destroy actions.
pub fn images() -> ResourceSpec {
    ResourceSpec::new("images").method("id", by_id()).item(
        ItemSpec::new()
            .action("update", MethodSpec::put().endpoint("{id}").required("name"))
            .action("transfer", MethodSpec::post().required("region"))
            .action("destroy", MethodSpec::delete().endpoint("{id}")),
    )
}

/// SSH keys of the account.
pub fn keys() -> ResourceSpec {
    ResourceSpec::with_noun("keys", "account/keys")
        .method("id", by_id())
        .method(
            "create",
            MethodSpec::post()
                .endpoint("")
                .required("name")
                .required("public_key"),
        )
        .method(
            "update",
            MethodSpec::put()
                .endpoint("{id}")
                .required("id")
                .required("name"),
        )
        .method("destroy", MethodSpec::delete().endpoint("{id}").required("id"))
}

/// Floating IPs. Items have no `id`; their identity is the `ip` field.
pub fn floating_ips() -> ResourceSpec {
    ResourceSpec::new("floating_ips")
        .method("id", MethodSpec::get().endpoint("{ip}").required("ip"))
        .method(
            "create_for_droplet",
            MethodSpec::post().endpoint("").required("droplet_id"),
        )
        .method(
            "create_for_region",
            MethodSpec::post().endpoint("").required("region"),
        )
        .method("destroy", MethodSpec::delete().endpoint("{ip}").required("ip"))
        .item(
            ItemSpec::new()
                .action("assign", MethodSpec::new().required("droplet_id"))
                .action("unassign", MethodSpec::new()),
        )
}

fn by_id() -> MethodSpec {
    MethodSpec::get().endpoint("{id}").required("id")
}
