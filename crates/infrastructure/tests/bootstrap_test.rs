mod helpers;

use helpers::{name, Hierarchy};
use ndns_application::ports::NameResolver;
use ndns_domain::RecordType;
use ndns_infrastructure::bootstrap::{init_logging, load_config};
use ndns_infrastructure::ndns::NdnsResolverBuilder;

#[test]
fn test_load_config_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config.trust.chain_limit, 10);
    assert_eq!(config.query.interest_lifetime_ms, 4000);
}

#[test]
fn test_load_config_missing_file() {
    assert!(load_config(Some("/nonexistent/ndns.toml")).is_err());
}

#[test]
fn test_init_logging_twice() {
    let config = load_config(None).unwrap();
    init_logging(&config.logging);
    init_logging(&config.logging);
}

#[tokio::test]
async fn test_resolver_from_config_file() {
    let hierarchy = Hierarchy::new();
    let anchor = hierarchy.anchor();
    let path = std::env::temp_dir().join(format!("ndns-bootstrap-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        format!(
            r#"
            [trust]
            chain_limit = 5

            [[trust.anchors]]
            key_name = "{}"
            public_key = "{}"

            [query]
            interest_lifetime_ms = 500
            "#,
            anchor.key_name,
            anchor.public_key.to_base64()
        ),
    )
    .unwrap();

    let config = load_config(path.to_str()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.trust.chain_limit, 5);

    let resolver = NdnsResolverBuilder::new(hierarchy.transport.clone())
        .with_config(config)
        .build()
        .unwrap();
    let resolution = resolver
        .resolve(&name("/ndn/edu/ucla/www"), RecordType::TXT)
        .await
        .unwrap();
    assert!(resolution.answer.is_some());
}
