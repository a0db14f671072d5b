use {
    pepper::{ConnectionConfig, PepperError},
    std::time::Duration,
};

#[test]
fn test_defaults() {
    let config = ConnectionConfig::default();
    assert_eq!(config.address(), "10.15.3.25:12345");
    assert_eq!(config.profile().id(), 4);
    assert_eq!(config.read_timeout(), Duration::from_secs(5));
    assert_eq!(config.connect_timeout(), Duration::from_secs(5));
}

#[test]
fn test_from_args() {
    let config = ConnectionConfig::from_args(["192.168.0.167", "12347", "3"]).unwrap();
    assert_eq!(config.host(), "192.168.0.167");
    assert_eq!(config.port(), 12347);
    assert_eq!(config.profile().id(), 3);
}

#[test]
fn test_from_args_partial() {
    let config = ConnectionConfig::from_args(["127.0.0.1"]).unwrap();
    assert_eq!(config.address(), "127.0.0.1:12345");
    assert_eq!(config.profile().id(), 4);

    let empty: [&str; 0] = [];
    assert_eq!(
        ConnectionConfig::from_args(empty).unwrap().address(),
        "10.15.3.25:12345"
    );
}

#[test]
fn test_from_args_rejects_unknown_profile() {
    let result = ConnectionConfig::from_args(["127.0.0.1", "12345", "9"]);
    assert!(matches!(result, Err(PepperError::UnsupportedProfile(9))));
}

#[test]
fn test_from_args_rejects_bad_port() {
    let result = ConnectionConfig::from_args(["127.0.0.1", "port"]);
    assert!(matches!(result, Err(PepperError::Config(_))));
}

#[test]
fn test_builder() {
    let config = ConnectionConfig::default()
        .with_host("robot.local")
        .with_port(9559)
        .with_read_timeout(Duration::from_millis(250));
    assert_eq!(config.address(), "robot.local:9559");
    assert_eq!(config.read_timeout(), Duration::from_millis(250));
}
