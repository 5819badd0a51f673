use bridge_config::AppConfig;

// 环境变量是进程级状态，两个场景放同一个用例里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("BRIDGE_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("BRIDGE_AUTO_START", "off");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert!(!config.auto_start);
    assert_eq!(config.certificate_path, None);
    assert!(!config.seed_demo_nodes);

    // 证书与私钥必须成对配置
    unsafe {
        std::env::set_var("BRIDGE_CERT_PATH", "/tmp/cert.der");
        std::env::remove_var("BRIDGE_KEY_PATH");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::set_var("BRIDGE_KEY_PATH", "/tmp/key.pem");
    }
    let config = AppConfig::from_env().expect("config with identity");
    assert_eq!(config.certificate_path.as_deref(), Some("/tmp/cert.der"));
    assert_eq!(config.private_key_path.as_deref(), Some("/tmp/key.pem"));
}
