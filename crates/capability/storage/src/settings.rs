//! 服务器设置键名与默认值。
//!
//! 设置以字符串键值对持久化；缺省时使用这里的默认值。
//! `opcua_username` / `opcua_password` 为专用共享凭据对，默认不配置。

pub const SERVER_NAME: &str = "server_name";
pub const PORT: &str = "port";
pub const NAMESPACE_URI: &str = "namespace_uri";
pub const APPLICATION_URI: &str = "application_uri";
pub const POLLING_RATE: &str = "polling_rate";
pub const ALLOW_ANONYMOUS: &str = "allow_anonymous";
pub const OPCUA_USERNAME: &str = "opcua_username";
pub const OPCUA_PASSWORD: &str = "opcua_password";

/// 返回指定设置键的默认值（无默认值的键返回 None）。
pub fn default_for(key: &str) -> Option<&'static str> {
    match key {
        SERVER_NAME => Some("Sensor Bridge OPC UA Server"),
        PORT => Some("4840"),
        NAMESPACE_URI => Some("http://sensor.bridge.server"),
        APPLICATION_URI => Some("urn:sensor:bridge:server"),
        POLLING_RATE => Some("1000"),
        ALLOW_ANONYMOUS => Some("false"),
        _ => None,
    }
}

/// 带默认值读取：设置缺失时回退默认，再缺失时返回给定回退值。
pub fn value_or_default(map: &std::collections::HashMap<String, String>, key: &str, fallback: &str) -> String {
    map.get(key)
        .cloned()
        .or_else(|| default_for(key).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}
