//! 协议节点标识解析。

use bridge_protocol::NodeId;
use tracing::warn;

/// 解析节点标识字符串。
///
/// 形如 `ns=2;s=MyNode` 的串按结构化标识解析；否则视为注册命名空间
/// 内的不透明字符串。解析失败同样回退到注册命名空间并告警，
/// 永远不硬失败。
pub fn parse_node_id(raw: &str, local_namespace: u16) -> NodeId {
    if raw.contains(';') && raw.contains('=') {
        match parse_structured(raw) {
            Ok(node_id) => return node_id,
            Err(reason) => {
                warn!(
                    target: "bridge.registry",
                    "failed to parse node id '{}' ({}), falling back to local identifier", raw, reason
                );
            }
        }
    }
    NodeId::Structured {
        namespace: local_namespace,
        identifier: raw.to_string(),
    }
}

fn parse_structured(raw: &str) -> Result<NodeId, String> {
    let mut namespace: Option<u16> = None;
    let mut identifier: Option<String> = None;
    for part in raw.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            return Err(format!("malformed segment '{}'", part));
        };
        match key.trim() {
            "ns" => {
                namespace = Some(
                    value
                        .trim()
                        .parse::<u16>()
                        .map_err(|_| format!("invalid namespace index '{}'", value))?,
                );
            }
            "s" | "i" => {
                if value.is_empty() {
                    return Err("empty identifier".to_string());
                }
                identifier = Some(value.to_string());
            }
            other => return Err(format!("unsupported segment key '{}'", other)),
        }
    }
    match (namespace, identifier) {
        (Some(namespace), Some(identifier)) => Ok(NodeId::Structured { namespace, identifier }),
        _ => Err("missing ns= or s= segment".to_string()),
    }
}
