//! 轮询调度器。
//!
//! 单个长驻任务按固定节拍遍历注册表的节点快照：逐节点读数据源、
//! 套量程换算、把结果落到协议地址空间。节点粒度故障隔离 ——
//! 任何一个节点读失败只记日志与计数，不影响同一 tick 的其他节点。
//!
//! 量程配置从定义存储取，带本地缓存，每隔固定 tick 数刷新一次，
//! 避免每个节拍都打存储。

use bridge_registry::NodeRegistry;
use bridge_storage::NodeDefinitionStore;
use domain::{ScalarValue, ScalingSpec};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 量程缓存刷新周期（以 tick 计）。
const SPEC_REFRESH_TICKS: u64 = 30;

/// 轮询参数。
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// 节拍间隔。
    pub interval: Duration,
    /// 量程缓存刷新周期（tick 数，0 按 1 处理）。
    pub spec_refresh_ticks: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            spec_refresh_ticks: SPEC_REFRESH_TICKS,
        }
    }
}

impl PollerConfig {
    pub fn with_interval_ms(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            ..Self::default()
        }
    }
}

/// 轮询调度器。
///
/// `spawn` 后由 `request_stop` 协作式退出：运行标志翻转后，
/// 任务在当前 tick 结束时退出，绝不打断进行中的节点处理。
pub struct Poller {
    registry: Arc<NodeRegistry>,
    definitions: Arc<dyn NodeDefinitionStore>,
    config: PollerConfig,
    running: AtomicBool,
}

impl Poller {
    pub fn new(
        registry: Arc<NodeRegistry>,
        definitions: Arc<dyn NodeDefinitionStore>,
        config: PollerConfig,
    ) -> Self {
        Self {
            registry,
            definitions,
            config,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 请求退出；任务在下一次节拍检查时结束。
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// 启动轮询任务。重复调用只返回新的空任务，不会起第二个循环。
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!(target: "bridge.scheduler", "poller already running, ignoring spawn");
            return tokio::spawn(async {});
        }
        let poller = self.clone();
        tokio::spawn(async move {
            poller.run().await;
        })
    }

    async fn run(&self) {
        debug!(
            target: "bridge.scheduler",
            "poller started, interval {:?}", self.config.interval
        );
        let refresh_every = self.config.spec_refresh_ticks.max(1);
        let mut specs: HashMap<String, ScalingSpec> = HashMap::new();
        let mut tick: u64 = 0;
        while self.running.load(Ordering::SeqCst) {
            if tick % refresh_every == 0 {
                self.refresh_specs(&mut specs).await;
            }
            tick = tick.wrapping_add(1);
            self.poll_once(&specs).await;
            tokio::time::sleep(self.config.interval).await;
        }
        debug!(target: "bridge.scheduler", "poller stopped after {} ticks", tick);
    }

    /// 遍历当前节点快照一轮。快照在 tick 开始处取一次，
    /// 轮中途增删的节点从下一个 tick 生效。
    async fn poll_once(&self, specs: &HashMap<String, ScalingSpec>) {
        bridge_telemetry::record_poll_tick();
        let targets = self.registry.poll_targets().await;
        for target in targets {
            let raw = match target.source.read().await {
                Ok(raw) => raw,
                Err(err) => {
                    bridge_telemetry::record_read_failure();
                    warn!(
                        target: "bridge.scheduler",
                        "read failed for {}: {}", target.node_id, err
                    );
                    continue;
                }
            };
            let value = raw.as_ref().map(|raw| scaled_value(&target.node_id, specs, raw));
            if value.is_some() {
                bridge_telemetry::record_value_published();
            }
            match self.registry.apply_sample(&target.node_id, raw, value).await {
                Ok(()) => {}
                Err(bridge_registry::RegistryError::UnknownNode(_)) => {
                    // 快照与落值之间被移除，正常竞态
                    debug!(
                        target: "bridge.scheduler",
                        "node {} removed mid-tick, skipping", target.node_id
                    );
                }
                Err(err) => {
                    warn!(
                        target: "bridge.scheduler",
                        "publish failed for {}: {}", target.node_id, err
                    );
                }
            }
        }
    }

    async fn refresh_specs(&self, specs: &mut HashMap<String, ScalingSpec>) {
        match self.definitions.list_enabled().await {
            Ok(definitions) => {
                specs.clear();
                for definition in definitions {
                    if let Some(spec) = definition.scaling {
                        specs.insert(definition.node_id, spec);
                    }
                }
            }
            Err(err) => {
                // 刷新失败沿用旧缓存
                warn!(target: "bridge.scheduler", "scaling spec refresh failed: {}", err);
            }
        }
    }
}

/// 数值读数套量程换算；非数值读数原样透传。
fn scaled_value(node_id: &str, specs: &HashMap<String, ScalingSpec>, raw: &ScalarValue) -> ScalarValue {
    let Some(spec) = specs.get(node_id) else {
        return raw.clone();
    };
    match raw.as_f64() {
        Some(numeric) => ScalarValue::Float(bridge_scaling::apply_spec(node_id, spec, numeric)),
        None => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_raw_bypasses_scaling() {
        let mut specs = HashMap::new();
        specs.insert(
            "n".to_string(),
            ScalingSpec {
                enabled: true,
                raw_min: "0".to_string(),
                raw_max: "100".to_string(),
                eng_min: "0".to_string(),
                eng_max: "10".to_string(),
                unit: None,
            },
        );
        let raw = ScalarValue::Text("offline".to_string());
        assert_eq!(scaled_value("n", &specs, &raw), raw);
    }

    #[test]
    fn numeric_raw_is_scaled() {
        let mut specs = HashMap::new();
        specs.insert(
            "n".to_string(),
            ScalingSpec {
                enabled: true,
                raw_min: "0".to_string(),
                raw_max: "100".to_string(),
                eng_min: "0".to_string(),
                eng_max: "10".to_string(),
                unit: None,
            },
        );
        assert_eq!(
            scaled_value("n", &specs, &ScalarValue::Float(50.0)),
            ScalarValue::Float(5.0)
        );
    }

    #[test]
    fn missing_spec_passes_raw_through() {
        let specs = HashMap::new();
        assert_eq!(
            scaled_value("n", &specs, &ScalarValue::Int(7)),
            ScalarValue::Int(7)
        );
    }
}
