//! 模拟数据源：random / sine / incremental 三种模式。

use crate::params::{get_f64, get_str};
use crate::{DataSource, SourceError, SourceKind};
use async_trait::async_trait;
use domain::ScalarValue;
use rand::Rng;
use serde_json::{Map, Value};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

/// 模拟模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    Random,
    Sine,
    Incremental,
}

impl SimMode {
    fn parse(raw: &str) -> Self {
        match raw {
            "sine" => Self::Sine,
            "incremental" => Self::Incremental,
            _ => Self::Random,
        }
    }
}

/// 模拟数据源。
///
/// 读取永远成功；写入为 no-op（记录日志后忽略）。
pub struct SimulationSource {
    name: String,
    mode: SimMode,
    min: f64,
    max: f64,
    step: f64,
    current: Mutex<f64>,
    started: Instant,
}

impl SimulationSource {
    pub fn new(name: &str, params: &Map<String, Value>) -> Self {
        let min = get_f64(params, "min", 0.0);
        Self {
            name: name.to_string(),
            mode: SimMode::parse(get_str(params, "sim_type", "random")),
            min,
            max: get_f64(params, "max", 100.0),
            step: get_f64(params, "step", 1.0),
            current: Mutex::new(min),
            started: Instant::now(),
        }
    }

    fn next_value(&self) -> f64 {
        match self.mode {
            SimMode::Random => {
                let span = self.max - self.min;
                self.min + rand::thread_rng().r#gen::<f64>() * span
            }
            SimMode::Sine => {
                // 相位取自数据源创建以来的墙钟时间
                let elapsed = self.started.elapsed().as_secs_f64();
                let amplitude = (self.max - self.min) / 2.0;
                let center = self.min + amplitude;
                center + amplitude * elapsed.sin()
            }
            SimMode::Incremental => {
                let mut current = match self.current.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                *current += self.step;
                if *current > self.max {
                    // 越过上限后按溢出量回绕到下限之上
                    *current = self.min + (*current - self.max);
                }
                *current
            }
        }
    }
}

#[async_trait]
impl DataSource for SimulationSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Simulation
    }

    async fn read(&self) -> Result<Option<ScalarValue>, SourceError> {
        Ok(Some(ScalarValue::Float(self.next_value())))
    }

    async fn write(&self, _value: &ScalarValue) -> Result<(), SourceError> {
        info!(target: "bridge.source", "simulation source {} is read-only, write ignored", self.name);
        Ok(())
    }

    fn last_error(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(entries: Value) -> Map<String, Value> {
        entries.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn incremental_wraps_by_rebasing() {
        let source = SimulationSource::new(
            "inc",
            &params(json!({"sim_type": "incremental", "min": 0.0, "max": 10.0, "step": 3.0})),
        );
        let mut seen = Vec::new();
        for _ in 0..6 {
            match source.read().await.expect("read") {
                Some(ScalarValue::Float(v)) => seen.push(v),
                other => panic!("unexpected value: {:?}", other),
            }
        }
        assert_eq!(seen, vec![3.0, 6.0, 9.0, 2.0, 5.0, 8.0]);
    }

    #[tokio::test]
    async fn random_stays_within_bounds() {
        let source = SimulationSource::new(
            "rnd",
            &params(json!({"sim_type": "random", "min": 5.0, "max": 6.0})),
        );
        for _ in 0..50 {
            let value = source.read().await.expect("read").expect("value");
            let v = value.as_f64().expect("f64");
            assert!((5.0..=6.0).contains(&v), "out of range: {}", v);
        }
    }

    #[tokio::test]
    async fn sine_stays_within_bounds() {
        let source = SimulationSource::new(
            "sin",
            &params(json!({"sim_type": "sine", "min": -1.0, "max": 1.0})),
        );
        let value = source.read().await.expect("read").expect("value");
        let v = value.as_f64().expect("f64");
        assert!((-1.0..=1.0).contains(&v));
    }

    #[tokio::test]
    async fn write_is_ignored() {
        let source = SimulationSource::new("sim", &Map::new());
        source
            .write(&ScalarValue::Float(42.0))
            .await
            .expect("no-op write");
        assert!(source.last_error().is_none());
    }
}
