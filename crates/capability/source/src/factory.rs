//! 数据源工厂：按 source_kind 分发构造具体变体。

use crate::hal::HardwareCatalog;
use crate::{
    AnalogSource, DataSource, GpioSource, ManualSource, SimulationSource, SourceError, SourceKind,
};
use domain::NodeDefinition;
use std::sync::Arc;

/// 数据源工厂。
///
/// 未知类别是硬构造失败（[`SourceError::UnknownKind`]），
/// 永远不静默降级。
pub struct SourceFactory {
    catalog: Arc<dyn HardwareCatalog>,
}

impl SourceFactory {
    pub fn new(catalog: Arc<dyn HardwareCatalog>) -> Self {
        Self { catalog }
    }

    /// 按定义构造数据源实例。
    pub fn create(&self, definition: &NodeDefinition) -> Result<Arc<dyn DataSource>, SourceError> {
        let kind = SourceKind::parse(&definition.source_kind)
            .ok_or_else(|| SourceError::UnknownKind(definition.source_kind.clone()))?;
        let name = definition.name.as_str();
        let params = &definition.source_params;
        let source: Arc<dyn DataSource> = match kind {
            SourceKind::Simulation => Arc::new(SimulationSource::new(name, params)),
            SourceKind::Manual => Arc::new(ManualSource::new(name, params)),
            SourceKind::Gpio => Arc::new(GpioSource::new(name, params, self.catalog.as_ref())),
            SourceKind::Ads1115 => Arc::new(AnalogSource::new_i2c(name, params, self.catalog.as_ref())),
            SourceKind::Mcp3008 => Arc::new(AnalogSource::new_spi(name, params, self.catalog.as_ref())),
        };
        Ok(source)
    }
}
