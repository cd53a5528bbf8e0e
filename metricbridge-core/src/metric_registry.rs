use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{
    metric_factory::MetricFactory,
    metrics::{
        MaeFactory, RegressionErrorBiasTableFactory, RegressionErrorDistributionFactory,
        RegressionPredictedVsActualScatterFactory,
    },
};

pub static METRIC_REGISTRY: Lazy<RwLock<MetricRegistry>> = Lazy::new(|| {
    let mut registry = MetricRegistry::default();
    registry.register(Box::<RegressionErrorBiasTableFactory>::default());
    registry.register(Box::<RegressionErrorDistributionFactory>::default());
    registry.register(Box::<RegressionPredictedVsActualScatterFactory>::default());
    registry.register(Box::<MaeFactory>::default());
    RwLock::new(registry)
});

#[derive(Default)]
pub struct MetricRegistry {
    registry: BTreeMap<String, Box<dyn MetricFactory>>,
}

impl MetricRegistry {
    pub fn register(&mut self, factory: Box<dyn MetricFactory>) {
        self.registry.insert(factory.typename(), factory);
    }

    pub fn get(&self, typename: &str) -> Option<&dyn MetricFactory> {
        self.registry.get(typename).map(|x| x.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MetricFactory> {
        self.registry.values().map(|x| x.as_ref())
    }

    pub fn typenames(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }
}
