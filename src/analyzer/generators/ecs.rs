//! ECS services.

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};
use serde_json::Value;

const NAMESPACE: &str = "AWS/ECS";

/// Generator: ECS service CPU and memory utilization.
pub struct EcsServiceGenerator;

/// Cluster dimension value. `Cluster` is usually a `Ref`, in which case the
/// referenced logical id is the best available name.
fn cluster_name(resource: &ResourceDescriptor) -> String {
    match resource.properties.get("Cluster") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => map
            .get("Ref")
            .and_then(|r| r.as_str())
            .unwrap_or("default")
            .to_string(),
        _ => "default".to_string(),
    }
}

impl MetricGenerator for EcsServiceGenerator {
    fn name(&self) -> &'static str {
        "ecs"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::ECS::Service"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let service = physical_name(resource, "ServiceName");
        let cluster = cluster_name(resource);

        Ok(vec![
            MetricBuilder::new("CPUUtilization", NAMESPACE)
                .unit("Percent")
                .statistic("Average")
                .description("CPU used by the service's tasks relative to their reservation")
                .threshold(75.0, 90.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension("ClusterName", cluster.clone())
                .dimension("ServiceName", service.clone())
                .build(),
            MetricBuilder::new("MemoryUtilization", NAMESPACE)
                .unit("Percent")
                .statistic("Average")
                .description("Memory used by the service's tasks relative to their reservation")
                .threshold(80.0, 90.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension("ClusterName", cluster)
                .dimension("ServiceName", service)
                .build(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_ref_becomes_dimension() {
        let resource = ResourceDescriptor::new("Web", "AWS::ECS::Service")
            .with_property("Cluster", json!({"Ref": "AppCluster"}));
        let metrics = EcsServiceGenerator.generate(&resource).unwrap();
        assert_eq!(metrics[0].dimensions[0].value, "AppCluster");
        assert_eq!(metrics[0].dimensions[1].value, "Web");
    }
}
