//! Application and network load balancers (`AWS::ElasticLoadBalancingV2::LoadBalancer`).

use super::{GenerationError, MetricBuilder, MetricGenerator};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};

/// Generator: load balancer errors and latency.
pub struct LoadBalancerGenerator;

impl MetricGenerator for LoadBalancerGenerator {
    fn name(&self) -> &'static str {
        "elbv2"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::ElasticLoadBalancingV2::LoadBalancer"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        // The LoadBalancer dimension is the ARN suffix, only known after deploy
        let lb = resource.identifier.clone();

        let metrics = match resource.property_str("Type").unwrap_or("application") {
            "network" => {
                const NAMESPACE: &str = "AWS/NetworkELB";
                vec![
                    MetricBuilder::new("UnHealthyHostCount", NAMESPACE)
                        .statistic("Maximum")
                        .period(60)
                        .description("Targets failing health checks")
                        .threshold(1.0, 2.0)
                        .category(MetricCategory::Error)
                        .importance(Importance::High)
                        .dimension("LoadBalancer", lb.clone())
                        .build(),
                    MetricBuilder::new("TCP_Target_Reset_Count", NAMESPACE)
                        .description("Resets sent by targets to clients")
                        .threshold(10.0, 50.0)
                        .category(MetricCategory::Error)
                        .importance(Importance::Medium)
                        .dimension("LoadBalancer", lb)
                        .build(),
                ]
            }
            "application" => {
                const NAMESPACE: &str = "AWS/ApplicationELB";
                vec![
                    MetricBuilder::new("HTTPCode_ELB_5XX_Count", NAMESPACE)
                        .description("5xx responses generated by the load balancer itself")
                        .threshold(5.0, 20.0)
                        .category(MetricCategory::Error)
                        .importance(Importance::High)
                        .dimension("LoadBalancer", lb.clone())
                        .build(),
                    MetricBuilder::new("HTTPCode_Target_5XX_Count", NAMESPACE)
                        .description("5xx responses returned by targets")
                        .threshold(10.0, 50.0)
                        .category(MetricCategory::Error)
                        .importance(Importance::High)
                        .dimension("LoadBalancer", lb.clone())
                        .build(),
                    MetricBuilder::new("TargetResponseTime", NAMESPACE)
                        .unit("Seconds")
                        .statistic("p95")
                        .description("Time targets take to respond after the request leaves the load balancer")
                        .threshold(1.0, 3.0)
                        .category(MetricCategory::Latency)
                        .importance(Importance::High)
                        .dimension("LoadBalancer", lb.clone())
                        .build(),
                    MetricBuilder::new("RejectedConnectionCount", NAMESPACE)
                        .description("Connections rejected because the load balancer hit its limit")
                        .threshold(1.0, 10.0)
                        .category(MetricCategory::Saturation)
                        .importance(Importance::Medium)
                        .dimension("LoadBalancer", lb)
                        .build(),
                ]
            }
            other => {
                return Err(GenerationError::InvalidProperty {
                    property: "Type".to_string(),
                    reason: format!("unsupported load balancer type '{}'", other),
                });
            }
        };

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_application_load_balancer() {
        let resource =
            ResourceDescriptor::new("Alb", "AWS::ElasticLoadBalancingV2::LoadBalancer");
        let metrics = LoadBalancerGenerator.generate(&resource).unwrap();
        assert!(metrics.iter().all(|m| m.namespace == "AWS/ApplicationELB"));
    }

    #[test]
    fn test_network_load_balancer_namespace() {
        let resource = ResourceDescriptor::new("Nlb", "AWS::ElasticLoadBalancingV2::LoadBalancer")
            .with_property("Type", json!("network"));
        let metrics = LoadBalancerGenerator.generate(&resource).unwrap();
        assert!(metrics.iter().all(|m| m.namespace == "AWS/NetworkELB"));
    }

    #[test]
    fn test_gateway_type_is_rejected() {
        let resource = ResourceDescriptor::new("Gwlb", "AWS::ElasticLoadBalancingV2::LoadBalancer")
            .with_property("Type", json!("gateway"));
        assert!(LoadBalancerGenerator.generate(&resource).is_err());
    }
}
