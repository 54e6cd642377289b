//! API Gateway REST APIs.

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};

const NAMESPACE: &str = "AWS/ApiGateway";

/// Generator: REST API error rates and latency.
pub struct ApiGatewayGenerator;

impl MetricGenerator for ApiGatewayGenerator {
    fn name(&self) -> &'static str {
        "api_gateway"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::ApiGateway::RestApi"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let api = physical_name(resource, "Name");

        Ok(vec![
            MetricBuilder::new("5XXError", NAMESPACE)
                .description("Server-side errors returned to clients")
                .threshold(5.0, 20.0)
                .category(MetricCategory::Error)
                .importance(Importance::High)
                .dimension("ApiName", api.clone())
                .build(),
            MetricBuilder::new("4XXError", NAMESPACE)
                .description("Client-side errors, often a sign of broken callers")
                .threshold(50.0, 200.0)
                .category(MetricCategory::Error)
                .importance(Importance::Medium)
                .dimension("ApiName", api.clone())
                .build(),
            MetricBuilder::new("Latency", NAMESPACE)
                .unit("Milliseconds")
                .statistic("p99")
                .description("Time between receiving a request and returning the response")
                .threshold(1000.0, 3000.0)
                .category(MetricCategory::Latency)
                .importance(Importance::High)
                .dimension("ApiName", api.clone())
                .build(),
            MetricBuilder::new("IntegrationLatency", NAMESPACE)
                .unit("Milliseconds")
                .statistic("p99")
                .description("Time spent waiting on the backend integration")
                .threshold(800.0, 2500.0)
                .category(MetricCategory::Latency)
                .importance(Importance::Medium)
                .dimension("ApiName", api)
                .build(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_api_metrics() {
        let resource = ResourceDescriptor::new("PublicApi", "AWS::ApiGateway::RestApi");
        let metrics = ApiGatewayGenerator.generate(&resource).unwrap();
        assert_eq!(metrics.len(), 4);
        assert!(metrics.iter().all(|m| m.dimensions[0].value == "PublicApi"));
    }
}
