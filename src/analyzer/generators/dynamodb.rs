//! DynamoDB tables.

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};
use serde_json::Value;

const NAMESPACE: &str = "AWS/DynamoDB";

/// Generator: DynamoDB errors, throttling and consumed capacity.
pub struct DynamoDbGenerator;

/// Provisioned read/write capacity units, `None` for on-demand tables.
fn provisioned_capacity(resource: &ResourceDescriptor) -> Option<(f64, f64)> {
    if resource.property_str("BillingMode") == Some("PAY_PER_REQUEST") {
        return None;
    }
    let throughput = match resource.properties.get("ProvisionedThroughput")? {
        Value::Object(map) => map,
        _ => return None,
    };
    let units = |key: &str| match throughput.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Some((units("ReadCapacityUnits")?, units("WriteCapacityUnits")?))
}

impl MetricGenerator for DynamoDbGenerator {
    fn name(&self) -> &'static str {
        "dynamodb"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::DynamoDB::Table"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let table = physical_name(resource, "TableName");

        let mut metrics = vec![
            MetricBuilder::new("SystemErrors", NAMESPACE)
                .description("Requests that failed with an HTTP 500 from DynamoDB")
                .threshold(1.0, 5.0)
                .category(MetricCategory::Error)
                .importance(Importance::High)
                .dimension("TableName", table.clone())
                .build(),
            MetricBuilder::new("ThrottledRequests", NAMESPACE)
                .description("Requests rejected because they exceeded throughput limits")
                .threshold(1.0, 10.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension("TableName", table.clone())
                .build(),
            MetricBuilder::new("SuccessfulRequestLatency", NAMESPACE)
                .unit("Milliseconds")
                .statistic("Average")
                .description("Latency of successful requests")
                .threshold(25.0, 100.0)
                .category(MetricCategory::Latency)
                .importance(Importance::Medium)
                .dimension("TableName", table.clone())
                .dimension("Operation", "GetItem")
                .build(),
        ];

        if let Some((read, write)) = provisioned_capacity(resource) {
            if read <= 0.0 || write <= 0.0 {
                return Err(GenerationError::InvalidProperty {
                    property: "ProvisionedThroughput".to_string(),
                    reason: format!("capacity units must be positive (read={read}, write={write})"),
                });
            }
            // Consumed capacity is reported per minute when summed over 60s
            metrics.push(
                MetricBuilder::new("ConsumedReadCapacityUnits", NAMESPACE)
                    .period(60)
                    .description(format!("Read capacity consumed against {} provisioned RCU", read))
                    .threshold((read * 60.0 * 0.8).round(), (read * 60.0 * 0.95).round())
                    .category(MetricCategory::Saturation)
                    .importance(Importance::Medium)
                    .dimension("TableName", table.clone())
                    .build(),
            );
            metrics.push(
                MetricBuilder::new("ConsumedWriteCapacityUnits", NAMESPACE)
                    .period(60)
                    .description(format!("Write capacity consumed against {} provisioned WCU", write))
                    .threshold((write * 60.0 * 0.8).round(), (write * 60.0 * 0.95).round())
                    .category(MetricCategory::Saturation)
                    .importance(Importance::Medium)
                    .dimension("TableName", table)
                    .build(),
            );
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_on_demand_table_skips_capacity() {
        let resource = ResourceDescriptor::new("Orders", "AWS::DynamoDB::Table")
            .with_property("BillingMode", json!("PAY_PER_REQUEST"));
        let metrics = DynamoDbGenerator.generate(&resource).unwrap();
        assert_eq!(metrics.len(), 3);
    }

    #[test]
    fn test_provisioned_table_sizes_capacity_alarms() {
        let resource = ResourceDescriptor::new("Orders", "AWS::DynamoDB::Table").with_property(
            "ProvisionedThroughput",
            json!({"ReadCapacityUnits": 10, "WriteCapacityUnits": "5"}),
        );
        let metrics = DynamoDbGenerator.generate(&resource).unwrap();
        let read = metrics
            .iter()
            .find(|m| m.name == "ConsumedReadCapacityUnits")
            .unwrap();
        assert_eq!(read.recommended_threshold.warning, 480.0);
        assert_eq!(read.recommended_threshold.critical, 570.0);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let resource = ResourceDescriptor::new("Orders", "AWS::DynamoDB::Table").with_property(
            "ProvisionedThroughput",
            json!({"ReadCapacityUnits": 0, "WriteCapacityUnits": 5}),
        );
        assert!(DynamoDbGenerator.generate(&resource).is_err());
    }
}
