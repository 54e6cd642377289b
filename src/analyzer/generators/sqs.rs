//! SQS queues.

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};

const NAMESPACE: &str = "AWS/SQS";

/// Default message retention (4 days).
const DEFAULT_RETENTION_SECS: f64 = 345_600.0;

/// Generator: queue backlog and message age.
pub struct SqsQueueGenerator;

impl MetricGenerator for SqsQueueGenerator {
    fn name(&self) -> &'static str {
        "sqs"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::SQS::Queue"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let queue = physical_name(resource, "QueueName");
        let retention = resource
            .property_f64("MessageRetentionPeriod")
            .filter(|r| *r > 0.0)
            .unwrap_or(DEFAULT_RETENTION_SECS);

        Ok(vec![
            MetricBuilder::new("ApproximateAgeOfOldestMessage", NAMESPACE)
                .unit("Seconds")
                .statistic("Maximum")
                .description("Age of the oldest message; messages are dropped at the retention period")
                .threshold((retention * 0.5).round(), (retention * 0.8).round())
                .category(MetricCategory::Latency)
                .importance(Importance::High)
                .dimension("QueueName", queue.clone())
                .build(),
            MetricBuilder::new("ApproximateNumberOfMessagesVisible", NAMESPACE)
                .statistic("Maximum")
                .description("Backlog of messages waiting to be consumed")
                .threshold(1000.0, 10_000.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::Medium)
                .dimension("QueueName", queue.clone())
                .build(),
            MetricBuilder::new("NumberOfMessagesSent", NAMESPACE)
                .description("Messages added to the queue")
                .threshold(10_000.0, 100_000.0)
                .category(MetricCategory::Performance)
                .importance(Importance::Low)
                .dimension("QueueName", queue)
                .build(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_age_follows_retention() {
        let resource = ResourceDescriptor::new("Jobs", "AWS::SQS::Queue")
            .with_property("MessageRetentionPeriod", json!(1000));
        let metrics = SqsQueueGenerator.generate(&resource).unwrap();
        assert_eq!(metrics[0].recommended_threshold.warning, 500.0);
        assert_eq!(metrics[0].recommended_threshold.critical, 800.0);
    }
}
