//! RDS instances and Aurora clusters.

use super::{GenerationError, MetricBuilder, MetricGenerator, physical_name};
use crate::analyzer::types::{Importance, MetricCategory, MetricDefinition, ResourceDescriptor};

const NAMESPACE: &str = "AWS/RDS";

/// Generator: RDS saturation, latency and engine-specific health.
pub struct RdsGenerator;

/// Rough `max_connections` for an instance class, used to size the
/// connection alarm. Unknown or unresolved classes use the small-instance
/// figure so the alarm errs on the early side.
fn estimated_max_connections(instance_class: Option<&str>) -> f64 {
    let size = instance_class
        .and_then(|c| c.rsplit('.').next())
        .unwrap_or("small");
    match size {
        "micro" => 60.0,
        "small" => 150.0,
        "medium" => 300.0,
        "large" => 600.0,
        "xlarge" => 1200.0,
        "2xlarge" => 2500.0,
        _ if size.ends_with("xlarge") => 5000.0,
        _ => 150.0,
    }
}

impl MetricGenerator for RdsGenerator {
    fn name(&self) -> &'static str {
        "rds"
    }

    fn supported_types(&self) -> &'static [&'static str] {
        &["AWS::RDS::DBInstance", "AWS::RDS::DBCluster"]
    }

    fn generate(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<MetricDefinition>, GenerationError> {
        let is_cluster = resource.type_identifier == "AWS::RDS::DBCluster";
        let (dimension, id) = if is_cluster {
            (
                "DBClusterIdentifier",
                physical_name(resource, "DBClusterIdentifier"),
            )
        } else {
            (
                "DBInstanceIdentifier",
                physical_name(resource, "DBInstanceIdentifier"),
            )
        };
        let engine = resource
            .property_str("Engine")
            .unwrap_or("")
            .to_lowercase();
        let max_connections = estimated_max_connections(resource.property_str("DBInstanceClass"));

        let mut metrics = vec![
            MetricBuilder::new("CPUUtilization", NAMESPACE)
                .unit("Percent")
                .statistic("Average")
                .description("Processor utilization of the database host")
                .threshold(70.0, 85.0)
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension(dimension, id.clone())
                .build(),
            MetricBuilder::new("DatabaseConnections", NAMESPACE)
                .statistic("Average")
                .description(format!(
                    "Open connections relative to an estimated limit of {}",
                    max_connections
                ))
                .threshold(
                    (max_connections * 0.8).round(),
                    (max_connections * 0.95).round(),
                )
                .category(MetricCategory::Saturation)
                .importance(Importance::High)
                .dimension(dimension, id.clone())
                .build(),
        ];

        if !is_cluster {
            metrics.push(
                MetricBuilder::new("ReadLatency", NAMESPACE)
                    .unit("Seconds")
                    .statistic("Average")
                    .description("Average time taken per disk read")
                    .threshold(0.02, 0.05)
                    .category(MetricCategory::Latency)
                    .importance(Importance::Medium)
                    .dimension(dimension, id.clone())
                    .build(),
            );
            metrics.push(
                MetricBuilder::new("WriteLatency", NAMESPACE)
                    .unit("Seconds")
                    .statistic("Average")
                    .description("Average time taken per disk write")
                    .threshold(0.02, 0.05)
                    .category(MetricCategory::Latency)
                    .importance(Importance::Medium)
                    .dimension(dimension, id.clone())
                    .build(),
            );
            metrics.push(
                MetricBuilder::new("DiskQueueDepth", NAMESPACE)
                    .statistic("Average")
                    .description("Outstanding I/O requests waiting for the disk")
                    .threshold(10.0, 20.0)
                    .category(MetricCategory::Saturation)
                    .importance(Importance::Medium)
                    .dimension(dimension, id.clone())
                    .build(),
            );
        } else {
            metrics.push(
                MetricBuilder::new("AuroraReplicaLagMaximum", NAMESPACE)
                    .unit("Milliseconds")
                    .statistic("Maximum")
                    .period(60)
                    .description("Largest lag between the writer and any replica")
                    .threshold(1000.0, 5000.0)
                    .category(MetricCategory::Latency)
                    .importance(Importance::Medium)
                    .dimension(dimension, id.clone())
                    .build(),
            );
        }

        if engine.contains("postgres") {
            metrics.push(
                MetricBuilder::new("MaximumUsedTransactionIDs", NAMESPACE)
                    .statistic("Average")
                    .description("Transaction id consumption; wraparound forces a shutdown")
                    .threshold(1_000_000_000.0, 1_500_000_000.0)
                    .category(MetricCategory::Saturation)
                    .importance(Importance::High)
                    .dimension(dimension, id)
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
    fn test_connection_estimate_by_class() {
        assert_eq!(estimated_max_connections(Some("db.t3.micro")), 60.0);
        assert_eq!(estimated_max_connections(Some("db.r6g.4xlarge")), 5000.0);
        assert_eq!(estimated_max_connections(None), 150.0);
    }

    #[test]
    fn test_cluster_uses_cluster_dimension() {
        let resource = ResourceDescriptor::new("Aurora", "AWS::RDS::DBCluster")
            .with_property("Engine", json!("aurora-postgresql"));
        let metrics = RdsGenerator.generate(&resource).unwrap();
        assert!(
            metrics
                .iter()
                .all(|m| m.dimensions[0].name == "DBClusterIdentifier")
        );
        assert!(metrics.iter().any(|m| m.name == "AuroraReplicaLagMaximum"));
        assert!(metrics.iter().any(|m| m.name == "MaximumUsedTransactionIDs"));
    }

    #[test]
    fn test_instance_has_disk_latency() {
        let resource = ResourceDescriptor::new("Db", "AWS::RDS::DBInstance")
            .with_property("Engine", json!("mysql"));
        let metrics = RdsGenerator.generate(&resource).unwrap();
        assert!(metrics.iter().any(|m| m.name == "ReadLatency"));
        assert!(!metrics.iter().any(|m| m.name == "MaximumUsedTransactionIDs"));
    }
}
