//! End-to-end tests for template analysis.

use cfn_metrics::analyzer::{AnalysisOptions, MetricsAnalyzer, REDACTED};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn template(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write template");
    file
}

const SIX_TYPES: &str = r#"
Resources:
  Fn:
    Type: AWS::Lambda::Function
  Db:
    Type: AWS::RDS::DBInstance
    Properties:
      Engine: mysql
  Table:
    Type: AWS::DynamoDB::Table
    Properties:
      BillingMode: PAY_PER_REQUEST
  Service:
    Type: AWS::ECS::Service
    Properties:
      Cluster: !Ref Cluster
  Api:
    Type: AWS::ApiGateway::RestApi
  Queue:
    Type: AWS::SQS::Queue
"#;

#[tokio::test]
async fn test_six_supported_types() {
    let file = template(".yaml", SIX_TYPES);
    let analyzer = MetricsAnalyzer::new();
    let result = analyzer
        .analyze(file.path(), &AnalysisOptions::default())
        .await
        .unwrap();

    assert_eq!(result.metadata.total_resources, 6);
    assert_eq!(result.metadata.supported_resources, 6);
    assert_eq!(result.resources.len(), 6);
    assert!(result.unsupported_resources.is_empty());
    assert!(result.errors.is_none());

    let ids: Vec<_> = result.resources.iter().map(|r| r.logical_id.as_str()).collect();
    assert_eq!(ids, vec!["Fn", "Db", "Table", "Service", "Api", "Queue"]);
    assert!(result.resources.iter().all(|r| !r.metrics.is_empty()));
}

#[tokio::test]
async fn test_master_user_password_is_redacted() {
    let analyzer = MetricsAnalyzer::new();
    let result = analyzer
        .analyze(&fixture("serverless-stack.yaml"), &AnalysisOptions::default())
        .await
        .unwrap();

    let db = result.resource("OrdersDatabase").expect("database analyzed");
    assert_eq!(db.resource_properties["MasterUserPassword"], json!(REDACTED));
    assert_eq!(db.resource_properties["MasterUsername"], json!("admin"));

    let function = result.resource("OrdersFunction").expect("function analyzed");
    assert_eq!(
        function.resource_properties["Environment"]["Variables"]["api_key"],
        json!(REDACTED)
    );
    assert_eq!(
        function.resource_properties["Role"],
        json!({"Fn::GetAtt": ["OrdersRole", "Arn"]})
    );
    assert_eq!(result.unsupported_resources, vec!["OrdersRole", "ArtifactsBucket"]);
}

#[tokio::test]
async fn test_unsupported_omitted_but_counted() {
    let file = template(
        ".json",
        r#"{
  "Resources": {
    "Queue": {"Type": "AWS::SQS::Queue"},
    "Bucket": {"Type": "AWS::S3::Bucket"},
    "Fn": {"Type": "AWS::Lambda::Function", "Properties": {"Timeout": 10}},
    "Topic": {"Type": "AWS::SNS::Topic"}
  }
}"#,
    );
    let analyzer = MetricsAnalyzer::new();
    let options = AnalysisOptions::new().with_include_unsupported(false);
    let result = analyzer.analyze(file.path(), &options).await.unwrap();

    assert!(result.unsupported_resources.is_empty());
    assert_eq!(result.metadata.total_resources, 4);
    assert_eq!(result.metadata.supported_resources, 2);

    let stats = analyzer.analysis_statistics().unwrap();
    assert_eq!(stats.unsupported_resources, 2);
    assert_eq!(stats.total_resources, result.metadata.total_resources);
}

const ONE_BROKEN: &str = r#"
Resources:
  Good:
    Type: AWS::SQS::Queue
  Broken:
    Type: AWS::Lambda::Function
    Properties:
      Timeout: -5
  AlsoGood:
    Type: AWS::ApiGateway::RestApi
"#;

#[tokio::test]
async fn test_partial_failure_is_recorded() {
    let file = template(".yaml", ONE_BROKEN);
    let analyzer = MetricsAnalyzer::new();
    let options = AnalysisOptions::new()
        .with_continue_on_error(true)
        .with_collect_metrics(true);
    let result = analyzer.analyze(file.path(), &options).await.unwrap();

    let ids: Vec<_> = result.resources.iter().map(|r| r.logical_id.as_str()).collect();
    assert_eq!(ids, vec!["Good", "AlsoGood"]);

    let errors = result.errors.as_ref().expect("errors recorded");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].resource_id, "Broken");
    assert!(errors[0].message.contains("Timeout"));

    let metric_count = result.metric_count();
    let perf = result.performance_metrics.expect("performance metrics");
    assert_eq!(perf.failed_resources, 1);
    assert_eq!(perf.metrics_generated, metric_count);
}

#[tokio::test]
async fn test_strict_mode_fails_whole_analysis() {
    let file = template(".yaml", ONE_BROKEN);
    let analyzer = MetricsAnalyzer::new();
    let err = analyzer
        .analyze(file.path(), &AnalysisOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "resource");
    assert!(err.to_string().contains("Broken"));
    assert!(analyzer.analysis_statistics().is_none());
}

#[tokio::test]
async fn test_resource_type_filter() {
    let analyzer = MetricsAnalyzer::new();
    let options = AnalysisOptions::new().with_resource_types(["AWS::SQS::Queue"]);
    let result = analyzer
        .analyze(&fixture("serverless-stack.yaml"), &options)
        .await
        .unwrap();

    assert_eq!(result.resources.len(), 1);
    assert_eq!(result.resources[0].logical_id, "OrdersQueue");
    assert_eq!(result.unsupported_resources.len(), 5);
}

#[tokio::test]
async fn test_parser_errors_propagate() {
    let analyzer = MetricsAnalyzer::new();

    let missing = analyzer
        .analyze(Path::new("no/such/template.yaml"), &AnalysisOptions::default())
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), "file");

    let empty = template(".yaml", "Resources: {}\n");
    let err = analyzer
        .analyze(empty.path(), &AnalysisOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn test_generous_memory_limit_passes() {
    let file = template(".yaml", SIX_TYPES);
    let analyzer = MetricsAnalyzer::new();
    let options = AnalysisOptions::new().with_memory_limit_mb(64 * 1024);
    let result = analyzer.analyze(file.path(), &options).await.unwrap();

    assert_eq!(result.resources.len(), 6);
    assert!(result.metadata.memory_peak_mb >= 0.0);
}
