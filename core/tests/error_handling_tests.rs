// tests/error_handling_tests.rs
mod common;
use common::*;
use conveyor::{ContextData, ConveyorError, Pipeline, PipelineControl, StageStatus};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_non_optional_stage_missing_handler_fails() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("stage_with_no_handler", false, None)]);

  let report = pipeline.run_with_report(ContextData::new(TestContext::default())).await;

  assert_eq!(report.status_of("stage_with_no_handler"), Some(StageStatus::Failed));
  match report.outcome {
    Err(TestError::Conveyor(s)) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("stage_with_no_handler"));
    }
    other => panic!("Expected TestError::Conveyor(HandlerMissing), got {:?}", other),
  }
}

// A pipeline whose error type is ConveyorError itself.
#[tokio::test]
#[serial]
async fn test_pipeline_with_conveyor_error_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, ConveyorError>::new(&[("task", false, None)]);
  pipeline.on("task", |ctx: ContextData<TestContext>| async move {
    ctx.write().counter = 1;
    Ok::<PipelineControl, ConveyorError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(TestContext::default());
  assert!(pipeline.run(ctx.clone()).await.is_ok());
  assert_eq!(ctx.read().counter, 1);

  let mut failing = Pipeline::<TestContext, ConveyorError>::new(&[("fail_task", false, None)]);
  failing.on("fail_task", |_ctx| async move {
    Err::<PipelineControl, _>(ConveyorError::Internal("intentional".to_string()))
  });
  match failing.run(ContextData::new(TestContext::default())).await {
    Err(ConveyorError::Internal(s)) => assert_eq!(s, "intentional"),
    other => panic!("Expected ConveyorError::Internal, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_anyhow_errors_become_handler_errors() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, ConveyorError>::new(&[("io", false, None)]);
  pipeline.on("io", |_ctx| async move {
    let err = anyhow::anyhow!("disk unplugged");
    Err::<PipelineControl, ConveyorError>(err.into())
  });

  let err = pipeline.run(ContextData::new(TestContext::default())).await.unwrap_err();
  assert!(matches!(err, ConveyorError::HandlerError { .. }));
  assert!(err.to_string().contains("disk unplugged"));
}

#[test]
fn test_wrapped_conveyor_error_is_not_nested() {
  let original = ConveyorError::StageNotFound {
    stage_name: "x".to_string(),
  };
  let converted = ConveyorError::from(anyhow::Error::new(original));
  assert!(matches!(converted, ConveyorError::StageNotFound { ref stage_name } if stage_name == "x"));
}
