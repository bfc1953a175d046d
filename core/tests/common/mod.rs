// tests/common/mod.rs
#![allow(dead_code)]

use conveyor::{ContextData, ConveyorError, PipelineControl};
use once_cell::sync::Lazy;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub stages_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Conveyor error: {0}")]
  Conveyor(String), // ConveyorError is not PartialEq, keep its Debug text

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<ConveyorError> for TestError {
  fn from(err: ConveyorError) -> Self {
    TestError::Conveyor(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  label: &'static str,
  message_to_append: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.stages_executed.push(label.to_string());
      tracing::debug!(target: "test_handlers", %label, counter = guard.counter, "executed");
      if guard.should_stop_at.as_deref() == Some(label) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  label: &'static str,
  error_message: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().stages_executed.push(label.to_string());
      tracing::warn!(target: "test_handlers", %label, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  }
}

/// Handler that only bumps a shared counter, for call-count assertions.
pub fn create_counting_handler(
  counter: Arc<AtomicUsize>,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |_ctx: ContextData<TestContext>| {
    let counter = Arc::clone(&counter);
    Box::pin(async move {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(PipelineControl::Continue)
    })
  }
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
