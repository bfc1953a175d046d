// text-summarizer/src/model/schedule.rs

/// Linear warmup from 0 to the peak rate over `warmup_steps`, then linear
/// decay to 0 at `total_steps`. Steps are 0-based optimizer steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSchedule {
  pub peak_lr: f32,
  pub warmup_steps: usize,
  pub total_steps: usize,
}

impl LinearSchedule {
  pub fn new(peak_lr: f32, warmup_steps: usize, total_steps: usize) -> Self {
    Self {
      peak_lr,
      warmup_steps,
      total_steps,
    }
  }

  pub fn lr_at(&self, step: usize) -> f32 {
    if step < self.warmup_steps {
      return self.peak_lr * step as f32 / self.warmup_steps.max(1) as f32;
    }
    let remaining = self.total_steps.saturating_sub(step) as f32;
    let decay_span = self.total_steps.saturating_sub(self.warmup_steps).max(1) as f32;
    self.peak_lr * (remaining / decay_span).max(0.0)
  }
}
