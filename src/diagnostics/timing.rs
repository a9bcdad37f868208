use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Wall-clock breakdown of one `process` call, stages in execution order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

/// Collects stage timings while a run progresses.
pub(crate) struct Stopwatch {
    start: Instant,
    stages: Vec<StageTiming>,
}

impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
            stages: Vec::new(),
        }
    }

    /// Run `f`, record its duration under `label`, return its output.
    pub(crate) fn stage<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.stages.push(StageTiming {
            label: label.to_string(),
            elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
        });
        out
    }

    pub(crate) fn last_ms(&self) -> f64 {
        self.stages.last().map_or(0.0, |s| s.elapsed_ms)
    }

    pub(crate) fn finish(self) -> TimingBreakdown {
        TimingBreakdown {
            total_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            stages: self.stages,
        }
    }
}
