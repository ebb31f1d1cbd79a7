use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock time spent in one upscaling stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Stage timings of one doubling, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Run `f`, record its duration under `label`, and return its output.
    pub fn measure<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stages.push(StageTiming {
            label: label.to_string(),
            elapsed_ms,
        });
        out
    }

    /// Milliseconds recorded for `label`, if that stage ran.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }

    /// Set `total_ms` to the sum of the recorded stages.
    pub fn close(&mut self) {
        self.total_ms = self.stages.iter().map(|s| s.elapsed_ms).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_stages_in_order() {
        let mut timing = TimingBreakdown::default();
        let v = timing.measure("fuse", || 3);
        timing.measure("conserve", || ());
        timing.close();
        assert_eq!(v, 3);
        let labels: Vec<_> = timing.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["fuse", "conserve"]);
        assert!(timing.stage_ms("fuse").is_some());
        assert!(timing.stage_ms("refine").is_none());
        assert!(timing.total_ms >= 0.0);
    }
}
