//! Simulated Latency - 模拟网络延迟
//!
//! 内存仓储在执行操作前按配置等待一段时间，让调用方体验真实后端的加载状态。
//! 延迟不影响正确性，默认关闭。

use std::time::Duration;

/// 模拟延迟配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedLatency {
    enabled: bool,
    scale: f64,
}

impl SimulatedLatency {
    pub fn new(enabled: bool, scale: f64) -> Self {
        Self { enabled, scale }
    }

    pub fn disabled() -> Self {
        Self::new(false, 1.0)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 实际等待时长（毫秒）
    pub fn effective_ms(&self, base_ms: u64) -> u64 {
        if !self.enabled || !self.scale.is_finite() || self.scale <= 0.0 {
            return 0;
        }
        (base_ms as f64 * self.scale).round() as u64
    }

    /// 等待 base_ms * scale 毫秒
    pub async fn pause(&self, base_ms: u64) {
        let ms = self.effective_ms(base_ms);
        if ms == 0 {
            return;
        }
        tracing::trace!(delay_ms = ms, "Simulating latency");
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::disabled()
    }
}
