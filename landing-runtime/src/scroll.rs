//! # Scroll 模块
//!
//! 锚点平滑滚动：把页面滚动偏移在给定时长内缓动到目标位置。
//!
//! 新的请求直接替换进行中的滚动，从当前偏移重新出发。

use tracing::debug;

use crate::animation::EasingFunction;

/// 进行中的滚动
#[derive(Debug, Clone)]
struct ScrollMotion {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// 平滑滚动器
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// 当前滚动偏移
    offset: f32,
    /// 进行中的滚动
    motion: Option<ScrollMotion>,
    /// 缓动函数
    easing: EasingFunction,
    /// 固定导航栏高度，目标位置会减去它
    nav_offset: f32,
}

impl SmoothScroll {
    pub fn new(easing: EasingFunction, nav_offset: f32) -> Self {
        Self {
            offset: 0.0,
            motion: None,
            easing,
            nav_offset: nav_offset.max(0.0),
        }
    }

    /// 滚动到锚点
    ///
    /// 目标位置为 `anchor_top - nav_offset`，不小于 0。
    /// 时长为 0 时立即到位。
    pub fn scroll_to_anchor(&mut self, anchor_top: f32, duration: f32) {
        let to = (anchor_top - self.nav_offset).max(0.0);
        debug!(from = self.offset, to, duration, "平滑滚动到锚点");

        if duration <= 0.0 || (to - self.offset).abs() < f32::EPSILON {
            self.offset = to;
            self.motion = None;
            return;
        }

        self.motion = Some(ScrollMotion {
            from: self.offset,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    /// 用户手动滚动：同步偏移并取消进行中的平滑滚动
    pub fn jump_to(&mut self, offset: f32) {
        self.offset = offset.max(0.0);
        self.motion = None;
    }

    /// 推进时间
    ///
    /// # 返回
    /// 本帧偏移发生变化时返回新的偏移
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        let motion = self.motion.as_mut()?;
        motion.elapsed += dt;

        let t = (motion.elapsed / motion.duration).min(1.0);
        self.offset = motion.from + (motion.to - motion.from) * self.easing.apply(t);
        if t >= 1.0 {
            self.offset = motion.to;
            self.motion = None;
        }
        Some(self.offset)
    }

    /// 当前滚动偏移
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// 目标偏移（空闲时为当前偏移）
    pub fn target(&self) -> f32 {
        self.motion.as_ref().map_or(self.offset, |m| m.to)
    }

    /// 是否正在滚动
    pub fn is_scrolling(&self) -> bool {
        self.motion.is_some()
    }
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(EasingFunction::Power2InOut, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_anchor() {
        let mut scroll = SmoothScroll::new(EasingFunction::Linear, 80.0);
        scroll.scroll_to_anchor(1080.0, 1.0);
        assert!(scroll.is_scrolling());
        assert_eq!(scroll.target(), 1000.0);

        assert_eq!(scroll.update(0.5), Some(500.0));
        assert_eq!(scroll.update(0.6), Some(1000.0));
        assert!(!scroll.is_scrolling());
        assert_eq!(scroll.update(0.1), None);
    }

    #[test]
    fn test_target_clamped_to_top() {
        let mut scroll = SmoothScroll::new(EasingFunction::Linear, 80.0);
        scroll.jump_to(500.0);
        scroll.scroll_to_anchor(20.0, 0.5);
        assert_eq!(scroll.target(), 0.0);
    }

    #[test]
    fn test_new_request_replaces_inflight() {
        let mut scroll = SmoothScroll::new(EasingFunction::Linear, 0.0);
        scroll.scroll_to_anchor(1000.0, 1.0);
        scroll.update(0.5);

        scroll.scroll_to_anchor(0.0, 1.0);
        assert_eq!(scroll.target(), 0.0);
        // 从当前位置 500 出发
        assert_eq!(scroll.update(0.5), Some(250.0));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut scroll = SmoothScroll::default();
        scroll.scroll_to_anchor(300.0, 0.0);
        assert!(!scroll.is_scrolling());
        assert_eq!(scroll.offset(), 300.0);
    }

    #[test]
    fn test_manual_scroll_cancels() {
        let mut scroll = SmoothScroll::default();
        scroll.scroll_to_anchor(1000.0, 1.0);
        scroll.jump_to(42.0);
        assert!(!scroll.is_scrolling());
        assert_eq!(scroll.offset(), 42.0);
    }
}
