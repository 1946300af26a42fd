//! # Tween 模块
//!
//! 单个补间实例：在 `duration` 内把 [`VisualProps`] 从 `from` 变到 `to`。
//!
//! 补间只关注时间轴，不知道属性最终写到哪里。

use super::{EasingFunction, VisualProps};

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 等待延迟结束
    #[default]
    Delayed,
    /// 正在播放
    Running,
    /// 已结束
    Finished,
}

/// 补间实例
#[derive(Debug, Clone)]
pub struct Tween {
    /// 起始值
    pub from: VisualProps,
    /// 目标值
    pub to: VisualProps,
    /// 时长（秒）
    pub duration: f32,
    /// 延迟启动（秒）
    pub delay: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: TweenState,
    /// 已经过的时间（不含延迟）
    elapsed: f32,
    /// 延迟阶段已等待的时间
    waited: f32,
}

impl Tween {
    /// 创建补间
    pub fn new(from: VisualProps, to: VisualProps, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing: EasingFunction::default(),
            state: TweenState::Delayed,
            elapsed: 0.0,
            waited: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// 推进时间
    ///
    /// # 返回
    /// - `true`: 补间仍在进行中
    /// - `false`: 补间已结束
    pub fn update(&mut self, dt: f32) -> bool {
        match self.state {
            TweenState::Delayed => {
                self.waited += dt;
                if self.waited >= self.delay {
                    self.state = TweenState::Running;
                    self.elapsed = self.waited - self.delay;
                    self.advance(0.0)
                } else {
                    true
                }
            }
            TweenState::Running => self.advance(dt),
            TweenState::Finished => false,
        }
    }

    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = TweenState::Finished;
            false
        } else {
            true
        }
    }

    /// 原始时间进度 (0.0 - 1.0，未应用缓动)
    pub fn raw_progress(&self) -> f32 {
        match self.state {
            TweenState::Finished => 1.0,
            _ if self.duration <= 0.0 => 0.0,
            _ => (self.elapsed / self.duration).clamp(0.0, 1.0),
        }
    }

    /// 当前值
    ///
    /// 延迟阶段停留在 `from`。
    pub fn current(&self) -> VisualProps {
        match self.state {
            TweenState::Delayed => self.from,
            TweenState::Running => {
                VisualProps::lerp(&self.from, &self.to, self.easing.apply(self.raw_progress()))
            }
            TweenState::Finished => self.to,
        }
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state == TweenState::Finished
    }
}
