//! # Carousel 模块
//!
//! 截图轮播控制器：有序幻灯片、当前索引、防抖锁。
//!
//! ## 规则
//!
//! - 索引始终有效，`next` / `previous` 在两端回绕
//! - 切换成功后加锁，`settle_delay` 秒后由 [`CarouselController::update`] 解锁
//! - 加锁期间的请求直接丢弃，不排队
//! - 请求当前索引为空操作，不加锁
//!
//! 主图和缩略图条都从同一个 `active_index` 派生（见 [`CarouselController::frame`]），
//! 因此一次写入同时更新两者。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CarouselError;

/// 默认稳定延迟（秒）
pub const DEFAULT_SETTLE_DELAY: f32 = 0.5;

/// 非激活幻灯片在主图区域的缩放
const INACTIVE_SCALE: f32 = 0.95;

/// 幻灯片描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 幻灯片 ID
    pub id: String,
    /// 媒体引用（由渲染表面解析）
    pub media: String,
    /// 说明文字
    pub caption: String,
}

impl Slide {
    pub fn new(id: impl Into<String>, media: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            media: media.into(),
            caption: caption.into(),
        }
    }
}

/// 导航结果
///
/// 除 `Moved` 外的结果都不改变状态；调用方可以忽略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// 切换成功
    Moved { from: usize, to: usize },
    /// 已是当前索引
    AlreadyActive,
    /// 正在过渡中，请求被丢弃
    Locked,
    /// 索引越界
    OutOfRange,
}

impl Navigation {
    /// 是否切换成功
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// 单张幻灯片的渲染状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    /// 幻灯片索引
    pub index: usize,
    /// 主图不透明度
    pub opacity: f32,
    /// 主图缩放
    pub scale: f32,
    /// 缩略图是否带激活标记
    pub thumbnail_active: bool,
}

/// 轮播渲染快照
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselFrame {
    /// 当前索引
    pub active_index: usize,
    /// 每张幻灯片的状态
    pub slides: Vec<SlideFrame>,
}

/// 自动播放计时器
#[derive(Debug, Clone)]
struct Autoplay {
    interval: f32,
    elapsed: f32,
}

/// 轮播控制器
#[derive(Debug, Clone)]
pub struct CarouselController {
    /// 幻灯片（构造后不可变）
    slides: Vec<Slide>,
    /// 当前索引
    active_index: usize,
    /// 剩余锁定时间；`Some` 表示已加锁
    lock_remaining: Option<f32>,
    /// 稳定延迟（秒）
    settle_delay: f32,
    /// 自动播放
    autoplay: Option<Autoplay>,
}

impl CarouselController {
    /// 创建轮播，初始索引为 0
    pub fn new(slides: Vec<Slide>, settle_delay: f32) -> Result<Self, CarouselError> {
        if slides.is_empty() {
            return Err(CarouselError::Empty);
        }
        if !settle_delay.is_finite() || settle_delay < 0.0 {
            return Err(CarouselError::InvalidSettleDelay {
                delay: settle_delay,
            });
        }
        Ok(Self {
            slides,
            active_index: 0,
            lock_remaining: None,
            settle_delay,
            autoplay: None,
        })
    }

    /// 开启自动播放
    ///
    /// 每隔 `interval` 秒调用一次 [`CarouselController::next`]，同样受锁约束。
    pub fn with_autoplay(mut self, interval: f32) -> Result<Self, CarouselError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(CarouselError::InvalidAutoplayInterval { interval });
        }
        self.autoplay = Some(Autoplay {
            interval,
            elapsed: 0.0,
        });
        Ok(self)
    }

    // ========== 导航 ==========

    /// 切换到指定索引
    pub fn go_to(&mut self, index: usize) -> Navigation {
        if self.is_locked() {
            debug!(index, "轮播过渡中，忽略切换请求");
            return Navigation::Locked;
        }
        if index >= self.slides.len() {
            debug!(index, len = self.slides.len(), "轮播索引越界，忽略");
            return Navigation::OutOfRange;
        }
        if index == self.active_index {
            return Navigation::AlreadyActive;
        }

        let from = self.active_index;
        self.active_index = index;
        self.lock_remaining = Some(self.settle_delay);
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.elapsed = 0.0;
        }

        debug!(from, to = index, "轮播切换");
        Navigation::Moved { from, to: index }
    }

    /// 下一张（末尾回绕到开头）
    pub fn next(&mut self) -> Navigation {
        let len = self.slides.len();
        self.go_to((self.active_index + 1) % len)
    }

    /// 上一张（开头回绕到末尾）
    pub fn previous(&mut self) -> Navigation {
        let len = self.slides.len();
        self.go_to((self.active_index + len - 1) % len)
    }

    // ========== 时间推进 ==========

    /// 推进时间：释放到期的锁，驱动自动播放
    ///
    /// # 返回
    /// 自动播放产生的导航结果（若本帧触发了自动切换）
    pub fn update(&mut self, dt: f32) -> Option<Navigation> {
        if let Some(remaining) = self.lock_remaining {
            let remaining = remaining - dt;
            self.lock_remaining = if remaining > 0.0 { Some(remaining) } else { None };
        }

        let autoplay = self.autoplay.as_mut()?;
        autoplay.elapsed += dt;
        if autoplay.elapsed < autoplay.interval {
            return None;
        }

        // 被锁拦住时保持到期状态，下一帧重试
        let navigation = self.next();
        if navigation == Navigation::Locked {
            return None;
        }
        Some(navigation)
    }

    // ========== 查询方法 ==========

    /// 当前索引
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// 当前幻灯片
    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.active_index]
    }

    /// 所有幻灯片
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// 幻灯片数量
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// 构造时已保证非空，总是返回 `false`
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// 是否处于过渡锁定中
    pub fn is_locked(&self) -> bool {
        self.lock_remaining.is_some()
    }

    /// 稳定延迟
    pub fn settle_delay(&self) -> f32 {
        self.settle_delay
    }

    /// 渲染快照：主图与缩略图的激活状态同时由当前索引决定
    pub fn frame(&self) -> CarouselFrame {
        let slides = (0..self.slides.len())
            .map(|index| {
                let active = index == self.active_index;
                SlideFrame {
                    index,
                    opacity: if active { 1.0 } else { 0.0 },
                    scale: if active { 1.0 } else { INACTIVE_SCALE },
                    thumbnail_active: active,
                }
            })
            .collect();

        CarouselFrame {
            active_index: self.active_index,
            slides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide::new(format!("s{i}"), format!("screens/{i}.png"), format!("截图 {i}")))
            .collect()
    }

    fn carousel(n: usize) -> CarouselController {
        CarouselController::new(slides(n), DEFAULT_SETTLE_DELAY).unwrap()
    }

    /// 等待锁释放
    fn settle(c: &mut CarouselController) {
        c.update(c.settle_delay());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            CarouselController::new(Vec::new(), 0.5).unwrap_err(),
            CarouselError::Empty
        );
        assert!(CarouselController::new(slides(2), -1.0).is_err());
        assert!(carousel(2).with_autoplay(0.0).is_err());
    }

    #[test]
    fn test_next_wraps_through_every_slide() {
        let mut c = carousel(5);
        let mut visited = Vec::new();
        for _ in 0..5 {
            assert!(c.next().moved());
            visited.push(c.active_index());
            settle(&mut c);
        }
        insta::assert_yaml_snapshot!(visited, @r"
        - 1
        - 2
        - 3
        - 4
        - 0
        ");
    }

    #[test]
    fn test_next_cycle_returns_to_start_from_any_index() {
        for start in 0..4 {
            let mut c = carousel(4);
            c.go_to(start);
            settle(&mut c);

            let mut seen = vec![false; 4];
            for _ in 0..4 {
                c.next();
                settle(&mut c);
                assert!(!seen[c.active_index()], "索引 {} 重复访问", c.active_index());
                seen[c.active_index()] = true;
            }
            assert_eq!(c.active_index(), start);
            assert!(seen.iter().all(|s| *s));
        }
    }

    #[test]
    fn test_previous_wraps_from_zero() {
        let mut c = carousel(5);
        assert_eq!(c.previous(), Navigation::Moved { from: 0, to: 4 });
        assert_eq!(c.active_index(), 4);
    }

    #[test]
    fn test_locked_drops_requests() {
        let mut c = carousel(5);
        assert!(c.next().moved());
        assert!(c.is_locked());

        assert_eq!(c.next(), Navigation::Locked);
        assert_eq!(c.previous(), Navigation::Locked);
        assert_eq!(c.go_to(3), Navigation::Locked);
        assert_eq!(c.active_index(), 1);

        // 锁未到期
        c.update(0.3);
        assert!(c.is_locked());
        assert_eq!(c.next(), Navigation::Locked);

        // 到期后解锁，被丢弃的请求不会补发
        c.update(0.2);
        assert!(!c.is_locked());
        assert_eq!(c.active_index(), 1);
        assert!(c.next().moved());
        assert_eq!(c.active_index(), 2);
    }

    #[test]
    fn test_self_transition_never_locks() {
        let mut c = carousel(3);
        assert_eq!(c.go_to(0), Navigation::AlreadyActive);
        assert!(!c.is_locked());
    }

    #[test]
    fn test_single_slide() {
        let mut c = carousel(1);
        assert_eq!(c.next(), Navigation::AlreadyActive);
        assert_eq!(c.previous(), Navigation::AlreadyActive);
        assert!(!c.is_locked());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut c = carousel(3);
        assert_eq!(c.go_to(3), Navigation::OutOfRange);
        assert_eq!(c.active_index(), 0);
        assert!(!c.is_locked());
    }

    #[test]
    fn test_frame_main_and_thumbnails_agree() {
        let mut c = carousel(4);
        c.go_to(2);
        let frame = c.frame();
        assert_eq!(frame.active_index, 2);
        for slide in &frame.slides {
            let active = slide.index == 2;
            assert_eq!(slide.thumbnail_active, active);
            assert_eq!(slide.opacity == 1.0, active);
        }
        assert_eq!(frame.slides.iter().filter(|s| s.thumbnail_active).count(), 1);
        assert_eq!(c.active_slide().id, "s2");
    }

    #[test]
    fn test_autoplay_respects_lock() {
        let mut c = carousel(3).with_autoplay(2.0).unwrap();

        assert_eq!(c.update(1.9), None);
        assert_eq!(c.update(0.2), Some(Navigation::Moved { from: 0, to: 1 }));

        // 用户操作重置自动播放计时
        settle(&mut c);
        c.update(1.0);
        assert!(c.next().moved());
        assert_eq!(c.update(1.6), None);
        assert_eq!(c.active_index(), 2);
        assert_eq!(c.update(0.5), Some(Navigation::Moved { from: 2, to: 0 }));
    }

    #[test]
    fn test_autoplay_retries_after_lock() {
        let mut c = CarouselController::new(slides(3), 1.0)
            .unwrap()
            .with_autoplay(0.5)
            .unwrap();

        assert!(c.next().moved());
        // 自动播放到期时仍在锁定中：丢弃本次，保持到期
        assert_eq!(c.update(0.6), None);
        assert_eq!(c.active_index(), 1);
        // 解锁后的下一帧立即切换
        assert_eq!(c.update(0.5), Some(Navigation::Moved { from: 1, to: 2 }));
    }
}
