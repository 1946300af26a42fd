//! # Landing Runtime
//!
//! 落地页动效的核心运行时库。
//!
//! ## 架构概述
//!
//! `landing-runtime` 是纯逻辑核心，不依赖任何 IO 或 DOM。
//! 它通过两个外部协作者与宿主层（Host）通信：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── scroll / resize ────────────►│ ScrollViewport (VisibilityService)
//!   │◄─── Vec<(SubscriptionId, Crossing)> │
//!   │──── dispatch(crossings) ────────►│ VisibilityAnimator
//!   │──── update(dt) ─────────────────►│
//!   │◄─── RenderSurface::apply(node, props)
//!   │◄─── Vec<AnimatorEvent> ──────────│
//! ```
//!
//! 所有状态变化都在宿主的单线程事件循环内完成，没有后台线程，
//! 也不会自行调度计时器：时间只通过 `update(dt)` 推进。
//!
//! ## 核心类型
//!
//! - [`VisibilityAnimator`]：滚动触发的入场动画编排
//! - [`CarouselController`]：带防抖锁的环形轮播状态机
//! - [`ScrollViewport`]：基于布局盒的可见性触发服务
//! - [`SmoothScroll`]：锚点平滑滚动
//!
//! ## 模块结构
//!
//! - [`animation`]：缓动函数、视觉属性、补间
//! - [`animator`]：可见性动画器
//! - [`carousel`]：轮播控制器
//! - [`visibility`]：可见性触发服务
//! - [`surface`]：渲染表面接口
//! - [`scroll`]：平滑滚动
//! - [`error`]：错误类型定义

pub mod animation;
pub mod animator;
pub mod carousel;
pub mod error;
pub mod scroll;
pub mod surface;
pub mod visibility;

// 重导出核心类型
pub use animation::{EasingFunction, Tween, TweenState, VisualProps};
pub use animator::{
    AnimationConfig, AnimationHandle, AnimationScope, AnimatorEvent, PlayState, SharedAnimator,
    ToggleActions, VisibilityAnimator,
};
pub use carousel::{CarouselController, CarouselFrame, Navigation, Slide, SlideFrame};
pub use error::{AnimatorError, CarouselError, LandingError, LandingResult};
pub use scroll::SmoothScroll;
pub use surface::{NodeRef, RenderSurface};
pub use visibility::{Crossing, LayoutBox, Observation, ScrollViewport, SubscriptionId, VisibilityService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _props = VisualProps::IDENTITY;
        let _config = AnimationConfig::fade_up();
        let _crossing = Crossing::In;
        let _viewport = ScrollViewport::new(800.0);
        let _slide = Slide::new("dashboard", "screens/dashboard.png", "仪表盘");
    }
}
