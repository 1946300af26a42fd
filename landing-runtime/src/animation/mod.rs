//! # Animation 模块
//!
//! 动画的基础构件。
//!
//! ## 核心设计理念
//!
//! 这里只负责 **时间轴**：
//! - 知道一组视觉属性从 A 到 B 需要在 duration 内变化
//! - 给出任意时刻的插值结果
//! - **不关心属性写到哪里**，由 [`crate::animator`] 通过渲染表面应用
//!
//! ## 核心概念
//!
//! - `VisualProps`: 不透明度、偏移、缩放
//! - `Tween`: 单个补间实例
//! - `EasingFunction`: 缓动函数

mod easing;
mod props;
mod tween;

pub use easing::EasingFunction;
pub use props::VisualProps;
pub use tween::{Tween, TweenState};
