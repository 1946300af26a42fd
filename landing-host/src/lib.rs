//! # Landing Host
//!
//! 落地页的 headless 宿主：用 [`ScrollViewport`](landing_runtime::ScrollViewport)
//! 模拟浏览器视口，用 [`RecordingSurface`] 记录每个节点被写入的视觉属性。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 配置加载
//! - 页面区块的布局与挂载
//! - 将滚动、尺寸变化和帧时间转发给运行时
//!
//! 动画状态机、轮播锁、平滑滚动都在 `landing-runtime` 中，本层不包含这些逻辑。

pub mod config;
pub mod page;
pub mod surface;

pub use config::{AppConfig, ConfigError};
pub use page::{LandingPage, PageError, Section};
pub use surface::RecordingSurface;
