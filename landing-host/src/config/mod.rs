//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use landing_runtime::{AnimationConfig, EasingFunction, ToggleActions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 视口配置
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// 入场动画配置
    #[serde(default)]
    pub motion: MotionConfig,

    /// 截图轮播配置
    #[serde(default)]
    pub carousel: CarouselConfig,

    /// 锚点平滑滚动配置
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 视口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// 视口宽度
    #[serde(default = "default_viewport_width")]
    pub width: u32,

    /// 视口高度
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

/// 入场动画配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// 默认触发阈值
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// 标题/卡片入场时长（秒）
    #[serde(default = "default_duration")]
    pub duration: f32,

    /// 交错间隔（秒）
    #[serde(default = "default_stagger")]
    pub stagger: f32,

    /// 标题/卡片缓动
    #[serde(default = "default_motion_easing")]
    pub easing: EasingFunction,

    /// 离开视口时的行为
    ///
    /// 页面各区块默认都开启反向（`play_reverse`）。
    #[serde(default = "default_toggle_actions")]
    pub toggle_actions: ToggleActions,
}

/// 截图轮播配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// 切换后的锁定时长（秒）
    #[serde(default = "default_settle_delay")]
    pub settle_delay: f32,

    /// 自动播放间隔（秒），不配置则只响应用户操作
    #[serde(default)]
    pub autoplay_interval: Option<f32>,
}

/// 锚点平滑滚动配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// 滚动时长（秒）
    #[serde(default = "default_scroll_duration")]
    pub duration: f32,

    /// 滚动缓动
    #[serde(default = "default_scroll_easing")]
    pub easing: EasingFunction,

    /// 固定导航栏高度
    #[serde(default = "default_nav_offset")]
    pub nav_offset: f32,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// headless 模拟帧率
    #[serde(default = "default_fps")]
    pub fps: u32,
}

// 默认值函数
fn default_viewport_width() -> u32 {
    1440
}

fn default_viewport_height() -> f32 {
    900.0
}

fn default_threshold() -> f32 {
    0.8
}

fn default_duration() -> f32 {
    0.8
}

fn default_stagger() -> f32 {
    0.1
}

fn default_motion_easing() -> EasingFunction {
    EasingFunction::Power3Out
}

fn default_toggle_actions() -> ToggleActions {
    ToggleActions::PlayReverse
}

fn default_settle_delay() -> f32 {
    0.5
}

fn default_scroll_duration() -> f32 {
    0.8
}

fn default_scroll_easing() -> EasingFunction {
    EasingFunction::Power2InOut
}

fn default_nav_offset() -> f32 {
    80.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fps() -> u32 {
    60
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            duration: default_duration(),
            stagger: default_stagger(),
            easing: default_motion_easing(),
            toggle_actions: default_toggle_actions(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            settle_delay: default_settle_delay(),
            autoplay_interval: None,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration: default_scroll_duration(),
            easing: default_scroll_easing(),
            nav_offset: default_nav_offset(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            fps: default_fps(),
        }
    }
}

impl MotionConfig {
    /// 标题与卡片的入场配置
    pub fn entrance(&self) -> AnimationConfig {
        self.apply(AnimationConfig::fade_up())
            .with_duration(self.duration)
            .with_easing(self.easing)
    }

    /// 在预设上应用全局阈值与离开行为
    pub fn apply(&self, preset: AnimationConfig) -> AnimationConfig {
        preset
            .with_threshold(self.threshold)
            .with_toggle_actions(self.toggle_actions)
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    /// 日志订阅器必须已经初始化；启动阶段先用 [`AppConfig::read`]，
    /// 初始化日志后再交给 [`AppConfig::or_default`]。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::or_default(path, Self::read(path))
    }

    /// 读取并解析配置文件，不产生日志
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 记录读取结果，失败时回退到默认配置
    pub fn or_default(path: &Path, result: Result<Self, ConfigError>) -> Self {
        match result {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(ConfigError::NotFound(_)) => {
                warn!(path = %path.display(), "配置文件不存在，使用默认配置");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.height <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "视口高度必须大于 0".to_string(),
            ));
        }

        // 入场配置交给运行时的校验规则
        self.motion
            .entrance()
            .validate()
            .map_err(|e| ConfigError::ValidationFailed(format!("入场动画配置无效: {e}")))?;

        if self.motion.stagger < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "交错间隔不能为负数".to_string(),
            ));
        }

        if self.carousel.settle_delay < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "轮播稳定延迟不能为负数".to_string(),
            ));
        }

        if let Some(interval) = self.carousel.autoplay_interval {
            if interval <= self.carousel.settle_delay {
                return Err(ConfigError::ValidationFailed(format!(
                    "自动播放间隔 {interval} 必须大于稳定延迟 {}",
                    self.carousel.settle_delay
                )));
            }
        }

        if self.scroll.duration < 0.0 || self.scroll.nav_offset < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "平滑滚动时长和导航偏移不能为负数".to_string(),
            ));
        }

        if self.debug.fps == 0 {
            return Err(ConfigError::ValidationFailed("帧率必须大于 0".to_string()));
        }

        Ok(())
    }

    /// 每帧时长（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.debug.fps.max(1) as f32
    }
}

/// 配置错误
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// 文件不存在
    #[error("配置文件不存在: {0}")]
    NotFound(String),
    /// 解析失败
    #[error("配置文件解析失败: {0}")]
    ParseFailed(String),
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
