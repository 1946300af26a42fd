//! # Error 模块
//!
//! 定义 landing-runtime 中使用的错误类型。

use thiserror::Error;

/// 动画注册错误
///
/// 注册时校验配置，不合法的配置直接拒绝，不做静默修正。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimatorError {
    /// 触发阈值不在 (0, 1] 范围内
    #[error("无效的触发阈值 {threshold}，有效范围是 (0, 1]")]
    InvalidThreshold { threshold: f32 },

    /// 动画时长为负数或非有限值
    #[error("无效的动画时长 {duration}，必须为非负有限值")]
    InvalidDuration { duration: f32 },

    /// 延迟为负数或非有限值
    #[error("无效的动画延迟 {delay}，必须为非负有限值")]
    InvalidDelay { delay: f32 },

    /// 起始视觉属性不合法
    #[error("无效的起始属性 '{property}' = {value} - {message}")]
    InvalidFromState {
        property: &'static str,
        value: f32,
        message: String,
    },

    /// 动画器已销毁
    #[error("动画器已销毁，无法注册")]
    Detached,
}

/// 轮播构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// 幻灯片列表为空
    #[error("轮播至少需要一张幻灯片")]
    Empty,

    /// 稳定延迟不合法
    #[error("无效的稳定延迟 {delay}，必须为非负有限值")]
    InvalidSettleDelay { delay: f32 },

    /// 自动播放间隔不合法
    #[error("无效的自动播放间隔 {interval}，必须为正有限值")]
    InvalidAutoplayInterval { interval: f32 },
}

/// landing-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandingError {
    /// 动画注册错误
    #[error("动画注册错误: {0}")]
    Animator(#[from] AnimatorError),

    /// 轮播错误
    #[error("轮播错误: {0}")]
    Carousel(#[from] CarouselError),
}

/// Result 类型别名
pub type LandingResult<T> = Result<T, LandingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: LandingError = AnimatorError::InvalidThreshold { threshold: 0.0 }.into();
        assert!(matches!(err, LandingError::Animator(_)));

        let err: LandingError = CarouselError::Empty.into();
        assert_eq!(err.to_string(), "轮播错误: 轮播至少需要一张幻灯片");
    }
}
