//! # Props 模块
//!
//! 可动画的瞬态视觉属性。

use serde::{Deserialize, Serialize};

/// 视觉属性
///
/// 入场动画只改变这四个属性；静止状态为 [`VisualProps::IDENTITY`]。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualProps {
    /// 不透明度 (0.0 - 1.0)
    pub opacity: f32,
    /// 水平偏移（像素）
    pub offset_x: f32,
    /// 垂直偏移（像素）
    pub offset_y: f32,
    /// 缩放
    pub scale: f32,
}

impl VisualProps {
    /// 静止状态：完全不透明、无偏移、原始大小
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// 完全隐藏（其余属性为静止值）
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::IDENTITY
        }
    }

    /// 线性插值
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            opacity: mix(from.opacity, to.opacity),
            offset_x: mix(from.offset_x, to.offset_x),
            offset_y: mix(from.offset_y, to.offset_y),
            scale: mix(from.scale, to.scale),
        }
    }

    /// 是否为静止状态
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let from = VisualProps::hidden().with_offset(0.0, 40.0).with_scale(0.9);
        assert_eq!(VisualProps::lerp(&from, &VisualProps::IDENTITY, 0.0), from);
        assert_eq!(
            VisualProps::lerp(&from, &VisualProps::IDENTITY, 1.0),
            VisualProps::IDENTITY
        );

        let mid = VisualProps::lerp(&from, &VisualProps::IDENTITY, 0.5);
        assert_eq!(mid.opacity, 0.5);
        assert_eq!(mid.offset_y, 20.0);
        assert!((mid.scale - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_partial_deserialize_uses_identity() {
        let props: VisualProps = serde_json::from_str(r#"{ "opacity": 0.0 }"#).unwrap();
        assert_eq!(props, VisualProps::hidden());
    }
}
