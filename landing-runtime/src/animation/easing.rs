//! # Easing 模块
//!
//! 缓动函数库，用于补间的时间插值。
//!
//! 名称沿用网页动效里常见的 `power2.out` 写法，配置文件可以直接填写。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EasingFunction {
    /// 线性（匀速）
    #[serde(rename = "linear", alias = "none")]
    Linear,
    /// 二次缓出
    #[serde(rename = "power1.out")]
    Power1Out,
    /// 三次缓出
    #[default]
    #[serde(rename = "power2.out")]
    Power2Out,
    /// 三次缓入缓出
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    /// 四次缓出
    #[serde(rename = "power3.out")]
    Power3Out,
    /// 正弦缓入缓出
    #[serde(rename = "sine.inOut")]
    SineInOut,
    /// 指数缓出
    #[serde(rename = "expo.out")]
    ExpoOut,
    /// 回弹缓出（略微越过终点再回落）
    #[serde(rename = "back.out")]
    BackOut,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    ///
    /// # 返回
    /// - 缓动后的进度值，端点固定为 0.0 和 1.0
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::Power2Out => 1.0 - (1.0 - t).powi(3),
            EasingFunction::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::Power3Out => 1.0 - (1.0 - t).powi(4),
            EasingFunction::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            EasingFunction::ExpoOut => expo_out(t),
            EasingFunction::BackOut => back_out(t),
        }
    }
}

/// 指数缓出
fn expo_out(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

/// 回弹缓出（overshoot = 1.70158）
fn back_out(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 8] = [
        EasingFunction::Linear,
        EasingFunction::Power1Out,
        EasingFunction::Power2Out,
        EasingFunction::Power2InOut,
        EasingFunction::Power3Out,
        EasingFunction::SineInOut,
        EasingFunction::ExpoOut,
        EasingFunction::BackOut,
    ];

    #[test]
    fn test_linear() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 0.001, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        // 超出范围应该被限制
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_out_curves_front_loaded() {
        // 缓出曲线在中点应该已经超过一半
        assert!(EasingFunction::Power2Out.apply(0.5) > 0.5);
        assert!(EasingFunction::ExpoOut.apply(0.5) > 0.5);
        let mid = EasingFunction::Power2InOut.apply(0.5);
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| EasingFunction::BackOut.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_serde_names() {
        let easing: EasingFunction = serde_json::from_str("\"power3.out\"").unwrap();
        assert_eq!(easing, EasingFunction::Power3Out);
        let easing: EasingFunction = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(easing, EasingFunction::Linear);
        assert_eq!(
            serde_json::to_string(&EasingFunction::BackOut).unwrap(),
            "\"back.out\""
        );
    }
}
