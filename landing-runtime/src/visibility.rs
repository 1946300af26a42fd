//! # Visibility 模块
//!
//! 可见性触发服务：观察节点相对视口阈值线的位置，报告进入/离开事件。
//!
//! ## 判定规则
//!
//! 阈值线位于 `scroll_y + threshold * viewport_height`。节点满足以下两条即视为"在内"：
//! - 顶边已越过阈值线（`top < 阈值线`）
//! - 底边仍在视口顶部之下（`top + height > scroll_y`）
//!
//! 状态变化时产生一个 [`Crossing`]，不变则不产生。

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::surface::NodeRef;

/// 订阅 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// 穿越方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// 进入视口阈值
    In,
    /// 离开视口阈值
    Out,
}

/// 观察结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// 订阅 ID，用于取消观察和匹配穿越事件
    pub subscription: SubscriptionId,
    /// 首次绘制时节点是否已经在阈值内
    pub initially_visible: bool,
}

/// 可见性触发服务
///
/// 运行时通过它注册观察；穿越事件由宿主在滚动/尺寸变化时取回并派发给动画器。
pub trait VisibilityService {
    /// 开始观察节点
    fn observe(&mut self, node: NodeRef, threshold: f32) -> Observation;

    /// 取消观察，未知订阅为空操作
    fn unobserve(&mut self, subscription: SubscriptionId);
}

/// 节点布局盒（文档坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    /// 顶边位置
    pub top: f32,
    /// 高度
    pub height: f32,
}

impl LayoutBox {
    pub fn new(top: f32, height: f32) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    /// 底边位置
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// 单个观察
#[derive(Debug, Clone)]
struct Watch {
    node: NodeRef,
    threshold: f32,
    inside: bool,
}

/// 基于布局盒的滚动视口
///
/// 宿主提供每个节点的布局盒，调用 [`ScrollViewport::scroll_to`] /
/// [`ScrollViewport::resize`] 后得到按订阅顺序排列的穿越事件。
#[derive(Debug)]
pub struct ScrollViewport {
    /// 当前滚动偏移
    scroll_y: f32,
    /// 视口高度
    height: f32,
    /// 节点布局
    layouts: HashMap<NodeRef, LayoutBox>,
    /// 观察列表（按订阅顺序）
    watches: BTreeMap<SubscriptionId, Watch>,
    /// 下一个订阅 ID
    next_subscription: u64,
}

impl ScrollViewport {
    /// 创建视口，初始滚动位置为 0
    pub fn new(height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            height: height.max(0.0),
            layouts: HashMap::new(),
            watches: BTreeMap::new(),
            next_subscription: 1,
        }
    }

    /// 设置节点布局
    ///
    /// 不会立即产生事件，调用 [`ScrollViewport::refresh`] 取回变化。
    pub fn set_layout(&mut self, node: NodeRef, layout: LayoutBox) {
        self.layouts.insert(node, layout);
    }

    /// 移除节点布局
    pub fn remove_layout(&mut self, node: NodeRef) {
        self.layouts.remove(&node);
    }

    /// 获取节点布局
    pub fn layout(&self, node: NodeRef) -> Option<LayoutBox> {
        self.layouts.get(&node).copied()
    }

    /// 滚动到指定位置
    pub fn scroll_to(&mut self, y: f32) -> Vec<(SubscriptionId, Crossing)> {
        self.scroll_y = y.max(0.0);
        self.refresh()
    }

    /// 修改视口高度
    pub fn resize(&mut self, height: f32) -> Vec<(SubscriptionId, Crossing)> {
        self.height = height.max(0.0);
        self.refresh()
    }

    /// 重新计算所有观察的状态，返回发生变化的穿越事件
    pub fn refresh(&mut self) -> Vec<(SubscriptionId, Crossing)> {
        let mut crossings = Vec::new();
        for (id, watch) in self.watches.iter_mut() {
            let inside = is_inside(
                self.layouts.get(&watch.node),
                watch.threshold,
                self.scroll_y,
                self.height,
            );
            if inside != watch.inside {
                watch.inside = inside;
                let crossing = if inside { Crossing::In } else { Crossing::Out };
                crossings.push((*id, crossing));
            }
        }
        if !crossings.is_empty() {
            debug!(scroll_y = self.scroll_y, count = crossings.len(), "视口穿越");
        }
        crossings
    }

    /// 当前滚动偏移
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// 视口高度
    pub fn height(&self) -> f32 {
        self.height
    }

    /// 观察数量
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// 订阅是否仍有效
    pub fn is_observing(&self, subscription: SubscriptionId) -> bool {
        self.watches.contains_key(&subscription)
    }
}

fn is_inside(layout: Option<&LayoutBox>, threshold: f32, scroll_y: f32, height: f32) -> bool {
    let Some(layout) = layout else {
        return false;
    };
    let trigger_line = scroll_y + threshold * height;
    layout.top < trigger_line && layout.bottom() > scroll_y
}

impl VisibilityService for ScrollViewport {
    fn observe(&mut self, node: NodeRef, threshold: f32) -> Observation {
        let subscription = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        if !self.layouts.contains_key(&node) {
            debug!(node = %node, "观察的节点没有布局，视为不可见");
        }
        let inside = is_inside(self.layouts.get(&node), threshold, self.scroll_y, self.height);
        self.watches.insert(
            subscription,
            Watch {
                node,
                threshold,
                inside,
            },
        );

        Observation {
            subscription,
            initially_visible: inside,
        }
    }

    fn unobserve(&mut self, subscription: SubscriptionId) {
        self.watches.remove(&subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_with(node: NodeRef, top: f32) -> ScrollViewport {
        let mut viewport = ScrollViewport::new(1000.0);
        viewport.set_layout(node, LayoutBox::new(top, 200.0));
        viewport
    }

    #[test]
    fn test_initially_visible() {
        let node = NodeRef(1);
        let mut viewport = viewport_with(node, 100.0);
        let obs = viewport.observe(node, 0.8);
        assert!(obs.initially_visible);

        let below = NodeRef(2);
        viewport.set_layout(below, LayoutBox::new(900.0, 200.0));
        let obs = viewport.observe(below, 0.8);
        // 900 > 800 阈值线，还没进入
        assert!(!obs.initially_visible);
    }

    #[test]
    fn test_scroll_crossings() {
        let node = NodeRef(1);
        let mut viewport = viewport_with(node, 1500.0);
        let obs = viewport.observe(node, 0.8);
        assert!(!obs.initially_visible);

        // 阈值线 = 600 + 800 = 1400，未越过
        assert!(viewport.scroll_to(600.0).is_empty());

        // 阈值线 = 800 + 800 = 1600，进入
        assert_eq!(
            viewport.scroll_to(800.0),
            vec![(obs.subscription, Crossing::In)]
        );

        // 同侧滚动不重复报告
        assert!(viewport.scroll_to(900.0).is_empty());

        // 向上滚回阈值线以下，离开
        assert_eq!(
            viewport.scroll_to(100.0),
            vec![(obs.subscription, Crossing::Out)]
        );
    }

    #[test]
    fn test_scroll_past_leaves() {
        let node = NodeRef(1);
        let mut viewport = viewport_with(node, 100.0);
        let obs = viewport.observe(node, 0.8);
        assert!(obs.initially_visible);

        // 底边 300 已在视口顶部之上
        assert_eq!(
            viewport.scroll_to(400.0),
            vec![(obs.subscription, Crossing::Out)]
        );
    }

    #[test]
    fn test_resize_crossings() {
        let node = NodeRef(1);
        let mut viewport = viewport_with(node, 700.0);
        let obs = viewport.observe(node, 0.5);
        assert!(!obs.initially_visible);

        assert_eq!(
            viewport.resize(2000.0),
            vec![(obs.subscription, Crossing::In)]
        );
    }

    #[test]
    fn test_unobserve_is_idempotent() {
        let node = NodeRef(1);
        let mut viewport = viewport_with(node, 1500.0);
        let obs = viewport.observe(node, 0.8);

        viewport.unobserve(obs.subscription);
        viewport.unobserve(obs.subscription);
        assert!(!viewport.is_observing(obs.subscription));
        assert!(viewport.scroll_to(2000.0).is_empty());
    }

    #[test]
    fn test_missing_layout_never_crosses() {
        let mut viewport = ScrollViewport::new(1000.0);
        let obs = viewport.observe(NodeRef(9), 1.0);
        assert!(!obs.initially_visible);
        assert!(viewport.scroll_to(5000.0).is_empty());
    }
}
