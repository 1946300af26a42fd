//! # Surface 模块
//!
//! 渲染表面接口：运行时只拿到不透明的节点引用，通过它写入瞬态视觉属性。
//!
//! ## 设计说明
//!
//! 方法都接受 `&self`，实现方用 `RefCell` 之类的内部可变性保存状态，
//! 这样动画器可以持有 `Rc<dyn RenderSurface>`，宿主同时也能读取。

use std::fmt;

use crate::animation::VisualProps;

/// 渲染节点引用
///
/// 由宿主分配，运行时不解释其含义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(pub u64);

impl NodeRef {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// 渲染表面
pub trait RenderSurface {
    /// 设置节点的瞬态视觉属性
    fn apply(&self, node: NodeRef, props: VisualProps);

    /// 清除节点的瞬态视觉属性，恢复标记本身的静止样式
    fn clear(&self, node: NodeRef);
}
