//! # Surface 模块
//!
//! headless 渲染表面：记录每个节点当前的瞬态视觉属性，替代真实的 DOM 树。

use std::cell::RefCell;
use std::collections::HashMap;

use landing_runtime::{NodeRef, RenderSurface, VisualProps};

/// 单个节点的记录
#[derive(Debug, Clone, Default)]
struct NodeRecord {
    /// 当前瞬态属性；`None` 表示显示标记本身的静止样式
    props: Option<VisualProps>,
    /// 累计写入次数
    writes: usize,
}

/// 记录型渲染表面
#[derive(Debug, Default)]
pub struct RecordingSurface {
    nodes: RefCell<HashMap<NodeRef, NodeRecord>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 节点当前的瞬态属性
    pub fn props(&self, node: NodeRef) -> Option<VisualProps> {
        self.nodes.borrow().get(&node).and_then(|r| r.props)
    }

    /// 节点最终呈现的属性（没有瞬态属性时为静止状态）
    pub fn rendered(&self, node: NodeRef) -> VisualProps {
        self.props(node).unwrap_or(VisualProps::IDENTITY)
    }

    /// 节点累计写入次数
    pub fn writes(&self, node: NodeRef) -> usize {
        self.nodes.borrow().get(&node).map_or(0, |r| r.writes)
    }

    /// 所有节点的累计写入次数
    pub fn total_writes(&self) -> usize {
        self.nodes.borrow().values().map(|r| r.writes).sum()
    }
}

impl RenderSurface for RecordingSurface {
    fn apply(&self, node: NodeRef, props: VisualProps) {
        let mut nodes = self.nodes.borrow_mut();
        let record = nodes.entry(node).or_default();
        record.props = Some(props);
        record.writes += 1;
    }

    fn clear(&self, node: NodeRef) {
        if let Some(record) = self.nodes.borrow_mut().get_mut(&node) {
            record.props = None;
        }
    }
}
