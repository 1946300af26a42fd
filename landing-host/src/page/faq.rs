//! 常见问题：手风琴列表，同一时刻最多展开一项。

use landing_runtime::{AnimationScope, NodeRef, ScrollViewport};
use tracing::debug;

use super::{NodeAllocator, PageContext, PageError, Section, animation_error};

const HEIGHT: f32 = 1000.0;
const ITEM_TOP: f32 = 200.0;
const ITEM_PITCH: f32 = 120.0;
const ITEM_HEIGHT: f32 = 100.0;

const QUESTIONS: [&str; 5] = [
    "数据存储在哪里？",
    "是否支持多币种？",
    "可以导出账单吗？",
    "如何连接银行账户？",
    "免费版有哪些限制？",
];

pub struct FaqSection {
    title: NodeRef,
    items: Vec<NodeRef>,
    open: Option<usize>,
    scope: Option<AnimationScope<ScrollViewport>>,
}

impl FaqSection {
    pub fn new(nodes: &mut NodeAllocator) -> Self {
        Self {
            title: nodes.alloc("faq.title"),
            items: (0..QUESTIONS.len())
                .map(|i| nodes.alloc(format!("faq.item[{i}]")))
                .collect(),
            open: None,
            scope: None,
        }
    }

    /// 展开/收起条目
    ///
    /// 展开某项时收起其他项；再次点击已展开的项则收起。越界索引被忽略。
    ///
    /// # 返回
    /// 操作后展开的条目
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            debug!(index, count = self.items.len(), "FAQ 索引越界，忽略");
            return self.open;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
        debug!(open = ?self.open, question = QUESTIONS[index], "FAQ 切换");
        self.open
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn question(&self, index: usize) -> Option<&'static str> {
        QUESTIONS.get(index).copied()
    }

    pub fn items(&self) -> &[NodeRef] {
        &self.items
    }
}

impl Section for FaqSection {
    fn id(&self) -> &'static str {
        "faq"
    }

    fn height(&self) -> f32 {
        HEIGHT
    }

    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError> {
        if self.scope.is_some() {
            return Ok(());
        }

        ctx.place(self.title, 80.0, 100.0);
        for (i, item) in self.items.iter().enumerate() {
            ctx.place(*item, ITEM_TOP + i as f32 * ITEM_PITCH, ITEM_HEIGHT);
        }

        let motion = ctx.motion();
        let mut scope = ctx.scope("faq");
        scope
            .register(self.title, motion.entrance())
            .map_err(animation_error("faq"))?;
        scope
            .register_staggered(self.items.iter().copied(), &motion.entrance(), motion.stagger)
            .map_err(animation_error("faq"))?;

        self.scope = Some(scope);
        Ok(())
    }

    fn unmount(&mut self) {
        self.scope = None;
        self.open = None;
    }

    fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }
}
