//! 功能区：标题横幅、交错出现的卡片网格、贯穿卡片的连接线。

use landing_runtime::{AnimationConfig, AnimationScope, NodeRef, ScrollViewport};

use super::{NodeAllocator, PageContext, PageError, Section, animation_error};

const HEIGHT: f32 = 1000.0;
const COLUMNS: usize = 3;
const CARD_TOP: f32 = 220.0;
const CARD_HEIGHT: f32 = 280.0;
const ROW_GAP: f32 = 40.0;

/// 卡片标题
const FEATURES: [&str; 6] = [
    "预算追踪",
    "账单提醒",
    "储蓄目标",
    "支出分析",
    "多账户同步",
    "银行级加密",
];

pub struct FeaturesSection {
    title: NodeRef,
    line: NodeRef,
    cards: Vec<NodeRef>,
    scope: Option<AnimationScope<ScrollViewport>>,
}

impl FeaturesSection {
    pub fn new(nodes: &mut NodeAllocator) -> Self {
        Self {
            title: nodes.alloc("features.title"),
            line: nodes.alloc("features.line"),
            cards: FEATURES
                .iter()
                .map(|name| nodes.alloc(format!("features.card[{name}]")))
                .collect(),
            scope: None,
        }
    }

    pub fn title(&self) -> NodeRef {
        self.title
    }

    pub fn line(&self) -> NodeRef {
        self.line
    }

    pub fn cards(&self) -> &[NodeRef] {
        &self.cards
    }
}

impl Section for FeaturesSection {
    fn id(&self) -> &'static str {
        "features"
    }

    fn height(&self) -> f32 {
        HEIGHT
    }

    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError> {
        if self.scope.is_some() {
            return Ok(());
        }

        ctx.place(self.title, 80.0, 100.0);
        ctx.place(self.line, CARD_TOP + CARD_HEIGHT / 2.0, 4.0);
        for (i, card) in self.cards.iter().enumerate() {
            let row = (i / COLUMNS) as f32;
            ctx.place(*card, CARD_TOP + row * (CARD_HEIGHT + ROW_GAP), CARD_HEIGHT);
        }

        let motion = ctx.motion();
        let mut scope = ctx.scope("features");
        scope
            .register(self.title, motion.entrance())
            .map_err(animation_error("features"))?;
        scope
            .register(self.line, motion.apply(AnimationConfig::reveal_line()))
            .map_err(animation_error("features"))?;
        scope
            .register_staggered(self.cards.iter().copied(), &motion.entrance(), motion.stagger)
            .map_err(animation_error("features"))?;

        self.scope = Some(scope);
        Ok(())
    }

    fn unmount(&mut self) {
        self.scope = None;
    }

    fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }
}
