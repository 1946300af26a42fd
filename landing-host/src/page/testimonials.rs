//! 用户评价：标题与一排评价卡片，卡片从左侧依次滑入。

use landing_runtime::{AnimationConfig, AnimationScope, NodeRef, ScrollViewport};

use super::{NodeAllocator, PageContext, PageError, Section, animation_error};

const HEIGHT: f32 = 900.0;

const AUTHORS: [&str; 3] = ["自由职业者", "小店店主", "研究生"];

pub struct TestimonialsSection {
    title: NodeRef,
    cards: Vec<NodeRef>,
    scope: Option<AnimationScope<ScrollViewport>>,
}

impl TestimonialsSection {
    pub fn new(nodes: &mut NodeAllocator) -> Self {
        Self {
            title: nodes.alloc("testimonials.title"),
            cards: AUTHORS
                .iter()
                .map(|author| nodes.alloc(format!("testimonials.card[{author}]")))
                .collect(),
            scope: None,
        }
    }

    pub fn title(&self) -> NodeRef {
        self.title
    }

    pub fn cards(&self) -> &[NodeRef] {
        &self.cards
    }
}

impl Section for TestimonialsSection {
    fn id(&self) -> &'static str {
        "testimonials"
    }

    fn height(&self) -> f32 {
        HEIGHT
    }

    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError> {
        if self.scope.is_some() {
            return Ok(());
        }

        ctx.place(self.title, 80.0, 100.0);
        for card in &self.cards {
            ctx.place(*card, 240.0, 360.0);
        }

        let motion = ctx.motion();
        let mut scope = ctx.scope("testimonials");
        scope
            .register(self.title, motion.entrance())
            .map_err(animation_error("testimonials"))?;
        scope
            .register_staggered(
                self.cards.iter().copied(),
                &motion.apply(AnimationConfig::slide_in_left()),
                motion.stagger * 1.5,
            )
            .map_err(animation_error("testimonials"))?;

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
