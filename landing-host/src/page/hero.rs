//! 首屏横幅：标题、副标题、行动按钮依次淡入。

use landing_runtime::{AnimationScope, NodeRef, ScrollViewport};

use super::{NodeAllocator, PageContext, PageError, Section, animation_error};

const HEIGHT: f32 = 900.0;

pub struct HeroSection {
    title: NodeRef,
    subtitle: NodeRef,
    cta: NodeRef,
    scope: Option<AnimationScope<ScrollViewport>>,
}

impl HeroSection {
    pub fn new(nodes: &mut NodeAllocator) -> Self {
        Self {
            title: nodes.alloc("hero.title"),
            subtitle: nodes.alloc("hero.subtitle"),
            cta: nodes.alloc("hero.cta"),
            scope: None,
        }
    }

    /// 按出现顺序排列的节点
    pub fn nodes(&self) -> [NodeRef; 3] {
        [self.title, self.subtitle, self.cta]
    }
}

impl Section for HeroSection {
    fn id(&self) -> &'static str {
        "hero"
    }

    fn height(&self) -> f32 {
        HEIGHT
    }

    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError> {
        if self.scope.is_some() {
            return Ok(());
        }

        ctx.place(self.title, 250.0, 120.0);
        ctx.place(self.subtitle, 400.0, 60.0);
        ctx.place(self.cta, 500.0, 56.0);

        // 首屏元素在注册时即开始播放，间隔比卡片组更大
        let mut scope = ctx.scope("hero");
        scope
            .register_staggered(self.nodes(), &ctx.motion().entrance(), 0.2)
            .map_err(animation_error("hero"))?;
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
