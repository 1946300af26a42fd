//! 截图展示：主图区域 + 缩略图条，由同一个轮播控制器驱动。
//!
//! 主图容器和缩略图条容器参与入场动画；每张幻灯片和每个缩略图的节点
//! 只由轮播写入，两者互不干扰。

use std::rc::Rc;

use landing_runtime::{
    AnimationConfig, AnimationScope, CarouselController, Navigation, NodeRef, RenderSurface,
    ScrollViewport, Slide, VisualProps,
};
use tracing::debug;

use super::{NodeAllocator, PageContext, PageError, Section, animation_error};
use crate::config::CarouselConfig;

const HEIGHT: f32 = 1100.0;

/// 非激活缩略图的不透明度
const THUMBNAIL_DIM: f32 = 0.5;

fn default_slides() -> Vec<Slide> {
    vec![
        Slide::new("dashboard", "screens/dashboard.png", "总览仪表盘"),
        Slide::new("budget", "screens/budget.png", "预算编辑"),
        Slide::new("reports", "screens/reports.png", "月度报表"),
        Slide::new("goals", "screens/goals.png", "储蓄目标进度"),
    ]
}

pub struct ScreenshotsSection {
    title: NodeRef,
    display: NodeRef,
    strip: NodeRef,
    slides: Vec<NodeRef>,
    thumbnails: Vec<NodeRef>,
    carousel: CarouselController,
    surface: Rc<dyn RenderSurface>,
    scope: Option<AnimationScope<ScrollViewport>>,
}

impl ScreenshotsSection {
    pub fn new(
        nodes: &mut NodeAllocator,
        surface: Rc<dyn RenderSurface>,
        config: &CarouselConfig,
    ) -> Result<Self, PageError> {
        let slides = default_slides();
        let slide_nodes = slides
            .iter()
            .map(|s| nodes.alloc(format!("screenshots.slide[{}]", s.id)))
            .collect();
        let thumbnails = slides
            .iter()
            .map(|s| nodes.alloc(format!("screenshots.thumb[{}]", s.id)))
            .collect();

        let mut carousel = CarouselController::new(slides, config.settle_delay)?;
        if let Some(interval) = config.autoplay_interval {
            carousel = carousel.with_autoplay(interval)?;
        }

        Ok(Self {
            title: nodes.alloc("screenshots.title"),
            display: nodes.alloc("screenshots.display"),
            strip: nodes.alloc("screenshots.strip"),
            slides: slide_nodes,
            thumbnails,
            carousel,
            surface,
            scope: None,
        })
    }

    // ========== 轮播 ==========

    pub fn next(&mut self) -> Navigation {
        let nav = self.carousel.next();
        self.after_navigation(nav)
    }

    pub fn previous(&mut self) -> Navigation {
        let nav = self.carousel.previous();
        self.after_navigation(nav)
    }

    /// 点击缩略图
    pub fn select(&mut self, index: usize) -> Navigation {
        let nav = self.carousel.go_to(index);
        self.after_navigation(nav)
    }

    fn after_navigation(&self, nav: Navigation) -> Navigation {
        if nav.moved() {
            self.render_carousel();
        } else {
            debug!(?nav, active = self.carousel.active_index(), "轮播请求未生效");
        }
        nav
    }

    /// 把当前帧写到主图与缩略图节点
    fn render_carousel(&self) {
        if self.scope.is_none() {
            return;
        }
        let frame = self.carousel.frame();
        for slide in &frame.slides {
            let main = VisualProps::IDENTITY
                .with_opacity(slide.opacity)
                .with_scale(slide.scale);
            self.surface.apply(self.slides[slide.index], main);

            let opacity = if slide.thumbnail_active {
                1.0
            } else {
                THUMBNAIL_DIM
            };
            self.surface
                .apply(self.thumbnails[slide.index], VisualProps::IDENTITY.with_opacity(opacity));
        }
    }

    // ========== 查询方法 ==========

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn title(&self) -> NodeRef {
        self.title
    }

    pub fn display(&self) -> NodeRef {
        self.display
    }

    pub fn strip(&self) -> NodeRef {
        self.strip
    }

    pub fn slide_nodes(&self) -> &[NodeRef] {
        &self.slides
    }

    pub fn thumbnail_nodes(&self) -> &[NodeRef] {
        &self.thumbnails
    }
}

impl Section for ScreenshotsSection {
    fn id(&self) -> &'static str {
        "screenshots"
    }

    fn height(&self) -> f32 {
        HEIGHT
    }

    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError> {
        if self.scope.is_some() {
            return Ok(());
        }

        ctx.place(self.title, 80.0, 100.0);
        ctx.place(self.display, 220.0, 600.0);
        ctx.place(self.strip, 860.0, 120.0);

        let motion = ctx.motion();
        let mut scope = ctx.scope("screenshots");
        scope
            .register(self.title, motion.entrance())
            .map_err(animation_error("screenshots"))?;
        scope
            .register(self.display, motion.apply(AnimationConfig::zoom_in()))
            .map_err(animation_error("screenshots"))?;
        scope
            .register(self.strip, motion.entrance().with_delay(0.3))
            .map_err(animation_error("screenshots"))?;

        self.scope = Some(scope);
        self.render_carousel();
        Ok(())
    }

    fn unmount(&mut self) {
        if self.scope.take().is_none() {
            return;
        }
        for node in self.slides.iter().chain(&self.thumbnails) {
            self.surface.clear(*node);
        }
    }

    fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    fn update(&mut self, dt: f32) {
        if let Some(nav) = self.carousel.update(dt) {
            if nav.moved() {
                debug!(?nav, "自动播放切换");
                self.render_carousel();
            }
        }
    }
}
