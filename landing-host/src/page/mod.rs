//! # Page 模块
//!
//! 落地页组合：按顺序堆叠各区块，负责挂载/卸载，并把滚动、尺寸变化和时间推进
//! 转发给运行时。
//!
//! ## 区块顺序
//!
//! `hero` → `features` → `screenshots` → `testimonials` → `faq`
//!
//! 每个区块的锚点名就是它的 ID。

mod faq;
mod features;
mod hero;
mod screenshots;
mod testimonials;

use std::collections::HashMap;
use std::rc::Rc;

use landing_runtime::{
    AnimationScope, AnimatorError, AnimatorEvent, CarouselError, LayoutBox, Navigation, NodeRef,
    RenderSurface, ScrollViewport, SharedAnimator, SmoothScroll, VisibilityAnimator,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AppConfig, MotionConfig};
use crate::surface::RecordingSurface;

pub use faq::FaqSection;
pub use features::FeaturesSection;
pub use hero::HeroSection;
pub use screenshots::ScreenshotsSection;
pub use testimonials::TestimonialsSection;

/// 页面错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// 动画注册失败
    #[error("区块 '{section}' 注册动画失败: {source}")]
    Animation {
        section: &'static str,
        #[source]
        source: AnimatorError,
    },

    /// 轮播构造失败
    #[error("轮播初始化失败: {0}")]
    Carousel(#[from] CarouselError),

    /// 未知锚点
    #[error("未知锚点: {0}")]
    UnknownAnchor(String),

    /// 未知区块
    #[error("未知区块: {0}")]
    UnknownSection(String),
}

/// 节点分配器
///
/// 为页面上的每个可渲染节点分配唯一的 [`NodeRef`]，并记录用于日志的标签。
#[derive(Debug, Default)]
pub struct NodeAllocator {
    next: u64,
    labels: HashMap<NodeRef, String>,
}

impl NodeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配节点
    pub fn alloc(&mut self, label: impl Into<String>) -> NodeRef {
        self.next += 1;
        let node = NodeRef(self.next);
        self.labels.insert(node, label.into());
        node
    }

    /// 节点标签
    pub fn label(&self, node: NodeRef) -> Option<&str> {
        self.labels.get(&node).map(String::as_str)
    }
}

/// 挂载上下文
pub struct PageContext<'a> {
    animator: &'a SharedAnimator<ScrollViewport>,
    motion: &'a MotionConfig,
    top: f32,
}

impl<'a> PageContext<'a> {
    pub fn new(
        animator: &'a SharedAnimator<ScrollViewport>,
        motion: &'a MotionConfig,
        top: f32,
    ) -> Self {
        Self {
            animator,
            motion,
            top,
        }
    }

    /// 设置节点布局（相对区块顶部）
    pub fn place(&self, node: NodeRef, offset: f32, height: f32) {
        self.animator
            .borrow_mut()
            .service_mut()
            .set_layout(node, LayoutBox::new(self.top + offset, height));
    }

    /// 创建区块的注册作用域
    pub fn scope(&self, name: &'static str) -> AnimationScope<ScrollViewport> {
        AnimationScope::new(self.animator, name)
    }

    /// 全局动效配置
    pub fn motion(&self) -> &MotionConfig {
        self.motion
    }

    /// 区块顶部位置
    pub fn top(&self) -> f32 {
        self.top
    }
}

/// 页面区块
pub trait Section {
    /// 区块 ID（同时是锚点名）
    fn id(&self) -> &'static str;

    /// 区块高度
    fn height(&self) -> f32;

    /// 挂载：放置节点布局并注册入场动画。已挂载时为空操作。
    fn mount(&mut self, ctx: &PageContext<'_>) -> Result<(), PageError>;

    /// 卸载：注销全部动画，清除瞬态属性
    fn unmount(&mut self);

    /// 是否已挂载
    fn is_mounted(&self) -> bool;

    /// 推进区块自身的状态（轮播等）
    fn update(&mut self, _dt: f32) {}
}

/// 把作用域注册错误包装成页面错误
pub(crate) fn animation_error(section: &'static str) -> impl Fn(AnimatorError) -> PageError {
    move |source| PageError::Animation { section, source }
}

/// 落地页
pub struct LandingPage {
    config: AppConfig,
    surface: Rc<RecordingSurface>,
    animator: SharedAnimator<ScrollViewport>,
    scroller: SmoothScroll,
    nodes: NodeAllocator,
    hero: HeroSection,
    features: FeaturesSection,
    screenshots: ScreenshotsSection,
    testimonials: TestimonialsSection,
    faq: FaqSection,
}

impl LandingPage {
    /// 创建页面（尚未挂载）
    pub fn new(config: AppConfig) -> Result<Self, PageError> {
        let surface = Rc::new(RecordingSurface::new());
        let viewport = ScrollViewport::new(config.viewport.height);
        let animator =
            VisibilityAnimator::new(viewport, surface.clone() as Rc<dyn RenderSurface>)
                .into_shared();
        let scroller = SmoothScroll::new(config.scroll.easing, config.scroll.nav_offset);

        let mut nodes = NodeAllocator::new();
        let hero = HeroSection::new(&mut nodes);
        let features = FeaturesSection::new(&mut nodes);
        let screenshots = ScreenshotsSection::new(
            &mut nodes,
            surface.clone() as Rc<dyn RenderSurface>,
            &config.carousel,
        )?;
        let testimonials = TestimonialsSection::new(&mut nodes);
        let faq = FaqSection::new(&mut nodes);

        Ok(Self {
            config,
            surface,
            animator,
            scroller,
            nodes,
            hero,
            features,
            screenshots,
            testimonials,
            faq,
        })
    }

    fn sections(&self) -> [&dyn Section; 5] {
        [
            &self.hero,
            &self.features,
            &self.screenshots,
            &self.testimonials,
            &self.faq,
        ]
    }

    fn sections_mut(&mut self) -> [&mut dyn Section; 5] {
        [
            &mut self.hero,
            &mut self.features,
            &mut self.screenshots,
            &mut self.testimonials,
            &mut self.faq,
        ]
    }

    // ========== 挂载 ==========

    /// 挂载所有区块
    pub fn mount_all(&mut self) -> Result<(), PageError> {
        let animator = self.animator.clone();
        let motion = self.config.motion.clone();

        let mut top = 0.0;
        for section in self.sections_mut() {
            let ctx = PageContext::new(&animator, &motion, top);
            section.mount(&ctx)?;
            top += section.height();
        }

        info!(
            document_height = top,
            registered = self.animator.borrow().registered_count(),
            "页面挂载完成"
        );
        Ok(())
    }

    /// 挂载单个区块
    pub fn mount(&mut self, id: &str) -> Result<(), PageError> {
        let top = self
            .section_top(id)
            .ok_or_else(|| PageError::UnknownSection(id.to_string()))?;
        let animator = self.animator.clone();
        let motion = self.config.motion.clone();

        let section = self
            .sections_mut()
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| PageError::UnknownSection(id.to_string()))?;
        section.mount(&PageContext::new(&animator, &motion, top))
    }

    /// 卸载单个区块
    pub fn unmount(&mut self, id: &str) -> Result<(), PageError> {
        let section = self
            .sections_mut()
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| PageError::UnknownSection(id.to_string()))?;
        section.unmount();
        debug!(section = id, "区块已卸载");
        Ok(())
    }

    /// 卸载所有区块
    pub fn unmount_all(&mut self) {
        for section in self.sections_mut() {
            section.unmount();
        }
    }

    // ========== 事件 ==========

    /// 用户滚动到指定位置（取消进行中的平滑滚动）
    pub fn scroll_to(&mut self, y: f32) {
        self.scroller.jump_to(y);
        self.apply_scroll(self.scroller.offset());
    }

    /// 视口尺寸变化
    pub fn resize(&mut self, height: f32) {
        let mut animator = self.animator.borrow_mut();
        let crossings = animator.service_mut().resize(height);
        animator.dispatch(crossings);
    }

    /// 平滑滚动到锚点
    pub fn navigate(&mut self, anchor: &str) -> Result<(), PageError> {
        let top = self
            .section_top(anchor)
            .ok_or_else(|| PageError::UnknownAnchor(anchor.to_string()))?;
        self.scroller
            .scroll_to_anchor(top, self.config.scroll.duration);
        Ok(())
    }

    /// 推进一帧
    ///
    /// # 返回
    /// 本帧产生的动画事件
    pub fn tick(&mut self, dt: f32) -> Vec<AnimatorEvent> {
        if let Some(y) = self.scroller.update(dt) {
            self.apply_scroll(y);
        }

        let events = self.animator.borrow_mut().update(dt);
        for section in self.sections_mut() {
            section.update(dt);
        }
        events
    }

    fn apply_scroll(&mut self, y: f32) {
        let mut animator = self.animator.borrow_mut();
        let crossings = animator.service_mut().scroll_to(y);
        animator.dispatch(crossings);
    }

    // ========== 交互 ==========

    /// 截图轮播：下一张
    pub fn next_screenshot(&mut self) -> Navigation {
        self.screenshots.next()
    }

    /// 截图轮播：上一张
    pub fn previous_screenshot(&mut self) -> Navigation {
        self.screenshots.previous()
    }

    /// 截图轮播：点击缩略图
    pub fn select_screenshot(&mut self, index: usize) -> Navigation {
        self.screenshots.select(index)
    }

    /// FAQ：展开/收起条目
    pub fn toggle_faq(&mut self, index: usize) -> Option<usize> {
        self.faq.toggle(index)
    }

    // ========== 查询方法 ==========

    /// 区块顶部位置
    pub fn section_top(&self, id: &str) -> Option<f32> {
        let mut top = 0.0;
        for section in self.sections() {
            if section.id() == id {
                return Some(top);
            }
            top += section.height();
        }
        None
    }

    /// 区块 ID 列表（按页面顺序）
    pub fn section_ids(&self) -> Vec<&'static str> {
        self.sections().iter().map(|s| s.id()).collect()
    }

    /// 区块是否已挂载
    pub fn is_mounted(&self, id: &str) -> bool {
        self.sections()
            .iter()
            .any(|s| s.id() == id && s.is_mounted())
    }

    /// 文档总高度
    pub fn document_height(&self) -> f32 {
        self.sections().iter().map(|s| s.height()).sum()
    }

    /// 当前滚动偏移
    pub fn scroll_y(&self) -> f32 {
        self.scroller.offset()
    }

    /// 没有进行中的动画和平滑滚动
    pub fn is_idle(&self) -> bool {
        !self.scroller.is_scrolling()
            && !self.animator.borrow().has_active_animations()
            && !self.screenshots.carousel().is_locked()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn animator(&self) -> &SharedAnimator<ScrollViewport> {
        &self.animator
    }

    /// 节点标签
    pub fn label(&self, node: NodeRef) -> &str {
        self.nodes.label(node).unwrap_or("?")
    }

    pub fn hero(&self) -> &HeroSection {
        &self.hero
    }

    pub fn features(&self) -> &FeaturesSection {
        &self.features
    }

    pub fn screenshots(&self) -> &ScreenshotsSection {
        &self.screenshots
    }

    pub fn testimonials(&self) -> &TestimonialsSection {
        &self.testimonials
    }

    pub fn faq(&self) -> &FaqSection {
        &self.faq
    }
}

impl Drop for LandingPage {
    fn drop(&mut self) {
        self.unmount_all();
    }
}

impl std::fmt::Debug for LandingPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandingPage")
            .field("scroll_y", &self.scroll_y())
            .field("document_height", &self.document_height())
            .field("animator", &self.animator.borrow())
            .finish()
    }
}
