//! # Animator 模块
//!
//! 可见性动画器：元素越过视口阈值时播放一次性入场动画，离开时按配置反向。
//!
//! ## 状态机
//!
//! ```text
//!            In                 补间完成
//! Pending ────────► Playing ────────────► Settled
//!    ▲                │  ▲                  │
//!    │ 反向完成    Out │  │ In          Out* │
//!    │                ▼  │                  │
//!    └─────────── Reversing ◄───────────────┘
//! ```
//!
//! `Out*`：仅在 [`ToggleActions::PlayReverse`] 且元素不是首屏可见时生效。
//!
//! ## 时间模型
//!
//! 动画器不持有计时器，时间只通过 [`VisibilityAnimator::update`] 推进。
//! 注销后的元素不会再收到任何属性写入，也不会产生事件。

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::{EasingFunction, Tween, VisualProps};
use crate::error::AnimatorError;
use crate::surface::{NodeRef, RenderSurface};
use crate::visibility::{Crossing, SubscriptionId, VisibilityService};

/// 动画句柄，注册时分配，用于注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// 元素播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// 等待进入视口（处于起始状态）
    #[default]
    Pending,
    /// 正在播放入场动画（含延迟阶段）
    Playing,
    /// 已到达静止状态
    Settled,
    /// 正在反向回到起始状态
    Reversing,
}

impl PlayState {
    /// 是否有补间在进行
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Playing | Self::Reversing)
    }
}

/// 离开视口时的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleActions {
    /// 播放一次并停留；离开视口只会取消尚未完成的入场动画
    #[default]
    PlayOnce,
    /// 每次离开视口都反向，每次进入都重新播放
    PlayReverse,
}

/// 入场动画配置
///
/// `from` 是起始视觉状态，动画总是走向 [`VisualProps::IDENTITY`]。
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// 触发阈值（视口高度的比例，0.8 表示顶边越过视口 80% 处时触发）
    pub threshold: f32,
    /// 起始视觉状态
    pub from: VisualProps,
    /// 时长（秒）
    pub duration: f32,
    /// 延迟（秒）
    pub delay: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 离开视口时的行为
    pub toggle_actions: ToggleActions,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            from: VisualProps::hidden(),
            duration: 0.8,
            delay: 0.0,
            easing: EasingFunction::Power3Out,
            toggle_actions: ToggleActions::PlayOnce,
        }
    }
}

impl AnimationConfig {
    /// 自下而上淡入（标题、卡片）
    pub fn fade_up() -> Self {
        Self {
            from: VisualProps::hidden().with_offset(0.0, 50.0),
            ..Self::default()
        }
    }

    /// 从左侧滑入
    pub fn slide_in_left() -> Self {
        Self {
            from: VisualProps::hidden().with_offset(-50.0, 0.0),
            easing: EasingFunction::Power2Out,
            ..Self::default()
        }
    }

    /// 缩放淡入（截图主图）
    pub fn zoom_in() -> Self {
        Self {
            from: VisualProps::hidden().with_scale(0.9),
            duration: 0.6,
            easing: EasingFunction::BackOut,
            ..Self::default()
        }
    }

    /// 连接线展开
    pub fn reveal_line() -> Self {
        Self {
            from: VisualProps::IDENTITY.with_scale(0.0),
            duration: 1.2,
            easing: EasingFunction::Power2InOut,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_from(mut self, from: VisualProps) -> Self {
        self.from = from;
        self
    }

    pub fn with_toggle_actions(mut self, toggle_actions: ToggleActions) -> Self {
        self.toggle_actions = toggle_actions;
        self
    }

    /// 交错组中第 `index` 个元素的配置：`delay += index * unit`
    pub fn staggered(&self, index: usize, unit: f32) -> Self {
        Self {
            delay: self.delay + index as f32 * unit,
            ..self.clone()
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), AnimatorError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AnimatorError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(AnimatorError::InvalidDuration {
                duration: self.duration,
            });
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(AnimatorError::InvalidDelay { delay: self.delay });
        }
        let from = &self.from;
        if !(0.0..=1.0).contains(&from.opacity) {
            return Err(AnimatorError::InvalidFromState {
                property: "opacity",
                value: from.opacity,
                message: "必须在 0.0 - 1.0 之间".to_string(),
            });
        }
        if !from.scale.is_finite() || from.scale < 0.0 {
            return Err(AnimatorError::InvalidFromState {
                property: "scale",
                value: from.scale,
                message: "必须为非负有限值".to_string(),
            });
        }
        for (property, value) in [("offset_x", from.offset_x), ("offset_y", from.offset_y)] {
            if !value.is_finite() {
                return Err(AnimatorError::InvalidFromState {
                    property,
                    value,
                    message: "必须为有限值".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 动画器事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// 开始入场动画
    Started(AnimationHandle),
    /// 入场动画完成
    Settled(AnimationHandle),
    /// 开始反向
    Reversed(AnimationHandle),
    /// 反向完成，回到等待状态
    Reset(AnimationHandle),
}

impl AnimatorEvent {
    /// 事件所属的句柄
    pub fn handle(&self) -> AnimationHandle {
        match self {
            Self::Started(h) | Self::Settled(h) | Self::Reversed(h) | Self::Reset(h) => *h,
        }
    }
}

/// 进行中的补间
///
/// `progress` 表示元素离静止状态还有多远（0 = 起始状态，1 = 静止状态），
/// 按时间比例计算，正反切换时据此折算剩余时长。
#[derive(Debug, Clone)]
struct Motion {
    tween: Tween,
    start_progress: f32,
    forward: bool,
}

impl Motion {
    fn progress(&self) -> f32 {
        let raw = self.tween.raw_progress();
        if self.forward {
            self.start_progress + (1.0 - self.start_progress) * raw
        } else {
            self.start_progress * (1.0 - raw)
        }
    }
}

/// 已注册元素
#[derive(Debug)]
struct Entry {
    node: NodeRef,
    subscription: SubscriptionId,
    config: AnimationConfig,
    state: PlayState,
    motion: Option<Motion>,
    initially_visible: bool,
    current: VisualProps,
}

impl Entry {
    /// 当前离静止状态的进度
    fn progress(&self) -> f32 {
        match (&self.motion, self.state) {
            (Some(motion), _) => motion.progress(),
            (None, PlayState::Settled) => 1.0,
            (None, _) => 0.0,
        }
    }
}

/// 共享的动画器，供各个区块的 [`AnimationScope`] 持有
pub type SharedAnimator<V> = Rc<RefCell<VisibilityAnimator<V>>>;

/// 可见性动画器
///
/// 持有可见性触发服务和渲染表面。宿主在滚动/尺寸变化后把服务产生的穿越事件
/// 交给 [`VisibilityAnimator::dispatch`]，再每帧调用 [`VisibilityAnimator::update`]。
pub struct VisibilityAnimator<V: VisibilityService> {
    /// 可见性触发服务
    service: V,
    /// 渲染表面
    surface: Rc<dyn RenderSurface>,
    /// 已注册元素
    entries: BTreeMap<AnimationHandle, Entry>,
    /// 订阅 → 句柄
    by_subscription: HashMap<SubscriptionId, AnimationHandle>,
    /// 下一个句柄
    next_handle: u64,
    /// 待取回的事件
    events: Vec<AnimatorEvent>,
    /// 作用域在动画器被占用时释放的句柄，下次 `update` 时注销
    released: Rc<RefCell<Vec<AnimationHandle>>>,
}

impl<V: VisibilityService> fmt::Debug for VisibilityAnimator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityAnimator")
            .field("entries", &self.entries.len())
            .field("animating", &self.animating_count())
            .finish()
    }
}

impl<V: VisibilityService> VisibilityAnimator<V> {
    /// 创建动画器
    pub fn new(service: V, surface: Rc<dyn RenderSurface>) -> Self {
        Self {
            service,
            surface,
            entries: BTreeMap::new(),
            by_subscription: HashMap::new(),
            next_handle: 1,
            events: Vec::new(),
            released: Rc::default(),
        }
    }

    /// 包装为共享动画器
    pub fn into_shared(self) -> SharedAnimator<V> {
        Rc::new(RefCell::new(self))
    }

    // ========== 注册 ==========

    /// 注册元素
    ///
    /// 配置不合法时返回错误，元素不会被观察。
    /// 首屏已可见的元素立即开始入场动画，其余元素在越过阈值前不产生任何写入。
    pub fn register(
        &mut self,
        node: NodeRef,
        config: AnimationConfig,
    ) -> Result<AnimationHandle, AnimatorError> {
        config.validate()?;

        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;

        let observation = self.service.observe(node, config.threshold);
        debug!(
            handle = %handle,
            node = %node,
            threshold = config.threshold,
            initially_visible = observation.initially_visible,
            "注册入场动画"
        );

        let current = config.from;
        self.entries.insert(
            handle,
            Entry {
                node,
                subscription: observation.subscription,
                config,
                state: PlayState::Pending,
                motion: None,
                initially_visible: observation.initially_visible,
                current,
            },
        );
        self.by_subscription
            .insert(observation.subscription, handle);

        if observation.initially_visible {
            self.play_forward(handle);
        }

        Ok(handle)
    }

    /// 注销元素
    ///
    /// 取消观察、丢弃进行中的补间和未取回的事件，并清除节点的瞬态属性。
    /// 重复注销或未知句柄为空操作，返回 `false`。
    pub fn deregister(&mut self, handle: AnimationHandle) -> bool {
        let Some(entry) = self.entries.remove(&handle) else {
            return false;
        };

        self.service.unobserve(entry.subscription);
        self.by_subscription.remove(&entry.subscription);
        self.events.retain(|event| event.handle() != handle);
        self.surface.clear(entry.node);

        debug!(handle = %handle, state = ?entry.state, "注销入场动画");
        true
    }

    /// 注销作用域延后释放的句柄
    fn drain_released(&mut self) {
        let released = std::mem::take(&mut *self.released.borrow_mut());
        if released.is_empty() {
            return;
        }
        debug!(count = released.len(), "注销延后释放的句柄");
        for handle in released {
            self.deregister(handle);
        }
    }

    /// 检查句柄是否仍然有效
    pub fn is_registered(&self, handle: AnimationHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// 已注册元素数量
    pub fn registered_count(&self) -> usize {
        self.entries.len()
    }

    // ========== 事件派发 ==========

    /// 派发一批穿越事件
    pub fn dispatch(&mut self, crossings: impl IntoIterator<Item = (SubscriptionId, Crossing)>) {
        for (subscription, crossing) in crossings {
            self.on_crossing(subscription, crossing);
        }
    }

    /// 处理单个穿越事件
    ///
    /// 未知订阅（例如已注销元素的残留事件）被忽略。
    pub fn on_crossing(&mut self, subscription: SubscriptionId, crossing: Crossing) {
        self.drain_released();

        let Some(&handle) = self.by_subscription.get(&subscription) else {
            debug!(subscription = %subscription, "忽略未知订阅的穿越事件");
            return;
        };
        let Some(entry) = self.entries.get(&handle) else {
            return;
        };

        match (crossing, entry.state) {
            (Crossing::In, PlayState::Pending | PlayState::Reversing) => {
                self.play_forward(handle);
            }
            (Crossing::Out, PlayState::Playing) => {
                self.play_reverse(handle);
            }
            (Crossing::Out, PlayState::Settled) => {
                let reversible = entry.config.toggle_actions == ToggleActions::PlayReverse
                    && !entry.initially_visible;
                if reversible {
                    self.play_reverse(handle);
                }
            }
            // 进行中不重播；已在起始状态不需要反向
            (Crossing::In, PlayState::Playing | PlayState::Settled)
            | (Crossing::Out, PlayState::Pending | PlayState::Reversing) => {}
        }
    }

    /// 开始（或从反向中恢复）入场动画
    fn play_forward(&mut self, handle: AnimationHandle) {
        let Some(entry) = self.entries.get_mut(&handle) else {
            return;
        };

        let start_progress = entry.progress();
        // 从反向中恢复时不再等待延迟，按剩余进度折算时长；
        // 尚未离开起始状态（例如在延迟阶段被打断）时按首次播放处理，保留交错延迟
        let resuming = entry.state == PlayState::Reversing && start_progress > 0.0;
        let tween = if resuming {
            Tween::new(
                entry.current,
                VisualProps::IDENTITY,
                entry.config.duration * (1.0 - start_progress),
            )
        } else {
            Tween::new(entry.config.from, VisualProps::IDENTITY, entry.config.duration)
                .with_delay(entry.config.delay)
        }
        .with_easing(entry.config.easing);

        let from = tween.from;
        entry.motion = Some(Motion {
            tween,
            start_progress: if resuming { start_progress } else { 0.0 },
            forward: true,
        });
        entry.state = PlayState::Playing;
        entry.current = from;
        self.surface.apply(entry.node, from);
        self.events.push(AnimatorEvent::Started(handle));
    }

    /// 取消入场动画并反向回到起始状态
    fn play_reverse(&mut self, handle: AnimationHandle) {
        let Some(entry) = self.entries.get_mut(&handle) else {
            return;
        };

        let start_progress = entry.progress();
        let tween = Tween::new(
            entry.current,
            entry.config.from,
            entry.config.duration * start_progress,
        )
        .with_easing(entry.config.easing);

        entry.motion = Some(Motion {
            tween,
            start_progress,
            forward: false,
        });
        entry.state = PlayState::Reversing;
        self.events.push(AnimatorEvent::Reversed(handle));
    }

    // ========== 时间推进 ==========

    /// 推进所有补间并写入渲染表面
    ///
    /// # 返回
    /// 返回自上次调用以来产生的事件
    pub fn update(&mut self, dt: f32) -> Vec<AnimatorEvent> {
        self.drain_released();

        for (handle, entry) in self.entries.iter_mut() {
            let Some(motion) = entry.motion.as_mut() else {
                continue;
            };

            let running = motion.tween.update(dt);
            let props = motion.tween.current();
            let forward = motion.forward;
            entry.current = props;
            self.surface.apply(entry.node, props);

            if !running {
                entry.motion = None;
                if forward {
                    entry.state = PlayState::Settled;
                    self.events.push(AnimatorEvent::Settled(*handle));
                } else {
                    entry.state = PlayState::Pending;
                    self.events.push(AnimatorEvent::Reset(*handle));
                }
            }
        }

        std::mem::take(&mut self.events)
    }

    // ========== 查询方法 ==========

    /// 元素的播放状态
    pub fn play_state(&self, handle: AnimationHandle) -> Option<PlayState> {
        self.entries.get(&handle).map(|e| e.state)
    }

    /// 元素最近一次写入的视觉属性
    pub fn current_props(&self, handle: AnimationHandle) -> Option<VisualProps> {
        self.entries.get(&handle).map(|e| e.current)
    }

    /// 元素对应的节点
    pub fn node(&self, handle: AnimationHandle) -> Option<NodeRef> {
        self.entries.get(&handle).map(|e| e.node)
    }

    /// 是否有补间在进行
    pub fn has_active_animations(&self) -> bool {
        self.entries.values().any(|e| e.state.is_animating())
    }

    /// 正在进行补间的元素数量
    pub fn animating_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.state.is_animating())
            .count()
    }

    /// 可见性触发服务
    pub fn service(&self) -> &V {
        &self.service
    }

    /// 可见性触发服务（可变），宿主用它驱动滚动
    pub fn service_mut(&mut self) -> &mut V {
        &mut self.service
    }
}

/// 区块级注册作用域
///
/// 区块挂载时创建，持有该区块所有元素的句柄；`dispose` 或 `Drop` 时一并注销。
/// 释放时动画器正被借用，则句柄进入动画器的延后注销队列，不会泄漏。
pub struct AnimationScope<V: VisibilityService + 'static> {
    /// 作用域名称（用于日志）
    name: String,
    /// 动画器（弱引用，动画器先于作用域销毁时不做任何事）
    animator: Weak<RefCell<VisibilityAnimator<V>>>,
    /// 已注册句柄
    handles: Vec<AnimationHandle>,
    /// 动画器的延后注销队列（首次注册成功时取得）
    released: Option<Rc<RefCell<Vec<AnimationHandle>>>>,
}

impl<V: VisibilityService + 'static> AnimationScope<V> {
    /// 创建作用域
    pub fn new(animator: &SharedAnimator<V>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animator: Rc::downgrade(animator),
            handles: Vec::new(),
            released: None,
        }
    }

    /// 注册单个元素
    pub fn register(
        &mut self,
        node: NodeRef,
        config: AnimationConfig,
    ) -> Result<AnimationHandle, AnimatorError> {
        let Some(animator) = self.animator.upgrade() else {
            warn!(scope = %self.name, "动画器已销毁，无法注册");
            return Err(AnimatorError::Detached);
        };
        let mut animator = animator.borrow_mut();
        let handle = animator.register(node, config)?;
        self.released
            .get_or_insert_with(|| Rc::clone(&animator.released));
        self.handles.push(handle);
        Ok(handle)
    }

    /// 注册交错组：第 i 个元素延迟 `base.delay + i * stagger`
    ///
    /// 配置在注册任何元素之前整体校验，失败时不会注册组内任何元素。
    pub fn register_staggered(
        &mut self,
        nodes: impl IntoIterator<Item = NodeRef>,
        base: &AnimationConfig,
        stagger: f32,
    ) -> Result<Vec<AnimationHandle>, AnimatorError> {
        base.validate()?;
        if !stagger.is_finite() || stagger < 0.0 {
            return Err(AnimatorError::InvalidDelay { delay: stagger });
        }

        nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| self.register(node, base.staggered(index, stagger)))
            .collect()
    }

    /// 作用域内的句柄
    pub fn handles(&self) -> &[AnimationHandle] {
        &self.handles
    }

    /// 注销作用域内所有元素
    pub fn dispose(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        let Some(animator) = self.animator.upgrade() else {
            self.handles.clear();
            return;
        };
        let Ok(mut animator) = animator.try_borrow_mut() else {
            // 交给动画器在下一次派发或 update 时注销
            let queued = self
                .released
                .as_ref()
                .and_then(|released| released.try_borrow_mut().ok());
            match queued {
                Some(mut released) => {
                    debug!(scope = %self.name, count = self.handles.len(), "动画器正被占用，延后注销");
                    released.append(&mut self.handles);
                }
                None => {
                    warn!(scope = %self.name, count = self.handles.len(), "动画器正被占用，无法注销");
                }
            }
            return;
        };
        for handle in self.handles.drain(..) {
            animator.deregister(handle);
        }
        debug!(scope = %self.name, "作用域已释放");
    }
}

impl<V: VisibilityService + 'static> Drop for AnimationScope<V> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<V: VisibilityService + 'static> fmt::Debug for AnimationScope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationScope")
            .field("name", &self.name)
            .field("handles", &self.handles.len())
            .finish()
    }
}
