//! # 页面生命周期集成测试
//!
//! 测试 LandingPage → VisibilityAnimator → RecordingSurface 的完整链路。
//! 这些测试不依赖真实的浏览器环境。

use landing_host::{AppConfig, LandingPage, PageError};
use landing_runtime::{AnimatorEvent, Navigation, VisualProps};

const DT: f32 = 1.0 / 60.0;

fn mounted_page() -> LandingPage {
    let mut page = LandingPage::new(AppConfig::default()).unwrap();
    page.mount_all().unwrap();
    page
}

/// 推进直到空闲，返回期间产生的全部事件
fn settle(page: &mut LandingPage) -> Vec<AnimatorEvent> {
    let mut events = Vec::new();
    for _ in 0..600 {
        if page.is_idle() {
            break;
        }
        events.extend(page.tick(DT));
    }
    assert!(page.is_idle(), "页面在 10 秒内没有空闲");
    events
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// 首屏元素在挂载时开始播放，首屏以下的区块不产生任何写入
#[test]
fn test_mount_plays_hero_only() {
    let page = mounted_page();

    for node in page.hero().nodes() {
        let props = page.surface().props(node).expect("首屏元素应已写入起始状态");
        assert!(approx(props.opacity, 0.0));
        assert!(approx(props.offset_y, 50.0));
    }

    let features = page.features();
    assert_eq!(page.surface().writes(features.title()), 0);
    assert_eq!(page.surface().writes(features.line()), 0);
    for card in features.cards() {
        assert_eq!(page.surface().writes(*card), 0);
    }
    assert_eq!(page.surface().writes(page.faq().items()[0]), 0);
}

/// 首屏入场完成后停在静止状态
#[test]
fn test_hero_settles() {
    let mut page = mounted_page();
    let events = settle(&mut page);

    let settled = events
        .iter()
        .filter(|e| matches!(e, AnimatorEvent::Settled(_)))
        .count();
    assert_eq!(settled, 3);
    for node in page.hero().nodes() {
        let props = page.surface().rendered(node);
        assert!(approx(props.opacity, 1.0));
        assert!(approx(props.offset_y, 0.0));
    }
}

/// 滚动越过阈值后功能区标题入场，卡片仍在等待
#[test]
fn test_scroll_triggers_features() {
    let mut page = mounted_page();
    settle(&mut page);

    // 触发线 = 400 + 0.8 * 900 = 1120，标题顶部 980
    page.scroll_to(400.0);
    let title = page.features().title();
    assert!(page.surface().props(title).is_some());
    assert_eq!(page.surface().writes(page.features().cards()[0]), 0);

    settle(&mut page);
    assert!(approx(page.surface().rendered(title).opacity, 1.0));

    // 第一行卡片顶部 1120，再往下滚一点
    page.scroll_to(600.0);
    let cards = page.features().cards();
    assert!(page.surface().props(cards[0]).is_some());
    assert!(page.surface().props(cards[2]).is_some());
    assert_eq!(page.surface().writes(cards[3]), 0);
}

/// 交错组中靠后的卡片等待更久才开始移动
#[test]
fn test_staggered_cards() {
    let mut page = mounted_page();
    settle(&mut page);
    page.scroll_to(600.0);

    page.tick(0.15);
    let cards = page.features().cards();
    let first = page.surface().rendered(cards[0]);
    let third = page.surface().rendered(cards[2]);
    assert!(first.opacity > 0.0);
    assert!(approx(third.opacity, 0.0));
}

/// 离开视口后反向回到起始状态，再次进入时重新播放
#[test]
fn test_reverse_and_replay() {
    let mut page = mounted_page();
    settle(&mut page);

    page.scroll_to(400.0);
    settle(&mut page);
    let title = page.features().title();

    page.scroll_to(0.0);
    let events = settle(&mut page);
    assert!(events.iter().any(|e| matches!(e, AnimatorEvent::Reversed(_))));
    assert!(events.iter().any(|e| matches!(e, AnimatorEvent::Reset(_))));
    let props = page.surface().rendered(title);
    assert!(approx(props.opacity, 0.0));
    assert!(approx(props.offset_y, 50.0));

    page.scroll_to(400.0);
    settle(&mut page);
    assert!(approx(page.surface().rendered(title).opacity, 1.0));
}

/// 首屏元素完成入场后不参与反向
#[test]
fn test_hero_exempt_from_reverse() {
    let mut page = mounted_page();
    settle(&mut page);

    page.scroll_to(2000.0);
    let events = settle(&mut page);
    let hero_handles: Vec<_> = {
        let animator = page.animator().borrow();
        events
            .iter()
            .filter(|e| {
                animator
                    .node(e.handle())
                    .is_some_and(|node| page.hero().nodes().contains(&node))
            })
            .cloned()
            .collect()
    };
    assert!(hero_handles.is_empty());
    for node in page.hero().nodes() {
        assert!(approx(page.surface().rendered(node).opacity, 1.0));
    }
}

/// 视口变高同样会触发入场
#[test]
fn test_resize_triggers_entrance() {
    let mut page = mounted_page();
    settle(&mut page);

    // 触发线 = 0.8 * 1300 = 1040 > 980
    page.resize(1300.0);
    assert!(page.surface().props(page.features().title()).is_some());
}

/// 过渡中卸载：清除瞬态属性，之后不再写入
#[test]
fn test_unmount_mid_transition() {
    let mut page = mounted_page();
    settle(&mut page);
    page.scroll_to(600.0);
    page.tick(0.2);

    let title = page.features().title();
    assert!(page.surface().props(title).is_some());
    let writes = page.surface().writes(title);

    page.unmount("features").unwrap();
    assert!(!page.is_mounted("features"));
    assert_eq!(page.surface().props(title), None);
    assert_eq!(page.surface().rendered(title), VisualProps::IDENTITY);

    for _ in 0..120 {
        page.tick(DT);
    }
    assert_eq!(page.surface().writes(title), writes);
    for card in page.features().cards() {
        assert_eq!(page.surface().props(*card), None);
    }

    // 重新挂载后按当前滚动位置重新判断
    page.mount("features").unwrap();
    assert!(page.is_mounted("features"));
    assert!(page.surface().props(title).is_some());
}

#[test]
fn test_unknown_section() {
    let mut page = mounted_page();
    assert_eq!(
        page.unmount("pricing"),
        Err(PageError::UnknownSection("pricing".to_string()))
    );
    assert_eq!(
        page.navigate("pricing"),
        Err(PageError::UnknownAnchor("pricing".to_string()))
    );
}

/// 轮播连续切换：每次等待锁释放，在末尾回绕
#[test]
fn test_carousel_next_sequence() {
    let mut page = mounted_page();
    let mut visited = Vec::new();
    for _ in 0..5 {
        assert!(page.next_screenshot().moved());
        visited.push(page.screenshots().carousel().active_index());
        page.tick(0.5);
    }
    assert_eq!(visited, vec![1, 2, 3, 0, 1]);

    let screenshots = page.screenshots();
    for (i, node) in screenshots.slide_nodes().iter().enumerate() {
        let props = page.surface().rendered(*node);
        let thumb = page.surface().rendered(screenshots.thumbnail_nodes()[i]);
        if i == 1 {
            assert_eq!(props.opacity, 1.0);
            assert_eq!(thumb.opacity, 1.0);
        } else {
            assert_eq!(props.opacity, 0.0);
            assert_eq!(thumb.opacity, 0.5);
        }
    }
}

/// 锁定期间的请求被丢弃，不排队
#[test]
fn test_carousel_locked_requests_dropped() {
    let mut page = mounted_page();

    assert_eq!(
        page.next_screenshot(),
        Navigation::Moved { from: 0, to: 1 }
    );
    assert_eq!(page.next_screenshot(), Navigation::Locked);
    assert_eq!(page.select_screenshot(3), Navigation::Locked);

    page.tick(0.5);
    assert_eq!(page.screenshots().carousel().active_index(), 1);
    assert!(!page.screenshots().carousel().is_locked());

    assert_eq!(page.select_screenshot(1), Navigation::AlreadyActive);
    assert_eq!(page.select_screenshot(9), Navigation::OutOfRange);
    assert_eq!(
        page.previous_screenshot(),
        Navigation::Moved { from: 1, to: 0 }
    );
}

/// 自动播放在锁释放后切换
#[test]
fn test_carousel_autoplay() {
    let mut config = AppConfig::default();
    config.carousel.autoplay_interval = Some(3.0);
    let mut page = LandingPage::new(config).unwrap();
    page.mount_all().unwrap();

    page.tick(2.9);
    assert_eq!(page.screenshots().carousel().active_index(), 0);
    page.tick(0.2);
    assert_eq!(page.screenshots().carousel().active_index(), 1);
}

/// 锚点导航：平滑滚动到区块顶部减去导航栏高度
#[test]
fn test_anchor_navigation() {
    let mut page = mounted_page();
    settle(&mut page);

    page.navigate("features").unwrap();
    page.tick(DT);
    assert!(page.scroll_y() > 0.0);
    assert!(page.scroll_y() < 820.0);

    settle(&mut page);
    assert!(approx(page.scroll_y(), 820.0));
    // 滚动途中越过阈值，标题已入场
    assert!(approx(
        page.surface().rendered(page.features().title()).opacity,
        1.0
    ));

    page.navigate("hero").unwrap();
    settle(&mut page);
    assert!(approx(page.scroll_y(), 0.0));
}

/// 手动滚动取消进行中的平滑滚动
#[test]
fn test_manual_scroll_cancels_anchor() {
    let mut page = mounted_page();
    page.navigate("faq").unwrap();
    page.tick(DT);

    page.scroll_to(100.0);
    page.tick(DT);
    assert_eq!(page.scroll_y(), 100.0);
}

#[test]
fn test_faq_toggle() {
    let mut page = mounted_page();
    assert_eq!(page.faq().open_item(), None);

    assert_eq!(page.toggle_faq(1), Some(1));
    assert_eq!(page.toggle_faq(3), Some(3));
    assert_eq!(page.toggle_faq(3), None);
    assert_eq!(page.toggle_faq(2), Some(2));
    // 越界忽略
    assert_eq!(page.toggle_faq(42), Some(2));
}

#[test]
fn test_page_layout() {
    let page = mounted_page();
    assert_eq!(
        page.section_ids(),
        vec!["hero", "features", "screenshots", "testimonials", "faq"]
    );
    assert_eq!(page.section_top("hero"), Some(0.0));
    assert_eq!(page.section_top("features"), Some(900.0));
    assert_eq!(page.section_top("screenshots"), Some(1900.0));
    assert_eq!(page.document_height(), 4900.0);
    assert_eq!(page.label(page.hero().nodes()[0]), "hero.title");
}

/// 页面销毁时注销全部元素
#[test]
fn test_drop_unregisters_everything() {
    let page = mounted_page();
    let animator = page.animator().clone();
    assert!(animator.borrow().registered_count() > 0);

    drop(page);
    assert_eq!(animator.borrow().registered_count(), 0);
    assert_eq!(animator.borrow().service().watch_count(), 0);
}
