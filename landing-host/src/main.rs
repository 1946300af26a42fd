//! # Landing Host
//!
//! 以 headless 方式运行落地页，并用日志输出动画与轮播事件。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p landing-host
//! cargo run -p landing-host -- simulate --to 3000 --speed 1500
//! cargo run -p landing-host -- gallery --steps 6 --previous
//! cargo run -p landing-host -- anchor faq
//! cargo run -p landing-host -- --config my.json -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use landing_host::{AppConfig, LandingPage};
use landing_runtime::AnimatorEvent;
use tracing::{Level, debug, error, info};

/// 模拟时长上限（秒），防止配置异常时无限循环
const MAX_SIMULATED_SECONDS: f32 = 120.0;

#[derive(Parser)]
#[command(name = "landing-host")]
#[command(about = "落地页动效 headless 模拟器")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 覆盖配置中的模拟帧率
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 匀速滚动页面，观察各区块入场（默认命令）
    Simulate {
        /// 目标滚动位置（默认：文档底部）
        #[arg(long)]
        to: Option<f32>,

        /// 滚动速度（像素/秒）
        #[arg(long, default_value = "1200")]
        speed: f32,
    },

    /// 连续切换截图轮播
    Gallery {
        /// 切换次数
        #[arg(long, default_value = "5")]
        steps: usize,

        /// 反方向切换
        #[arg(long)]
        previous: bool,
    },

    /// 平滑滚动到锚点
    Anchor {
        /// 锚点名（区块 ID）
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 先读取配置以确定日志级别，订阅器就绪后再记录读取结果
    let loaded = AppConfig::read(&cli.config);
    let log_level = loaded
        .as_ref()
        .map_or("info", |config| config.debug.log_level.as_str());
    init_tracing(log_level, cli.verbose);

    let mut config = AppConfig::or_default(&cli.config, loaded);
    if let Some(fps) = cli.fps {
        config.debug.fps = fps;
    }

    if let Err(e) = run(cli.command, config) {
        error!("{e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing(log_level: &str, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        log_level.parse().unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn run(command: Option<Commands>, config: AppConfig) -> anyhow::Result<()> {
    config.validate().context("配置无效")?;

    let dt = config.frame_dt();
    let mut page = LandingPage::new(config).context("页面初始化失败")?;
    page.mount_all().context("页面挂载失败")?;
    info!(
        sections = ?page.section_ids(),
        document_height = page.document_height(),
        "页面已就绪"
    );

    // 首屏入场
    run_until_idle(&mut page, dt);

    match command.unwrap_or(Commands::Simulate {
        to: None,
        speed: 1200.0,
    }) {
        Commands::Simulate { to, speed } => simulate(&mut page, to, speed, dt)?,
        Commands::Gallery { steps, previous } => gallery(&mut page, steps, previous, dt)?,
        Commands::Anchor { name } => {
            page.navigate(&name)?;
            run_until_idle(&mut page, dt);
            info!(anchor = %name, scroll_y = page.scroll_y(), "已到达锚点");
        }
    }

    info!(writes = page.surface().total_writes(), "模拟结束");
    Ok(())
}

fn simulate(page: &mut LandingPage, to: Option<f32>, speed: f32, dt: f32) -> anyhow::Result<()> {
    if !speed.is_finite() || speed <= 0.0 {
        anyhow::bail!("滚动速度必须大于 0: {speed}");
    }

    let bottom = (page.document_height() - page.config().viewport.height).max(0.0);
    let target = to.unwrap_or(bottom).clamp(0.0, bottom);
    info!(target, speed, "开始滚动");

    let mut y = page.scroll_y();
    let mut elapsed = 0.0;
    while (y - target).abs() > f32::EPSILON && elapsed < MAX_SIMULATED_SECONDS {
        let step = speed * dt;
        y = if y < target {
            (y + step).min(target)
        } else {
            (y - step).max(target)
        };
        page.scroll_to(y);
        let events = page.tick(dt);
        log_events(page, &events);
        elapsed += dt;
    }

    run_until_idle(page, dt);
    Ok(())
}

fn gallery(page: &mut LandingPage, steps: usize, previous: bool, dt: f32) -> anyhow::Result<()> {
    page.navigate("screenshots")?;
    run_until_idle(page, dt);

    for step in 0..steps {
        let nav = if previous {
            page.previous_screenshot()
        } else {
            page.next_screenshot()
        };
        info!(step, ?nav, "轮播切换");
        // 等待锁释放后再发下一次请求
        run_until_idle(page, dt);
    }

    let carousel = page.screenshots().carousel();
    info!(
        active = carousel.active_index(),
        slide = %carousel.active_slide().id,
        "轮播停在"
    );
    Ok(())
}

/// 推进直到页面空闲（或达到模拟时长上限）
fn run_until_idle(page: &mut LandingPage, dt: f32) {
    let mut elapsed = 0.0;
    while !page.is_idle() && elapsed < MAX_SIMULATED_SECONDS {
        let events = page.tick(dt);
        log_events(page, &events);
        elapsed += dt;
    }
    debug!(elapsed, "页面空闲");
}

fn log_events(page: &LandingPage, events: &[AnimatorEvent]) {
    let animator = page.animator().borrow();
    for event in events {
        let node = animator
            .node(event.handle())
            .map_or("?", |node| page.label(node));
        match event {
            AnimatorEvent::Started(handle) => debug!(%handle, node, "入场开始"),
            AnimatorEvent::Settled(handle) => info!(%handle, node, "入场完成"),
            AnimatorEvent::Reversed(handle) => debug!(%handle, node, "开始反向"),
            AnimatorEvent::Reset(handle) => info!(%handle, node, "已复位"),
        }
    }
}
