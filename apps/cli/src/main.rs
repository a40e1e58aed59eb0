//! # Stickdrive CLI
//!
//! 把游戏手柄的轴输入转换为周期性的执行指令并发布到消息总线。
//!
//! ```bash
//! stickdrive --device /dev/input/js0 --freq 100 --cid 111 \
//!     --acc_min 0 --acc_max 50 --dec_min 0 --dec_max -10 \
//!     --steering_min -10 --steering_max 10
//! ```
//!
//! 进程结构：读取线程持续排空设备事件并更新共享快照，主线程按
//! `--freq` 的频率把快照发布到总线。Ctrl-C 或致命设备错误终止
//! 会话，退出前无条件发送一条中性停车指令。

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stickdrive_bus::{BusSession, UdpSession, time_trigger};
use stickdrive_driver::{Publisher, SharedControl, read_loop};
use stickdrive_joystick::Joystick;
use stickdrive_protocol::{AxisLayout, ControlRanges};
use tracing::{error, info};

mod validation;

/// Stickdrive - 手柄转总线驱动
#[derive(Parser, Debug)]
#[command(name = "stickdrive")]
#[command(about = "Publish joystick axis input as actuation commands", long_about = None)]
#[command(version)]
struct Cli {
    /// 手柄设备路径
    #[arg(long)]
    device: String,

    /// 发布频率（Hz）
    #[arg(long)]
    freq: f32,

    /// 会话 ID（组播地址主机字节，1..=254）
    #[arg(long)]
    cid: u8,

    /// 加速输出下限
    #[arg(long = "acc_min", allow_negative_numbers = true)]
    acc_min: f32,

    /// 加速输出上限
    #[arg(long = "acc_max", allow_negative_numbers = true)]
    acc_max: f32,

    /// 减速输出下限
    #[arg(long = "dec_min", allow_negative_numbers = true)]
    dec_min: f32,

    /// 减速输出上限
    #[arg(long = "dec_max", allow_negative_numbers = true)]
    dec_max: f32,

    /// 转向输出下限
    #[arg(long = "steering_min", allow_negative_numbers = true)]
    steering_min: f32,

    /// 转向输出上限
    #[arg(long = "steering_max", allow_negative_numbers = true)]
    steering_max: f32,

    /// 使用 PS4 轴布局（加速在轴 5 而非轴 4）
    #[arg(long)]
    ps4: bool,

    /// 输出每条轴事件的调试日志
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志：--verbose 提升默认级别，RUST_LOG 始终优先
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    validation::validate_freq(cli.freq)?;
    validation::validate_cid(cli.cid)?;
    let ranges = ControlRanges {
        acc_min: cli.acc_min,
        acc_max: cli.acc_max,
        dec_min: cli.dec_min,
        dec_max: cli.dec_max,
        steering_min: cli.steering_min,
        steering_max: cli.steering_max,
    };
    validation::validate_ranges(&ranges)?;

    let joystick = Joystick::open(&cli.device)
        .with_context(|| format!("failed to open joystick device '{}'", cli.device))?;

    let js_info = joystick.info();
    info!(
        "Found {}, number of axes: {}, number of buttons: {}",
        js_info.name, js_info.axes, js_info.buttons
    );

    let layout = AxisLayout::from_ps4_flag(cli.ps4);
    let shared = SharedControl::new();
    let shutdown = Arc::new(AtomicBool::new(false));

    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("interrupt received, shutting down");
            shutdown.store(true, Ordering::Release);
        })
        .context("failed to install interrupt handler")?;
    }

    let reader = {
        let shared = shared.clone();
        let shutdown = shutdown.clone();
        std::thread::Builder::new()
            .name("joystick-reader".into())
            .spawn(move || read_loop(joystick, layout, ranges, shared, shutdown))
            .context("failed to spawn reader thread")?
    };

    let session =
        UdpSession::new(cli.cid).context("failed to create bus session")?;
    info!(
        "publishing to {} at {} Hz",
        session.target(),
        cli.freq
    );

    let mut publisher = Publisher::new(&shared, &session);
    if session.is_running() {
        let shutdown = shutdown.clone();
        time_trigger(cli.freq, || {
            if shutdown.load(Ordering::Acquire) {
                return false;
            }
            publisher.tick()
        });
    }

    // 会话因何结束都一样：先把被控系统带回中性状态
    publisher.send_stop();

    shutdown.store(true, Ordering::Release);
    if reader.join().is_err() {
        error!("reader thread panicked");
    }

    Ok(())
}
