//! 设备读取循环
//!
//! 显式状态机 `Polling ⇄ Draining`，终态 `Error`：
//!
//! - **Polling**: 带超时（20ms）等待设备可读，超时后重查退出标志
//!   和共享错误标志，保证无输入时循环也能终止
//! - **Draining**: 非阻塞读尽所有积压事件，逐条送入映射层，整个
//!   批次在单次加锁内提交到共享快照
//! - **Error**: 读取失败（EAGAIN 之外）为致命错误，错误标志置位
//!   后读取线程永久退出，不做重试

use crate::snapshot::SharedControl;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use stickdrive_joystick::JoystickBackend;
use stickdrive_protocol::{AxisLayout, ControlRanges, JsEvent, deflection_percent, raw_percent};
use tracing::{debug, error, trace};

/// Polling 状态的等待超时（约 50Hz 重查一次退出条件）
pub(crate) const POLL_TIMEOUT: Duration = Duration::from_millis(20);

/// 读取循环的状态机相位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderPhase {
    /// 等待设备可读
    Polling,
    /// 读尽积压事件
    Draining,
    /// 致命错误，读取永久停止
    Error,
}

/// 单个读取批次内累积的映射结果
///
/// 字段为 `None` 表示本批次没有对应轴的事件，提交时保持快照原值。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct DrainBatch {
    /// 本批次最新的加速度映射结果
    pub(crate) acceleration: Option<f32>,
    /// 本批次最新的转向映射结果
    pub(crate) steering: Option<f32>,
}

impl DrainBatch {
    /// 将一条设备事件送入映射层
    ///
    /// 只处理轴事件；按键和初始状态事件不产生任何映射。
    pub(crate) fn apply(&mut self, event: &JsEvent, layout: AxisLayout, ranges: &ControlRanges) {
        if !event.is_axis() {
            return;
        }

        if event.number == layout.steering_axis {
            let percent = raw_percent(event.value);
            if percent > 49.95 && percent < 50.05 {
                debug!("Going straight.");
            } else {
                debug!(
                    "Turning {} at {:.1}%.",
                    if event.value < 0 { "left" } else { "right" },
                    deflection_percent(event.value)
                );
            }
            self.steering = Some(ranges.steering(event.value));
        }

        // 两个判断相互独立：一次批次可能同时更新两个通道
        if event.number == layout.acceleration_axis {
            debug!(
                "{} at {:.1}%.",
                if event.value < 0 { "Accelerating" } else { "Braking" },
                deflection_percent(event.value)
            );
            self.acceleration = Some(ranges.acceleration(event.value));
        }
    }
}

/// 读取线程主循环
///
/// 持续运行直到退出标志置位或发生致命设备错误。致命错误通过
/// 共享快照的错误标志传播给发布端，本函数不返回错误值。
pub fn read_loop<B: JoystickBackend>(
    mut device: B,
    layout: AxisLayout,
    ranges: ControlRanges,
    shared: SharedControl,
    shutdown: Arc<AtomicBool>,
) {
    let mut phase = ReaderPhase::Polling;

    loop {
        phase = match phase {
            ReaderPhase::Polling => {
                // Acquire: 看到 true 时必须同时看到置位方此前的全部写入
                if shutdown.load(Ordering::Acquire) {
                    trace!("reader: shutdown flag set, exiting");
                    return;
                }
                if shared.has_error() {
                    ReaderPhase::Error
                } else {
                    match device.wait_readable(POLL_TIMEOUT) {
                        Ok(true) => ReaderPhase::Draining,
                        Ok(false) => ReaderPhase::Polling,
                        Err(e) => {
                            error!("joystick poll failed: {}", e);
                            shared.mark_error();
                            ReaderPhase::Error
                        },
                    }
                }
            },

            ReaderPhase::Draining => {
                let mut batch = DrainBatch::default();
                let mut fatal = false;

                loop {
                    match device.read_event() {
                        Ok(Some(event)) => batch.apply(&event, layout, &ranges),
                        // EAGAIN：积压读尽，批次正常结束
                        Ok(None) => break,
                        Err(e) => {
                            error!("joystick read failed: {}", e);
                            fatal = true;
                            break;
                        },
                    }
                }

                // 单次加锁提交整个批次；出错前已映射的事件照常生效
                shared.commit(batch.acceleration, batch.steering, fatal);

                if fatal {
                    ReaderPhase::Error
                } else {
                    ReaderPhase::Polling
                }
            },

            ReaderPhase::Error => {
                trace!("reader: fatal error, reading stopped");
                return;
            },
        };
    }
}
