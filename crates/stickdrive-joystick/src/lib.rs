//! # Stickdrive Joystick Adapter
//!
//! 游戏手柄设备抽象层，提供统一的非阻塞事件读取接口。
//!
//! 驱动层只依赖 [`JoystickBackend`] trait，真实设备实现
//! （[`jsdev::Joystick`]）仅在 Linux 平台编译。

use std::time::Duration;
use stickdrive_protocol::JsEvent;
use thiserror::Error;

#[cfg(target_os = "linux")]
pub mod jsdev;

#[cfg(target_os = "linux")]
pub use jsdev::Joystick;

/// 设备适配层统一错误类型
///
/// "暂无数据"（EAGAIN）不是错误，由 [`JoystickBackend::read_event`]
/// 以 `Ok(None)` 表达；这里的每个变体对读取循环都是致命的。
#[derive(Error, Debug)]
pub enum JoystickError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Truncated event record: expected {expected} bytes, got {actual}")]
    TruncatedEvent { expected: usize, actual: usize },

    #[error("Device disconnected")]
    Disconnected,
}

/// 设备描述信息（尽力而为的探测结果，不影响控制数据）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickInfo {
    /// 设备名称，探测失败时为 "Unknown"
    pub name: String,
    /// 轴数量
    pub axes: u8,
    /// 按键数量
    pub buttons: u8,
}

/// 手柄后端抽象
///
/// 读取循环通过此 trait 访问设备，测试中可用 mock 后端替换真实设备。
pub trait JoystickBackend {
    /// 等待设备可读，最多阻塞 `timeout`
    ///
    /// 返回 `Ok(true)` 表示有事件可读，`Ok(false)` 表示超时。
    fn wait_readable(&mut self, timeout: Duration) -> Result<bool, JoystickError>;

    /// 非阻塞读取一条事件记录
    ///
    /// 返回 `Ok(None)` 表示当前无更多事件（EAGAIN），读取批次正常结束。
    fn read_event(&mut self) -> Result<Option<JsEvent>, JoystickError>;
}
