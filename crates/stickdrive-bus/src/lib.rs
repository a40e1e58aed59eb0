//! # Stickdrive Bus
//!
//! 消息总线会话层：
//!
//! - [`BusSession`]: 会话抽象（存活检查 + 指令发送）
//! - [`UdpSession`]: UDP 组播会话实现
//! - [`time_trigger`]: 固定频率回调触发器
//!
//! 会话只负责传输，序列化在协议层（`stickdrive-protocol`）完成。

use stickdrive_protocol::ActuationCommand;
use thiserror::Error;

pub mod trigger;
pub mod udp;

pub use trigger::time_trigger;
pub use udp::UdpSession;

/// 总线层统一错误类型
#[derive(Error, Debug)]
pub enum BusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid conversation id: {0}")]
    InvalidCid(u8),
}

/// 消息总线会话抽象
///
/// 长生命周期对象；发送端只要求 `&self`，发布回调和停车路径
/// 可以共享同一个会话。
pub trait BusSession {
    /// 会话是否存活（构造失败之外的场景恒为 true）
    fn is_running(&self) -> bool;

    /// 发送一条执行指令
    fn send(&self, command: &ActuationCommand) -> Result<(), BusError>;
}
