//! # Stickdrive Protocol
//!
//! 游戏手柄事件记录与执行指令映射（无硬件依赖）
//!
//! ## 模块
//!
//! - `event`: Linux `js_event` 原始事件记录解析
//! - `mapper`: 原始轴采样值到物理加速度/转向量的纯映射
//! - `command`: 输出执行指令（`ActuationCommand`）及线格式编解码
//!
//! ## 字节序
//!
//! 设备事件记录和指令线格式均使用小端字节序（little-endian），
//! 与 Linux joystick 子系统的 `struct js_event` 布局一致。

pub mod command;
pub mod event;
pub mod mapper;

// 重新导出常用类型
pub use command::*;
pub use event::*;
pub use mapper::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid record length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: &'static str, value: u8 },
}
