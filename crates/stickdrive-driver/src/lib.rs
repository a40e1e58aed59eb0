//! # Stickdrive Driver
//!
//! IO 循环与状态同步驱动层：
//!
//! - `snapshot`: 读取线程与发布回调共享的控制快照（单把互斥锁）
//! - `reader`: 设备读取循环（Polling ⇄ Draining 状态机，终态 Error）
//! - `publisher`: 由总线定时触发器驱动的周期发布回调
//!
//! ## 并发模型
//!
//! 恰好两个执行单元：自调度的读取线程和定时触发器驱动的发布回调。
//! 共享资源只有控制快照（单写者/单读者，锁内只做标量拷贝，绝不
//! 跨 IO 持锁）和一个协作式退出标志（Acquire/Release 原子布尔）。

pub mod publisher;
pub mod reader;
pub mod snapshot;

pub use publisher::Publisher;
pub use reader::read_loop;
pub use snapshot::{ControlSnapshot, SharedControl};
