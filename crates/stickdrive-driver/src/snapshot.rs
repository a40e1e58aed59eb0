//! 共享控制快照
//!
//! 读取线程（唯一写者）和发布回调（唯一读者）之间的共享状态。
//! 保护方式为单把 `parking_lot::Mutex`，临界区只做标量拷入/拷出，
//! 持锁期间不做任何 IO。

use parking_lot::Mutex;
use std::sync::Arc;

/// 最新已知的控制状态
///
/// 启动时全零；每个读取批次提交一次；进程退出前被最后读取一次
/// 用于发送停车指令。`acceleration` 和 `steering` 恒为映射层的
/// 量化结果（0.25 的整数倍，近零钳制为 0.0）。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlSnapshot {
    /// 加速度（映射后的物理量）
    pub acceleration: f32,
    /// 转向量（映射后的物理量）
    pub steering: f32,
    /// 致命设备错误标志（一旦置位不再清除）
    pub has_error: bool,
}

/// 共享快照句柄（可廉价克隆，内部为 `Arc<Mutex>`）
#[derive(Debug, Clone, Default)]
pub struct SharedControl {
    inner: Arc<Mutex<ControlSnapshot>>,
}

impl SharedControl {
    /// 创建全零快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交一个读取批次
    ///
    /// 整个批次单次加锁，发布端不会观察到撕裂写入。`None` 字段
    /// 保持原值；`fatal` 置位后错误标志永久保持。
    pub fn commit(&self, acceleration: Option<f32>, steering: Option<f32>, fatal: bool) {
        let mut snap = self.inner.lock();
        if let Some(acceleration) = acceleration {
            snap.acceleration = acceleration;
        }
        if let Some(steering) = steering {
            snap.steering = steering;
        }
        if fatal {
            snap.has_error = true;
        }
    }

    /// 标记致命错误（用于批次之外的失败路径，如 poll 出错）
    pub fn mark_error(&self) {
        self.inner.lock().has_error = true;
    }

    /// 拷出当前快照（锁只持有拷贝三个标量的时长）
    pub fn snapshot(&self) -> ControlSnapshot {
        *self.inner.lock()
    }

    /// 错误标志当前值
    pub fn has_error(&self) -> bool {
        self.inner.lock().has_error
    }
}
