//! Linux joystick 事件记录解析
//!
//! Linux joystick 子系统（`/dev/input/jsN`）以固定 8 字节的
//! `struct js_event` 记录上报输入变化：
//!
//! ```text
//! offset 0..4   time    u32 LE   事件时间戳（毫秒）
//! offset 4..6   value   i16 LE   轴采样值或按键状态
//! offset 6      kind    u8       事件类型位掩码（AXIS | BUTTON | INIT）
//! offset 7      number  u8       轴/按键编号
//! ```
//!
//! 本模块只负责记录解析和事件分类，不做任何 IO。

use crate::ProtocolError;

/// 轴事件（摇杆轴值变化）
pub const JS_EVENT_AXIS: u8 = 0x02;
/// 按键事件（本系统忽略）
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// 初始状态事件标志位（与 AXIS/BUTTON 按位或）
pub const JS_EVENT_INIT: u8 = 0x80;

/// `js_event` 记录的固定长度（字节）
pub const JS_EVENT_SIZE: usize = 8;

/// 轴采样值下界
pub const AXIS_MIN: i16 = i16::MIN;
/// 轴采样值上界
pub const AXIS_MAX: i16 = i16::MAX;

/// 单条 joystick 事件记录
///
/// 瞬态数据：由设备产生，立即交给映射层消费，不做缓存。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsEvent {
    /// 事件时间戳（毫秒，设备侧时钟）
    pub time: u32,
    /// 轴采样值，范围 [-32768, 32767]
    pub value: i16,
    /// 事件类型位掩码
    pub kind: u8,
    /// 轴/按键编号
    pub number: u8,
}

impl JsEvent {
    /// 是否为轴事件（INIT 标志位不影响分类，与原始驱动的
    /// `js.type & ~JS_EVENT_INIT` 语义一致）
    pub fn is_axis(&self) -> bool {
        (self.kind & !JS_EVENT_INIT) == JS_EVENT_AXIS
    }

    /// 是否为按键事件
    pub fn is_button(&self) -> bool {
        (self.kind & !JS_EVENT_INIT) == JS_EVENT_BUTTON
    }
}

impl TryFrom<&[u8]> for JsEvent {
    type Error = ProtocolError;

    fn try_from(buf: &[u8]) -> Result<Self, Self::Error> {
        if buf.len() != JS_EVENT_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: JS_EVENT_SIZE,
                actual: buf.len(),
            });
        }

        Ok(Self {
            time: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_le_bytes([buf[4], buf[5]]),
            kind: buf[6],
            number: buf[7],
        })
    }
}

/// 逻辑控制通道到轴编号的映射
///
/// 转向固定在轴 0（左摇杆左右），加速通道取决于手柄型号：
/// PS3 手柄的右摇杆上下是轴 4，PS4 手柄是轴 5。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLayout {
    /// 左/右转向轴编号
    pub steering_axis: u8,
    /// 前/后加速轴编号
    pub acceleration_axis: u8,
}

impl AxisLayout {
    /// 根据 `--ps4` 标志选择布局
    pub fn from_ps4_flag(is_ps4: bool) -> Self {
        Self {
            steering_axis: 0,
            acceleration_axis: if is_ps4 { 5 } else { 4 },
        }
    }
}
