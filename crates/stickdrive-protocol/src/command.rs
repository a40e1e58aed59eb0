//! 执行指令（ActuationRequest）定义与线格式编解码
//!
//! 总线会话发送的固定 10 字节小端记录：
//!
//! ```text
//! offset 0      magic         u8      0xAC
//! offset 1..5   acceleration  f32 LE
//! offset 5..9   steering      f32 LE
//! offset 9      is_valid      u8      0 / 1
//! ```

use crate::ProtocolError;

/// 线格式魔数
pub const COMMAND_MAGIC: u8 = 0xAC;

/// 线格式固定长度（字节）
pub const COMMAND_WIRE_SIZE: usize = 10;

/// 周期性发布的执行指令
///
/// `is_valid` 为发布时刻共享状态错误标志的取反；最终停车指令
/// 无条件为 `{0, 0, true}`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationCommand {
    /// 加速度（acc/dec 区间内，0.25 步长）
    pub acceleration: f32,
    /// 转向量（steering 区间内，0.25 步长）
    pub steering: f32,
    /// 指令是否可信（设备故障后为 false）
    pub is_valid: bool,
}

impl ActuationCommand {
    /// 构造停车指令：归零并标记有效，用于会话结束时把被控系统
    /// 带回中性状态
    pub fn stop() -> Self {
        Self {
            acceleration: 0.0,
            steering: 0.0,
            is_valid: true,
        }
    }

    /// 编码为固定长度线格式
    pub fn encode(&self) -> [u8; COMMAND_WIRE_SIZE] {
        let mut buf = [0u8; COMMAND_WIRE_SIZE];
        buf[0] = COMMAND_MAGIC;
        buf[1..5].copy_from_slice(&self.acceleration.to_le_bytes());
        buf[5..9].copy_from_slice(&self.steering.to_le_bytes());
        buf[9] = self.is_valid as u8;
        buf
    }

    /// 从线格式解码
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() != COMMAND_WIRE_SIZE {
            return Err(ProtocolError::InvalidLength {
                expected: COMMAND_WIRE_SIZE,
                actual: buf.len(),
            });
        }
        if buf[0] != COMMAND_MAGIC {
            return Err(ProtocolError::InvalidValue {
                field: "magic",
                value: buf[0],
            });
        }

        Ok(Self {
            acceleration: f32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]),
            steering: f32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]),
            is_valid: buf[9] != 0,
        })
    }
}
