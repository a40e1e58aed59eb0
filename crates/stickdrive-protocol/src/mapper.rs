//! 轴采样值到物理量的纯映射
//!
//! 将原始 i16 轴采样值转换为执行层的转向/加速物理量：
//!
//! 1. 先归一化为全量程百分比 `percent ∈ [0, 100]`
//! 2. 线性映射到启动时配置的物理区间
//! 3. 按 0.25 步长量化
//! 4. 接近零的结果（|v| < 0.001）钳制为精确的 0.0，避免出现 "-0"
//!
//! 全部为无状态纯函数，无失败路径（输入按类型构造即有限）。

use crate::event::{AXIS_MAX, AXIS_MIN};

/// 量化步长（物理量按 0.25 取整）
pub const QUANTIZATION_STEP: f32 = 0.25;

/// 近零钳制阈值
pub const ZERO_SNAP_EPSILON: f32 = 0.001;

/// 启动时配置的物理量区间（不可变）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRanges {
    /// 最小加速度
    pub acc_min: f32,
    /// 最大加速度
    pub acc_max: f32,
    /// 最小减速度
    pub dec_min: f32,
    /// 最大减速度
    pub dec_max: f32,
    /// 最小转向量
    pub steering_min: f32,
    /// 最大转向量
    pub steering_max: f32,
}

/// 原始采样值在全量程中的百分比位置，范围 [0, 100]
///
/// 摇杆物理中点（raw = 0）对应约 50.0008%，不是精确的 50%。
pub fn raw_percent(raw: i16) -> f32 {
    (raw as f32 - AXIS_MIN as f32) / (AXIS_MAX as f32 - AXIS_MIN as f32) * 100.0
}

/// 偏转量百分比（用于日志显示）
///
/// 把 [0, 50] / [50, 100] 的两半量程折算为各自方向上的 [0, 100]：
/// 左转和右转、加速和刹车都显示为 0-100%。
pub fn deflection_percent(raw: i16) -> f32 {
    let percent = raw_percent(raw);
    if raw < 0 {
        100.0 - 2.0 * percent
    } else {
        2.0 * percent - 100.0
    }
}

/// 按 0.25 步长量化并做近零钳制
fn quantize(value: f32) -> f32 {
    let quantized = (4.0 * value).round() / 4.0;
    if quantized < ZERO_SNAP_EPSILON && quantized > -ZERO_SNAP_EPSILON {
        0.0
    } else {
        quantized
    }
}

/// 转向映射
///
/// 线性映射到 `[steering_min, steering_max]` 后取负，使摇杆的物理
/// 左/右方向与车辆坐标系的转向符号约定一致。
pub fn steering_from_raw(raw: i16, steering_min: f32, steering_max: f32) -> f32 {
    let percent = raw_percent(raw);
    let steering = percent / 100.0 * (steering_max - steering_min) + steering_min;
    quantize(-steering)
}

/// 加速/减速映射
///
/// `raw < 0`（摇杆前推）为加速分支，`raw >= 0` 为刹车分支。
/// 刹车分支只按区间宽度 `dec_max - dec_min` 缩放，不加 `dec_min`
/// 偏移；下游消费方依赖此行为，见
/// `quirk_deceleration_branch_has_no_min_offset` 测试。
pub fn acceleration_from_raw(
    raw: i16,
    acc_min: f32,
    acc_max: f32,
    dec_min: f32,
    dec_max: f32,
) -> f32 {
    let percent = raw_percent(raw);
    let value = if raw < 0 {
        (100.0 - 2.0 * percent) / 100.0 * (acc_max - acc_min) + acc_min
    } else {
        (2.0 * percent - 100.0) / 100.0 * (dec_max - dec_min)
    };
    quantize(value)
}

impl ControlRanges {
    /// 转向映射（区间取自配置）
    pub fn steering(&self, raw: i16) -> f32 {
        steering_from_raw(raw, self.steering_min, self.steering_max)
    }

    /// 加速/减速映射（区间取自配置）
    pub fn acceleration(&self, raw: i16) -> f32 {
        acceleration_from_raw(raw, self.acc_min, self.acc_max, self.dec_min, self.dec_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_ranges() -> ControlRanges {
        ControlRanges {
            acc_min: 0.0,
            acc_max: 50.0,
            dec_min: 0.0,
            dec_max: -10.0,
            steering_min: -10.0,
            steering_max: 10.0,
        }
    }

    #[test]
    fn test_steering_center_snaps_to_zero() {
        // raw = 0 的理论中点 percent ≈ 50.0008，映射结果应被近零钳制
        let steering = steering_from_raw(0, -10.0, 10.0);
        assert_eq!(steering, 0.0);
        assert!(steering.is_sign_positive(), "must not produce -0.0");
    }

    #[test]
    fn test_steering_full_left_maps_to_positive_max() {
        // percent = 0 → 映射前为 steering_min = -10 → 取负后 +10
        assert_eq!(steering_from_raw(-32768, -10.0, 10.0), 10.0);
    }

    #[test]
    fn test_steering_full_right_maps_to_negative_max() {
        // percent = 100 → 映射前为 steering_max = 10 → 取负后 -10
        assert_eq!(steering_from_raw(32767, -10.0, 10.0), -10.0);
    }

    #[test]
    fn test_acceleration_full_forward() {
        // percent = 0 → (100 - 0)/100 * 50 + 0 = 50.0
        assert_eq!(acceleration_from_raw(-32768, 0.0, 50.0, 0.0, -10.0), 50.0);
    }

    #[test]
    fn test_deceleration_full_brake() {
        // percent = 100 → (200 - 100)/100 * (-10 - 0) = -10.0
        assert_eq!(acceleration_from_raw(32767, 0.0, 50.0, 0.0, -10.0), -10.0);
    }

    #[test]
    fn quirk_deceleration_branch_has_no_min_offset() {
        // 刹车分支不加 dec_min 偏移：dec_min = 5, dec_max = 15 时，
        // 全刹车输出区间宽度 10 而非 15。此行为是下游消费方已依赖的
        // 既有语义，禁止"修正"。
        let value = acceleration_from_raw(32767, 0.0, 50.0, 5.0, 15.0);
        assert_eq!(value, 10.0, "deceleration must scale by width only");

        // 对照：加速分支在同样的区间配置下会加上 acc_min 偏移
        let value = acceleration_from_raw(-32768, 5.0, 15.0, 0.0, -10.0);
        assert_eq!(value, 15.0, "acceleration includes the min offset");
    }

    #[test]
    fn test_deflection_percent_symmetry() {
        assert!((deflection_percent(-32768) - 100.0).abs() < 0.01);
        assert!((deflection_percent(32767) - 100.0).abs() < 0.01);
        assert!(deflection_percent(0).abs() < 0.01);
    }

    #[test]
    fn test_quantization_step() {
        // 量化结果必须落在 0.25 的整数倍上
        let steering = steering_from_raw(1234, -10.0, 10.0);
        let quarters = steering * 4.0;
        assert!((quarters - quarters.round()).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_steering_bounded_and_quantized(raw in i16::MIN..=i16::MAX) {
            let steering = steering_from_raw(raw, -10.0, 10.0);

            // 幅值不超过区间端点绝对值的最大者
            prop_assert!(steering.abs() <= 10.0 + 1e-3);

            // 0.25 整数倍（浮点误差容忍）
            let quarters = steering * 4.0;
            prop_assert!((quarters - quarters.round()).abs() < 1e-3);

            // 近零钳制后绝不输出 (-0.001, 0.001) 内的非零值
            if steering != 0.0 {
                prop_assert!(steering.abs() >= ZERO_SNAP_EPSILON);
            }
        }

        #[test]
        fn prop_acceleration_bounded_and_quantized(raw in i16::MIN..=i16::MAX) {
            let ranges = test_ranges();
            let value = ranges.acceleration(raw);

            // acc 分支落在 [0, 50]，dec 分支落在 [-10, 0]
            prop_assert!(value >= -10.0 - 1e-3 && value <= 50.0 + 1e-3);

            let quarters = value * 4.0;
            prop_assert!((quarters - quarters.round()).abs() < 1e-3);
        }

        #[test]
        fn prop_steering_monotonic_negation(raw in i16::MIN..i16::MAX) {
            // 原始值增大（右推）时转向输出不增（符号取负）
            let a = steering_from_raw(raw, -10.0, 10.0);
            let b = steering_from_raw(raw + 1, -10.0, 10.0);
            prop_assert!(b <= a + 1e-3);
        }
    }
}
