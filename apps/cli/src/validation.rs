//! 输入验证模块
//!
//! 对命令行参数做启动前检查。映射范围只要求有限，不要求
//! min <= max：减速映射常以 `dec_max < dec_min` 的方式配置来
//! 反转输出符号。

use anyhow::Result;
use stickdrive_protocol::ControlRanges;

/// 验证发布频率
///
/// 频率必须为正的有限值（作为周期的分母使用）。
pub fn validate_freq(freq: f32) -> Result<()> {
    if !freq.is_finite() || freq <= 0.0 {
        anyhow::bail!("freq must be a positive finite value, got {}", freq);
    }
    Ok(())
}

/// 验证会话 ID
///
/// cid 充当组播地址的主机字节，0 和 255 不可用。
pub fn validate_cid(cid: u8) -> Result<()> {
    if cid == 0 || cid == 255 {
        anyhow::bail!("cid must be in range [1, 254], got {}", cid);
    }
    Ok(())
}

/// 验证全部映射范围参数
pub fn validate_ranges(ranges: &ControlRanges) -> Result<()> {
    let fields = [
        ("acc_min", ranges.acc_min),
        ("acc_max", ranges.acc_max),
        ("dec_min", ranges.dec_min),
        ("dec_max", ranges.dec_max),
        ("steering_min", ranges.steering_min),
        ("steering_max", ranges.steering_max),
    ];

    for (name, value) in fields {
        if !value.is_finite() {
            anyhow::bail!("{} must be finite, got {}", name, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> ControlRanges {
        ControlRanges {
            acc_min: 0.0,
            acc_max: 100.0,
            dec_min: 0.0,
            dec_max: -10.0,
            steering_min: -10.0,
            steering_max: 10.0,
        }
    }

    #[test]
    fn test_validate_freq() {
        assert!(validate_freq(10.0).is_ok());
        assert!(validate_freq(0.5).is_ok());

        assert!(validate_freq(0.0).is_err());
        assert!(validate_freq(-10.0).is_err());
        assert!(validate_freq(f32::NAN).is_err());
        assert!(validate_freq(f32::INFINITY).is_err());
    }

    #[test]
    fn test_validate_cid() {
        assert!(validate_cid(1).is_ok());
        assert!(validate_cid(111).is_ok());
        assert!(validate_cid(254).is_ok());

        assert!(validate_cid(0).is_err());
        assert!(validate_cid(255).is_err());
    }

    #[test]
    fn test_validate_ranges_accepts_inverted_deceleration() {
        // dec_max < dec_min 是刻意的配置方式，必须通过验证
        assert!(validate_ranges(&ranges()).is_ok());
    }

    #[test]
    fn test_validate_ranges_rejects_non_finite() {
        let mut r = ranges();
        r.steering_max = f32::NAN;
        assert!(validate_ranges(&r).is_err());

        let mut r = ranges();
        r.acc_min = f32::NEG_INFINITY;
        assert!(validate_ranges(&r).is_err());
    }
}
