//! 固定频率回调触发器
//!
//! 以配置的频率反复调用回调，直到回调返回 `false`。调用方对
//! 触发器的唯一假设是"大约每 1/freq 秒被调用一次，直到喊停"。
//!
//! 使用 spin_sleep 获得亚毫秒级的节拍精度（相比 `thread::sleep`
//! 的 1-2ms 抖动）。回调超时（执行时间超过一个周期）时重新锚定
//! 节拍，不做补偿性追赶。

use std::time::{Duration, Instant};
use tracing::trace;

/// 以 `freq_hz` 的频率驱动 `callback`，返回 `false` 时停止
///
/// 在当前线程阻塞运行。`freq_hz` 必须为正且有限（由 CLI 层校验）。
pub fn time_trigger<F>(freq_hz: f32, mut callback: F)
where
    F: FnMut() -> bool,
{
    let period = Duration::from_secs_f64(1.0 / f64::from(freq_hz));
    let sleeper = spin_sleep::SpinSleeper::default();
    let mut next_tick = Instant::now() + period;

    loop {
        if !callback() {
            trace!("time trigger: callback requested stop");
            return;
        }

        let now = Instant::now();
        if next_tick > now {
            sleeper.sleep(next_tick - now);
        } else {
            // 回调超时：重新锚定节拍，不追赶错过的周期
            next_tick = now;
        }
        next_tick += period;
    }
}
