//! 周期发布回调
//!
//! 由总线会话的定时触发器驱动。每次触发：加锁拷出快照三个标量、
//! 释放锁、构造执行指令、交给会话发送，最后以布尔值告知触发器
//! 是否继续。发送永远不在持锁状态下进行。

use crate::snapshot::SharedControl;
use stickdrive_bus::BusSession;
use stickdrive_protocol::ActuationCommand;
use tracing::{debug, error, info};

/// 周期发布器
///
/// 快照观察到错误标志后，当次指令仍会发出（`is_valid = false`），
/// 随后返回 `false` 终止周期触发；最终的停车指令由
/// [`Publisher::send_stop`] 在触发循环之外无条件发送。
pub struct Publisher<'a, S: BusSession> {
    shared: &'a SharedControl,
    session: &'a S,
}

impl<'a, S: BusSession> Publisher<'a, S> {
    /// 创建发布器
    pub fn new(shared: &'a SharedControl, session: &'a S) -> Self {
        Self { shared, session }
    }

    /// 单次发布（定时触发器的回调体）
    ///
    /// 返回是否继续周期触发。
    pub fn tick(&mut self) -> bool {
        let snap = self.shared.snapshot();

        let command = ActuationCommand {
            acceleration: snap.acceleration,
            steering: snap.steering,
            is_valid: !snap.has_error,
        };

        debug!(
            "acceleration = {}, steering = {}, is_valid = {}",
            command.acceleration, command.steering, command.is_valid
        );

        // 发送失败不改变继续/停止决策：停止条件只由设备错误驱动
        if let Err(e) = self.session.send(&command) {
            error!("bus send failed: {}", e);
        }

        !snap.has_error
    }

    /// 发送最终停车指令
    ///
    /// 无论会话因何终止（设备错误或外部退出请求），都把被控系统
    /// 带回中性状态。
    pub fn send_stop(&mut self) {
        info!("sending neutral stop command");
        if let Err(e) = self.session.send(&ActuationCommand::stop()) {
            error!("failed to send stop command: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use stickdrive_bus::BusError;

    /// Mock 会话：记录全部已发送指令
    #[derive(Default)]
    struct MockSession {
        sent: Mutex<Vec<ActuationCommand>>,
        fail_sends: bool,
    }

    impl BusSession for MockSession {
        fn is_running(&self) -> bool {
            true
        }

        fn send(&self, command: &ActuationCommand) -> Result<(), BusError> {
            self.sent.lock().push(*command);
            if self.fail_sends {
                Err(BusError::Io(std::io::Error::other("send failed")))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_tick_publishes_snapshot_values() {
        let shared = SharedControl::new();
        shared.commit(Some(25.5), Some(-4.0), false);
        let session = MockSession::default();

        let mut publisher = Publisher::new(&shared, &session);
        assert!(publisher.tick());

        let sent = session.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].acceleration, 25.5);
        assert_eq!(sent[0].steering, -4.0);
        assert!(sent[0].is_valid);
    }

    #[test]
    fn test_ticks_idempotent_without_new_events() {
        let shared = SharedControl::new();
        shared.commit(Some(1.25), Some(0.5), false);
        let session = MockSession::default();

        let mut publisher = Publisher::new(&shared, &session);
        assert!(publisher.tick());
        assert!(publisher.tick());

        let sent = session.sent.lock();
        assert_eq!(sent[0], sent[1]);
    }

    #[test]
    fn test_error_tick_invalidates_and_stops() {
        let shared = SharedControl::new();
        shared.commit(Some(3.0), None, true);
        let session = MockSession::default();

        let mut publisher = Publisher::new(&shared, &session);

        // 错误被观察到的那一拍：指令仍发出，但 is_valid=false，且返回停止
        assert!(!publisher.tick());
        {
            let sent = session.sent.lock();
            assert_eq!(sent.len(), 1);
            assert!(!sent[0].is_valid);
            assert_eq!(sent[0].acceleration, 3.0);
        }

        // 触发循环结束后恰好一条无条件停车指令
        publisher.send_stop();
        let sent = session.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], ActuationCommand::stop());
    }

    #[test]
    fn test_send_failure_does_not_stop_cadence() {
        let shared = SharedControl::new();
        let session = MockSession {
            fail_sends: true,
            ..Default::default()
        };

        let mut publisher = Publisher::new(&shared, &session);
        assert!(publisher.tick(), "send failure alone must not stop the loop");
    }
}
