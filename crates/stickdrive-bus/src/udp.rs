//! UDP 组播会话
//!
//! 按会话 ID（cid）约定把指令发往组播组 `225.0.0.<cid>:12175`。
//! 线格式为协议层的固定 10 字节记录，见
//! [`stickdrive_protocol::command`]。

use crate::{BusError, BusSession};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use stickdrive_protocol::ActuationCommand;
use tracing::trace;

/// 组播端口（所有会话共用，按组播地址区分会话）
pub const SESSION_PORT: u16 = 12175;

/// cid 对应的组播目标地址
///
/// cid 的有效范围是 1..=254（0 和 255 不是合法的组内主机字节）。
pub fn multicast_addr_for_cid(cid: u8) -> Result<SocketAddr, BusError> {
    if cid == 0 || cid == 255 {
        return Err(BusError::InvalidCid(cid));
    }
    Ok(SocketAddr::V4(SocketAddrV4::new(
        Ipv4Addr::new(225, 0, 0, cid),
        SESSION_PORT,
    )))
}

/// UDP 组播会话
///
/// # 示例
///
/// ```no_run
/// use stickdrive_bus::{BusSession, UdpSession};
/// use stickdrive_protocol::ActuationCommand;
///
/// let session = UdpSession::new(111).unwrap();
/// session.send(&ActuationCommand::stop()).unwrap();
/// ```
#[derive(Debug)]
pub struct UdpSession {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSession {
    /// 创建发往组播组 `225.0.0.<cid>` 的会话
    pub fn new(cid: u8) -> Result<Self, BusError> {
        let target = multicast_addr_for_cid(cid)?;
        Self::with_target(target)
    }

    /// 创建发往任意目标地址的会话（单播消费方和测试使用）
    pub fn with_target(target: SocketAddr) -> Result<Self, BusError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        // 组播默认只在本地链路内传播
        socket.set_multicast_ttl_v4(1)?;

        trace!("bus session bound to {}, target {}", socket.local_addr()?, target);

        Ok(Self { socket, target })
    }

    /// 目标地址
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl BusSession for UdpSession {
    fn is_running(&self) -> bool {
        // socket 绑定成功即存活；发送失败单独经 send 的 Result 上报
        true
    }

    fn send(&self, command: &ActuationCommand) -> Result<(), BusError> {
        self.socket.send_to(&command.encode(), self.target)?;
        Ok(())
    }
}
