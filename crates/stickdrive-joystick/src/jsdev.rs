//! Linux joystick 字符设备实现
//!
//! 基于内核 joystick 子系统（`/dev/input/jsN`）：
//!
//! - 设备以 `O_RDONLY | O_NONBLOCK` 打开，读取永不阻塞
//! - 可读等待用 `poll(2)` 实现（带超时，保证循环能响应退出标志）
//! - 轴/按键数量和设备名通过 `JSIOCG*` ioctl 探测，全部尽力而为
//!
//! ## 限制
//!
//! - **仅限 Linux 平台**：joystick 字符设备是 Linux 内核特性
//! - **单设备**：一个 `Joystick` 对应一个已打开的设备文件

use crate::{JoystickBackend, JoystickError, JoystickInfo};
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use std::fs::{File, OpenOptions};
use std::os::fd::AsFd;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::time::Duration;
use stickdrive_protocol::{JS_EVENT_SIZE, JsEvent};
use tracing::{trace, warn};

// JSIOCGAXES / JSIOCGBUTTONS / JSIOCGNAME(len)，见 linux/joystick.h
nix::ioctl_read!(js_get_axes, b'j', 0x11, u8);
nix::ioctl_read!(js_get_buttons, b'j', 0x12, u8);
nix::ioctl_read_buf!(js_get_name, b'j', 0x13, u8);

/// 设备名探测缓冲区长度
const NAME_PROBE_LEN: usize = 80;

/// Linux joystick 设备适配器
///
/// # 示例
///
/// ```no_run
/// use stickdrive_joystick::{Joystick, JoystickBackend};
/// use std::time::Duration;
///
/// let mut js = Joystick::open("/dev/input/js0").unwrap();
/// if js.wait_readable(Duration::from_millis(20)).unwrap() {
///     while let Some(ev) = js.read_event().unwrap() {
///         println!("axis {} = {}", ev.number, ev.value);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Joystick {
    file: File,
    path: String,
}

impl Joystick {
    /// 以非阻塞只读方式打开设备
    ///
    /// # 错误
    /// - `JoystickError::Device`: 设备不存在、权限不足等打开失败
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JoystickError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| {
                JoystickError::Device(format!(
                    "Could not open device '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        trace!("joystick device '{}' opened (O_RDONLY | O_NONBLOCK)", path.display());

        Ok(Self {
            file,
            path: path.display().to_string(),
        })
    }

    /// 设备路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 探测设备描述信息
    ///
    /// 所有探测均为尽力而为：数量探测失败记 0，名称探测失败
    /// 回退为 "Unknown"，均不影响控制数据。
    pub fn info(&self) -> JoystickInfo {
        let fd = self.file.as_raw_fd();

        let mut axes: u8 = 0;
        if let Err(e) = unsafe { js_get_axes(fd, &mut axes) } {
            warn!("JSIOCGAXES probe failed on '{}': {}", self.path, e);
        }

        let mut buttons: u8 = 0;
        if let Err(e) = unsafe { js_get_buttons(fd, &mut buttons) } {
            warn!("JSIOCGBUTTONS probe failed on '{}': {}", self.path, e);
        }

        let mut name_buf = [0u8; NAME_PROBE_LEN];
        let name = match unsafe { js_get_name(fd, &mut name_buf) } {
            Ok(_) => {
                let end = name_buf.iter().position(|&b| b == 0).unwrap_or(NAME_PROBE_LEN);
                String::from_utf8_lossy(&name_buf[..end]).into_owned()
            },
            Err(e) => {
                warn!("JSIOCGNAME probe failed on '{}': {}", self.path, e);
                "Unknown".to_string()
            },
        };

        JoystickInfo { name, axes, buttons }
    }
}

impl JoystickBackend for Joystick {
    fn wait_readable(&mut self, timeout: Duration) -> Result<bool, JoystickError> {
        let pollfd = PollFd::new(self.file.as_fd(), PollFlags::POLLIN);
        let timeout_ms = timeout.as_millis().min(65535) as u16;

        match poll(&mut [pollfd], PollTimeout::from(timeout_ms)) {
            Ok(0) => Ok(false),
            Ok(_) => Ok(true),
            // 被信号打断（如 SIGINT）：当作一次超时，让循环重查退出标志
            Err(Errno::EINTR) => Ok(false),
            Err(e) => Err(JoystickError::Io(e.into())),
        }
    }

    fn read_event(&mut self) -> Result<Option<JsEvent>, JoystickError> {
        let mut buf = [0u8; JS_EVENT_SIZE];

        match nix::unistd::read(&self.file, &mut buf) {
            Ok(JS_EVENT_SIZE) => {
                let event = JsEvent::try_from(&buf[..]).map_err(|_| {
                    // 长度在上面已保证，此分支不可达；保守映射
                    JoystickError::TruncatedEvent {
                        expected: JS_EVENT_SIZE,
                        actual: JS_EVENT_SIZE,
                    }
                })?;
                Ok(Some(event))
            },
            // 内核保证 js_event 读取按整条记录返回；0 字节意味着设备已消失
            Ok(0) => Err(JoystickError::Disconnected),
            Ok(n) => Err(JoystickError::TruncatedEvent {
                expected: JS_EVENT_SIZE,
                actual: n,
            }),
            Err(Errno::EAGAIN) => Ok(None),
            Err(e) => Err(JoystickError::Io(e.into())),
        }
    }
}
