//! Synchronous client for the controller daemon.

use std::{
    io::{self, BufRead, BufReader, Write},
    os::unix::net::UnixStream,
    path::Path,
    sync::Mutex,
    time::Duration,
};

use tracing::{debug, info};

use drift_launch::{Controller, StartError};

use crate::protocol::{self, Response};

/// Client for the controller daemon on its Unix control socket.
///
/// The daemon is the only process privileged to fork workers; this client
/// submits start requests and waits for the acknowledgement. One request
/// is in flight at a time: the channel is guarded by a mutex, so a shared
/// client serializes concurrent launches.
pub struct NativeController {
    channel: Mutex<BufReader<UnixStream>>,
    pid: u32,
    timeout: Duration,
}

impl NativeController {
    /// Connect to the daemon socket and bound both channel directions by
    /// `timeout`.
    pub fn connect(socket: &Path, timeout: Duration) -> io::Result<Self> {
        let stream = UnixStream::connect(socket)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        let pid = peer_pid(&stream)?;
        info!(socket = %socket.display(), pid, "connected to controller daemon");
        Ok(Self {
            channel: Mutex::new(BufReader::new(stream)),
            pid,
            timeout,
        })
    }

    fn map_io(&self, error: io::Error) -> StartError {
        match error.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => StartError::TimedOut {
                timeout: self.timeout,
            },
            _ => StartError::Io(error),
        }
    }
}

impl Controller for NativeController {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn start_process(&self, command: &[String]) -> Result<(), StartError> {
        let request = protocol::encode_start(command)
            .map_err(|e| StartError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let mut channel = self.channel.lock().unwrap_or_else(|e| e.into_inner());

        let mut writer = channel.get_ref();
        writer
            .write_all(request.as_bytes())
            .map_err(|e| self.map_io(e))?;

        let mut line = String::new();
        let read = channel.read_line(&mut line).map_err(|e| self.map_io(e))?;
        if read == 0 {
            return Err(StartError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "controller closed the channel",
            )));
        }

        match protocol::decode_response(&line) {
            Ok(Response::Ok) => {
                debug!("controller confirmed start");
                Ok(())
            }
            Ok(Response::Err(reason)) => Err(StartError::Rejected(reason)),
            Err(e) => Err(StartError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                e,
            ))),
        }
    }
}

/// Pid of the daemon on the far end of the socket.
///
/// Linux reports it through `SO_PEERCRED`. Elsewhere there is no portable
/// equivalent, so the pid is reported as 0.
#[cfg(target_os = "linux")]
fn peer_pid(stream: &UnixStream) -> io::Result<u32> {
    use std::os::fd::AsRawFd;

    let mut cred = libc::ucred {
        pid: 0,
        uid: 0,
        gid: 0,
    };
    let mut len = std::mem::size_of::<libc::ucred>() as libc::socklen_t;
    // SAFETY: cred and len are valid writable storage of the sizes passed.
    let rc = unsafe {
        libc::getsockopt(
            stream.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_PEERCRED,
            &mut cred as *mut libc::ucred as *mut libc::c_void,
            &mut len,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(cred.pid as u32)
}

#[cfg(not(target_os = "linux"))]
fn peer_pid(_stream: &UnixStream) -> io::Result<u32> {
    tracing::warn!("peer credentials are not available on this platform; reporting pid 0");
    Ok(0)
}
