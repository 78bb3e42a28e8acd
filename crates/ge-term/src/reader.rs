// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// A dedicated thread polls stdin and sends raw byte chunks over a channel,
// so the event loop can wait with `recv_timeout` and still flush a lone
// Escape or repaint a timed status message. The thread checks a stop flag
// between polls and exits within one poll interval of being asked.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Large enough for a paste burst, small enough to stay on the stack.
const READ_BUF_SIZE: usize = 4096;

const POLL_TIMEOUT_MS: i32 = 50;

pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start the reader thread. Each message on the returned channel is a
    /// non-empty chunk of stdin; the channel closes on EOF or stop.
    ///
    /// # Errors
    ///
    /// Fails if the OS refuses to spawn the thread.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || reader_loop(&tx, &stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Ask the thread to exit and join it. Safe to call more than once.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn reader_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };
        if ready <= 0 {
            continue;
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            log::debug!("stdin closed");
            break;
        }
        #[allow(clippy::cast_sign_loss)] // n > 0
        let chunk = buf[..n as usize].to_vec();
        if tx.send(chunk).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
fn reader_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let stdin = std::io::stdin();
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stop_is_idempotent() {
        let (mut reader, _rx) = StdinReader::spawn().unwrap();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn drop_does_not_hang() {
        let (reader, _rx) = StdinReader::spawn().unwrap();
        drop(reader);
    }

    #[test]
    fn channel_closes_after_stop() {
        let (mut reader, rx) = StdinReader::spawn().unwrap();
        reader.stop();
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
