//! Captured tracing output for tests

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing::Level;

/// Buffer shared between the subscriber and the test
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Log lines recorded on the current thread while the capture is alive
pub struct LogCapture {
    buffer: SharedBuffer,
    _guard: DefaultGuard,
}

impl LogCapture {
    /// Record everything at debug and above, formatted as the binary does
    /// minus timestamps and colours
    pub fn start() -> Self {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            buffer,
            _guard: guard,
        }
    }

    /// All lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.buffer.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines at `level` on `target` whose message ends with `message`
    pub fn find(&self, level: Level, target: &str, message: &str) -> Vec<String> {
        let level = level.to_string();
        let target = format!("{}:", target);
        self.lines()
            .into_iter()
            .filter(|line| {
                line.trim_start().starts_with(&level)
                    && line.contains(&target)
                    && line.ends_with(message)
            })
            .collect()
    }

    /// Lines on exactly `target`
    pub fn on_target(&self, target: &str) -> Vec<String> {
        let target = format!(" {}: ", target);
        self.lines()
            .into_iter()
            .filter(|line| line.contains(&target))
            .collect()
    }
}
