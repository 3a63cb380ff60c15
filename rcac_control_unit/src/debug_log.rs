//! Textual debug logger over an optional output channel.
//!
//! The channel is opened once at construction. When opening fails every
//! call is a silent no-op, and write errors are dropped: the logger must
//! never disturb the control loop.
//!
//! Lines end in `\r\n`. Floats are printed with two truncated decimals:
//! ```text
//! scaled = trunc(value × 100)
//! whole  = scaled / 100
//! frac   = |scaled % 100|      (zero-padded to two digits)
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

/// Log a formatted line through a [`DebugLogger`].
///
/// ```
/// use rcac_control_unit::debug_log;
/// use rcac_control_unit::debug_log::DebugLogger;
///
/// let mut logger = DebugLogger::init(|| Some(Vec::<u8>::new()));
/// debug_log!(logger, "count {}", 7);
/// assert_eq!(logger.channel().unwrap().as_slice(), b"count 7\r\n");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log(::core::format_args!($($arg)*))
    };
}

#[derive(Debug)]
pub struct DebugLogger<W: Write> {
    channel: Option<W>,
}

impl<W: Write> DebugLogger<W> {
    /// Open the channel with `open`; `None` leaves the logger closed.
    pub fn init(open: impl FnOnce() -> Option<W>) -> Self {
        Self { channel: open() }
    }

    /// A logger with no channel.
    pub const fn closed() -> Self {
        Self { channel: None }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Write the formatted message followed by `\r\n`.
    pub fn log(&mut self, args: fmt::Arguments<'_>) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        let _ = channel.write_fmt(args);
        let _ = channel.write_all(b"\r\n");
    }

    /// Write `label whole.frac\r\n` with two truncated decimals.
    pub fn log_float(&mut self, label: &str, value: f32) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        let _ = write!(channel, "{label} {}\r\n", TwoDecimals(value));
    }

    pub fn channel(&self) -> Option<&W> {
        self.channel.as_ref()
    }

    pub fn into_channel(self) -> Option<W> {
        self.channel
    }
}

impl DebugLogger<File> {
    /// Append to the file at `path`. Failure to open is logged once and
    /// leaves the logger closed.
    pub fn open_path(path: &Path) -> Self {
        Self::init(|| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    info!("debug log channel opened at {}", path.display());
                    Some(file)
                }
                Err(e) => {
                    warn!("debug log channel unavailable ({}): {e}", path.display());
                    None
                }
            }
        })
    }
}

/// Fixed two-decimal rendering, truncated toward zero.
struct TwoDecimals(f32);

impl fmt::Display for TwoDecimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Saturating float → int cast; NaN becomes 0.
        let scaled = (self.0 * 100.0) as i32;
        let whole = scaled / 100;
        let frac = (scaled % 100).abs();
        // Values in (-1, 0) print without a sign: whole is 0.
        write!(f, "{whole}.{frac:02}")
    }
}
