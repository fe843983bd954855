//! Terminal bell notifier.

use std::io::{self, Write};
use std::sync::Mutex;

use super::{Completion, CompletionNotifier, NotifyError};

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell by writing BEL to a stream.
#[derive(Debug)]
pub struct BellNotifier<W: Write> {
    out: Mutex<W>,
}

impl BellNotifier<io::Stderr> {
    /// Rings the bell on stderr, leaving stdout to the display.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> BellNotifier<W> {
    /// Creates a bell notifier writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> CompletionNotifier for BellNotifier<W> {
    fn name(&self) -> &str {
        "bell"
    }

    fn notify(&self, _completion: &Completion) -> Result<(), NotifyError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotifyError::Unavailable("bell writer poisoned".to_string()))?;
        out.write_all(BELL)?;
        out.flush()?;
        Ok(())
    }
}
