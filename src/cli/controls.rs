//! Interactive controls typed on stdin while a countdown runs.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::driver::Control;
use crate::types::CountdownSpec;

/// Maps one input line to a control command.
///
/// `spec` is what `s` restarts with.
pub fn parse_control(line: &str, spec: CountdownSpec) -> Option<Control> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Control::Pause),
        "r" | "resume" => Some(Control::Resume),
        "s" | "start" => Some(Control::Start(spec)),
        "x" | "reset" => Some(Control::Reset),
        "q" | "quit" => Some(Control::Quit),
        _ => None,
    }
}

/// Forwards controls read from `input` until it ends or the driver is gone.
pub async fn forward_controls<R>(
    input: R,
    spec: CountdownSpec,
    controls: mpsc::UnboundedSender<Control>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read controls")? {
        let Some(control) = parse_control(&line, spec) else {
            if !line.trim().is_empty() {
                debug!(input = %line.trim(), "unknown control");
            }
            continue;
        };
        if controls.send(control).is_err() {
            break;
        }
    }
    debug!("control input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_control_keys() {
        let spec = CountdownSpec::duration(10);
        assert_eq!(parse_control("p", spec), Some(Control::Pause));
        assert_eq!(parse_control(" R \n", spec), Some(Control::Resume));
        assert_eq!(parse_control("s", spec), Some(Control::Start(spec)));
        assert_eq!(parse_control("reset", spec), Some(Control::Reset));
        assert_eq!(parse_control("Q", spec), Some(Control::Quit));
        assert_eq!(parse_control("", spec), None);
        assert_eq!(parse_control("later", spec), None);
    }

    #[tokio::test]
    async fn test_forward_controls_skips_unknown_lines() {
        let spec = CountdownSpec::duration(10);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"p\nhello\n\nr\nq\n";

        forward_controls(input, spec, tx).await.unwrap();

        let mut received = Vec::new();
        while let Some(control) = rx.recv().await {
            received.push(control);
        }
        assert_eq!(
            received,
            vec![Control::Pause, Control::Resume, Control::Quit]
        );
    }
}
