use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard program available")]
    Unavailable,
}

// Platform clipboard writers, tried in order: macOS, Wayland, X11, Windows.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Writes `text` to the system clipboard through the first candidate
/// program that accepts it. Returns the program used.
pub fn copy_text(text: &str) -> Result<&'static str, ClipboardError> {
    for (program, args) in CANDIDATES {
        if pipe_to(program, args, text) {
            return Ok(program);
        }
    }
    Err(ClipboardError::Unavailable)
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(_) => return false,
    };
    if let Some(stdin) = child.stdin.as_mut() {
        if stdin.write_all(text.as_bytes()).is_err() {
            let _ = child.kill();
            return false;
        }
    }
    matches!(child.wait(), Ok(status) if status.success())
}
