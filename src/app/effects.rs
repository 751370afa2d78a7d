use std::io::{self, Write, stdout};
use std::path::Path;
use std::process::{Command, Stdio};

use base64::Engine;

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Run the effect behind `msg`, if any, and report it in a toast.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        let path = match msg {
            Message::CopyPath | Message::OpenExternal => model.focused_path(),
            _ => return,
        };
        let (outcome, done, verb) = if *msg == Message::CopyPath {
            (
                copy_to_clipboard(&path.display().to_string()),
                format!("Copied {}", path.display()),
                "Copy",
            )
        } else {
            (
                open_external(&path),
                format!("Opened {}", model.view.focus_id),
                "Open",
            )
        };

        match outcome {
            Ok(()) => model.show_toast(ToastLevel::Info, done),
            Err(err) => {
                crate::perf::log_event(
                    "effect.error",
                    format!("msg={msg:?} path={} err={err}", path.display()),
                );
                model.show_toast(ToastLevel::Error, format!("{verb} failed: {err}"));
            }
        }
    }
}

/// Hand `path` to the desktop's default viewer.
fn open_external(path: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    let status = command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("viewer exited with {status}")))
    }
}

/// Copy with `pbcopy` on macOS, otherwise through the terminal with OSC 52.
fn copy_to_clipboard(text: &str) -> io::Result<()> {
    if cfg!(target_os = "macos") && pipe_to("pbcopy", text).is_ok() {
        return Ok(());
    }
    let mut out = stdout().lock();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

fn pipe_to(program: &str, text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("stdin not captured"))?
        .write_all(text.as_bytes())?;
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{program} exited with {status}")))
    }
}

/// OSC 52 "set clipboard" escape for `text`.
fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
