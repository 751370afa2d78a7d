use crate::app::Model;
use crate::gallery::Trigger;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Focus the next image
    Next,
    /// Focus the previous image
    Prev,
    /// Activate the "next" arrow control
    SkipForward,
    /// Activate the "previous" arrow control
    SkipBack,
    /// Focus the first image
    First,
    /// Focus the last image
    Last,
    /// Focus an absolute index (clamped)
    GoTo(i64),
    /// A visible thumbnail was clicked
    ThumbnailClick(usize),
    /// Terminal resized to (width, height)
    Resize(u16, u16),

    // Zoom
    ZoomIn,
    ZoomOut,
    ToggleZoom,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Effects
    /// Copy the focused image path to the clipboard
    CopyPath,
    /// Open the focused image in the system viewer
    OpenExternal,

    /// Repaint without changing state
    Redraw,
    /// Quit the application
    Quit,
}

/// Pure state transition.
///
/// Navigation messages are translated into [`Trigger`]s for the navigator.
/// Effects (`CopyPath`, `OpenExternal`) leave the state untouched; the event
/// loop performs them after the update.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Next => {
            let target = signed(model.current_index()).saturating_add(1);
            model.navigate(Trigger::NavigateTo(target));
        }
        Message::Prev => {
            let target = signed(model.current_index()).saturating_sub(1);
            model.navigate(Trigger::NavigateTo(target));
        }
        Message::SkipForward => model.navigate(Trigger::Next),
        Message::SkipBack => model.navigate(Trigger::Prev),
        Message::First => model.navigate(Trigger::NavigateTo(0)),
        Message::Last => {
            let last = signed(model.gallery.len().saturating_sub(1));
            model.navigate(Trigger::NavigateTo(last));
        }
        Message::GoTo(index) => model.navigate(Trigger::NavigateTo(index)),
        Message::ThumbnailClick(index) => model.navigate(Trigger::ThumbnailClick(index)),
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.refresh_metrics();
        }

        Message::ZoomIn => model.zoom.activate(),
        Message::ZoomOut => model.zoom.deactivate(),
        Message::ToggleZoom => model.zoom.toggle(),

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        Message::CopyPath | Message::OpenExternal | Message::Redraw => {}
        Message::Quit => model.should_quit = true,
    }
    model
}

fn signed(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
