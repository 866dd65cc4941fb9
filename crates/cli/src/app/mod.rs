//! Browser application: state, transitions and the event loop.

pub mod input;
mod machine;
pub mod scroll;
pub mod state;

pub use input::{InputResult, TextInput};
pub use state::{
    ConfirmAction, NavigationState, Notice, Preview, RenameDialog, Transition, UploadPicker,
    ViewMode,
};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::dispatch::{CommandResult, Dispatcher};
use crate::ui;

/// Drive the browser until the user quits.
///
/// Key presses and command results are the only two event sources. Both go
/// through the state machine; any commands it returns are handed to the
/// dispatcher, and the screen is redrawn after every event.
pub async fn run(
    terminal: &mut DefaultTerminal,
    mut state: NavigationState,
    dispatcher: Dispatcher,
    mut results: mpsc::UnboundedReceiver<CommandResult>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    state.resize(terminal.size()?.height);
    let mut transition = state.start();

    loop {
        for command in transition.commands.drain(..) {
            dispatcher.dispatch(command);
        }
        if transition.quit {
            break;
        }

        terminal.draw(|frame| ui::render(frame, &state))?;

        transition = tokio::select! {
            biased;

            Some(event) = events.next() => match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => state.handle_key(key),
                Event::Resize(_, height) => {
                    state.resize(height);
                    Transition::none()
                }
                _ => Transition::none(),
            },

            Some(result) = results.recv() => state.handle_result(result),

            else => break,
        };
    }

    tracing::debug!(bucket = %state.bucket, "browser closed");
    Ok(())
}
