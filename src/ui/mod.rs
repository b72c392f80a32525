//! Terminal presentation: prompts, spinner and plain tables

pub mod prompts;
pub mod spinner;
pub mod table;

pub use spinner::{Spinner, with_spinner};
pub use table::Table;

use is_terminal::IsTerminal;

/// Turn colour off when stdout is piped or redirected
pub fn init_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}
