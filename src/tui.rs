//! Terminal lifecycle: alternate screen, raw mode, and a panic hook that puts
//! the terminal back before the panic report is printed.

use std::io::{stdout, Stdout};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter the alternate screen, enable raw mode, and install the panic hook.
pub fn init() -> Result<Tui> {
    execute!(stdout(), EnterAlternateScreen).wrap_err("entering alternate screen")?;
    enable_raw_mode().wrap_err("enabling raw mode")?;
    install_panic_hook();
    Terminal::new(CrosstermBackend::new(stdout())).wrap_err("creating terminal")
}

/// Leave the alternate screen and disable raw mode.
pub fn restore() -> Result<()> {
    disable_raw_mode().wrap_err("disabling raw mode")?;
    execute!(stdout(), LeaveAlternateScreen).wrap_err("leaving alternate screen")?;
    Ok(())
}

/// Restore first, then hand over to the previous hook (color-eyre's).
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
