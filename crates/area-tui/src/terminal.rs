//! Terminal setup and restoration

use ratatui::DefaultTerminal;

/// Enter raw mode and the alternate screen.
pub fn init() -> DefaultTerminal {
    install_panic_hook();
    ratatui::init()
}

/// Leave the alternate screen. Safe to call more than once.
pub fn restore() {
    ratatui::restore();
}

/// Restore the terminal before the default hook prints the panic
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        previous(info);
    }));
}
