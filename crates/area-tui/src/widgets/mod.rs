//! Widget components for the TUI

pub mod dialogs;
pub mod help_bar;
pub mod list;
pub mod modal_overlay;
pub mod nav_bar;
pub mod pages;
pub mod sign_in;
pub mod toasts;
pub mod wizard;

pub use dialogs::{ConfirmDialog, OAuthPendingDialog, PickerDialog, PromptDialog};
pub use help_bar::HelpBar;
pub use nav_bar::NavBar;
pub use sign_in::SignInForm;
pub use toasts::ToastStack;
pub use wizard::WizardView;
