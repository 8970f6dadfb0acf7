//! # area-core - Core Domain Types
//!
//! Foundation crate for the AREA terminal client. Provides the domain model
//! mirrored from the server, the settings-form rules, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Service Catalog (`service`)
//! - [`Service`] - A connectable integration with its actions and reactions
//! - [`AreaDefinition`] - One action or reaction a service exposes
//! - [`Authenticator`] - OAuth2 provider descriptor
//! - [`About`] - Bootstrap payload of `GET /about.json`
//!
//! ### Parameters (`field`, `settings`, `form`, `options`)
//! - [`FieldKind`], [`FieldSchema`] - Typed parameter schema
//! - [`Settings`], [`SettingValue`] - User-entered values for one area
//! - [`ordered_fields()`], [`visible_fields()`], [`is_submittable()`] - Form rules
//! - [`ServiceOptions`], [`SelectOption`] - Remote select payloads
//!
//! ### Applets (`applet`)
//! - [`Applet`], [`AppletStatus`] - Persisted automations
//! - [`Draft`], [`Area`] - The applet under construction
//! - [`AddAreaRequest`], [`SubmitAppletRequest`], [`DraftRemoval`] - Draft mutations
//!
//! ### Accounts (`account`)
//! - [`User`], [`AuthMode`], [`PasswordCredentials`], [`CodeExchange`]
//! - [`AuthorizationList`], [`AuthorizationEntry`] - OAuth grants and their usage
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Client failures, built through constructors such as
//!   [`Error::config`]; [`Error::api_failure`] exposes the server outcome
//! - [`ApiFailure`] - Cloneable outcome of a failed API call
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use area_core::prelude::*;
//! ```

pub mod account;
pub mod applet;
pub mod error;
pub mod field;
pub mod form;
pub mod log_tail;
pub mod logging;
pub mod options;
pub mod prelude;
pub mod service;
pub mod settings;
pub mod text;

// Re-export commonly used types at crate root for convenience
pub use account::{
    encode_password, AuthMode, Authorization, AuthorizationEntry, AuthorizationList,
    AuthorizationUsage, CodeExchange, PasswordCredentials, ServiceAuthorizations, User,
};
pub use applet::{
    AddAreaRequest, Applet, AppletStatus, Area, Draft, DraftField, DraftRemoval,
    SubmitAppletRequest,
};
pub use error::{ApiFailure, Error, Result};
pub use field::{FieldKind, FieldSchema};
pub use form::{
    is_submittable, is_visible, missing_required, ordered_fields, revealable_fields,
    visible_fields, Store,
};
pub use log_tail::{LogTail, DEFAULT_LOG_LINES};
pub use options::{variable_options, SelectOption, ServiceOptions};
pub use service::{
    color_of, find_service, About, Appearance, AreaDefinition, AreaType, Authenticator, Service,
    DEFAULT_COLOR,
};
pub use settings::{component_token, SettingValue, Settings};
pub use text::{field_label, pretty, pretty_setting};
