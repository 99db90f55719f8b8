//! Scripted login workflow over a remote browser session.
//!
//! `WorkflowRunner` drives any [`backend::Backend`] through connect,
//! navigate, fill, submit and verify, capturing screenshots on the way.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod locator;
pub mod selector;
pub mod workflow;

pub use backend::{Backend, BackendError, ConnectOptions};
pub use config::LoginConfig;
pub use error::WorkflowError;
pub use selector::{SelectorGroup, SelectorSet};
pub use workflow::{Verdict, WorkflowResult, WorkflowRunner};
