//! Search layer.
//!
//! - **[`debounce`]**: cancellable quiet-window timer over an injected clock.
//! - **[`client`]**: the remote profile lookup and its failure type.
//! - **[`orchestrator`]**: generation-tagged request lifecycle.

pub mod client;
pub mod debounce;
pub mod orchestrator;
