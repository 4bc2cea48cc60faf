//! In-process domain event distribution.
//!
//! The workflows publish a [`DomainEvent`] after every successful state
//! transition. Subscribers (notification delivery, email confirmation,
//! future integrations) attach via [`EventBus::subscribe`]; nothing in the
//! workflows depends on a subscriber being present.

pub mod bus;

pub use bus::{DomainEvent, EventBus};
