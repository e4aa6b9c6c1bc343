mod countdown;
mod guard;

pub use countdown::{Countdown, Tick};
pub use guard::{Signature, TransitionGuard};
