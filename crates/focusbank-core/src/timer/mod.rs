mod all_pause;
pub mod bank;
mod engine;
mod grace;

pub use all_pause::AllPauseState;
pub use bank::{bank_delta, earn, spend, Attribution, EARN_DIVISOR};
pub use engine::{
    AllPauseSnapshot, BankTimer, GraceSnapshot, Mode, Phase, TimerSnapshot,
};
pub use grace::{
    GraceChoice, GraceContext, GraceResolution, GraceState, ATTRIBUTION_THRESHOLD_SECS,
};
