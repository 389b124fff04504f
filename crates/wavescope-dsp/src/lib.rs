pub mod detrend;
pub mod filter;
pub mod zero_phase;

pub use detrend::{detrend, is_all_zero};
pub use filter::{design_bandpass, FilterSpec};
pub use zero_phase::{filtfilt, has_minimum_samples, lfilter, lfilter_zi};
