//! Augmentation transforms — the numeric core of noisy/clean pair synthesis.
//!
//! Every transform borrows its inputs and returns a freshly allocated
//! buffer; none keep state between calls, so they can run on independent
//! buffers from any number of threads. Invalid parameters are reported, not
//! clamped.

pub mod mixing;
pub mod spectral;
pub mod timing;

pub use mixing::{
    DEFAULT_INITIAL_DISTANCE_M, apply_environmental_sounds, attenuation_db, mix_clean_and_noise,
    reconcile_length, simulate_noise_at_distance,
};
pub use spectral::{adjust_volume, apply_bandpass_filter};
pub use timing::{apply_echo, apply_speed_and_pitch_change, time_stretch};
