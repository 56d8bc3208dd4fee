pub mod constants;
pub mod display_utils;
pub mod fft_engine;
pub mod format;
pub mod frame_bus;
pub mod processor;
pub mod ring_buffer;
pub mod smoothing;
pub mod spectrum;
pub mod waveform;
pub mod window_functions;
