//! Backend-free visualisation layer
//!
//! Renderers consume [`SpectrumFrame`](crate::audio::spectrum::SpectrumFrame)s
//! and emit [`DrawCommand`]s; painting them is left to whichever UI toolkit
//! hosts the analyser.

pub mod circular_bars;
pub mod draw;
pub mod renderer;
pub mod spectrum_bars;
pub mod style;
pub mod waveform_line;

pub use circular_bars::CircularBars;
pub use draw::{DrawCommand, DrawList, Paint, Point, Size};
pub use renderer::{RendererSet, VisualizationType, VisualizerRenderer};
pub use spectrum_bars::SpectrumBars;
pub use style::{Color, UITheme};
pub use waveform_line::WaveformLine;
