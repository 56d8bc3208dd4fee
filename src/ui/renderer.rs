use crate::audio::spectrum::SpectrumFrame;
use crate::ui::circular_bars::CircularBars;
use crate::ui::draw::{DrawList, Size};
use crate::ui::spectrum_bars::SpectrumBars;
use crate::ui::waveform_line::WaveformLine;

/// A pluggable visualisation style
///
/// Renderers turn a [`SpectrumFrame`] into backend-free draw commands. Layout
/// work belongs in `on_attach`/`on_resize`; `render` runs every display
/// frame and should stay cheap.
pub trait VisualizerRenderer: Send {
    /// Stable identifier, matches [`VisualizationType::id`]
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Selected; precompute anything that depends on the canvas size
    fn on_attach(&mut self, size: Size) {
        self.on_resize(size);
    }

    /// Deselected; release anything held for rendering
    fn on_detach(&mut self) {}

    fn on_resize(&mut self, _size: Size) {}

    /// Append this frame's commands. An empty frame draws nothing.
    fn render(&self, frame: &SpectrumFrame, out: &mut DrawList);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualizationType {
    Spectrum,
    Waveform,
    Circular,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 3] = [Self::Spectrum, Self::Waveform, Self::Circular];

    pub fn id(self) -> &'static str {
        match self {
            Self::Spectrum => "spectrum",
            Self::Waveform => "waveform",
            Self::Circular => "circular",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Spectrum => "Spectrum",
            Self::Waveform => "Waveform",
            Self::Circular => "Circular",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.id() == id)
    }
}

/// Ordered renderers with one selected at a time
///
/// Switching detaches the old renderer and attaches the new one at the last
/// known canvas size.
pub struct RendererSet {
    renderers: Vec<Box<dyn VisualizerRenderer>>,
    selected: usize,
    size: Size,
}

impl RendererSet {
    /// None when `renderers` is empty
    pub fn new(renderers: Vec<Box<dyn VisualizerRenderer>>) -> Option<Self> {
        if renderers.is_empty() {
            return None;
        }
        Some(Self {
            renderers,
            selected: 0,
            size: Size::ZERO,
        })
    }

    /// Spectrum, waveform and circular renderers with default settings
    pub fn with_defaults() -> Self {
        Self {
            renderers: vec![
                Box::new(SpectrumBars::default()),
                Box::new(WaveformLine::default()),
                Box::new(CircularBars::default()),
            ],
            selected: 0,
            size: Size::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> &dyn VisualizerRenderer {
        self.renderers[self.selected].as_ref()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.renderers.iter().map(|renderer| renderer.display_name())
    }

    /// Attach the current renderer to a canvas
    pub fn attach(&mut self, size: Size) {
        self.size = size;
        self.renderers[self.selected].on_attach(size);
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.renderers[self.selected].on_resize(size);
    }

    /// Out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.renderers.len() {
            return false;
        }
        self.switch_to(index);
        true
    }

    pub fn select_type(&mut self, ty: VisualizationType) -> bool {
        match self.renderers.iter().position(|r| r.id() == ty.id()) {
            Some(index) => {
                self.switch_to(index);
                true
            }
            None => false,
        }
    }

    /// Wraps around to the first renderer
    pub fn next(&mut self) {
        self.switch_to((self.selected + 1) % self.renderers.len());
    }

    /// Wraps around to the last renderer
    pub fn previous(&mut self) {
        let index = if self.selected > 0 {
            self.selected - 1
        } else {
            self.renderers.len() - 1
        };
        self.switch_to(index);
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.selected {
            return;
        }
        self.renderers[self.selected].on_detach();
        self.selected = index;
        self.renderers[self.selected].on_attach(self.size);
        log::debug!("Visualizer switched to {}", self.current().display_name());
    }

    /// Replace `out` with the current renderer's commands for `frame`
    pub fn render(&self, frame: &SpectrumFrame, out: &mut DrawList) {
        out.clear();
        self.current().render(frame, out);
    }
}
