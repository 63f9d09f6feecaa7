use leptos::html::Canvas as CanvasNode;
use leptos::{create_node_ref, NodeRef, Signal, SignalGet};
use leptos_use::{use_device_pixel_ratio, use_element_size, UseElementSizeReturn};

/// Size of a canvas element as laid out by CSS, plus the device pixel ratio
/// its backing store is scaled by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        }
    }
}

impl CanvasSize {
    /// Zero-sized canvases (not laid out yet, or hidden) are skipped.
    pub fn is_drawable(&self) -> bool {
        self.width >= f64::EPSILON && self.height >= f64::EPSILON
    }

    pub fn backing_width(&self) -> u32 {
        backing_pixels(self.width, self.dpr)
    }

    pub fn backing_height(&self) -> u32 {
        backing_pixels(self.height, self.dpr)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_pixels(css_pixels: f64, dpr: f64) -> u32 {
    (css_pixels * dpr).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

pub struct UseCanvasReturn {
    pub node_ref: NodeRef<CanvasNode>,
    pub size: Signal<CanvasSize>,
}

pub fn use_canvas() -> UseCanvasReturn {
    let node_ref = create_node_ref::<CanvasNode>();
    let dpr = use_device_pixel_ratio();
    let UseElementSizeReturn { width, height } = use_element_size(node_ref);

    let size = Signal::derive(move || CanvasSize {
        width: width.get(),
        height: height.get(),
        dpr: dpr.get(),
    });

    UseCanvasReturn { node_ref, size }
}
