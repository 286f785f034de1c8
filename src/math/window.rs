//! Blend windows for seam-free tile compositing
//!
//! A window is a T x T weight mask that is 1 in the tile interior and ramps
//! linearly towards the four borders over `edge` pixels. Ramps on opposite
//! borders multiply, so corners fall off in both directions. Where two tiles
//! overlap by exactly `edge` pixels, one tile's falling ramp meets the
//! other's rising ramp.

use clap::ValueEnum;
use ndarray::{Array1, Array2, Axis, s};

/// Sampling of the linear border ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BlendRamp {
    /// Ramp sampled at pixel centres, `(i + 0.5) / edge`
    ///
    /// Rising and falling ramps sum to exactly 1 across a seam and no
    /// covered pixel ever gets zero weight.
    #[default]
    Centered,
    /// Endpoint-inclusive ramp, `linspace(0, 1, edge)`
    ///
    /// The outermost border row and column of every tile get zero weight,
    /// so the outer frame of a reconstruction comes out black.
    Linspace,
}

impl BlendRamp {
    /// Rising ramp of length `edge`, from low to full weight
    pub fn rising(self, edge: usize) -> Array1<f32> {
        match self {
            Self::Centered => {
                let edge_f = edge as f32;
                Array1::from_shape_fn(edge, |i| (i as f32 + 0.5) / edge_f)
            }
            Self::Linspace => linspace(0.0, 1.0, edge),
        }
    }

    /// Falling ramp of length `edge`, from full to low weight
    pub fn falling(self, edge: usize) -> Array1<f32> {
        match self {
            Self::Centered => {
                let mut ramp = self.rising(edge);
                ramp.invert_axis(Axis(0));
                ramp
            }
            Self::Linspace => linspace(1.0, 0.0, edge),
        }
    }
}

/// Evenly spaced samples over `[start, stop]` including both endpoints
///
/// A single sample yields `start`, zero samples yield an empty array.
pub fn linspace(start: f32, stop: f32, count: usize) -> Array1<f32> {
    match count {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let span = (count - 1) as f32;
            Array1::from_shape_fn(count, |i| (stop - start).mul_add(i as f32 / span, start))
        }
    }
}

/// Read-only T x T weight mask shared by all tiles of one stitch run
#[derive(Debug, Clone)]
pub struct BlendWindow {
    weights: Array2<f32>,
    edge: usize,
}

impl BlendWindow {
    /// Build the window for tiles of `tile_size` ramping over `edge` pixels
    ///
    /// `edge` is clamped to `tile_size`; an edge of zero gives an all-ones
    /// window.
    pub fn new(tile_size: usize, edge: usize, ramp: BlendRamp) -> Self {
        let edge = edge.min(tile_size);
        let mut weights = Array2::<f32>::ones((tile_size, tile_size));

        if edge > 0 {
            let rising = ramp.rising(edge);
            let falling = ramp.falling(edge);
            let tail = tile_size - edge;

            // Rows
            for (mut row, &w) in weights
                .slice_mut(s![..edge, ..])
                .axis_iter_mut(Axis(0))
                .zip(rising.iter())
            {
                row *= w;
            }
            for (mut row, &w) in weights
                .slice_mut(s![tail.., ..])
                .axis_iter_mut(Axis(0))
                .zip(falling.iter())
            {
                row *= w;
            }

            // Columns
            for (mut col, &w) in weights
                .slice_mut(s![.., ..edge])
                .axis_iter_mut(Axis(1))
                .zip(rising.iter())
            {
                col *= w;
            }
            for (mut col, &w) in weights
                .slice_mut(s![.., tail..])
                .axis_iter_mut(Axis(1))
                .zip(falling.iter())
            {
                col *= w;
            }
        }

        Self { weights, edge }
    }

    /// Weight mask indexed by (row, col)
    pub const fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Tile edge length the window was built for
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    /// Ramp length in pixels
    pub const fn edge(&self) -> usize {
        self.edge
    }

    /// Weight at a tile-local pixel, zero outside the window
    pub fn weight(&self, y: usize, x: usize) -> f32 {
        self.weights.get((y, x)).copied().unwrap_or(0.0)
    }
}
