/// Display color, RGBA in `[0, 1]`.
pub type Rgba = [f32; 4];

const PALETTE: [Rgba; 10] = [
    [0.894, 0.102, 0.110, 1.0],
    [0.216, 0.494, 0.722, 1.0],
    [0.302, 0.686, 0.290, 1.0],
    [0.596, 0.306, 0.639, 1.0],
    [1.000, 0.498, 0.000, 1.0],
    [1.000, 1.000, 0.200, 1.0],
    [0.651, 0.337, 0.157, 1.0],
    [0.969, 0.506, 0.749, 1.0],
    [0.600, 0.600, 0.600, 1.0],
    [0.400, 0.761, 0.647, 1.0],
];

/// Color for the subset at `index`; the palette repeats after ten entries.
#[must_use]
pub fn palette_color(index: usize) -> Rgba {
    PALETTE[index % PALETTE.len()]
}
