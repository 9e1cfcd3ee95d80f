//! Small value types handed to the renderer.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub m: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn mul(&self, rhs: &Matrix4) -> Matrix4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Matrix4 { m: out }
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT_BLACK: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks an `RRGGBBAA` word as used by the RDP colour commands.
    pub const fn from_rgba8888(word: u32) -> Self {
        Self::new((word >> 24) as u8, (word >> 16) as u8, (word >> 8) as u8, word as u8)
    }

    /// Expands a 16-bit framebuffer pixel (5:5:5:1).
    pub fn from_rgba5551(pixel: u16) -> Self {
        let expand = |c: u16| ((c << 3) | (c >> 2)) as u8;
        Self::new(
            expand((pixel >> 11) & 0x1F),
            expand((pixel >> 6) & 0x1F),
            expand((pixel >> 1) & 0x1F),
            if pixel & 1 != 0 { 0xFF } else { 0x00 },
        )
    }

    /// Packs as `AARRGGBB`, the layout the renderer side works in.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}
