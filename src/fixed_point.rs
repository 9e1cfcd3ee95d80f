//! Readers for the fixed-point structures the RSP loads from RDRAM.
//!
//! An N64 `Mtx` is two 4x4 planes of 16-bit values: 32 bytes of signed
//! integer parts followed by 32 bytes of unsigned fractions. In the host
//! word layout the two halfwords of every word are swapped, which
//! [`Rdram::read_u16`] undoes with [`U16_TWIDDLE`](crate::memory::U16_TWIDDLE).

use crate::math::{Matrix4, Vec2};
use crate::memory::Rdram;

pub const MATRIX_SIZE: u32 = 64;
pub const LIGHT_SIZE: u32 = 16;
pub const VIEWPORT_SIZE: u32 = 16;

const FRACTION_PLANE: u32 = 32;
const FIXED_RECIP: f32 = 1.0 / 65536.0;

pub fn matrix_from_fixed_point(mem: &Rdram, address: u32) -> Matrix4 {
    debug_assert!(mem.contains(address, MATRIX_SIZE), "Mtx: address invalid (0x{:08X})", address);

    let mut mat = Matrix4::IDENTITY;
    for (i, row) in mat.m.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            let offset = ((i * 4 + j) * 2) as u32;
            let hi = mem.read_s16(address + offset) as i32;
            let lo = mem.read_u16(address + FRACTION_PLANE + offset) as i32;
            *cell = ((hi << 16) | lo) as f32 * FIXED_RECIP;
        }
    }
    mat
}

/// Inverse of [`matrix_from_fixed_point`]; used by hosts that build lists.
pub fn matrix_to_fixed_point(mem: &mut Rdram, address: u32, mat: &Matrix4) {
    for (i, row) in mat.m.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate() {
            let offset = ((i * 4 + j) * 2) as u32;
            let fixed = (cell * 65536.0).round() as i32;
            mem.write_u16(address + offset, (fixed >> 16) as u16);
            mem.write_u16(address + FRACTION_PLANE + offset, fixed as u16);
        }
    }
}

/// `Light` record: colour, a second (unused) colour copy, then direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct N64Light {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub r2: u8,
    pub g2: u8,
    pub b2: u8,
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl N64Light {
    pub fn read(mem: &Rdram, address: u32) -> Self {
        debug_assert!(
            mem.contains(address, LIGHT_SIZE),
            "Light: address invalid (0x{:08X})",
            address
        );
        Self {
            r: mem.read_u8(address),
            g: mem.read_u8(address + 1),
            b: mem.read_u8(address + 2),
            r2: mem.read_u8(address + 4),
            g2: mem.read_u8(address + 5),
            b2: mem.read_u8(address + 6),
            x: mem.read_s8(address + 8),
            y: mem.read_s8(address + 9),
            z: mem.read_s8(address + 10),
        }
    }

    /// A zero direction marks an ambient light.
    pub fn has_direction(&self) -> bool {
        (self.x | self.y | self.z) != 0
    }
}

/// `Vp`: four s16 scale values then four s16 translations, all 14.2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: Vec2,
    pub trans: Vec2,
}

impl Viewport {
    pub fn read(mem: &Rdram, address: u32) -> Self {
        debug_assert!(
            mem.contains(address, VIEWPORT_SIZE),
            "MoveMem viewport: invalid memory (0x{:08X})",
            address
        );
        let scale_x = mem.read_s16(address);
        let scale_y = mem.read_s16(address + 2);
        let trans_x = mem.read_s16(address + 8);
        let trans_y = mem.read_s16(address + 10);
        Self {
            scale: Vec2::new(scale_x as f32 * 0.25, scale_y as f32 * 0.25),
            trans: Vec2::new(trans_x as f32 * 0.25, trans_y as f32 * 0.25),
        }
    }
}
