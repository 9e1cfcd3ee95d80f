//! High-level interpreter for N64 RSP display lists.
//!
//! [`Interpreter::process`] runs one graphics task: it picks the opcode
//! table for the loaded microcode, walks the display list with its nested
//! calls, keeps the RDP state and turns draw commands into calls on a
//! [`Renderer`].

pub mod debug_flags;
pub mod dlist;
pub mod fixed_point;
pub mod gbi;
pub mod hacks;
pub mod handlers;
pub mod instrument;
pub mod math;
pub mod memory;
pub mod rdp;
pub mod renderer;
pub mod segment;
pub mod task;
pub mod ucode;

#[cfg(test)]
mod test_support;

pub use dlist::{DisplayListStack, DlContext, Interpreter, InterpreterConfig, StackOverflow};
pub use gbi::Command;
pub use hacks::{GameHacks, TitlePolicy};
pub use instrument::{DlStats, Instrumentation, NoInstrumentation};
pub use memory::Rdram;
pub use rdp::RdpState;
pub use renderer::{FrameHost, Renderer, TileState, VertexFormat, VertexLoad};
pub use segment::SegmentTable;
pub use task::TaskDescriptor;
pub use ucode::{MicrocodeProfile, SizeSignature, UcodeId, UcodeRegistry};
