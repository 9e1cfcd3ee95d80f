//! Optional observation of the dispatch loop. The interpreter always calls
//! through an [`Instrumentation`]; [`NoInstrumentation`] does nothing.

use crate::gbi::Command;

pub trait Instrumentation {
    fn on_command(&mut self, _pc: u32, _cmd: Command, _name: &'static str) {}
    fn on_rect_clipped(&mut self) {}
    fn on_unknown_opcode(&mut self, _pc: u32, _cmd: Command) {}
    fn on_list_complete(&mut self, _instructions: u32) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoInstrumentation;

impl Instrumentation for NoInstrumentation {}

/// Per-frame counters.
#[derive(Debug, Clone)]
pub struct DlStats {
    pub instructions: u32,
    pub rects_clipped: u32,
    pub unknown_opcodes: u32,
    pub opcode_hits: [u32; 256],
    pub last_list_length: u32,
}

impl DlStats {
    pub fn new() -> Self {
        Self {
            instructions: 0,
            rects_clipped: 0,
            unknown_opcodes: 0,
            opcode_hits: [0; 256],
            last_list_length: 0,
        }
    }

    pub fn hits(&self, opcode: u8) -> u32 {
        self.opcode_hits[opcode as usize]
    }
}

impl Default for DlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrumentation for DlStats {
    fn on_command(&mut self, _pc: u32, cmd: Command, _name: &'static str) {
        self.instructions += 1;
        self.opcode_hits[cmd.opcode() as usize] += 1;
    }

    fn on_rect_clipped(&mut self) {
        self.rects_clipped += 1;
    }

    fn on_unknown_opcode(&mut self, _pc: u32, _cmd: Command) {
        self.unknown_opcodes += 1;
    }

    fn on_list_complete(&mut self, instructions: u32) {
        self.last_list_length = instructions;
    }
}
