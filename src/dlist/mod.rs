//! The display-list processor: per-frame driver and fetch/dispatch loop.

pub mod stack;


pub use stack::{DisplayListStack, DlFrame, StackOverflow, MAX_DL_STACK_SIZE};

use crate::debug_flags;
use crate::gbi::Command;
use crate::hacks::{GameHacks, TitlePolicy};
use crate::instrument::{Instrumentation, NoInstrumentation};
use crate::memory::Rdram;
use crate::rdp::RdpState;
use crate::renderer::{FrameHost, Renderer, TileState};
use crate::segment::SegmentTable;
use crate::task::TaskDescriptor;
use crate::ucode::{MicrocodeProfile, UcodeId, UcodeRegistry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Stop each list after this many commands.
    pub instruction_limit: Option<u32>,
    /// Log every dispatched command at debug level.
    pub trace: bool,
    /// Skip detection and always use this profile.
    pub forced_ucode: Option<UcodeId>,
}

impl InterpreterConfig {
    pub fn from_env() -> Self {
        let forced_ucode = debug_flags::force_ucode().and_then(|name| {
            let id = UcodeId::from_name(name);
            if id.is_none() {
                log::warn!("DL_FORCE_UCODE: unknown profile \"{}\"", name);
            }
            id
        });
        Self {
            instruction_limit: debug_flags::instruction_limit(),
            trace: debug_flags::trace_dl(),
            forced_ucode,
        }
    }
}

/// Everything a handler may touch while a list runs.
pub struct DlContext<'a> {
    pub state: &'a mut RdpState,
    pub segments: &'a mut SegmentTable,
    pub stack: &'a mut DisplayListStack,
    pub mem: &'a Rdram,
    pub renderer: &'a mut dyn Renderer,
    pub tiles: &'a mut dyn TileState,
    pub policy: &'a TitlePolicy,
    pub instr: &'a mut dyn Instrumentation,
    pub profile: &'a MicrocodeProfile,
    reported_unknown: &'a mut [bool; 256],
}

impl<'a> DlContext<'a> {
    /// Segmented to physical address.
    #[inline]
    pub fn resolve(&self, addr: u32) -> u32 {
        self.segments.resolve(addr)
    }

    /// Command at the current list position, without consuming it.
    pub fn peek(&self) -> Option<Command> {
        let pc = self.stack.pc()?;
        Some(Command::new(self.mem.read_u32(pc), self.mem.read_u32(pc + 4)))
    }

    pub fn peek_opcode(&self) -> Option<u8> {
        self.peek().map(|cmd| cmd.opcode())
    }

    /// Reads the next command from the current list and steps past it.
    pub fn fetch_next(&mut self) -> Command {
        let cmd = self.peek().unwrap_or(Command::new(0, 0));
        self.stack.advance_top(8);
        cmd
    }

    /// Calls a sub-list. A call past the nesting limit is dropped and the
    /// current list carries on.
    pub fn call(&mut self, address: u32) {
        if let Err(err) = self.stack.push(address) {
            self.report_overflow(err);
        }
    }

    /// Calls a sub-list that returns on its own after `limit` commands.
    pub fn call_limited(&mut self, address: u32, limit: u32) {
        if let Err(err) = self.stack.push_limited(address, limit) {
            self.report_overflow(err);
        }
    }

    fn report_overflow(&mut self, err: StackOverflow) {
        if self.stack.note_overflow() {
            log::warn!("{}; dropping the call", err);
        }
    }

    pub fn branch(&mut self, address: u32) {
        self.stack.jump(address);
    }

    pub fn return_from_list(&mut self) {
        self.stack.pop();
    }

    /// Logs the first occurrence of each unhandled opcode.
    pub fn report_unknown(&mut self, cmd: Command) {
        let pc = self.stack.pc().unwrap_or(0).wrapping_sub(8);
        self.instr.on_unknown_opcode(pc, cmd);
        let seen = &mut self.reported_unknown[cmd.opcode() as usize];
        if !*seen {
            *seen = true;
            log::warn!(
                "Unknown display list command {:08X} {:08X} at 0x{:08X} ({}), ending list",
                cmd.w0,
                cmd.w1,
                pc,
                self.profile.name()
            );
        }
    }
}

pub struct Interpreter {
    pub state: RdpState,
    pub segments: SegmentTable,
    stack: DisplayListStack,
    registry: UcodeRegistry,
    hacks: GameHacks,
    policy: TitlePolicy,
    config: InterpreterConfig,
    reported_unknown: [bool; 256],
    first_call: bool,
    frame: u32,
    pub frameskip: bool,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            state: RdpState::new(),
            segments: SegmentTable::new(),
            stack: DisplayListStack::new(),
            registry: UcodeRegistry::new(),
            hacks: GameHacks::builtin(),
            policy: TitlePolicy::default(),
            config,
            reported_unknown: [false; 256],
            first_call: true,
            frame: 0,
            frameskip: false,
        }
    }

    pub fn with_hacks(mut self, hacks: GameHacks) -> Self {
        self.registry.add_signatures(hacks.signatures());
        self.hacks = hacks;
        self
    }

    /// Selects the per-title behaviour for the loaded cartridge.
    pub fn set_title(&mut self, title: &str) {
        self.policy = self.hacks.policy_for(title);
        // Custom profiles depend on the title.
        self.registry.invalidate();
        log::info!("Display list policy for \"{}\": {:?}", title.trim(), self.policy);
    }

    pub fn policy(&self) -> &TitlePolicy {
        &self.policy
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn registry(&self) -> &UcodeRegistry {
        &self.registry
    }

    /// Number of tasks processed.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Runs one graphics task. The DP completion interrupt is raised exactly
    /// once, also when nothing could be rendered.
    pub fn process(
        &mut self,
        task: &TaskDescriptor,
        mem: &Rdram,
        renderer: &mut dyn Renderer,
        tiles: &mut dyn TileState,
        host: &mut dyn FrameHost,
    ) {
        self.process_with(task, mem, renderer, tiles, host, &mut NoInstrumentation);
    }

    pub fn process_with(
        &mut self,
        task: &TaskDescriptor,
        mem: &Rdram,
        renderer: &mut dyn Renderer,
        tiles: &mut dyn TileState,
        host: &mut dyn FrameHost,
        instr: &mut dyn Instrumentation,
    ) {
        if renderer.is_ready() {
            self.render(task, mem, renderer, tiles, host, instr);
        } else {
            log::debug!("Renderer not ready, skipping display list at 0x{:08X}", task.data_ptr);
        }
        host.signal_dp_complete();
    }

    fn render(
        &mut self,
        task: &TaskDescriptor,
        mem: &Rdram,
        renderer: &mut dyn Renderer,
        tiles: &mut dyn TileState,
        host: &mut dyn FrameHost,
        instr: &mut dyn Instrumentation,
    ) {
        if self.first_call {
            renderer.clear_all_surfaces();
            self.first_call = false;
        }

        if !self.policy.update_screen_after_list {
            host.update_screen();
        }

        let profile = self
            .registry
            .resolve(task, mem, &self.policy, self.config.forced_ucode);

        self.state.reset();
        self.frame = self.frame.wrapping_add(1);
        self.stack.reset(task.data_ptr);

        if !self.frameskip {
            renderer.set_vi_scales();
            renderer.reset_matrices(task.matrix_stack_size());
            renderer.reset();
            renderer.begin_scene();
            let count = self.run_list(&profile, mem, renderer, tiles, instr);
            instr.on_list_complete(count);
            renderer.end_scene();
        }

        if self.policy.update_screen_after_list {
            host.update_screen();
        }
    }

    /// Dispatches commands until the stack drains or the instruction limit
    /// is hit. Returns the number of commands dispatched.
    fn run_list(
        &mut self,
        profile: &MicrocodeProfile,
        mem: &Rdram,
        renderer: &mut dyn Renderer,
        tiles: &mut dyn TileState,
        instr: &mut dyn Instrumentation,
    ) -> u32 {
        let limit = self.config.instruction_limit;
        let trace = self.config.trace;
        let mut ctx = DlContext {
            state: &mut self.state,
            segments: &mut self.segments,
            stack: &mut self.stack,
            mem,
            renderer,
            tiles,
            policy: &self.policy,
            instr,
            profile,
            reported_unknown: &mut self.reported_unknown,
        };

        let mut count = 0u32;
        while let Some(pc) = ctx.stack.pc() {
            let frame_index = ctx.stack.depth() - 1;
            let cmd = ctx.fetch_next();
            let entry = profile.entry(cmd.opcode());

            count += 1;
            if trace {
                log::debug!(
                    "[{:05}] 0x{:08X}: {:08X} {:08X} {}",
                    count,
                    pc,
                    cmd.w0,
                    cmd.w1,
                    entry.name
                );
            }
            ctx.instr.on_command(pc, cmd, entry.name);

            (entry.handler)(&mut ctx, cmd);
            ctx.stack.tick_repeat(frame_index);

            if limit.is_some_and(|n| count >= n) {
                log::debug!("Instruction limit reached after {} commands", count);
                break;
            }
        }
        count
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}
