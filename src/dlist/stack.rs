use std::fmt;

pub const MAX_DL_STACK_SIZE: usize = 32;

/// One nested display list: where the next command is fetched from and, for
/// bounded sub-lists, how many more commands it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlFrame {
    pub pc: u32,
    pub remaining: Option<u32>,
    exhausted: bool,
}

impl DlFrame {
    fn new(pc: u32, remaining: Option<u32>) -> Self {
        Self {
            pc,
            remaining,
            exhausted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow {
    pub address: u32,
}

impl fmt::Display for StackOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "display list stack overflow: call to 0x{:08X} exceeds {} nested lists",
            self.address, MAX_DL_STACK_SIZE
        )
    }
}

impl std::error::Error for StackOverflow {}

/// Call/return stack of display lists. Processing ends when it is empty.
#[derive(Debug, Clone, Default)]
pub struct DisplayListStack {
    frames: Vec<DlFrame>,
    overflowed: bool,
}

impl DisplayListStack {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(MAX_DL_STACK_SIZE),
            overflowed: false,
        }
    }

    /// Empties the stack and starts over with a single list.
    pub fn reset(&mut self, address: u32) {
        self.frames.clear();
        self.frames.push(DlFrame::new(address, None));
        self.overflowed = false;
    }

    /// Records a rejected push; true only for the first one since `reset`.
    pub fn note_overflow(&mut self) -> bool {
        !std::mem::replace(&mut self.overflowed, true)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn top(&self) -> Option<&DlFrame> {
        self.frames.last()
    }

    pub fn frame(&self, index: usize) -> Option<&DlFrame> {
        self.frames.get(index)
    }

    /// Address of the next command, if any list is active.
    pub fn pc(&self) -> Option<u32> {
        self.top().map(|f| f.pc)
    }

    pub fn push(&mut self, address: u32) -> Result<(), StackOverflow> {
        self.push_frame(DlFrame::new(address, None))
    }

    /// Pushes a list that is popped after `limit` commands have run at its
    /// depth. A zero limit runs nothing and pushes nothing.
    pub fn push_limited(&mut self, address: u32, limit: u32) -> Result<(), StackOverflow> {
        if limit == 0 {
            return Ok(());
        }
        self.push_frame(DlFrame::new(address, Some(limit)))
    }

    fn push_frame(&mut self, frame: DlFrame) -> Result<(), StackOverflow> {
        if self.frames.len() >= MAX_DL_STACK_SIZE {
            return Err(StackOverflow { address: frame.pc });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Returns from the current list. Bounded lists that ran out while a
    /// nested call was active are popped along with it.
    pub fn pop(&mut self) {
        self.frames.pop();
        while self.frames.last().is_some_and(|f| f.exhausted) {
            self.frames.pop();
        }
    }

    /// Replaces the current list (a branch, not a call).
    pub fn jump(&mut self, address: u32) {
        match self.frames.last_mut() {
            Some(top) => top.pc = address,
            None => self.frames.push(DlFrame::new(address, None)),
        }
    }

    pub fn advance_top(&mut self, bytes: u32) {
        if let Some(top) = self.frames.last_mut() {
            top.pc = top.pc.wrapping_add(bytes);
        }
    }

    /// Counts one command against the frame at `index`, the top of the
    /// stack before that command's handler ran.
    pub fn tick_repeat(&mut self, index: usize) {
        let is_top = index + 1 == self.frames.len();
        let Some(frame) = self.frames.get_mut(index) else {
            return;
        };
        let Some(remaining) = frame.remaining.as_mut() else {
            return;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return;
        }
        if is_top {
            self.pop();
        } else {
            frame.exhausted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_balanced() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x1000);
        for i in 0..10 {
            stack.push(0x2000 + i * 0x100).unwrap();
        }
        assert_eq!(stack.depth(), 11);
        assert_eq!(stack.pc(), Some(0x2900));
        for _ in 0..10 {
            stack.pop();
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pc(), Some(0x1000));
        stack.pop();
        assert!(stack.is_empty());
        // Popping an empty stack is harmless.
        stack.pop();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_overflow_rejects_push_and_keeps_frames() {
        let mut stack = DisplayListStack::new();
        stack.reset(0);
        for i in 1..MAX_DL_STACK_SIZE as u32 {
            stack.push(i * 8).unwrap();
        }
        assert_eq!(stack.depth(), MAX_DL_STACK_SIZE);

        let err = stack.push(0xDEAD_0000).unwrap_err();
        assert_eq!(err.address, 0xDEAD_0000);
        assert!(err.to_string().contains("0xDEAD0000"));
        assert_eq!(stack.depth(), MAX_DL_STACK_SIZE);
        assert_eq!(stack.pc(), Some((MAX_DL_STACK_SIZE as u32 - 1) * 8));
        assert_eq!(stack.frame(0).map(|f| f.pc), Some(0));
    }

    #[test]
    fn test_limit_three_pops_after_three_ticks() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        stack.push_limited(0x800, 3).unwrap();
        assert_eq!(stack.depth(), 2);

        stack.tick_repeat(1);
        stack.tick_repeat(1);
        assert_eq!(stack.depth(), 2);
        stack.tick_repeat(1);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pc(), Some(0x100));
    }

    #[test]
    fn test_limit_zero_pushes_nothing() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        stack.push_limited(0x800, 0).unwrap();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_unlimited_frames_ignore_ticks() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        for _ in 0..100 {
            stack.tick_repeat(0);
        }
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_exhausted_frame_pops_with_nested_call() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        stack.push_limited(0x800, 1).unwrap();
        // The bounded list's only command calls another list.
        stack.push(0xC00).unwrap();
        stack.tick_repeat(1);
        assert_eq!(stack.depth(), 3);

        stack.pop();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pc(), Some(0x100));
    }

    #[test]
    fn test_tick_after_handler_popped_is_ignored() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        stack.push_limited(0x800, 5).unwrap();
        stack.pop();
        stack.tick_repeat(1);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_advance_and_jump() {
        let mut stack = DisplayListStack::new();
        stack.reset(0x100);
        stack.advance_top(8);
        assert_eq!(stack.pc(), Some(0x108));
        stack.jump(0x4000);
        assert_eq!(stack.pc(), Some(0x4000));
        assert_eq!(stack.depth(), 1);
    }
}
