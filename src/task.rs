//! The graphics task header (`OSTask`) the CPU leaves in SP DMEM at 0xFC0.

pub const TASK_HEADER_OFFSET: u32 = 0x0FC0;
pub const TASK_HEADER_WORDS: usize = 16;

const PHYS_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskDescriptor {
    pub ucode: u32,
    pub ucode_size: u32,
    pub ucode_data: u32,
    pub ucode_data_size: u32,
    /// Start of the display list.
    pub data_ptr: u32,
    pub dram_stack_size: u32,
}

impl TaskDescriptor {
    /// Decodes the header words in field order: type, flags, ucode_boot,
    /// ucode_boot_size, ucode, ucode_size, ucode_data, ucode_data_size,
    /// dram_stack, dram_stack_size, output_buff, output_buff_size, data_ptr,
    /// data_size, yield_data_ptr, yield_data_size.
    pub fn from_words(words: &[u32; TASK_HEADER_WORDS]) -> Self {
        Self {
            ucode: words[4] & PHYS_MASK,
            ucode_size: words[5],
            ucode_data: words[6] & PHYS_MASK,
            ucode_data_size: words[7],
            dram_stack_size: words[9],
            data_ptr: words[12],
        }
    }

    /// Reads the header from a copy of SP DMEM, big-endian as the RSP sees
    /// it. `None` if the slice stops short of the header.
    pub fn from_dmem(dmem: &[u8]) -> Option<Self> {
        let start = TASK_HEADER_OFFSET as usize;
        let header = dmem.get(start..start + TASK_HEADER_WORDS * 4)?;
        let mut words = [0u32; TASK_HEADER_WORDS];
        for (word, bytes) in words.iter_mut().zip(header.chunks_exact(4)) {
            *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Some(Self::from_words(&words))
    }

    /// Depth of the renderer's matrix stack (one 64-byte Mtx per entry).
    pub fn matrix_stack_size(&self) -> u32 {
        self.dram_stack_size >> 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields_and_masking() {
        let mut words = [0u32; TASK_HEADER_WORDS];
        words[0] = 1; // M_GFXTASK
        words[4] = 0x8010_0000;
        words[5] = 0x1000;
        words[6] = 0xA011_0000;
        words[7] = 0x800;
        words[9] = 0x400;
        words[12] = 0x0020_0000;

        let task = TaskDescriptor::from_words(&words);
        assert_eq!(task.ucode, 0x0010_0000);
        assert_eq!(task.ucode_data, 0x0011_0000);
        assert_eq!(task.ucode_size, 0x1000);
        assert_eq!(task.ucode_data_size, 0x800);
        assert_eq!(task.data_ptr, 0x0020_0000);
        assert_eq!(task.matrix_stack_size(), 16);
    }

    #[test]
    fn test_header_read_from_dmem() {
        let mut dmem = vec![0u8; 0x1000];
        let at = |word: usize| TASK_HEADER_OFFSET as usize + word * 4;
        dmem[at(5)..at(5) + 4].copy_from_slice(&0x0000_1000u32.to_be_bytes());
        dmem[at(12)..at(12) + 4].copy_from_slice(&0x0020_0040u32.to_be_bytes());

        let task = TaskDescriptor::from_dmem(&dmem).expect("header in range");
        assert_eq!(task.ucode_size, 0x1000);
        assert_eq!(task.data_ptr, 0x0020_0040);
        assert_eq!(TaskDescriptor::from_dmem(&dmem[..0xFFC]), None);
    }
}
