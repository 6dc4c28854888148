use crate::GROUP_SIZE;

/// Byte layout of a group, determined by its header byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupLayout {
    /// Total size of the group including the header.
    pub size: u8,
    /// Offset of each value relative to the header.
    pub offsets: [u8; GROUP_SIZE],
    /// Width of each value, either 1 or 4.
    pub widths: [u8; GROUP_SIZE],
}

pub static GROUP_LAYOUTS: [GroupLayout; 256] = build_layouts();

const fn build_layouts() -> [GroupLayout; 256] {
    let mut layouts = [GroupLayout {
        size: 0,
        offsets: [0; GROUP_SIZE],
        widths: [0; GROUP_SIZE],
    }; 256];

    let mut header = 0;
    while header < 256 {
        let mut offset = 1;
        let mut slot = 0;
        while slot < GROUP_SIZE {
            let width = if header & (1 << slot) != 0 { 4 } else { 1 };
            layouts[header].offsets[slot] = offset;
            layouts[header].widths[slot] = width;
            offset += width;
            slot += 1;
        }
        layouts[header].size = offset;
        header += 1;
    }
    layouts
}

#[inline(always)]
pub fn layout(header: u8) -> &'static GroupLayout {
    &GROUP_LAYOUTS[header as usize]
}

/// Returns `true` if `delta` does not fit into a single signed byte.
#[inline(always)]
pub fn needs_wide_slot(delta: i32) -> bool {
    !(-128..=127).contains(&delta)
}

/// Decodes the delta stored in `slot` of the group starting at `group_offset`.
#[inline(always)]
pub fn decode_slot(data: &[u8], group_offset: usize, slot: usize) -> i32 {
    let layout = layout(data[group_offset]);
    let pos = group_offset + layout.offsets[slot] as usize;
    if layout.widths[slot] == 4 {
        i32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
    } else {
        data[pos] as i8 as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts() {
        assert_eq!(layout(0).size, 9);
        assert_eq!(layout(0).offsets, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(layout(0xFF).size, 33);
        assert_eq!(layout(0xFF).offsets, [1, 5, 9, 13, 17, 21, 25, 29]);

        // the first five values are wide
        let mixed = layout(0x1F);
        assert_eq!(mixed.widths, [4, 4, 4, 4, 4, 1, 1, 1]);
        assert_eq!(mixed.offsets, [1, 5, 9, 13, 17, 21, 22, 23]);
        assert_eq!(mixed.size, 24);
    }

    #[test]
    fn test_wide_slot_boundaries() {
        assert!(needs_wide_slot(-129));
        assert!(!needs_wide_slot(-128));
        assert!(!needs_wide_slot(127));
        assert!(needs_wide_slot(128));
    }

    #[test]
    fn test_decode_sign_extends() {
        let data = [0b10, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 5, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode_slot(&data, 0, 0), -1);
        assert_eq!(decode_slot(&data, 0, 1), -2);
        assert_eq!(decode_slot(&data, 0, 2), 5);
    }
}
