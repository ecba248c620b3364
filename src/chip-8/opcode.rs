use std::fmt;

/// # Opcodes
///
/// CHIP-8 opcodes are 16 bits each. The most significant nibble selects a
/// family, and for families 0, 8, E and F the low nibble or low byte selects
/// the operation within it.
///
/// The remaining fields carry operands:
/// - `_NNN` a 12 bit address
/// - `__NN` an 8 bit immediate
/// - `_X__` register Vx, or the last register of the range V0..=Vx
/// - `__Y_` register Vy
/// - `___N` a 4 bit immediate (sprite height)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipIfEqualImmediate(u8, u8),
    /// 4XNN
    SkipIfNotEqualImmediate(u8, u8),
    /// 5XY0
    SkipIfEqual(u8, u8),
    /// 6XNN
    LoadImmediate(u8, u8),
    /// 7XNN
    AddImmediate(u8, u8),
    /// 8XY0
    Move(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4
    Add(u8, u8),
    /// 8XY5
    Sub(u8, u8),
    /// 8XY6
    ShiftRight(u8),
    /// 8XY7
    SubReversed(u8, u8),
    /// 8XYE
    ShiftLeft(u8),
    /// 9XY0
    SkipIfNotEqual(u8, u8),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKeyDown(u8),
    /// EXA1
    SkipIfKeyUp(u8),
    /// FX07
    LoadDelayTimer(u8),
    /// FX0A
    WaitForKey(u8),
    /// FX15
    SetDelayTimer(u8),
    /// FX18
    SetSoundTimer(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    LoadGlyph(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegisters(u8),
    /// FX65
    LoadRegisters(u8),
}

/// Returns the opcode's component nibbles, most significant first.
pub fn nibbles(opcode: u16) -> (u8, u8, u8, u8) {
    (
        ((opcode & 0xF000) >> 12) as u8,
        ((opcode & 0x0F00) >> 8) as u8,
        ((opcode & 0x00F0) >> 4) as u8,
        (opcode & 0x000F) as u8,
    )
}

impl Instruction {
    /// Decode an opcode word. `None` means it matches no defined operation.
    pub fn decode(opcode: u16) -> Option<Self> {
        let nnn = opcode & 0x0FFF;
        let nn = (opcode & 0x00FF) as u8;

        let instruction = match nibbles(opcode) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, ..) => Instruction::Jump(nnn),
            (0x2, ..) => Instruction::Call(nnn),
            (0x3, x, ..) => Instruction::SkipIfEqualImmediate(x, nn),
            (0x4, x, ..) => Instruction::SkipIfNotEqualImmediate(x, nn),
            (0x5, x, y, 0x0) => Instruction::SkipIfEqual(x, y),
            (0x6, x, ..) => Instruction::LoadImmediate(x, nn),
            (0x7, x, ..) => Instruction::AddImmediate(x, nn),
            (0x8, x, y, 0x0) => Instruction::Move(x, y),
            (0x8, x, y, 0x1) => Instruction::Or(x, y),
            (0x8, x, y, 0x2) => Instruction::And(x, y),
            (0x8, x, y, 0x3) => Instruction::Xor(x, y),
            (0x8, x, y, 0x4) => Instruction::Add(x, y),
            (0x8, x, y, 0x5) => Instruction::Sub(x, y),
            (0x8, x, _, 0x6) => Instruction::ShiftRight(x),
            (0x8, x, y, 0x7) => Instruction::SubReversed(x, y),
            (0x8, x, _, 0xE) => Instruction::ShiftLeft(x),
            (0x9, x, y, 0x0) => Instruction::SkipIfNotEqual(x, y),
            (0xA, ..) => Instruction::LoadIndex(nnn),
            (0xB, ..) => Instruction::JumpOffset(nnn),
            (0xC, x, ..) => Instruction::Random(x, nn),
            (0xD, x, y, n) => Instruction::Draw(x, y, n),
            (0xE, x, 0x9, 0xE) => Instruction::SkipIfKeyDown(x),
            (0xE, x, 0xA, 0x1) => Instruction::SkipIfKeyUp(x),
            (0xF, x, 0x0, 0x7) => Instruction::LoadDelayTimer(x),
            (0xF, x, 0x0, 0xA) => Instruction::WaitForKey(x),
            (0xF, x, 0x1, 0x5) => Instruction::SetDelayTimer(x),
            (0xF, x, 0x1, 0x8) => Instruction::SetSoundTimer(x),
            (0xF, x, 0x1, 0xE) => Instruction::AddIndex(x),
            (0xF, x, 0x2, 0x9) => Instruction::LoadGlyph(x),
            (0xF, x, 0x3, 0x3) => Instruction::StoreBcd(x),
            (0xF, x, 0x5, 0x5) => Instruction::StoreRegisters(x),
            (0xF, x, 0x6, 0x5) => Instruction::LoadRegisters(x),
            _ => return None,
        };

        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SkipIfEqualImmediate(x, nn) => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipIfNotEqualImmediate(x, nn) => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipIfEqual(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImmediate(x, nn) => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddImmediate(x, nn) => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x) => write!(f, "SHR V{:X}", x),
            SubReversed(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x) => write!(f, "SHL V{:X}", x),
            SkipIfNotEqual(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Random(x, nn) => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfKeyDown(x) => write!(f, "SKP V{:X}", x),
            SkipIfKeyUp(x) => write!(f, "SKNP V{:X}", x),
            LoadDelayTimer(x) => write!(f, "LD V{:X}, DT", x),
            WaitForKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelayTimer(x) => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            LoadGlyph(x) => write!(f, "LD F, V{:X}", x),
            StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegisters(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{nibbles, Instruction};

    #[test]
    fn test_nibbles() {
        assert_eq!(nibbles(0xABCD), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_decode_operands() {
        assert_eq!(Instruction::decode(0x00E0), Some(Instruction::ClearScreen));
        assert_eq!(Instruction::decode(0x00EE), Some(Instruction::Return));
        assert_eq!(Instruction::decode(0x1ABC), Some(Instruction::Jump(0xABC)));
        assert_eq!(Instruction::decode(0x2123), Some(Instruction::Call(0x123)));
        assert_eq!(
            Instruction::decode(0x3A42),
            Some(Instruction::SkipIfEqualImmediate(0xA, 0x42))
        );
        assert_eq!(
            Instruction::decode(0x8AB4),
            Some(Instruction::Add(0xA, 0xB))
        );
        assert_eq!(
            Instruction::decode(0x8AB7),
            Some(Instruction::SubReversed(0xA, 0xB))
        );
        assert_eq!(Instruction::decode(0x8ABE), Some(Instruction::ShiftLeft(0xA)));
        assert_eq!(Instruction::decode(0xB300), Some(Instruction::JumpOffset(0x300)));
        assert_eq!(Instruction::decode(0xC7F0), Some(Instruction::Random(0x7, 0xF0)));
        assert_eq!(
            Instruction::decode(0xD125),
            Some(Instruction::Draw(0x1, 0x2, 0x5))
        );
        assert_eq!(Instruction::decode(0xE69E), Some(Instruction::SkipIfKeyDown(0x6)));
        assert_eq!(Instruction::decode(0xE6A1), Some(Instruction::SkipIfKeyUp(0x6)));
        assert_eq!(Instruction::decode(0xF50A), Some(Instruction::WaitForKey(0x5)));
        assert_eq!(Instruction::decode(0xF933), Some(Instruction::StoreBcd(0x9)));
        assert_eq!(
            Instruction::decode(0xFF65),
            Some(Instruction::LoadRegisters(0xF))
        );
    }

    #[test]
    fn test_decode_rejects_unknown() {
        for &opcode in &[
            0x0000, 0x0123, 0x00E1, 0x5121, 0x8128, 0x812F, 0x9121, 0xE19F, 0xF100, 0xF175,
            0xFFFF,
        ] {
            assert_eq!(Instruction::decode(opcode), None, "{:#06x}", opcode);
        }
    }

    #[test]
    fn test_decode_covers_every_family() {
        let defined = (0..=0xFFFF_u16)
            .filter_map(Instruction::decode)
            .map(|instruction| std::mem::discriminant(&instruction))
            .collect::<std::collections::HashSet<_>>();

        assert_eq!(defined.len(), 34);
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::ClearScreen.to_string(), "CLS");
        assert_eq!(Instruction::Jump(0x2A0).to_string(), "JP 0x2A0");
        assert_eq!(Instruction::LoadImmediate(3, 0x1F).to_string(), "LD V3, 0x1F");
        assert_eq!(Instruction::Draw(0, 1, 5).to_string(), "DRW V0, V1, 5");
        assert_eq!(Instruction::StoreRegisters(0xA).to_string(), "LD [I], VA");
    }
}
