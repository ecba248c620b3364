//! Property tests over whole programs driven through the public API.

use chip8_interp::{random, Interpreter, Memory, Quirks, KEY_COUNT};
use proptest::prelude::*;

const NO_KEYS: [bool; KEY_COUNT] = [false; KEY_COUNT];

fn interpreter(program: &[u8]) -> Interpreter {
    let mut interpreter = Interpreter::new(Quirks::default(), random::seeded(1));
    interpreter.load(program).unwrap();

    interpreter
}

/// CALL a subroutine that decrements V0 and recurses until it reaches zero.
fn recursion_program(depth: u8) -> Vec<u8> {
    vec![
        0x60, depth, // 0x200: LD V0, depth
        0x22, 0x06, // 0x202: CALL 0x206
        0x12, 0x04, // 0x204: JP 0x204
        0x70, 0xFF, // 0x206: ADD V0, 0xFF
        0x30, 0x00, // 0x208: SE V0, 0
        0x22, 0x06, // 0x20A: CALL 0x206
        0x00, 0xEE, // 0x20C: RET
    ]
}

proptest! {
    #[test]
    fn font_region_is_never_written(
        program in proptest::collection::vec(any::<u8>(), 0..128),
        keys in any::<[bool; KEY_COUNT]>(),
        seed in any::<u64>(),
    ) {
        let mut interpreter = Interpreter::new(Quirks::default(), random::seeded(seed));
        interpreter.load(&program).unwrap();
        let pristine = Memory::default();

        for _ in 0..256 {
            if interpreter.cycle(&keys).is_err() {
                break;
            }
        }

        prop_assert_eq!(
            interpreter.cpu().memory().as_slice(0, 0x200).unwrap(),
            pristine.as_slice(0, 0x200).unwrap()
        );
    }

    #[test]
    fn load_then_add_immediate_wraps(x in 0u8..16, nn in any::<u8>(), k in any::<u8>()) {
        let mut interpreter = interpreter(&[0x60 | x, nn, 0x70 | x, k]);

        interpreter.cycle(&NO_KEYS).unwrap();
        interpreter.cycle(&NO_KEYS).unwrap();

        prop_assert_eq!(interpreter.cpu().v(x), nn.wrapping_add(k));
    }

    #[test]
    fn nested_calls_unwind_to_caller(depth in 1u8..=16) {
        let mut interpreter = interpreter(&recursion_program(depth));
        let mut deepest = 0;

        for _ in 0..128 {
            interpreter.cycle(&NO_KEYS).unwrap();
            deepest = deepest.max(interpreter.cpu().sp());
            if interpreter.cpu().pc() == 0x204 {
                break;
            }
        }

        prop_assert_eq!(deepest, depth);
        prop_assert_eq!(interpreter.cpu().pc(), 0x204);
        prop_assert_eq!(interpreter.cpu().sp(), 0);
    }

    #[test]
    fn drawing_twice_erases_the_sprite(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let height = sprite.len() as u8;
        let mut program = vec![
            0x60, x, // LD V0, x
            0x61, y, // LD V1, y
            0xA2, 0x0C, // LD I, 0x20C
            0xD0, 0x10 | height, // DRW V0, V1, height
            0xD0, 0x10 | height, // DRW V0, V1, height
            0x12, 0x0A, // JP 0x20A
        ];
        program.extend_from_slice(&sprite);
        let mut interpreter = interpreter(&program);

        for _ in 0..4 {
            interpreter.cycle(&NO_KEYS).unwrap();
        }
        prop_assert_eq!(interpreter.cpu().v(0xF), 0);

        interpreter.cycle(&NO_KEYS).unwrap();
        let any_set = sprite.iter().any(|&row| row != 0);
        prop_assert_eq!(interpreter.cpu().v(0xF), any_set as u8);
        prop_assert!(interpreter.cpu().framebuffer().pixels().iter().all(|&p| !p));
    }

    #[test]
    fn bcd_digits_recompose(value in any::<u8>()) {
        let mut interpreter = interpreter(&[0x60, value, 0xA3, 0x00, 0xF0, 0x33]);

        for _ in 0..3 {
            interpreter.cycle(&NO_KEYS).unwrap();
        }

        let digits = interpreter.cpu().memory().as_slice(0x300, 3).unwrap();
        prop_assert!(digits.iter().all(|&digit| digit < 10));
        prop_assert_eq!(
            u16::from(digits[0]) * 100 + u16::from(digits[1]) * 10 + u16::from(digits[2]),
            u16::from(value)
        );
    }
}

#[test]
fn seventeen_nested_calls_overflow() {
    let mut interpreter = interpreter(&recursion_program(17));

    let fault = (0..128)
        .find_map(|_| interpreter.cycle(&NO_KEYS).err())
        .expect("recursion must overflow");

    assert_eq!(fault, chip8_interp::Error::StackOverflow { pc: 0x20A });
}
