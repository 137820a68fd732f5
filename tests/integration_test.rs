// Integration tests for the Intcode machine

use intcode::interpreter::constants::DENSE_GROWTH_WINDOW;
use intcode::{ascii, Interpreter, RuntimeError, Status, Word};

const QUINE: [i64; 16] = [
    109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
];

const COMPARE_WITH_EIGHT: [i64; 47] = [
    3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0, 0,
    1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4, 20, 1105,
    1, 46, 98, 99,
];

fn words(values: &[i64]) -> Vec<Word> {
    values.iter().copied().map(Word::from).collect()
}

fn word(value: i64) -> Word {
    Word::from(value)
}

/// Run a program to completion and return its output
fn run_to_halt(program: &[i64], input: &[i64]) -> Vec<Word> {
    let mut machine = Interpreter::new(program, input.iter().copied());
    let status = machine.run().expect("Execution failed");
    assert_eq!(status, Status::Halted);
    machine.drain_output()
}

/// Run a program to completion and return its final memory image
fn final_memory(program: &[i64]) -> Vec<Word> {
    let mut machine = Interpreter::with_program(program);
    machine.run().expect("Execution failed");
    machine.memory().to_vec()
}

// === ARITHMETIC ===

#[test]
fn test_add_and_multiply_program() {
    let mut machine = Interpreter::with_program(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
    assert_eq!(machine.run(), Ok(Status::Halted));
    assert_eq!(machine.peek(0), word(3500));
    assert_eq!(machine.peek(3), word(70));
}

#[test]
fn test_small_position_mode_programs() {
    assert_eq!(final_memory(&[1, 0, 0, 0, 99]), words(&[2, 0, 0, 0, 99]));
    assert_eq!(final_memory(&[2, 3, 0, 3, 99]), words(&[2, 3, 0, 6, 99]));
    assert_eq!(final_memory(&[2, 4, 4, 5, 99, 0]), words(&[2, 4, 4, 5, 99, 9801]));
    assert_eq!(
        final_memory(&[1, 1, 1, 4, 99, 5, 6, 0, 99]),
        words(&[30, 1, 1, 4, 2, 5, 6, 0, 99])
    );
}

#[test]
fn test_mixed_immediate_position_multiply() {
    let mut machine = Interpreter::with_program(&[1002, 4, 3, 4, 33]);
    machine.run().expect("Execution failed");
    assert_eq!(machine.peek(4), word(99));
}

#[test]
fn test_negative_immediate_operand() {
    let mut machine = Interpreter::with_program(&[1101, 100, -1, 4, 0]);
    machine.run().expect("Execution failed");
    assert_eq!(machine.peek(4), word(99));
}

#[test]
fn test_patched_program_before_run() {
    // Addresses 1 and 2 are overwritten before the program starts
    let mut machine = Interpreter::with_program(&[1, 0, 0, 0, 99, 7, 5]);
    machine.poke(1, 5);
    machine.poke(2, 6);
    machine.run().expect("Execution failed");
    assert_eq!(machine.peek(0), word(12));
}

// === INPUT / OUTPUT ===

#[test]
fn test_identity_echo() {
    assert_eq!(run_to_halt(&[3, 0, 4, 0, 99], &[42]), words(&[42]));
}

#[test]
fn test_equality_and_less_than() {
    let position_eq = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
    assert_eq!(run_to_halt(&position_eq, &[8]), words(&[1]));
    assert_eq!(run_to_halt(&position_eq, &[7]), words(&[0]));

    let position_lt = [3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8];
    assert_eq!(run_to_halt(&position_lt, &[7]), words(&[1]));
    assert_eq!(run_to_halt(&position_lt, &[8]), words(&[0]));
    assert_eq!(run_to_halt(&position_lt, &[9]), words(&[0]));

    let immediate_eq = [3, 3, 1108, -1, 8, 3, 4, 3, 99];
    assert_eq!(run_to_halt(&immediate_eq, &[8]), words(&[1]));
    assert_eq!(run_to_halt(&immediate_eq, &[7]), words(&[0]));

    let immediate_lt = [3, 3, 1107, -1, 8, 3, 4, 3, 99];
    assert_eq!(run_to_halt(&immediate_lt, &[7]), words(&[1]));
    assert_eq!(run_to_halt(&immediate_lt, &[8]), words(&[0]));
}

#[test]
fn test_jumps() {
    let position_jump = [3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];
    assert_eq!(run_to_halt(&position_jump, &[0]), words(&[0]));
    assert_eq!(run_to_halt(&position_jump, &[9]), words(&[1]));

    let immediate_jump = [3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1];
    assert_eq!(run_to_halt(&immediate_jump, &[0]), words(&[0]));
    assert_eq!(run_to_halt(&immediate_jump, &[9]), words(&[1]));
}

#[test]
fn test_compare_with_eight() {
    assert_eq!(run_to_halt(&COMPARE_WITH_EIGHT, &[7]), words(&[999]));
    assert_eq!(run_to_halt(&COMPARE_WITH_EIGHT, &[8]), words(&[1000]));
    assert_eq!(run_to_halt(&COMPARE_WITH_EIGHT, &[9]), words(&[1001]));
}

#[test]
fn test_output_persists_until_drained() {
    let mut machine = Interpreter::with_program(&[3, 9, 4, 9, 3, 9, 4, 9, 99, 0]);
    machine.feed([1]);
    assert_eq!(machine.run(), Ok(Status::AwaitingInput));
    assert_eq!(machine.output(), words(&[1]));

    machine.feed([2]);
    assert_eq!(machine.run(), Ok(Status::Halted));
    assert_eq!(machine.output(), words(&[1, 2]));
    assert_eq!(machine.last_output(), Some(&word(2)));

    assert_eq!(machine.drain_output(), words(&[1, 2]));
    assert!(machine.output().is_empty());
}

// === RELATIVE BASE AND EXTENDED MEMORY ===

#[test]
fn test_quine() {
    assert_eq!(run_to_halt(&QUINE, &[]), words(&QUINE));
}

#[test]
fn test_large_product() {
    let output = run_to_halt(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]);
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].to_string().len(), 16);
}

#[test]
fn test_product_past_64_bits_is_exact() {
    let output = run_to_halt(&[1102, 4294967296, 4294967296, 7, 4, 7, 99, 0], &[]);
    assert_eq!(output, vec!["18446744073709551616".parse::<Word>().unwrap()]);
}

#[test]
fn test_arithmetic_stays_exact_far_past_64_bits() {
    // Square address 20 three times, then add one and output it
    let program = [
        2, 20, 20, 20, 2, 20, 20, 20, 2, 20, 20, 20, 1001, 20, 1, 20, 4, 20, 99,
    ];
    let mut machine = Interpreter::with_program(&program);
    machine.poke(20, i64::MAX);
    assert_eq!(machine.run(), Ok(Status::Halted));

    let expected = word(i64::MAX).pow(8u32) + word(1);
    assert_eq!(machine.drain_output(), vec![expected]);
}

#[test]
fn test_relative_base_past_64_bits() {
    // Push the relative base to 2^64, back down to 2, then output address 7 relatively
    let program: [i64; 13] = [
        109,
        i64::MAX,
        109,
        i64::MAX,
        109,
        2,
        109,
        -i64::MAX,
        109,
        -i64::MAX,
        204,
        5,
        99,
    ];
    let mut machine = Interpreter::with_program(&program);
    assert_eq!(machine.step(), Ok(Status::Running));
    assert_eq!(machine.step(), Ok(Status::Running));
    assert_eq!(machine.step(), Ok(Status::Running));
    assert_eq!(machine.relative_base().to_string(), "18446744073709551616");
    assert_eq!(machine.run(), Ok(Status::Halted));
    assert_eq!(machine.relative_base(), &word(2));
    assert_eq!(machine.drain_output(), words(&[-i64::MAX]));
}

#[test]
fn test_large_literal() {
    assert_eq!(
        run_to_halt(&[104, 1125899906842624, 99], &[]),
        words(&[1125899906842624])
    );
}

#[test]
fn test_relative_mode_input_target() {
    // Relative base -2, so `203 2` writes to address 0
    assert_eq!(run_to_halt(&[109, -2, 203, 2, 4, 0, 99], &[1]), words(&[1]));
}

#[test]
fn test_read_past_program_is_zero() {
    assert_eq!(run_to_halt(&[4, 1000, 99], &[]), words(&[0]));
}

#[test]
fn test_far_write_then_read() {
    let far = (DENSE_GROWTH_WINDOW * 100) as i64;
    let program = [1101, 7, 8, far, 4, far, 99];
    let mut machine = Interpreter::with_program(&program);
    machine.run().expect("Execution failed");
    assert_eq!(machine.drain_output(), words(&[15]));
    assert_eq!(machine.peek(far as usize), word(15));
    assert_eq!(machine.memory().sparse_len(), 1);
}

#[test]
fn test_immediate_input_target_acts_as_position() {
    assert_eq!(run_to_halt(&[103, 5, 4, 5, 99, 0], &[77]), words(&[77]));
}

// === SUSPENSION AND HALTING ===

#[test]
fn test_suspends_on_empty_input() {
    let mut machine = Interpreter::with_program(&[3, 0, 4, 0, 99]);
    assert_eq!(machine.run(), Ok(Status::AwaitingInput));
    assert!(machine.is_awaiting_input());
    assert_eq!(machine.pc(), 0);

    // Running again without input stays put
    assert_eq!(machine.run(), Ok(Status::AwaitingInput));
    assert_eq!(machine.pc(), 0);
    assert_eq!(machine.steps(), 0);

    machine.push_input(5);
    assert_eq!(machine.status(), Status::Running);
    assert_eq!(machine.run(), Ok(Status::Halted));
    assert_eq!(machine.output(), words(&[5]));
    assert_eq!(machine.pending_input(), 0);
}

#[test]
fn test_feeding_nothing_clears_suspension_until_next_run() {
    let mut machine = Interpreter::with_program(&[3, 0, 99]);
    machine.run().expect("Execution failed");
    machine.feed(Vec::<Word>::new());
    assert_eq!(machine.status(), Status::Running);

    // The read is retried and starves again without moving
    assert_eq!(machine.run(), Ok(Status::AwaitingInput));
    assert_eq!(machine.pc(), 0);
    assert_eq!(machine.steps(), 0);
}

#[test]
fn test_split_run_matches_single_run() {
    let program = [3, 0, 4, 0, 99];

    let mut whole = Interpreter::new(&program, [42]);
    whole.run().expect("Execution failed");

    let mut split = Interpreter::with_program(&program);
    assert_eq!(split.run(), Ok(Status::AwaitingInput));
    split.feed([42]);
    assert_eq!(split.run(), Ok(Status::Halted));

    assert_eq!(split.output(), whole.output());
    assert_eq!(split.memory(), whole.memory());
}

#[test]
fn test_halted_machine_is_inert() {
    let mut machine = Interpreter::new(&[3, 0, 4, 0, 99], [1, 2]);
    assert_eq!(machine.run(), Ok(Status::Halted));
    let memory = machine.memory().clone();
    let output = machine.output().to_vec();
    let steps = machine.steps();

    assert_eq!(machine.run(), Ok(Status::Halted));
    assert_eq!(machine.step(), Ok(Status::Halted));
    machine.feed([3]);
    assert_eq!(machine.run(), Ok(Status::Halted));

    assert!(machine.is_halted());
    assert_eq!(machine.memory(), &memory);
    assert_eq!(machine.output(), output.as_slice());
    assert_eq!(machine.steps(), steps);
}

#[test]
fn test_step_executes_one_instruction() {
    let mut machine = Interpreter::with_program(&[1101, 2, 3, 0, 109, 5, 99]);
    assert_eq!(machine.step(), Ok(Status::Running));
    assert_eq!(machine.peek(0), word(5));
    assert_eq!(machine.pc(), 4);

    assert_eq!(machine.step(), Ok(Status::Running));
    assert_eq!(machine.relative_base(), &word(5));

    assert_eq!(machine.step(), Ok(Status::Halted));
    assert_eq!(machine.steps(), 3);
}

#[test]
fn test_clones_run_independently() {
    let template = Interpreter::with_program(&[3, 0, 4, 0, 99]);
    let mut first = template.clone();
    let mut second = template.clone();
    first.feed([1]);
    second.feed([2]);
    first.run().expect("Execution failed");
    second.run().expect("Execution failed");

    assert_eq!(first.output(), words(&[1]));
    assert_eq!(second.output(), words(&[2]));
    assert_eq!(template.peek(0), word(3));
}

#[test]
fn test_from_source() {
    let mut machine = Interpreter::from_source("1002,4,3,4,33\n").expect("Parsing failed");
    machine.run().expect("Execution failed");
    assert_eq!(machine.peek(4), word(99));
}

#[test]
fn test_ascii_round_trip_through_machine() {
    // Echo three characters back
    let program = [3, 20, 4, 20, 3, 20, 4, 20, 3, 20, 4, 20, 99];
    let mut machine = Interpreter::with_program(&program);
    machine.feed(ascii::encode("hi"));
    machine.feed(ascii::encode_line(""));
    machine.run().expect("Execution failed");
    assert_eq!(ascii::decode(machine.output()).text, "hi\n");
}

// === FATAL ERRORS ===

#[test]
fn test_unknown_opcode() {
    let mut machine = Interpreter::with_program(&[1101, 1, 1, 5, 42, 0]);
    let err = machine.run().unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnknownOpcode {
            opcode: 42,
            word: word(42),
            pc: 4
        }
    );
    assert!(err.to_string().contains("pc 4"));

    // State is unchanged, so the fault repeats
    assert_eq!(machine.pc(), 4);
    assert_eq!(machine.run(), Err(err));
}

#[test]
fn test_immediate_write_target_is_fatal() {
    let mut machine = Interpreter::with_program(&[11101, 1, 1, 0, 99]);
    let err = machine.run().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::ImmediateWriteTarget { param: 3, pc: 0, .. }
    ));
    assert_eq!(machine.peek(0), word(11101));
}

#[test]
fn test_invalid_parameter_mode() {
    let mut machine = Interpreter::with_program(&[304, 0, 99]);
    assert!(matches!(
        machine.run(),
        Err(RuntimeError::InvalidParameterMode { mode: 3, param: 1, .. })
    ));
}

#[test]
fn test_negative_address() {
    let mut machine = Interpreter::with_program(&[4, -1, 99]);
    assert_eq!(
        machine.run(),
        Err(RuntimeError::NegativeAddress {
            address: word(-1),
            pc: 0
        })
    );

    let mut jumper = Interpreter::with_program(&[1105, 1, -3, 99]);
    assert_eq!(
        jumper.run(),
        Err(RuntimeError::NegativeAddress {
            address: word(-3),
            pc: 0
        })
    );
}

#[test]
fn test_address_beyond_usize_is_fatal() {
    let mut machine =
        Interpreter::from_source("4,1180591620717411303424,99").expect("Parsing failed");
    let err = machine.run().unwrap_err();
    assert!(matches!(err, RuntimeError::AddressOutOfRange { pc: 0, .. }));
    assert!(err.to_string().contains("1180591620717411303424"));
    assert_eq!(machine.pc(), 0);
}

#[test]
fn test_fault_on_input_keeps_queue() {
    // Relative base -10 makes the input target negative
    let mut machine = Interpreter::new(&[109, -10, 203, 0, 99], [7]);
    assert_eq!(
        machine.run(),
        Err(RuntimeError::NegativeAddress {
            address: word(-10),
            pc: 2
        })
    );
    assert_eq!(machine.pending_input(), 1);
}
