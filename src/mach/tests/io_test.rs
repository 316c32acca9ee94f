use super::*;

#[test]
fn test_print_forms() {
    let s = "print 'a'\nprint 2.5\nprint -3\nprintln\nprint 0x10\n";
    assert_eq!(run(s), "a2.5-3\n16");
}

#[test]
fn test_scan() {
    let mut runtime = Runtime::default();
    runtime.load(
        "test.tac",
        "scani $0\nprintln $0\nscanf $1\nprintln $1\nscanc $2\nprintln $2\n",
    );
    runtime.enter("12 2.5");
    runtime.enter("  xyz");
    assert_eq!(exec(&mut runtime, 100), "12\n2.5\nx\n");
}

#[test]
fn test_scan_waits_for_input() {
    let mut runtime = Runtime::default();
    runtime.load("test.tac", "println 1\nscani $0\nprintln $0\n");
    assert_eq!(exec(&mut runtime, 100), "1\n?");
    runtime.enter("41");
    assert_eq!(exec(&mut runtime, 100), "41\n");
}

#[test]
fn test_scan_at_end_of_input() {
    let s = "scani $0\nprintln $0\nscanc $1\nchtoint $2, $1\nprintln $2\n";
    assert_eq!(run(s), "0\n0\n");
}

#[test]
fn test_invalid_input() {
    let mut runtime = Runtime::default();
    runtime.load("test.tac", "scani $0\nprintln $0\nscani $1\nprintln $1\n");
    runtime.enter("abc 5");
    runtime.enter("6");
    runtime.close_input();
    assert_eq!(
        exec(&mut runtime, 100),
        "warning: test.tac(1,1): invalid input: 'abc'\n0\n6\n"
    );
}

#[test]
fn test_scan_into_typed_var() {
    let mut runtime = Runtime::default();
    runtime.load("test.tac", ".table\nchar c\n.code\nscani c\nprintln c\n");
    runtime.enter("65");
    assert_eq!(
        exec(&mut runtime, 100),
        "warning: test.tac(4,1): divergent type for target symbol\nA\n"
    );
}

#[test]
fn test_rand() {
    let s = "rand $0\nslt $1, $0, 0\nprintln $1\n";
    assert_eq!(run(s), "0\n");
}

#[test]
fn test_rand_is_seeded() {
    let mut one = Runtime::default();
    let mut two = Runtime::default();
    for runtime in [&mut one, &mut two].iter_mut() {
        runtime.seed(7);
        runtime.load("test.tac", "rand $0\nprintln $0\nrand $0\nprintln $0\n");
    }
    assert_eq!(exec(&mut one, 100), exec(&mut two, 100));
}

#[test]
fn test_chars_print_as_bytes() {
    let mut runtime = Runtime::default();
    runtime.load("test.tac", "scanc $0\nprint $0\nscanc $1\nprint $1\n");
    runtime.enter("é");
    runtime.close_input();
    let mut out = vec![];
    loop {
        match runtime.execute(100) {
            Event::Stopped => break,
            Event::Print(bytes) => out.extend(bytes),
            _ => {}
        }
    }
    assert_eq!(out, "é".as_bytes());
}

#[test]
fn test_chars_are_unsigned() {
    let s = "inttoch $0, 200\nchtoint $1, $0\nprintln $1\n\
             slt $2, $0, 'a'\nchtoint $3, $2\nprintln $3\n\
             slt $2, 'a', $0\nchtoint $3, $2\nprintln $3\n";
    assert_eq!(run(s), "200\n0\n1\n");
}
