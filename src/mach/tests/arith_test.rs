use super::*;

#[test]
fn test_add_into_var() {
    let s = ".table\nint x\n.code\nadd $0, 2, 3\nmov x, $0\nprint x\n";
    assert_eq!(run(s), "5");
}

#[test]
fn test_temp_takes_first_operand_type() {
    let s = "div $0, 7.0, 2\nprintln $0\ndiv $1, 7, 2\nprintln $1\n";
    assert_eq!(
        run(s),
        "warning: test.tac(1,1): different types for target and operands\n3.5\n3\n"
    );
}

#[test]
fn test_var_target_decides_type() {
    let s = ".table\nchar c = 'a'\n.code\nadd c, c, 1\nprintln c\n";
    assert_eq!(
        run(s),
        "warning: test.tac(4,1): different types for target and operands\nb\n"
    );
}

#[test]
fn test_comparisons_and_logic() {
    let s = "slt $0, 1, 2\nsleq $1, 3, 2\nseq $2, 4, 4\nnot $3, 0\nor $4, 0, 0\n\
             print $0\nprint $1\nprint $2\nprint $3\nprint $4\n";
    assert_eq!(run(s), "10110");
}

#[test]
fn test_wrapping() {
    let s = "add $0, 2147483647, 1\nprintln $0\nminus $1, 5\nprintln $1\n";
    assert_eq!(run(s), "-2147483648\n-5\n");
}

#[test]
fn test_integer_family() {
    let s = "band $0, 6, 3\nbor $1, 6, 3\nbxor $2, 6, 3\nshl $3, 1, 4\nshr $4, -16, 2\n\
             bnot $5, 0\nmod $6, 17, 5\n\
             print $0\nprint $1\nprint $2\nprint $3\nprint $4\nprint $5\nprint $6\n";
    assert_eq!(run(s), "27516-4-12");
}

#[test]
fn test_integer_target_warning() {
    let s = ".table\nfloat g\n.code\nband g, 6, 3\nprintln g\n";
    assert_eq!(
        run(s),
        "warning: test.tac(4,1): target of integer operation is not an integer\n2\n"
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(run("div $0, 1, 0\n"), "error: test.tac(1,1): division by zero\n");
    assert_eq!(run("mod $0, 1, 0\n"), "error: test.tac(1,1): division by zero\n");
    assert_eq!(run("div $0, 1.0, 0.0\nprintln $0\n"), "inf\n");
}

#[test]
fn test_casts() {
    let s = ".table\nfloat f = 2.75\n.code\nfltoint $0, f\nprintln $0\ninttoch $1, 65\nprintln $1\n";
    assert_eq!(run(s), "2\nA\n");
}

#[test]
fn test_cast_warnings() {
    let s = ".table\nint n\n.code\nfltoint $0, 3\nprintln $0\ninttofl n, 4\nprintln n\n";
    assert_eq!(
        run(s),
        "warning: test.tac(4,1): divergent type for source of cast\n\
         3\n\
         warning: test.tac(6,1): divergent type for target of cast\n\
         4\n"
    );
}
