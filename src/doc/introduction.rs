/*!
# Introductory Tutorial

`tac` runs programs written in a typed three-address code. Every
instruction names at most three operands: usually a target and two
sources. Save the following as `hello.tac`.

```text
.table
char greeting[] = "hi"
int x

.code
main:
    add $0, 2, 3        // $0 is a temporary, it becomes an int
    mov x, $0
    println x
```

Then run it.

<pre><code>&nbsp;$ tac hello.tac
&nbsp;5
</code></pre>

A program has two sections. `.table` declares variables and `.code`
holds instructions. Execution begins at the label `main` or, without
one, at the first instruction. The program stops when control runs past
the last instruction.

Temporaries like `$0` need no declaration. Each function call gets a
fresh set of them and they take the type of whatever is stored into
them. Variables keep the type they were declared with.

Functions receive parameters on the stack. Push them with `param`,
name the count in `call`, and read them as `#0`, `#1` and so on.

```text
.code
sum:
    add $0, #0, #1
    return $0
main:
    param 20
    param 22
    call sum, 2
    pop $1
    println $1          // 42
```

Interrupt a running program with CTRL-C. Add `-v` to see each phase,
`-d` to dump the symbol table and code, and `-s` to trace every
instruction as it executes. `--seed N` makes `rand` repeatable.

The exit status is zero unless an error was reported.
*/
