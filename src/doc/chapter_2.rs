/*!
# Instructions

Operands are written `target, source1, source2`. Constants can never be
targets.

## Arithmetic and logic

`add sub mul div and or seq slt sleq` take a target and two sources.
`minus not` take a target and one source. The work is done in the type
of the target. A temporary target takes the type of the first source.
Comparisons and logic store one or zero in that type. Integral division
by zero is an error.

## Integer only

`band bor bxor shl shr mod` take two sources and `bnot` one. Both the
target and the sources should be `int`.

## Casts

`chtoint chtofl inttoch inttofl fltoch fltoint` read the source as the
first type and store it as the second.

## Moves

`mov{t}{s}` copies a value. The letters pick how target and source are
addressed: `v` for the value itself, `d` through the address it holds,
`i` through the address it holds plus the third operand, and `a` (source
only) for the operand's own address. `mov` alone means `movvv`.

```text
movva $0, primes        // $0 = address of primes
movvi $1, $0, 3         // $1 = primes[3]
moviv $0, 11, 4         // primes[4] = 11
```

## Control

| Instruction           | Effect                                        |
|-----------------------|-----------------------------------------------|
| `jump L`              | continue at `L`                               |
| `brz L, x`            | jump when `x` is zero                         |
| `brnz L, x`           | jump when `x` is not zero                     |
| `param x`, `push x`   | push a copy of `x`                            |
| `pop t`               | pop into `t`                                  |
| `call L[, n]`         | call `L` with the top `n` slots as parameters |
| `return [x]`          | drop the frame, push `x`, resume the caller   |

## Memory and I/O

| Instruction      | Effect                                      |
|------------------|---------------------------------------------|
| `mema t, n`      | allocate `n` cells, `t` = address or zero   |
| `memf p`         | free the block at `p`                       |
| `print [x]`      | write `x`                                   |
| `println [x]`    | write `x` and a newline                     |
| `scanc t`        | read one non-blank character                |
| `scani t`        | read an integer                             |
| `scanf t`        | read a float                                |
| `rand t`         | random non-negative integer                 |

At the end of input the scan instructions store zero.
*/
