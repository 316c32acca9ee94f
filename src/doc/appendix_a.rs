/*!
# Diagnostics

Diagnostics are written to stderr as `level: file(line,column): text`.

Warnings report a type that differs from the one expected. The value is
converted and execution continues.

```text
warning: prog.tac(7,5): divergent type for target of move
```

Errors before execution, such as a syntax error or an unresolved
symbol, are all reported and nothing runs. An error during execution
stops the program at once.

```text
error: prog.tac(12,5): invalid address access: 0xaaaaab0e
```

| Error                                | Cause                                    |
|--------------------------------------|------------------------------------------|
| unresolved symbol                    | name is neither a variable nor a label   |
| invalid use of constant as ...       | constant or temporary in a bad place     |
| invalid address access               | nothing lives at the address             |
| trying to pop empty stack            | `pop` with no slots                      |
| stack overflow                       | more than 65536 slots                    |
| jump to an invalid code address      | target outside the code                  |
| number of parameters incompatible... | `call` names more slots than exist       |
| returning to nowhere                 | `return` outside any call                |
| parameter out of stack bounds        | `#N` past the top of the stack           |
| division by zero                     | integral `div` or `mod` by zero          |
*/
