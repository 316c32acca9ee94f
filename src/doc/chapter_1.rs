/*!
# Types and Storage

There are four types.

| Type    | Contents                          |
|---------|-----------------------------------|
| `char`  | one byte                          |
| `int`   | signed 32-bit integer             |
| `float` | 32-bit floating point             |
| `addr`  | unsigned 32-bit data or code address |

## Declarations

Declarations go in the `.table` section. Arrays take a size in brackets;
without a size the initializer decides. Missing elements are zero and
strings gain a terminating `'\0'`.

```text
.table
int count = 10
float rate = 0.5
char name[] = "tac"
int primes[8] = {2, 3, 5, 7}
addr p
```

Initializers of another numeric type are converted. Declaring a name a
second time replaces the first declaration with a warning.

## Operands

| Form         | Meaning                                   |
|--------------|-------------------------------------------|
| `x`          | variable or label                         |
| `42`, `0x2a` | integer constant                          |
| `2.5`, `1e3` | float constant                            |
| `'a'`        | char constant                             |
| `$N`         | temporary of the current call             |
| `#N`         | parameter `N` of the current call         |
| `$s`         | address of the top of the stack           |
| `$f`         | address of the first slot of the frame    |
| `$pc`        | address of the current instruction        |
| `$ra`        | return address of the current call        |

Registers are read only. A label used as an operand is its code address.

## Address space

Data addresses are split into three regions.

| Range                       | Region       |
|-----------------------------|--------------|
| `0` to `0x55555554`         | symbol table |
| `0x55555555` to `0xaaaaaaa9`| call stack   |
| `0xaaaaaaaa` and above      | heap         |

Each array element has its own address, so `a + 2` is the third
element of `a`. The address of a parameter is its stack slot. Heap
blocks come from `mema` and return with `memf`. Reading or writing an
address that holds nothing is an error.
*/
