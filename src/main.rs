fn main() {
    tac::term::main()
}
