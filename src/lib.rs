//! # TAC
//!
//! A virtual machine for typed three-address code.
//!
//! Install with `cargo install tac-vm`, then run a program with
//! `tac program.tac`. Input for the scan instructions is read from stdin.
//!
//! The library is split in three. [`lang`] turns source text into
//! instructions, [`mach`] links and executes them, and [`term`] is the
//! command line driver.

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/chapter_1.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_1;

#[path = "doc/chapter_2.rs"]
#[allow(non_snake_case)]
pub mod __Chapter_2;

#[path = "doc/appendix_a.rs"]
#[allow(non_snake_case)]
pub mod ___Appendix_A;

pub mod lang;
pub mod mach;
pub mod term;
