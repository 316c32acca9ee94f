#![allow(dead_code)]
use tac::lang::Error;
use tac::mach::{Event, Runtime};

pub fn load(source: &str) -> Runtime {
    let mut runtime = Runtime::default();
    runtime.seed(0);
    runtime.load("test.tac", source);
    runtime
}

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped => {
                break;
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("{}\n", error));
                }
            }
            Event::Warning(warning) => {
                s.push_str(&format!("{}\n", warning));
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} cycles exceeded\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => {
                s.push_str(&String::from_utf8_lossy(ps));
            }
            Event::Input => {
                s.push('?');
                break;
            }
        }
        match event {
            Event::Running => prev_running = true,
            _ => prev_running = false,
        }
    }
    s
}

/// Runs to completion with closed input, returning stdout text and
/// every diagnostic separately.
pub fn run(source: &str) -> (String, Vec<Error>) {
    let mut runtime = load(source);
    runtime.close_input();
    let mut out = String::new();
    let mut diagnostics = vec![];
    loop {
        match runtime.execute(100_000) {
            Event::Stopped => break,
            Event::Running | Event::Input => {}
            Event::Print(s) => out.push_str(&String::from_utf8_lossy(&s)),
            Event::Warning(warning) => diagnostics.push(warning),
            Event::Errors(errors) => diagnostics.extend(errors.iter().cloned()),
        }
    }
    (out, diagnostics)
}

pub fn errors(diagnostics: &[Error]) -> usize {
    diagnostics.iter().filter(|e| e.is_error()).count()
}
