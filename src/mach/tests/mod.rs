use crate::mach::{Event, Runtime};

mod arith_test;
mod io_test;

fn run(source: &str) -> String {
    let mut runtime = Runtime::default();
    runtime.seed(1);
    runtime.close_input();
    runtime.load("test.tac", source);
    exec(&mut runtime, 5000)
}

fn exec(runtime: &mut Runtime, cycles: usize) -> String {
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
