use std::process::ExitCode;

fn main() -> ExitCode {
    match trackaug::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
