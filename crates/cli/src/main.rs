use std::process::ExitCode;

fn main() -> ExitCode {
    parlatwin_cli::run()
}
