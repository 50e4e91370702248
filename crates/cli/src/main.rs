use std::process::ExitCode;

fn main() -> ExitCode {
    bakebot_cli::run()
}
