use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    trip_duration::run()
}
