use std::process::ExitCode;

fn main() -> ExitCode {
    match econ_calendar_feed::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(kind = ?err.kind(), "{err}");
            ExitCode::FAILURE
        }
    }
}
