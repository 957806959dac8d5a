use std::process::ExitCode;

fn main() -> ExitCode {
    match marquee::apps::run_generate(std::env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                let _ = clap_err.print();
                return ExitCode::from(clap_err.exit_code() as u8);
            }
            eprintln!("marquee: {err}");
            ExitCode::FAILURE
        }
    }
}
