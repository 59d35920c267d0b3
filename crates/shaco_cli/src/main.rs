//! Interactive entry point.
//!
//! # Responsibility
//! - Load configuration (`.env` + environment) and start diagnostic logging.
//! - Run the read-dispatch-print loop until EOF or an exit word.
//! - Poll reminders before each prompt and after each command.

use log::{info, warn};
use shaco_core::{init_logging, AppConfig, Assistant, Reply};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const PROMPT: &str = "> ";

fn main() -> ExitCode {
    // A missing .env is normal; only the environment matters then.
    let _ = dotenvy::dotenv();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("warning: diagnostic logging disabled: {err}");
    }
    info!(
        "event=session_start module=cli status=ok data_dir={}",
        config.data_dir.display()
    );

    let mut assistant = Assistant::new(config);
    match run(&mut assistant, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => {
            info!("event=session_end module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            warn!("event=session_end module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    assistant: &mut Assistant,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(
        output,
        "Welcome to Shaco {}! Type 'help' for commands, 'exit' to quit.",
        shaco_core::core_version()
    )?;

    let mut lines = input.lines();
    loop {
        print_reminders(assistant, &mut output)?;
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let reply = assistant.handle(&line?);

        match reply {
            Reply::Text(text) => writeln!(output, "{text}")?,
            Reply::Empty => {}
            Reply::Exit(text) => {
                writeln!(output, "{text}")?;
                break;
            }
        }
        print_reminders(assistant, &mut output)?;
    }
    Ok(())
}

fn print_reminders(assistant: &mut Assistant, output: &mut impl Write) -> io::Result<()> {
    for reminder in assistant.poll_reminders() {
        writeln!(output, "{reminder}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use shaco_core::{AppConfig, Assistant};

    fn session(input: &str) -> String {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut assistant = Assistant::new(AppConfig::new(dir.path()));
        let mut output = Vec::new();
        run(&mut assistant, input.as_bytes(), &mut output).expect("session should run");
        String::from_utf8(output).expect("utf-8 output")
    }

    #[test]
    fn loop_survives_errors_and_stops_on_exit() {
        let output = session("add 2 3\nfoo bar\ndivide 4 0\nexit\nadd 1 1\n");
        assert!(output.contains("> 5\n"));
        assert!(output.contains("Error: unrecognized command `foo bar`"));
        assert!(output.contains("Error: division by zero"));
        assert!(output.contains("Goodbye!"));
        assert!(!output.contains("> 2\n"));
    }

    #[test]
    fn zero_delay_reminder_fires_after_the_command() {
        let output = session("remind stretch 0\n");
        assert!(output.contains("Reminder: stretch"));
    }

    #[test]
    fn eof_ends_the_loop() {
        let output = session("");
        assert!(output.starts_with("Welcome to Shaco"));
    }
}
