use std::path::Path;

use assert_cmd::Command;

/// `lintel` running in `directory`, with colors and logging turned off so
/// that the output is stable.
pub fn lintel(directory: &Path) -> Command {
    let mut command = Command::cargo_bin("lintel").unwrap();
    command
        .current_dir(directory)
        .env("NO_COLOR", "1")
        .env_remove("LINTEL_LOG");
    command
}

pub trait CommandExt {
    /// Run the command and describe its outcome the way snapshots expect it.
    fn run(&mut self) -> String;
}

impl CommandExt for Command {
    fn run(&mut self) -> String {
        let output = self.output().unwrap();
        format!(
            "success: {}\nexit_code: {}\n----- stdout -----\n{}\n----- stderr -----\n{}",
            output.status.success(),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
    }
}
