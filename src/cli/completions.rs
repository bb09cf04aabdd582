//! Completions command implementation.

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::cli::Cli;
use crate::error::Result;

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_bash_completions() {
        let mut cmd = Cli::command();
        let mut buffer = Vec::new();
        clap_complete::generate(Shell::Bash, &mut cmd, "pixfx", &mut buffer);

        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("pixfx"));
    }
}
