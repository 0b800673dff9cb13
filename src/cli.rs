use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "culebra")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Culebra scripting language interpreter", long_about = None)]
pub struct Args {
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "script")]
    pub eval: Option<String>,

    #[arg(long = "ast")]
    pub ast: bool,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "expected 'auto', 'always' or 'never', got '{}'",
                other
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut command = Args::command();
    generate(shell, &mut command, "culebra", &mut io::stdout());
}
