use crate::cli::{Args, ColorChoice};

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub print_ast: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            // Diagnostics are the only colored output, and they go to stderr.
            ColorChoice::Auto => atty::is(atty::Stream::Stderr),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            print_ast: args.ast,
        }
    }
}
