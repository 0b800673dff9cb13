use clap::Parser;
use culebra::cli::{generate_completions, Args, Commands};
use culebra::config::AppConfig;
use culebra::diagnostic::render_diagnostic;
use culebra::interpreter::{self, EnvRef, InterpretError};
use culebra::value::Value;
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);
    let env = interpreter::global_env();

    verbose_log(&config, "Starting culebra");

    let code = if let Some(source) = &args.eval {
        run_source("<eval>", source, &env, &config)
    } else if let Some(path) = &args.script {
        match read_file(path) {
            Ok(source) => run_source(&path.display().to_string(), &source, &env, &config),
            Err(message) => {
                error_message(&config, &message);
                1
            }
        }
    } else {
        run_repl(&env, &config)
    };

    std::process::exit(code);
}

fn run_source(name: &str, source: &str, env: &EnvRef, config: &AppConfig) -> i32 {
    verbose_log(
        config,
        &format!("Running {} ({} bytes)", name, source.len()),
    );

    match interpreter::interpret(source, env, config.print_ast) {
        Ok(_) => {
            verbose_log(config, "Run finished");
            0
        }
        Err(error) => {
            report_error(name, source, &error, config);
            1
        }
    }
}

fn run_repl(env: &EnvRef, config: &AppConfig) -> i32 {
    println!("Culebra {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit.");

    loop {
        print!("culebra> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                error_message(config, &format!("Error reading input: {}", error));
                return 1;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        // Bindings persist across lines, including after a failed run.
        match interpreter::interpret(trimmed, env, config.print_ast) {
            Ok(Value::Undefined) => {}
            Ok(value) => println!("{}", value),
            Err(error) => report_error("<repl>", trimmed, &error, config),
        }
    }

    0
}

fn report_error(name: &str, source: &str, error: &InterpretError, config: &AppConfig) {
    let rendered = render_diagnostic(source, name, &error.to_diagnostic(), config.color_enabled);
    eprint!("{}", rendered);
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[culebra:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
