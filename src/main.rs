use clap::Parser;

mod commands;
mod output;
mod tty;

use commands::replace;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "wordswap")]
#[command(version = VERSION)]
#[command(about = "Replace words in selected files while keeping their line wrapping")]
struct Cli {
    #[command(flatten)]
    args: replace::ReplaceArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(replace::run(&cli.args));

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
        return std::process::ExitCode::from(exit_code_to_u8(1));
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
