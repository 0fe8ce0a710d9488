// cir2c: CIR-to-C source translator

mod codegen;
mod parser;

use std::fs;
use std::path::Path;
use std::process;

use codegen::generator::Generator;
use parser::lexer::Lexer;
use parser::parser::Parser;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("cir2c");

    if args.len() < 2 {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.cir> [-o <file.c>]", program_name);
        eprintln!();
        eprintln!("Translates a CIR source file to C and prints the result");
        eprintln!("to stdout (or writes it to the -o path).");
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = match args.iter().position(|a| a == "-o") {
        Some(i) => match args.get(i + 1) {
            Some(path) => Some(path.clone()),
            None => {
                eprintln!("Error: -o requires an output path");
                process::exit(1);
            }
        },
        None => None,
    };

    if !Path::new(input_path).exists() {
        eprintln!("Error: File '{}' not found", input_path);
        process::exit(1);
    }

    let source = match fs::read_to_string(input_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading '{}': {}", input_path, err);
            process::exit(1);
        }
    };

    // Run the stages by hand (rather than through `cir2c::compile`) so the
    // shell can surface lexer warnings and leftover-token diagnostics.
    let mut lexer = Lexer::new(&source);
    let tokens = match lexer.tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    for warning in lexer.warnings() {
        eprintln!("Warning: {}", warning);
    }

    let mut parser = Parser::new(tokens);
    let nodes = match parser.parse() {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("{}", err);
            let remaining = parser.remaining_tokens();
            if !remaining.is_empty() {
                eprintln!("({} tokens left unconsumed)", remaining.len());
            }
            process::exit(1);
        }
    };

    let output = match Generator::new().generate(&nodes) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("Generation error: {}", err);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(err) = fs::write(&path, output) {
                eprintln!("Error writing '{}': {}", path, err);
                process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}
