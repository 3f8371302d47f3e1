use std::{env, fs::read_to_string, path::PathBuf, process::exit, time::Instant};

use knight::{
    display_error,
    lexer::lexer::tokenize,
    lexer::source::TokenStream,
    parser::parser::parse,
    semantics::{
        analyze,
        context::{CompilationContext, Options},
    },
};

fn main() {
    let args: Vec<String> = env::args().collect();

    let (file_path, options) = match args.as_slice() {
        [_, path] => (path, Options::default()),
        [_, flag, path] if flag == "--no-warnings" => (
            path,
            Options {
                warnings_enabled: false,
            },
        ),
        _ => {
            eprintln!("Usage: knight [--no-warnings] <file.kn>");
            exit(2);
        }
    };

    let file = PathBuf::from(file_path);
    let file_contents = match read_to_string(&file) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file.to_string_lossy(), error);
            exit(2);
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(file_contents.as_str()) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &file, &file_contents);
            exit(1);
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let mut program = match parse(TokenStream::new(tokens)) {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &file, &file_contents);
            exit(1);
        }
    };

    println!("Parsed in {:?}", parse_start.elapsed());

    let analyze_start = Instant::now();
    let mut context = CompilationContext::with_options(options);
    analyze(&mut program, &mut context);

    println!("Analyzed in {:?}", analyze_start.elapsed());
    println!("Total time: {:?}", start.elapsed());

    for diagnostic in context.sort_and_report() {
        println!("{}: {}", file.to_string_lossy(), diagnostic);
    }

    if context.has_errors() {
        println!(
            "{} errors, {} warnings",
            context.error_count(),
            context.warning_count()
        );
        exit(1);
    }
}
