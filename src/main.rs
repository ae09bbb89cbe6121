use log::info;

use std::{
    env::args,
    io::{self, stdin, stdout},
};

use schemelet::{
    core::names,
    repl::{rep, run},
};

fn main() {
    let result = mmain();

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn mmain() -> io::Result<()> {
    let args: Vec<String> = args().skip(1).collect();

    match args.as_slice() {
        [] => {
            info!("starting interactive session");
            run(stdin().lock(), stdout().lock())
        }
        [flag] if flag == "-h" || flag == "--help" => {
            let mut primitives: Vec<_> = names().collect();
            primitives.sort_unstable();
            println!("{}\n\nPrimitives:\n  {}", HELP_MSG, primitives.join(" "));
            Ok(())
        }
        [expr] => {
            println!("{}", rep(expr));
            Ok(())
        }
        _ => {
            eprintln!("{}", HELP_MSG);
            std::process::exit(2);
        }
    }
}

const HELP_MSG: &str = r#"Usage: schemelet [EXPR] [--help|-h]

  EXPR  Expression to evaluate once; without it an interactive
        session starts and runs until `quit`

Options:
  -h, --help  Print this message"#;
