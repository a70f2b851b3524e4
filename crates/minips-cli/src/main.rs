use clap::Parser;
use minips_runtime::{Interp, Scoping};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minips", version, about = "Stack-language interpreter with selectable scoping")]
struct Opt {
    /// Program file; standard input is read when omitted
    file: Option<PathBuf>,

    /// Resolve names lexically instead of dynamically
    #[arg(short = 'l', long = "lexical", default_value_t = false)]
    lexical: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();
    let source = match &opt.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let scoping = if opt.lexical { Scoping::Lexical } else { Scoping::Dynamic };
    let mut interp = Interp::stdout(scoping);
    if let Err(e) = interp.run(&source) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
