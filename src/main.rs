use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use ariadne::{Color, Label, Report as Diagnostic, ReportKind, Source};
use chumsky::{error::Simple, Parser as _};
use clap::Parser;
use kakehashi::{
    error::GraphError,
    logging::init_tracing,
    options::{BridgeOptions, BridgeOptionsBuilder},
    parser::{build_network, parser},
    report::Report,
};

#[derive(Parser, Debug)]
#[command(name = "kakehashi", version)]
#[command(about = "Lists the bridges and cut vertices of an undirected edge list", long_about = None)]
struct Cli {
    /// Edge list to read; stdin when omitted
    path: Option<PathBuf>,

    /// Worker threads; components are searched concurrently above one
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Fail instead of descending deeper than this many nodes
    #[arg(long)]
    max_depth: Option<usize>,
}

impl Cli {
    fn options(&self) -> Result<BridgeOptions, io::Error> {
        let mut builder = BridgeOptionsBuilder::default();
        builder.threads(self.threads);
        if let Some(depth) = self.max_depth {
            builder.max_depth(depth);
        }

        builder
            .build()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))
    }
}

fn main() -> Result<(), io::Error> {
    if let Err(err) = init_tracing() {
        eprintln!("cannot initialise logging: {err}");
    }

    let cli = Cli::parse();
    let options = cli.options()?;
    let path = cli.path;

    // Read the contents of a specified file or from stdio.
    let src = if let Some(path) = path {
        fs::read_to_string(path)?
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        s
    };

    let statements = match parser().parse(src.as_str()) {
        Ok(statements) => statements,
        Err(errors) => {
            for error in errors {
                emit(&src, error)?;
            }
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "malformed edge list",
            ));
        }
    };

    let network = build_network(statements);
    let bridges = network.bridges_with(&options).map_err(into_io)?;
    let articulations = network.articulations_with(&options).map_err(into_io)?;

    print!("{}", Report::new(&network, &bridges, &articulations));

    Ok(())
}

fn into_io(err: GraphError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

fn emit(src: &str, error: Simple<char>) -> Result<(), io::Error> {
    let found = error
        .found()
        .map_or_else(|| "end of input".to_string(), |c| format!("{:?}", c));
    let span = error.span();

    Diagnostic::build(ReportKind::Error, (), span.start)
        .with_message(format!("unexpected {}", found))
        .with_label(
            Label::new(span)
                .with_message("expected a node label or an `a -- b` edge")
                .with_color(Color::Red),
        )
        .finish()
        .eprint(Source::from(src))
}
