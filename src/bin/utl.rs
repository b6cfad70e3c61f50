//! Command-line interface for the utl parser
//!
//! Usage:
//!   utl parse `<path>` [--format sexp|json|yaml]  - Parse a file and print its tree
//!   utl `<path>` [--format ...]                   - Same as parse (default command)
//!   utl check `<path>`                            - Parse and report error nodes
//!   utl catalog [--format json|yaml]              - Print the node-kind catalog
//!
//! Exit status: 0 on success, 1 when `check` finds error nodes, 2 on I/O
//! or usage failures.

use clap::{Arg, Command};
use utl::utl::catalog;
use utl::utl::formats;
use utl::utl::tree::{parse, SyntaxTree};

fn main() {
    let matches = Command::new("utl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A parser and inspector for UTL template files")
        .subcommand_required(false)
        .arg_required_else_help(true)
        // Default command args
        .arg(Arg::new("path").help("Path to the template file to parse").index(1))
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (sexp, json, yaml)")
                .default_value("sexp"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its syntax tree (default command)")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file to parse")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Output format (sexp, json, yaml)")
                        .default_value("sexp"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a file and report its error nodes")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file to check")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("catalog")
                .about("Print the machine-readable node-kind catalog")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Output format (json, yaml)")
                        .default_value("json"),
                ),
        )
        .try_get_matches_from(std::env::args())
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(2);
        });

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            handle_parse_command(path, format);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        Some(("catalog", catalog_matches)) => {
            let format = catalog_matches.get_one::<String>("format").unwrap();
            handle_catalog_command(format);
        }
        None => {
            // Default command: treat as parse
            match matches.get_one::<String>("path") {
                Some(path) => {
                    let format = matches.get_one::<String>("format").unwrap();
                    handle_parse_command(path, format);
                }
                None => std::process::exit(2),
            }
        }
        _ => unreachable!(),
    }
}

fn handle_parse_command(path: &str, format: &str) {
    let tree = parse_file(path);
    match render_tree(&tree, format) {
        Ok(output) => println!("{}", output),
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(2);
        }
    }
}

fn handle_check_command(path: &str) {
    let tree = parse_file(path);
    let errors = tree.errors();
    for error in &errors {
        println!(
            "{}:{}..{}: {}: {}",
            path, error.span.start, error.span.end, error.kind, error.message
        );
    }
    if errors.is_empty() {
        println!("{}: ok", path);
    } else {
        eprintln!("{}: {} error node(s)", path, errors.len());
        std::process::exit(1);
    }
}

fn handle_catalog_command(format: &str) {
    let output = match format {
        "json" => serde_json::to_string_pretty(catalog::NODE_TYPES).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(catalog::NODE_TYPES).map_err(|e| e.to_string()),
        other => Err(format!(
            "unknown catalog format '{}' (expected json, yaml)",
            other
        )),
    };
    match output {
        Ok(output) => println!("{}", output),
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(2);
        }
    }
}

fn parse_file(path: &str) -> SyntaxTree {
    match std::fs::read_to_string(path) {
        Ok(source) => parse(&source),
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", path, e);
            std::process::exit(2);
        }
    }
}

fn render_tree(tree: &SyntaxTree, format: &str) -> Result<String, String> {
    match format {
        "sexp" => Ok(formats::to_sexp(tree)),
        "json" => serde_json::to_string_pretty(tree.root()).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(tree.root()).map_err(|e| e.to_string()),
        other => Err(format!(
            "unknown output format '{}' (expected sexp, json, yaml)",
            other
        )),
    }
}
