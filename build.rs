// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: build request
fn spec_arg() -> Arg {
    Arg::new("spec")
        .required(true)
        .num_args(1..)
        .help("Build request, e.g. \"dakota@6.13 +mpi ~hdf5\"")
}

fn build_cli() -> Command {
    Command::new("recipebook")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Recipebook Contributors")
        .about("Inspect and resolve build recipes for source packages")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Config file (default: $RECIPEBOOK_CONFIG or <config dir>/recipebook/config.toml)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output (-v info, -vv debug); RUST_LOG overrides"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print JSON instead of text"),
        )
        .subcommand(Command::new("list").about("List registered recipes"))
        .subcommand(
            Command::new("info")
                .about("Show a recipe's versions, variants, dependencies and arguments")
                .arg(Arg::new("name").required(true).help("Recipe name")),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a build request: variants, dependencies, arguments, source")
                .arg(spec_arg()),
        )
        .subcommand(
            Command::new("args")
                .about("Print the CMake arguments for a build request, one per line")
                .arg(spec_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .value_name("DIR")
                        .help("Also print the standard prefix and build type arguments"),
                ),
        )
        .subcommand(
            Command::new("fetch")
                .about("Print the source URL and integrity for a version")
                .arg(Arg::new("spec").required(true).help("Request, e.g. \"dakota@6.12\"")),
        )
        .subcommand(
            Command::new("verify")
                .about("Verify a downloaded archive against its declared digest")
                .arg(Arg::new("spec").required(true).help("Request, e.g. \"dakota@6.12\""))
                .arg(Arg::new("file").required(true).help("Archive to check")),
        )
        .subcommand(
            Command::new("validate")
                .about("Check recipes and report errors and warnings")
                .arg(
                    Arg::new("files")
                        .num_args(0..)
                        .help("Recipe files to check (default: every registered recipe)"),
                ),
        )
        .subcommand(
            Command::new("install-plan")
                .about("Show or run the install steps of a recipe")
                .arg(Arg::new("spec").required(true).help("Build request"))
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .required(true)
                        .value_name("DIR")
                        .help("Installation prefix"),
                )
                .arg(
                    Arg::new("source")
                        .long("source")
                        .value_name("DIR")
                        .help("Unpacked source directory (required with --execute)"),
                )
                .arg(
                    Arg::new("execute")
                        .long("execute")
                        .action(ArgAction::SetTrue)
                        .help("Copy files instead of only printing the plan"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("recipebook.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
