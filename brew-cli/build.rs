use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const RENDERERS: &[&str] = &["homebrewery", "markdown"];

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let renderer = Arg::new("renderer")
        .long("renderer")
        .value_parser(clap::builder::PossibleValuesParser::new(RENDERERS));
    let theme = Arg::new("theme").long("theme").value_hint(ValueHint::Other);
    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_hint(ValueHint::FilePath);

    let mut cmd = Command::new("brewview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preview Homebrewery brews as HTML")
        .arg(Arg::new("config").long("config").value_hint(ValueHint::FilePath).global(true))
        .arg(Arg::new("settings").long("settings").value_hint(ValueHint::FilePath).global(true))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .arg(file_arg("Brew to render"))
                .arg(output.clone())
                .arg(renderer.clone())
                .arg(theme.clone()),
        )
        .subcommand(
            Command::new("watch")
                .arg(file_arg("Brew to watch"))
                .arg(output)
                .arg(renderer)
                .arg(theme.clone()),
        )
        .subcommand(
            Command::new("fetch-parser").arg(Arg::new("force").long("force").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("themes").arg(Arg::new("json").long("json").action(ArgAction::SetTrue)))
        .subcommand(
            Command::new("snippets")
                .subcommand(Command::new("list").arg(theme.clone()))
                .subcommand(Command::new("run").arg(theme)),
        )
        .subcommand(
            Command::new("brews")
                .subcommand(Command::new("list"))
                .subcommand(Command::new("add").arg(file_arg("Document to link")))
                .subcommand(Command::new("remove").arg(file_arg("Brew to unlink")))
                .subcommand(Command::new("remove-all"))
                .subcommand(Command::new("theme").arg(file_arg("Linked brew"))),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "brewview", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "brewview", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "brewview", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
