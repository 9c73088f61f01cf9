// Command-line interface for brew previews
//
// brewview renders Homebrewery brews to standalone HTML pages, keeps a page in
// sync with a brew while it is being edited, and manages the Homebrewery side
// of things: the parser bundle, themes, snippets and the list of linked brews.
//
// Usage:
//  brewview render <file> [-o out.html] [--renderer NAME] [--theme THEME]
//  brewview watch <file> -o out.html [--renderer NAME] [--theme THEME]
//  brewview fetch-parser [--force]
//  brewview themes [--json]
//  brewview snippets list [--theme THEME | --file FILE]
//  brewview snippets run <group> <snippet> [--theme THEME] [--insert FILE]
//  brewview brews list|add|remove|remove-all|theme
//
// Configuration comes from the embedded defaults, then ./brew.toml, then
// --config. Linked brews are stored in the JSON file named by
// preview.settings_file, or --settings.

mod watch;

use brew_config::{BrewConfig, ConfigError, Configurable, JsonSettingsStore, Loader};
use brew_preview::error::{DomError, FetchError, PipelineError, PresentError, RenderError};
use brew_preview::settings::{normalize_path, BrewSettings, LinkedBrew};
use brew_preview::snippets::{group_class, EditorBuffer, SnippetMenu, TextBuffer};
use brew_preview::{BrewView, FileDocumentSource, RemoteClient, RenderPipeline, RendererRegistry};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] brew_config::SettingsError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Present(#[from] PresentError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("file watch failed: {0}")]
    Watch(#[from] notify::Error),
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

fn build_cli() -> Command {
    let renderer_arg = Arg::new("renderer")
        .long("renderer")
        .value_name("NAME")
        .help("Renderer to use (homebrewery, markdown). Defaults to preview.renderer");
    let theme_arg = Arg::new("theme")
        .long("theme")
        .value_name("THEME")
        .help("Theme to render with, overriding the brew's linked theme");

    Command::new("brewview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preview Homebrewery brews as HTML")
        .long_about(
            "brewview renders Homebrewery brews (markdown documents linked to a theme) to HTML.\n\n\
            Commands:\n  \
            - render:       Render a brew once\n  \
            - watch:        Re-render a brew on every save\n  \
            - fetch-parser: Download the Homebrewery parser\n  \
            - themes:       List themes offered by the server\n  \
            - snippets:     List or run theme snippets\n  \
            - brews:        Manage linked brews\n\n\
            Examples:\n  \
            brewview brews add campaign/Dragons.md --theme 5eDMG\n  \
            brewview render campaign/Dragons.md -o dragons.html\n  \
            brewview watch campaign/Dragons.md -o dragons.html",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a brew.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .value_name("PATH")
                .help("Path to the linked brews settings file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render a brew to an HTML page")
                .arg(
                    Arg::new("file")
                        .help("Brew to render")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the page to FILE instead of stdout")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(renderer_arg.clone())
                .arg(theme_arg.clone()),
        )
        .subcommand(
            Command::new("watch")
                .about("Re-render a brew each time it is saved")
                .arg(
                    Arg::new("file")
                        .help("Brew to watch")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Page to keep up to date")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(renderer_arg)
                .arg(theme_arg.clone()),
        )
        .subcommand(
            Command::new("fetch-parser")
                .about("Download the Homebrewery parser")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Download even if a parser is already cached")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("themes").about("List themes offered by the server").arg(
                Arg::new("json")
                    .long("json")
                    .help("Print the themes as JSON")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("snippets")
                .about("List or run theme snippets")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List the text snippets of a theme")
                        .arg(theme_arg.clone())
                        .arg(
                            Arg::new("file")
                                .long("file")
                                .value_name("FILE")
                                .help("Use the theme of this linked brew")
                                .conflicts_with("theme")
                                .value_hint(ValueHint::FilePath),
                        ),
                )
                .subcommand(
                    Command::new("run")
                        .about("Run a snippet and print or insert its text")
                        .arg(Arg::new("group").help("Snippet group name").required(true).index(1))
                        .arg(Arg::new("snippet").help("Snippet name").required(true).index(2))
                        .arg(theme_arg)
                        .arg(
                            Arg::new("insert")
                                .long("insert")
                                .value_name("FILE")
                                .help("Append the snippet to this linked brew")
                                .value_hint(ValueHint::FilePath),
                        ),
                ),
        )
        .subcommand(
            Command::new("brews")
                .about("Manage linked brews")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list").about("List linked brews").arg(
                        Arg::new("json")
                            .long("json")
                            .help("Print the settings as JSON")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(
                    Command::new("add")
                        .about("Link a document as a brew")
                        .arg(Arg::new("file").required(true).index(1).value_hint(ValueHint::FilePath))
                        .arg(
                            Arg::new("theme")
                                .long("theme")
                                .value_name("THEME")
                                .help("Theme for the brew. Defaults to preview.theme"),
                        ),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Unlink a brew (the document is kept)")
                        .arg(Arg::new("file").required(true).index(1).value_hint(ValueHint::FilePath)),
                )
                .subcommand(Command::new("remove-all").about("Unlink every brew"))
                .subcommand(
                    Command::new("theme")
                        .about("Change the theme of a linked brew")
                        .arg(Arg::new("file").required(true).index(1).value_hint(ValueHint::FilePath))
                        .arg(Arg::new("theme").required(true).index(2)),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let result = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()))
        .map_err(CliError::from)
        .and_then(|config| {
            let store = settings_store(&config, matches.get_one::<String>("settings"));
            run(&matches, &config, &store)
        });

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(matches: &ArgMatches, config: &BrewConfig, store: &JsonSettingsStore) -> Result<(), CliError> {
    match matches.subcommand() {
        Some(("render", sub)) => handle_render_command(sub, config, store),
        Some(("watch", sub)) => handle_watch_command(sub, config, store),
        Some(("fetch-parser", sub)) => handle_fetch_parser_command(sub.get_flag("force"), config),
        Some(("themes", sub)) => handle_themes_command(sub.get_flag("json"), config),
        Some(("snippets", sub)) => match sub.subcommand() {
            Some(("list", list)) => handle_snippets_list_command(list, config, store),
            Some(("run", run)) => handle_snippets_run_command(run, config, store),
            _ => Err(usage("unknown snippets command")),
        },
        Some(("brews", sub)) => handle_brews_command(sub, config, store),
        _ => Err(usage("unknown subcommand. Use --help for usage information.")),
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> Result<BrewConfig, ConfigError> {
    let loader = Loader::new().with_optional_file(brew_config::LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    loader.build()
}

fn settings_store(config: &BrewConfig, explicit_path: Option<&String>) -> JsonSettingsStore {
    match explicit_path {
        Some(path) => JsonSettingsStore::new(path),
        None => JsonSettingsStore::new(&config.preview.settings_file),
    }
}

fn usage(message: impl Into<String>) -> CliError {
    CliError::Usage(message.into())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_default()
}

/// Settings to render `file` with: the stored ones, with `file` linked under
/// `theme_override` when given (or under the default theme if it is not
/// linked yet).
fn effective_settings(
    stored: BrewSettings,
    file: &str,
    theme_override: Option<&String>,
    config: &BrewConfig,
) -> BrewSettings {
    let mut settings = stored;
    let file = normalize_path(Path::new(file));
    let linked = settings.find(&file).map(|b| b.filepath.clone());
    match (linked, theme_override) {
        (Some(filepath), Some(theme)) => {
            settings.set_theme(&filepath, theme);
        }
        (Some(_), None) => {}
        (None, theme) => {
            let theme = theme.cloned().unwrap_or_else(|| config.preview.theme.clone());
            tracing::info!(file = %file, theme = %theme, "Document is not a linked brew, rendering with theme");
            settings.add(LinkedBrew::new(file).with_theme(theme));
        }
    }
    settings
}

fn page_title(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Brew".to_string())
}

fn write_output(path: &str, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_string(),
        source,
    })
}

/// Handle the render command
fn handle_render_command(
    sub: &ArgMatches,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<(), CliError> {
    let file = required(sub, "file");
    let settings = effective_settings(store.load()?, file, sub.get_one::<String>("theme"), config);

    let registry = RendererRegistry::with_builtins(config.parser.script_path());
    let renderer_name = sub
        .get_one::<String>("renderer")
        .unwrap_or(&config.preview.renderer);
    let renderer = registry.get(renderer_name)?;
    let pipeline = RenderPipeline::new(renderer, &config.remote.base_url, &settings);
    let source = FileDocumentSource::new(".", Some(PathBuf::from(file)));

    // Run the pipeline directly so render errors reach the user
    let Some(doc) = pipeline.render(&source)? else {
        return Err(usage(format!("'{file}' rendered to nothing")));
    };
    let mut view = BrewView::detached(page_title(file));
    view.show(&doc)?;
    let page = view.page_html()?;

    match sub.get_one::<String>("output") {
        Some(path) => write_output(path, &page),
        None => {
            print!("{page}");
            Ok(())
        }
    }
}

/// Handle the watch command
fn handle_watch_command(
    sub: &ArgMatches,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<(), CliError> {
    let file = required(sub, "file");
    let output = required(sub, "output");
    let settings = effective_settings(store.load()?, file, sub.get_one::<String>("theme"), config);

    let registry = RendererRegistry::with_builtins(config.parser.script_path());
    let renderer_name = sub
        .get_one::<String>("renderer")
        .unwrap_or(&config.preview.renderer);
    let renderer = registry.get(renderer_name)?;
    let pipeline = RenderPipeline::new(renderer, &config.remote.base_url, &settings);
    let source = FileDocumentSource::new(".", Some(PathBuf::from(file)));

    let mut view = BrewView::detached(page_title(file));
    if view.update(&pipeline, &source).is_some() {
        write_output(output, &view.page_html()?)?;
        eprintln!("Wrote {output}");
    }

    watch::watch_file(Path::new(file), || -> Result<(), CliError> {
        let Some(report) = view.update(&pipeline, &source) else {
            return Ok(());
        };
        tracing::info!(
            mode = ?report.mode,
            stylesheet_updated = report.stylesheet_updated,
            visited = report.stats.visited,
            inserted = report.stats.inserted,
            removed = report.stats.removed,
            replaced = report.stats.replaced,
            "Updated preview"
        );
        if report.stats.is_noop() && !report.stylesheet_updated {
            return Ok(());
        }
        let page = view.page_html()?;
        write_output(output, &page)?;
        eprintln!("Updated {output}");
        Ok(())
    })
}

/// Handle the fetch-parser command
fn handle_fetch_parser_command(force: bool, config: &BrewConfig) -> Result<(), CliError> {
    let client = RemoteClient::http(&config.remote.base_url, config.remote.timeout())?;
    let cache = config.parser.cache();

    if force {
        let path = cache.refresh(&client)?;
        println!("Loaded Homebrewery parser into {}", path.display());
    } else if cache.ensure(&client)? {
        println!("Loaded Homebrewery parser into {}", cache.path().display());
    } else {
        println!(
            "Homebrewery parser already present at {} (use --force to update)",
            cache.path().display()
        );
    }
    Ok(())
}

/// Handle the themes command
fn handle_themes_command(json: bool, config: &BrewConfig) -> Result<(), CliError> {
    let client = RemoteClient::http(&config.remote.base_url, config.remote.timeout())?;
    let themes = client.themes()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&themes)?);
        return Ok(());
    }
    for theme in themes {
        println!("{}\t{}", theme.path, theme.name);
    }
    Ok(())
}

fn snippet_theme(
    sub: &ArgMatches,
    file: Option<&String>,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<String, CliError> {
    if let Some(theme) = sub.get_one::<String>("theme") {
        return Ok(theme.clone());
    }
    match file {
        Some(file) => {
            let settings: BrewSettings = store.load()?;
            settings
                .find(file)
                .map(|b| b.theme.clone())
                .ok_or_else(|| usage(format!("'{file}' is not a linked brew")))
        }
        None => Ok(config.preview.theme.clone()),
    }
}

/// Handle the snippets list command
fn handle_snippets_list_command(
    sub: &ArgMatches,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<(), CliError> {
    let theme = snippet_theme(sub, sub.get_one::<String>("file"), config, store)?;
    let client = RemoteClient::http(&config.remote.base_url, config.remote.timeout())?;
    let menu = SnippetMenu::new(client.snippets(&theme)?);

    for group in menu.groups() {
        println!("{} [{}]", group.group_name, group_class(group));
        for snippet in &group.snippets {
            println!("  {}\t{}", snippet.name, snippet.path);
        }
    }
    Ok(())
}

/// Handle the snippets run command
fn handle_snippets_run_command(
    sub: &ArgMatches,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<(), CliError> {
    let group = required(sub, "group");
    let name = required(sub, "snippet");
    let insert = sub.get_one::<String>("insert");
    let theme = snippet_theme(sub, insert, config, store)?;

    let client = RemoteClient::http(&config.remote.base_url, config.remote.timeout())?;
    let mut menu = SnippetMenu::new(client.snippets(&theme)?);
    let snippet = menu
        .find(group, name)
        .cloned()
        .ok_or_else(|| usage(format!("no snippet '{name}' in group '{group}' of theme {theme}")))?;

    match insert {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let mut buffer = TextBuffer::new(text);
            menu.choose(&snippet, &client, &mut buffer)?;
            write_output(path, buffer.text())?;
            eprintln!("Inserted '{name}' into {path}");
        }
        None => {
            let mut stdout = StdoutBuffer;
            menu.choose(&snippet, &client, &mut stdout)?;
        }
    }
    Ok(())
}

/// Editor buffer that prints inserted text
struct StdoutBuffer;

impl EditorBuffer for StdoutBuffer {
    fn replace_selection(&mut self, text: &str) {
        print!("{text}");
    }
}

/// Handle the brews command family
fn handle_brews_command(
    sub: &ArgMatches,
    config: &BrewConfig,
    store: &JsonSettingsStore,
) -> Result<(), CliError> {
    let mut settings: BrewSettings = store.load()?;

    match sub.subcommand() {
        Some(("list", list)) => {
            if list.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                return Ok(());
            }
            for brew in &settings.linked_files {
                println!("{}\t{}", brew.filepath, brew.theme);
            }
            return Ok(());
        }
        Some(("add", add)) => {
            let file = normalize_path(Path::new(required(add, "file")));
            let theme = add
                .get_one::<String>("theme")
                .unwrap_or(&config.preview.theme);
            if !settings.add(LinkedBrew::new(file.as_str()).with_theme(theme.as_str())) {
                return Err(usage(format!("'{file}' is already linked")));
            }
            println!("Linked {file} ({theme})");
        }
        Some(("remove", remove)) => {
            let file = normalize_path(Path::new(required(remove, "file")));
            if settings.remove(&file).is_none() {
                return Err(usage(format!("'{file}' is not a linked brew")));
            }
            println!("Unlinked {file}");
        }
        Some(("remove-all", _)) => {
            let count = settings.remove_all();
            println!("Unlinked {count} brew(s)");
        }
        Some(("theme", theme_matches)) => {
            let file = normalize_path(Path::new(required(theme_matches, "file")));
            let theme = required(theme_matches, "theme");
            if !settings.set_theme(&file, theme) {
                return Err(usage(format!("'{file}' is not a linked brew")));
            }
            println!("{file} now uses {theme}");
        }
        _ => return Err(usage("unknown brews command")),
    }

    store.save(&settings)?;
    Ok(())
}
