use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use flexi_logger::Logger;
use quire::cache::Cache;
use quire::compose::{create_document, NewDocument};
use quire::config::Config;
use quire::date::DateResolver;
use quire::document::DocumentParser;
use quire::render_body;
use quire::store::Store;
use std::io::Read;
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = App::new("quire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lists, renders and creates markdown blog posts")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory to search (upwards) for quire.yaml [default: .]"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log debug output to stderr"),
        )
        .subcommand(SubCommand::with_name("list").about("Lists posts, newest first"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Prints a post's body as sanitized HTML")
                .arg(Arg::with_name("id").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("new")
                .about("Creates a post; the body is read from stdin")
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("author")
                        .long("author")
                        .takes_value(true)
                        .help("Byline author [default: `author` from quire.yaml]"),
                )
                .arg(
                    Arg::with_name("force")
                        .long("force")
                        .help("Overwrite an existing post with the same identifier"),
                ),
        )
        .get_matches();

    let _logger = match matches.is_present("verbose") {
        true => Logger::try_with_str("debug"),
        false => Logger::try_with_env_or_str("info"),
    }
    .and_then(|logger| logger.start())
    .map_err(|e| anyhow!("Starting logger: {}", e))?;

    let project_dir = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let config = Config::from_directory(&project_dir)?;
    let store = Store::new(
        &config.posts_directory,
        DocumentParser::new(DateResolver::new(config.date_overrides.clone())),
    );
    let cache = Cache::new(store);

    match matches.subcommand() {
        ("list", Some(_)) => list(&cache),
        ("show", Some(m)) => show(&cache, m),
        ("new", Some(m)) => new(&cache, &config, m),
        (name, _) => Err(anyhow!("Unknown subcommand `{}`", name)),
    }
}

fn list(cache: &Cache) -> Result<()> {
    for record in cache.get_all()?.iter() {
        println!("{}  {}  {}", record.date, record.id, record.title);
        if !record.summary.is_empty() {
            println!("    {}", record.summary);
        }
    }
    Ok(())
}

fn show(cache: &Cache, matches: &ArgMatches) -> Result<()> {
    let id = matches.value_of("id").unwrap_or_default();
    match cache.store().get_by_identifier(id)? {
        Some(doc) => {
            println!("{}", render_body(&doc.body));
            Ok(())
        }
        None => {
            eprintln!("Post not found");
            std::process::exit(1);
        }
    }
}

fn new(cache: &Cache, config: &Config, matches: &ArgMatches) -> Result<()> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Reading post body from stdin")?;

    let created = create_document(
        cache,
        &NewDocument {
            title: matches.value_of("title").unwrap_or_default().to_owned(),
            body,
            author: matches
                .value_of("author")
                .map(str::to_owned)
                .or_else(|| config.author.clone()),
            date: Local::now().naive_local().date(),
            overwrite: matches.is_present("force"),
        },
    )?;
    println!("{}\t{}", created.id, created.path.display());
    Ok(())
}
