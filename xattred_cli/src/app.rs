use clap::CommandFactory;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::io;

use crate::config::Config;
use crate::fmt;
use crate::opt::{
    AddOpts, Command, CompletionsOpts, EditOpts, GetOpts, ListOpts, Opts, OutputFormat, RmOpts,
    Shell, APP_NAME,
};
use crate::Result;
use xattred_core::{AttributeRecord, AttributeStore, OsXattrs};

#[derive(Debug, Serialize)]
struct AttributeView<'a> {
    name: &'a str,
    value: Option<&'a str>,
}

impl<'a> From<&'a AttributeRecord> for AttributeView<'a> {
    fn from(record: &'a AttributeRecord) -> Self {
        Self {
            name: record.name(),
            value: record.value(),
        }
    }
}

pub struct App {
    pub store: AttributeStore,
    pub pretty: bool,
    pub format: OutputFormat,
}

impl App {
    pub fn run(opts: Opts, config: Config) -> Result<()> {
        let app = Self::new(&opts, config);
        app.run_command(opts.cmd)
    }

    pub fn new(opts: &Opts, config: Config) -> App {
        let follow_symlinks = !opts.no_deref && config.follow_symlinks();

        App {
            store: AttributeStore::with_backend(OsXattrs::new(follow_symlinks)),
            pretty: opts.pretty || config.pretty_output,
            format: opts.output_format,
        }
    }

    pub fn run_command(&self, cmd: Command) -> Result<()> {
        if !self.pretty {
            colored::control::SHOULD_COLORIZE.set_override(false);
        }
        match cmd {
            Command::List(ref opts) => self.list(opts),
            Command::Get(ref opts) => self.get(opts),
            Command::Add(ref opts) => self.add(opts),
            Command::Edit(ref opts) => self.edit(opts),
            Command::Rm(ref opts) => self.rm(opts),
            Command::PrintCompletions(ref opts) => {
                self.print_completions(opts);
                Ok(())
            }
        }
    }

    fn list(&self, opts: &ListOpts) -> Result<()> {
        let records = self.store.list(&opts.path)?;
        print!("{}", render(&records, self.format)?);
        Ok(())
    }

    fn get(&self, opts: &GetOpts) -> Result<()> {
        let record = self.store.get(&opts.path, &opts.name)?;
        match self.format {
            OutputFormat::Default => println!("{}", fmt::value(&record)),
            format => print!("{}", render(std::slice::from_ref(&record), format)?),
        }
        Ok(())
    }

    fn add(&self, opts: &AddOpts) -> Result<()> {
        let record = self
            .store
            .create(&opts.path, opts.name.as_str(), opts.value.as_str())?;
        println!(
            "{} {} {}",
            fmt::path(&opts.path),
            "+".green().bold(),
            fmt::name(&record)
        );
        Ok(())
    }

    fn edit(&self, opts: &EditOpts) -> Result<()> {
        let record = self.store.get(&opts.path, &opts.name)?;

        let mut edited = record.clone();
        if let Some(name) = &opts.rename {
            edited = edited.with_name(name.as_str());
        }
        if let Some(value) = &opts.value {
            edited = edited.with_value(Some(value.as_str()));
        }

        if !edited.is_dirty() {
            println!("{}", fmt::ok("nothing to change"));
            return Ok(());
        }
        if let Some(warning) = lossy_write_warning(&edited) {
            log::warn!("{warning}");
            eprintln!("{}", fmt::warn(warning));
        }

        let committed = self.store.commit(&opts.path, &edited)?;
        println!(
            "{}: {} ==> {}",
            fmt::path(&opts.path),
            fmt::name(&record),
            fmt::name(&committed)
        );
        Ok(())
    }

    fn rm(&self, opts: &RmOpts) -> Result<()> {
        let record = AttributeRecord::new(opts.name.as_str(), None);
        self.store.remove(&opts.path, &record)?;
        println!("{} - {}", fmt::path(&opts.path), fmt::name(&record));
        Ok(())
    }

    fn print_completions(&self, opts: &CompletionsOpts) {
        use clap_complete::{
            generate,
            shells::{Bash, Elvish, Fish, PowerShell, Zsh},
        };

        let mut app = Opts::command();

        match opts.shell {
            Shell::Bash => generate(Bash, &mut app, APP_NAME, &mut io::stdout()),
            Shell::Elvish => generate(Elvish, &mut app, APP_NAME, &mut io::stdout()),
            Shell::Fish => generate(Fish, &mut app, APP_NAME, &mut io::stdout()),
            Shell::PowerShell => generate(PowerShell, &mut app, APP_NAME, &mut io::stdout()),
            Shell::Zsh => generate(Zsh, &mut app, APP_NAME, &mut io::stdout()),
        }
    }
}

/// Describes the data lost by committing `record`, if any. A value that couldn't be displayed
/// is written back as empty.
fn lossy_write_warning(record: &AttributeRecord) -> Option<String> {
    if record.value().is_some() {
        return None;
    }
    Some(format!(
        "attribute `{}` has no displayable value, it will be written as empty",
        record.original_name()
    ))
}

/// Renders `records` in the given output `format`.
fn render(records: &[AttributeRecord], format: OutputFormat) -> Result<String> {
    let views: Vec<AttributeView> = records.iter().map(AttributeView::from).collect();

    Ok(match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&views)?;
            out.push('\n');
            out
        }
        OutputFormat::Yaml => serde_yaml::to_string(&views)?,
        OutputFormat::Default => {
            let mut out = String::new();
            for record in records {
                // writing to a String can't fail
                let _ = writeln!(out, "{}: {}", fmt::name(record), fmt::value(record));
            }
            out
        }
    })
}
