use gamelib::SparseInput;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    List,
    Get,
    Add,
    Update,
    Delete,
    Search,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Run(Invocation),
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Explicit config file; `None` falls back to `gamelib.toml` when present.
    pub config: Option<PathBuf>,
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub global: GlobalArgs,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List(SparseInput),
    Get(i64),
    Add(SparseInput),
    Update(i64, SparseInput),
    Delete(i64),
    Search(String),
    Init,
}

const FIELD_FLAGS: &[(&str, &str)] = &[
    ("--name", "name"),
    ("--category", "category"),
    ("--year", "year"),
    ("--rating", "rating"),
];

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());

    let mut global = GlobalArgs::default();
    let mut command: Option<&str> = None;
    let mut positional: Vec<&str> = Vec::new();
    let mut fields = SparseInput::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(help_topic(command)?)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                global.config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                global.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                global.database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                global.database = Some(token.trim_start_matches("--database=").to_string());
            }
            _ if token.starts_with("--") => {
                let (flag, inline) = match token.split_once('=') {
                    Some((flag, v)) => (flag, Some(v)),
                    None => (token, None),
                };
                let Some((_, field)) = FIELD_FLAGS.iter().find(|(f, _)| *f == flag) else {
                    anyhow::bail!("unknown argument: {token}");
                };
                let value = match inline {
                    Some(v) => v,
                    None => {
                        let Some(v) = it.next() else {
                            anyhow::bail!("{flag} requires a value");
                        };
                        v
                    }
                };
                fields.insert(
                    (*field).to_string(),
                    serde_json::Value::String(value.to_string()),
                );
            }
            _ if command.is_none() => command = Some(token),
            other => positional.push(other),
        }
    }

    let Some(command) = command else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let action = match command {
        "list" => {
            no_positional(command, &positional)?;
            only_filter_fields(&fields)?;
            Action::List(fields)
        }
        "get" => {
            no_fields(command, &fields)?;
            Action::Get(parse_id(command, &positional)?)
        }
        "add" => {
            no_positional(command, &positional)?;
            Action::Add(fields)
        }
        "update" => Action::Update(parse_id(command, &positional)?, fields),
        "delete" => {
            no_fields(command, &fields)?;
            Action::Delete(parse_id(command, &positional)?)
        }
        "search" => {
            no_fields(command, &fields)?;
            let [name] = positional.as_slice() else {
                anyhow::bail!("search requires exactly one <NAME>");
            };
            Action::Search((*name).to_string())
        }
        "init" => {
            no_positional(command, &positional)?;
            no_fields(command, &fields)?;
            Action::Init
        }
        other => anyhow::bail!("unknown command: {other}"),
    };

    Ok(Command::Run(Invocation { global, action }))
}

fn help_topic(command: Option<&str>) -> anyhow::Result<HelpTopic> {
    Ok(match command {
        None => HelpTopic::Root,
        Some("list") => HelpTopic::List,
        Some("get") => HelpTopic::Get,
        Some("add") => HelpTopic::Add,
        Some("update") => HelpTopic::Update,
        Some("delete") => HelpTopic::Delete,
        Some("search") => HelpTopic::Search,
        Some("init") => HelpTopic::Init,
        Some(other) => anyhow::bail!("unknown command: {other}"),
    })
}

fn parse_id(command: &str, positional: &[&str]) -> anyhow::Result<i64> {
    let [raw] = positional else {
        anyhow::bail!("{command} requires exactly one <ID>");
    };
    raw.parse()
        .map_err(|_| anyhow::anyhow!("invalid id: {raw} (expected an integer)"))
}

fn no_positional(command: &str, positional: &[&str]) -> anyhow::Result<()> {
    if let Some(extra) = positional.first() {
        anyhow::bail!("{command}: unexpected argument: {extra}");
    }
    Ok(())
}

fn no_fields(command: &str, fields: &SparseInput) -> anyhow::Result<()> {
    if let Some(key) = fields.keys().next() {
        anyhow::bail!("{command} does not take --{key}");
    }
    Ok(())
}

fn only_filter_fields(fields: &SparseInput) -> anyhow::Result<()> {
    if fields.contains_key("name") {
        anyhow::bail!("list filters by --category, --year and --rating only; use `search` for names");
    }
    Ok(())
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
gamelib - game library catalog

USAGE:
  gamelib [OPTIONS] <COMMAND>

COMMANDS:
  list          List games, optionally filtered
  get           Show one game
  add           Add a game
  update        Change some fields of a game
  delete        Delete a game
  search        Look a game up by exact name
  init          Create the table and seed the default games

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: gamelib.toml, if present)
  --database <URL>      Override database.url from config and DATABASE_URL
  -h, --help            Print help

Run `gamelib <command> --help` for more."
            );
        }
        HelpTopic::List => {
            println!(
                "\
USAGE:
  gamelib list [--category <C>] [--year <Y>] [--rating <R>]

Every given filter must match. Empty values are ignored."
            );
        }
        HelpTopic::Get => {
            println!(
                "\
USAGE:
  gamelib get <ID>"
            );
        }
        HelpTopic::Add => {
            println!(
                "\
USAGE:
  gamelib add --name <N> [--category <C>] [--year <Y>] [--rating <R>]

RATINGS:
  EC, E, E10+, T, M, AO, RP"
            );
        }
        HelpTopic::Update => {
            println!(
                "\
USAGE:
  gamelib update <ID> [--name <N>] [--category <C>] [--year <Y>] [--rating <R>]

Only the given fields are changed. At least one is required."
            );
        }
        HelpTopic::Delete => {
            println!(
                "\
USAGE:
  gamelib delete <ID>"
            );
        }
        HelpTopic::Search => {
            println!(
                "\
USAGE:
  gamelib search <NAME>"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  gamelib init

Creates the games table when missing and seeds the default games into an
empty store."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gamelib")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_arguments_prints_root_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_update_with_fields() {
        let cmd = parse_args(&args(&[
            "--config",
            "games.toml",
            "update",
            "7",
            "--year=1989",
            "--rating",
            "E",
        ]))
        .unwrap();
        let Command::Run(inv) = cmd else {
            panic!("expected run");
        };
        assert_eq!(inv.global.config, Some(PathBuf::from("games.toml")));
        let Action::Update(id, fields) = inv.action else {
            panic!("expected update");
        };
        assert_eq!(id, 7);
        assert_eq!(fields.get("year"), Some(&serde_json::json!("1989")));
        assert_eq!(fields.get("rating"), Some(&serde_json::json!("E")));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn global_options_may_follow_the_command() {
        let cmd = parse_args(&args(&["search", "Tetris", "--database", "postgres://db/games"]))
            .unwrap();
        let Command::Run(inv) = cmd else {
            panic!("expected run");
        };
        assert_eq!(inv.global.database.as_deref(), Some("postgres://db/games"));
        assert_eq!(inv.action, Action::Search("Tetris".to_string()));
    }

    #[test]
    fn subcommand_help() {
        let cmd = parse_args(&args(&["add", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Add)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["get"])).is_err());
        assert!(parse_args(&args(&["get", "seven"])).is_err());
        assert!(parse_args(&args(&["delete", "1", "2"])).is_err());
        assert!(parse_args(&args(&["list", "--name", "Tetris"])).is_err());
        assert!(parse_args(&args(&["list", "--platform", "NES"])).is_err());
        assert!(parse_args(&args(&["add", "--name"])).is_err());
        assert!(parse_args(&args(&["launch"])).is_err());
    }

    #[test]
    fn update_without_fields_is_left_to_the_catalog() {
        let cmd = parse_args(&args(&["update", "3"])).unwrap();
        let Command::Run(inv) = cmd else {
            panic!("expected run");
        };
        assert!(matches!(inv.action, Action::Update(3, ref f) if f.is_empty()));
    }
}
