use std::time::Duration;

use crate::error::ConfigError;

pub const USAGE: &str = "\
Usage: toroidal_life [OPTIONS]

Options:
  -s, --size <N>             grid side length [default: 50]
  -n, --cells <N>            initial live cell draws [default: 20]
  -m, --max-generations <N>  stop after N generations [default: 100]
  -u, --unbounded            run until extinction
  -d, --delay <MS>           pause between frames [default: 100]
      --seed <N>             seed for the initial population
  -p, --plain                print frames without taking over the terminal
  -h, --help                 print this help

Keys: q/Esc/Ctrl-C quit, p/space pause, j faster, k slower";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub size: usize,
    pub cells: usize,
    pub max_generations: Option<u64>,
    pub delay: Duration,
    pub seed: Option<u64>,
    pub plain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: 50,
            cells: 20,
            max_generations: Some(100),
            delay: Duration::from_millis(100),
            seed: None,
            plain: false,
        }
    }
}

impl Config {
    /// Parses arguments, program name excluded.
    pub fn parse<I, S>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut c = Config::default();
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = split_flag(&arg);
            let mut value = || match &inline {
                Some(v) => Ok(v.clone()),
                None => args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue(flag.clone())),
            };
            match flag.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-u" | "--unbounded" => c.max_generations = None,
                "-p" | "--plain" => c.plain = true,
                "-s" | "--size" => c.size = number(&flag, value()?)?,
                "-n" | "--cells" => c.cells = number(&flag, value()?)?,
                "-m" | "--max-generations" => c.max_generations = Some(number(&flag, value()?)?),
                "-d" | "--delay" => c.delay = Duration::from_millis(number(&flag, value()?)?),
                "--seed" => c.seed = Some(number(&flag, value()?)?),
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        Ok(Command::Run(c))
    }
}

/// `--size=10` -> (`--size`, `10`), `-s10` and `-s=10` -> (`-s`, `10`).
fn split_flag(arg: &str) -> (String, Option<String>) {
    if arg.starts_with("--") {
        match arg.split_once('=') {
            Some((f, v)) => (f.to_string(), Some(v.to_string())),
            None => (arg.to_string(), None),
        }
    } else if arg.starts_with('-') && arg.len() > 2 && arg.is_char_boundary(2) {
        let v = &arg[2..];
        (arg[..2].to_string(), Some(v.strip_prefix('=').unwrap_or(v).to_string()))
    } else {
        (arg.to_string(), None)
    }
}

fn number<T: std::str::FromStr>(flag: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}
