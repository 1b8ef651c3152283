//! Launch-option resolution from argv: seed, room count, data directory,
//! content file, and scoring mode.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tomekeep_core::{DEFAULT_ROOM_COUNT, DEFAULT_SEED};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Default(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Default(seed) | Self::Generated(seed) => seed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub seed: SeedChoice,
    pub rooms: usize,
    pub data_dir: Option<PathBuf>,
    pub content_path: Option<PathBuf>,
    pub partial_credit: bool,
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Entropy-mixed seed for `--random-seed` runs.
pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

/// Walk argv by hand. `generated_seed` is injected so resolution itself
/// stays deterministic and testable.
pub fn resolve_launch_options(
    args: &[String],
    generated_seed: u64,
) -> Result<LaunchOptions, String> {
    let mut selected_seed = None;
    let mut random_seed = false;
    let mut rooms = DEFAULT_ROOM_COUNT;
    let mut data_dir = None;
    let mut content_path = None;
    let mut partial_credit = false;
    let mut index = 1_usize;

    while index < args.len() {
        let argument = args[index].as_str();

        match flag_value(argument, "--seed", args.get(index + 1)) {
            FlagMatch::WithValue(value, consumed) => {
                if selected_seed.is_some() {
                    return Err("seed provided more than once".to_string());
                }
                selected_seed = Some(parse_seed_value(value)?);
                index += consumed;
                continue;
            }
            FlagMatch::MissingValue => return Err("missing value for --seed".to_string()),
            FlagMatch::NoMatch => {}
        }

        match flag_value(argument, "--rooms", args.get(index + 1)) {
            FlagMatch::WithValue(value, consumed) => {
                rooms = value
                    .parse::<usize>()
                    .map_err(|_| format!("room count '{value}' must be a number"))?;
                if rooms == 0 {
                    return Err("room count must be at least 1".to_string());
                }
                index += consumed;
                continue;
            }
            FlagMatch::MissingValue => return Err("missing value for --rooms".to_string()),
            FlagMatch::NoMatch => {}
        }

        match flag_value(argument, "--data-dir", args.get(index + 1)) {
            FlagMatch::WithValue(value, consumed) => {
                data_dir = Some(PathBuf::from(value));
                index += consumed;
                continue;
            }
            FlagMatch::MissingValue => return Err("missing value for --data-dir".to_string()),
            FlagMatch::NoMatch => {}
        }

        match flag_value(argument, "--content", args.get(index + 1)) {
            FlagMatch::WithValue(value, consumed) => {
                content_path = Some(PathBuf::from(value));
                index += consumed;
                continue;
            }
            FlagMatch::MissingValue => return Err("missing value for --content".to_string()),
            FlagMatch::NoMatch => {}
        }

        match argument {
            "--random-seed" => random_seed = true,
            "--partial-credit" => partial_credit = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
        index += 1;
    }

    if random_seed && selected_seed.is_some() {
        return Err("--seed and --random-seed are mutually exclusive".to_string());
    }

    let seed = match selected_seed {
        Some(seed) => SeedChoice::Cli(seed),
        None if random_seed => SeedChoice::Generated(generated_seed),
        None => SeedChoice::Default(DEFAULT_SEED),
    };

    Ok(LaunchOptions { seed, rooms, data_dir, content_path, partial_credit })
}

enum FlagMatch<'a> {
    WithValue(&'a str, usize),
    MissingValue,
    NoMatch,
}

fn flag_value<'a>(
    argument: &'a str,
    flag: &str,
    next: Option<&'a String>,
) -> FlagMatch<'a> {
    if argument == flag {
        return match next {
            Some(value) => FlagMatch::WithValue(value.as_str(), 2),
            None => FlagMatch::MissingValue,
        };
    }
    if let Some(value) = argument.strip_prefix(flag)
        && let Some(inline) = value.strip_prefix('=')
    {
        return FlagMatch::WithValue(inline, 1);
    }
    FlagMatch::NoMatch
}

fn parse_seed_value(raw_value: &str) -> Result<u64, String> {
    raw_value.parse::<u64>().map_err(|_| format!("seed value '{raw_value}' must be a number"))
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
