use std::cell::OnceCell;

use clap::Parser;
use winsweep_core::Difficulty;

thread_local! {
    static LAUNCH_OPTIONS: OnceCell<LaunchOptions> = const { OnceCell::new() };
}

/// Launch options, read from the page's location hash, e.g. `#-vv&--difficulty=expert&--seed=42`.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct LaunchArgs {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed for the first game instead of a random one
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Preset to start with
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    pub difficulty: Difficulty,
}

impl LaunchArgs {
    pub fn parse_hash(hash: &str) -> Result<Self, clap::Error> {
        // the leading empty piece before `#` stands in for the binary name
        Self::try_parse_from(hash.split(['#', '&']))
    }

    /// Falls back to defaults when the hash does not parse, a broken link should still open a game.
    pub fn from_location() -> Self {
        let hash = gloo::utils::window()
            .location()
            .hash()
            .unwrap_or_default();

        Self::parse_hash(&hash).unwrap_or_else(|err| {
            log::warn!("Ignoring launch args {:?}: {}", hash, err);
            Self::default()
        })
    }

    pub fn options(&self) -> LaunchOptions {
        LaunchOptions {
            seed: self.seed,
            difficulty: self.difficulty,
        }
    }
}

/// The part of [`LaunchArgs`] that configures games, kept for the page's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub difficulty: Difficulty,
}

impl LaunchOptions {
    /// Options from the location hash, which is only read if `start` has not already done so.
    pub fn current() -> Self {
        Self::current_or_else(LaunchArgs::from_location)
    }

    pub(crate) fn current_or_else(parse: impl FnOnce() -> LaunchArgs) -> Self {
        LAUNCH_OPTIONS.with(|options| *options.get_or_init(|| parse().options()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = LaunchArgs::parse_hash("").unwrap();

        assert_eq!(args.seed, None);
        assert_eq!(args.difficulty, Difficulty::Beginner);
        assert_eq!(args.verbose.log_level(), Some(log::Level::Error));
    }

    #[test]
    fn parses_hash_pieces() {
        let args = LaunchArgs::parse_hash("#-vv&--difficulty=expert&--seed=42").unwrap();

        assert_eq!(args.seed, Some(42));
        assert_eq!(args.difficulty, Difficulty::Expert);
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        assert!(LaunchArgs::parse_hash("#--difficulty=custom").is_err());
    }

    #[test]
    fn launch_options_are_parsed_once() {
        let mut parses = 0;
        let first = LaunchOptions::current_or_else(|| {
            parses += 1;
            LaunchArgs::parse_hash("#--difficulty=intermediate&--seed=7").unwrap()
        });
        let second = LaunchOptions::current_or_else(|| {
            parses += 1;
            LaunchArgs::parse_hash("#--difficulty=expert").unwrap()
        });

        assert_eq!(parses, 1);
        assert_eq!(first, second);
        assert_eq!(
            second,
            LaunchOptions {
                seed: Some(7),
                difficulty: Difficulty::Intermediate
            }
        );
    }
}
