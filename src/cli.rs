use tracing::debug;

use crate::error::Result;
use crate::object::index::{compose, Index};

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "annview", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Compose indices applied one after another into a single index
    Compose {
        /// Length of the axis the first index is applied to
        #[arg(short, long)]
        len: usize,

        /// Indices such as `2:8:2`, `[0, 3]`, `[T, F, T]` or `-1`
        #[arg(required = true, allow_hyphen_values = true)]
        indices: Vec<Index>,
    },
}

impl Cli {
    pub fn run(&self) -> Result<String> {
        match &self.command {
            Command::Compose { len, indices } => {
                let index = compose_chain(indices, *len)?;
                let positions = index.positions(*len)?;
                Ok(format!("index: {index}\npositions: {positions:?}"))
            }
        }
    }
}

/// Fold a chain of indices into one index against an axis of length `len`
pub fn compose_chain(indices: &[Index], len: usize) -> Result<Index> {
    let mut composed = Index::full();
    for index in indices {
        composed = compose(&composed, index, len)?;
        debug!(target: "annview::cli", %index, %composed, "composed");
    }
    Ok(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::Parser;

    fn run(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args).map_err(|e| Error::Other(e.to_string()))?;
        cli.run()
    }

    #[test]
    fn compose_slices() {
        let out = run(&["annview", "compose", "--len", "10", "2:8:2", "1:"]).unwrap();
        assert_eq!(out, "index: 4:8:2\npositions: [4, 6]");
    }

    #[test]
    fn compose_mask_and_scalar() {
        let out = run(&["annview", "compose", "-l", "5", "[T, F, T, T, F]", "1"]).unwrap();
        assert_eq!(out, "index: 2\npositions: [2]");
    }

    #[test]
    fn negative_values() {
        let out = run(&["annview", "compose", "--len", "4", "::-1", "-1"]).unwrap();
        assert_eq!(out, "index: 0\npositions: [0]");
    }

    #[test]
    fn extreme_steps() {
        let out = run(&["annview", "compose", "--len", "3", "::-9223372036854775808"]).unwrap();
        assert_eq!(out, "index: 2:1:-1\npositions: [2]");

        let out = run(&["annview", "compose", "--len", "10", "::4294967296", "::4294967296"]).unwrap();
        assert_eq!(out, "index: 0:1:1\npositions: [0]");
    }

    #[test]
    fn errors() {
        assert!(run(&["annview", "compose", "--len", "3", "[5]"]).is_err());
        assert!(run(&["annview", "compose", "--len", "3"]).is_err());
        assert!(run(&["annview", "compose", "--len", "3", "x"]).is_err());
    }
}
