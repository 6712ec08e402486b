/// Index literal parser
///
/// Parses the textual form of an [Index], the same form its `Display`
/// implementation produces: slices (`2:8:2`, `::-1`), integer positions
/// (`[0, -1]`), boolean masks (`[T, F, T]`) and scalars (`-3`).
///
use pest::iterators::Pair;
use pest::Parser;

use crate::error::{Error, Result};
use crate::object::index::{Index, Slice};

#[derive(Parser)]
#[grammar = "grammar/index.pest"]
struct IndexParser;

pub fn parse_index(input: &str) -> Result<Index> {
    let failure = |msg: String| Error::Parse {
        input: input.to_string(),
        msg,
    };

    let mut pairs = IndexParser::parse(Rule::index, input).map_err(|e| failure(e.to_string()))?;
    let Some(pair) = pairs.next() else {
        return Err(failure("empty index".to_string()));
    };

    match pair.as_rule() {
        Rule::slice => parse_slice(pair),
        Rule::mask => Ok(Index::Mask(
            pair.into_inner()
                .map(|flag| matches!(flag.as_str(), "T" | "true"))
                .collect(),
        )),
        Rule::positions => Ok(Index::Positions(
            pair.into_inner().map(parse_int).collect::<Result<_>>()?,
        )),
        Rule::scalar => match pair.into_inner().next() {
            Some(int) => Ok(Index::Scalar(parse_int(int)?)),
            None => Err(failure("expected an integer".to_string())),
        },
        rule => Err(failure(format!("unexpected {rule:?}"))),
    }
}

fn parse_slice(pair: Pair<Rule>) -> Result<Index> {
    let mut slice = Slice::full();
    for bound in pair.into_inner() {
        let rule = bound.as_rule();
        let value = match bound.into_inner().next() {
            Some(int) => Some(parse_int(int)?),
            None => None,
        };

        match rule {
            Rule::start => slice.start = value,
            Rule::stop => slice.stop = value,
            Rule::step => slice.step = value,
            _ => (),
        }
    }
    Ok(Index::Slice(slice))
}

fn parse_int(pair: Pair<Rule>) -> Result<isize> {
    pair.as_str().parse().map_err(|e| Error::Parse {
        input: pair.as_str().to_string(),
        msg: format!("{e}"),
    })
}
