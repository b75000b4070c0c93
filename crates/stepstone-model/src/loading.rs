// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for the transportation domain.
//!
//! This module turns a problem definition into a validated `TransportMatrix`.
//! Two input formats are understood:
//!
//! * the line-oriented text grammar, where a header line names the warehouses,
//!   one line per factory lists its unit costs and production, and a final line
//!   lists the warehouse demands;
//! * a structured TOML document with `[[supply]]` and `[[demand]]` tables.
//!
//! The text parser accepts any `BufRead`, file path, raw reader, or string slice.
//! Blank lines are skipped and `#` starts a comment that runs to the end of the
//! line. Keywords (`costs`, `supply`, `demand`) are case-insensitive. Every
//! grammar error reports the 1-based line it was found on.

use crate::{
    matrix::{BalancePolicy, ModelError, TransportMatrix, TransportMatrixBuilder},
    num::TransportNumeric,
};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    marker::PhantomData,
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug, thiserror::Error)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input contained no header line.
    #[error("input is empty: expected a 'costs <warehouses..> supply' header line")]
    MissingHeader,
    /// The first line is not of the form `costs <names..> supply`.
    #[error("line {line}: header must be 'costs <warehouse names..> supply'")]
    InvalidHeader { line: usize },
    /// A token could not be parsed into the expected numeric type.
    #[error("line {line}: could not parse token '{token}' as type {type_name}")]
    Parse {
        line: usize,
        token: String,
        type_name: &'static str,
    },
    /// A factory line does not carry one cost per warehouse.
    #[error("line {line}: expected {expected} costs followed by the production, found {found} values")]
    CostCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// The demand line does not carry one demand per warehouse.
    #[error("line {line}: expected {expected} demands, found {found}")]
    DemandCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// The input ended before the demand line.
    #[error("input ended before the 'demand' line")]
    MissingDemand,
    /// Content follows the demand line.
    #[error("line {line}: unexpected content after the 'demand' line")]
    UnexpectedLine { line: usize },
    /// The TOML document could not be decoded.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// A TOML supply table does not carry one cost per demand table.
    #[error("supply '{supply}' lists {found} costs but {expected} demand nodes are defined")]
    RowLength {
        supply: String,
        expected: usize,
        found: usize,
    },
    /// The parsed data does not form a valid model.
    #[error("invalid problem: {0}")]
    Model(#[from] ModelError),
}

/// A supply node entry of the structured problem format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupplyDefinition<T> {
    pub name: String,
    pub production: T,
    /// One unit cost per demand node, in demand declaration order.
    pub costs: Vec<T>,
}

/// A demand node entry of the structured problem format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemandDefinition<T> {
    pub name: String,
    pub demand: T,
}

/// The structured (TOML) problem format.
///
/// ```toml
/// [[demand]]
/// name = "W1"
/// demand = 30
///
/// [[supply]]
/// name = "F1"
/// production = 30
/// costs = [4]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ProblemDefinition<T> {
    #[serde(default)]
    pub supply: Vec<SupplyDefinition<T>>,
    #[serde(default)]
    pub demand: Vec<DemandDefinition<T>>,
}

impl<T> ProblemDefinition<T>
where
    T: TransportNumeric,
{
    /// Checks the row lengths and converts the definition into a matrix builder.
    pub fn into_builder(self) -> Result<TransportMatrixBuilder<T>, ProblemLoaderError> {
        let mut builder = TransportMatrixBuilder::new();
        let expected = self.demand.len();

        for d in self.demand {
            builder.add_demand_node(d.name, d.demand);
        }

        let mut costs = Vec::with_capacity(self.supply.len() * expected);
        for s in self.supply {
            if s.costs.len() != expected {
                return Err(ProblemLoaderError::RowLength {
                    supply: s.name,
                    expected,
                    found: s.costs.len(),
                });
            }
            costs.extend(s.costs);
            builder.add_supply_node(s.name, s.production);
        }

        builder.set_costs_row_major(costs);
        Ok(builder)
    }
}

/// A configurable loader for transportation problem instances.
///
/// The text format this parser expects is as follows (whitespace-separated tokens):
///
/// ```text
/// costs   W1  W2  W3  supply      # header: warehouse names
/// F1      4   6   8   50          # factory name, one cost per warehouse, production
/// F2      5   4   3   60
/// demand  30  40  40              # one demand per warehouse
/// ```
///
/// # Configuration
/// * `balance_policy`: How an instance whose production and demand totals differ is
///   handled (rejected by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader<T> {
    balance_policy: BalancePolicy,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for ProblemLoader<T> {
    fn default() -> Self {
        Self {
            balance_policy: BalancePolicy::Reject,
            _marker: PhantomData,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    Header,
    Costs,
    Done,
}

fn parse_token<T>(line: usize, token: &str) -> Result<T, ProblemLoaderError>
where
    T: FromStr,
{
    token.parse::<T>().map_err(|_| ProblemLoaderError::Parse {
        line,
        token: token.to_owned(),
        type_name: std::any::type_name::<T>(),
    })
}

impl<T> ProblemLoader<T>
where
    T: TransportNumeric + FromStr,
{
    /// Creates a new `ProblemLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures how an unbalanced instance is handled.
    #[inline]
    pub fn balance_policy(mut self, policy: BalancePolicy) -> Self {
        self.balance_policy = policy;
        self
    }

    /// Loads a problem in the text grammar from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<TransportMatrix<T>, ProblemLoaderError> {
        let mut mode = ParseMode::Header;
        let mut warehouses: Vec<String> = Vec::new();
        let mut factories: Vec<(String, T)> = Vec::new();
        let mut costs: Vec<T> = Vec::new();
        let mut demands: Vec<T> = Vec::new();

        for (i, line) in rdr.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let content = line.split('#').next().unwrap_or_default();
            let tokens: Vec<&str> = content.split_whitespace().collect();

            let Some(first) = tokens.first() else {
                continue;
            };
            let last = tokens[tokens.len() - 1];

            match mode {
                ParseMode::Header => {
                    let valid = tokens.len() >= 3
                        && first.eq_ignore_ascii_case("costs")
                        && last.eq_ignore_ascii_case("supply");
                    if !valid {
                        return Err(ProblemLoaderError::InvalidHeader { line: line_no });
                    }

                    warehouses.extend(tokens[1..tokens.len() - 1].iter().map(|s| s.to_string()));
                    mode = ParseMode::Costs;
                }
                ParseMode::Costs if first.eq_ignore_ascii_case("demand") => {
                    let found = tokens.len() - 1;
                    if found != warehouses.len() {
                        return Err(ProblemLoaderError::DemandCount {
                            line: line_no,
                            expected: warehouses.len(),
                            found,
                        });
                    }

                    for token in &tokens[1..] {
                        demands.push(parse_token(line_no, token)?);
                    }
                    mode = ParseMode::Done;
                }
                ParseMode::Costs => {
                    let found = tokens.len().saturating_sub(2);
                    if tokens.len() < 2 || found != warehouses.len() {
                        return Err(ProblemLoaderError::CostCount {
                            line: line_no,
                            expected: warehouses.len(),
                            found,
                        });
                    }

                    for token in &tokens[1..tokens.len() - 1] {
                        costs.push(parse_token(line_no, token)?);
                    }
                    factories.push((first.to_string(), parse_token(line_no, last)?));
                }
                ParseMode::Done => {
                    return Err(ProblemLoaderError::UnexpectedLine { line: line_no });
                }
            }
        }

        match mode {
            ParseMode::Header => return Err(ProblemLoaderError::MissingHeader),
            ParseMode::Costs => return Err(ProblemLoaderError::MissingDemand),
            ParseMode::Done => {}
        }

        let mut builder = TransportMatrixBuilder::new();
        builder.balance_policy(self.balance_policy);
        for (name, demand) in warehouses.into_iter().zip(demands) {
            builder.add_demand_node(name, demand);
        }
        for (name, production) in factories {
            builder.add_supply_node(name, production);
        }
        builder.set_costs_row_major(costs);

        Ok(builder.build()?)
    }

    /// Loads a problem from a file path. Files with a `.toml` extension are read
    /// in the structured format, everything else in the text grammar.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<TransportMatrix<T>, ProblemLoaderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = path.as_ref();
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            let text = std::fs::read_to_string(path)?;
            return self.from_toml_str(&text);
        }

        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem in the text grammar from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<TransportMatrix<T>, ProblemLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a problem in the text grammar from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<TransportMatrix<T>, ProblemLoaderError> {
        self.from_reader(s.as_bytes())
    }

    /// Loads a problem in the structured TOML format from a string slice.
    pub fn from_toml_str(&self, s: &str) -> Result<TransportMatrix<T>, ProblemLoaderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let definition: ProblemDefinition<T> = toml::from_str(s)?;
        let mut builder = definition.into_builder()?;
        builder.balance_policy(self.balance_policy);
        Ok(builder.build()?)
    }
}
