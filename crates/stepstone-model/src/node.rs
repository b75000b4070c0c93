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

//! Supply and demand node records.
//!
//! Nodes carry identity (a display name) and capacity only. They are created
//! by the matrix builder and never change afterwards.

use crate::num::TransportNumeric;

/// A factory with a fixed production quantity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SupplyNode<T> {
    name: String,
    production: T,
}

impl<T> SupplyNode<T>
where
    T: TransportNumeric,
{
    /// Creates a new supply node.
    #[inline]
    pub fn new<S>(name: S, production: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            production,
        }
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the quantity this factory must ship.
    #[inline]
    pub fn production(&self) -> T {
        self.production
    }
}

/// A warehouse with a fixed demand quantity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DemandNode<T> {
    name: String,
    demand: T,
}

impl<T> DemandNode<T>
where
    T: TransportNumeric,
{
    /// Creates a new demand node.
    #[inline]
    pub fn new<S>(name: S, demand: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            demand,
        }
    }

    /// Returns the display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the quantity this warehouse must receive.
    #[inline]
    pub fn demand(&self) -> T {
        self.demand
    }
}

impl<T> std::fmt::Display for SupplyNode<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (production {})", self.name, self.production)
    }
}

impl<T> std::fmt::Display for DemandNode<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (demand {})", self.name, self.demand)
    }
}
