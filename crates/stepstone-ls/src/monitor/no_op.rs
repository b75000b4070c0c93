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

use crate::{
    cycle::Cycle, monitor::optimizer_monitor::OptimizerMonitor, pivot::Pivot,
    stats::OptimizerStatistics,
};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

/// A monitor that ignores every event and never stops the run.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOpMonitor<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOpMonitor<T> {
    /// Creates a new `NoOpMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> OptimizerMonitor<T> for NoOpMonitor<T>
where
    T: TransportNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOpMonitor"
    }

    #[inline(always)]
    fn on_start(&mut self, _matrix: &TransportMatrix<T>) {}

    #[inline(always)]
    fn on_sweep_start(&mut self, _matrix: &TransportMatrix<T>, _statistics: &OptimizerStatistics) {}

    #[inline(always)]
    fn on_pivot(
        &mut self,
        _matrix: &TransportMatrix<T>,
        _cycle: &Cycle,
        _pivot: &Pivot<T>,
        _statistics: &OptimizerStatistics,
    ) {
    }

    #[inline(always)]
    fn on_sweep_end(
        &mut self,
        _matrix: &TransportMatrix<T>,
        _improved: bool,
        _statistics: &OptimizerStatistics,
    ) {
    }

    #[inline(always)]
    fn on_end(&mut self, _matrix: &TransportMatrix<T>, _statistics: &OptimizerStatistics) {}
}
