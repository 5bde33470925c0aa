/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base91.
 *
 * base91 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base91 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base91. If not, see <https://www.gnu.org/licenses/>.
 */

use core::iter::FusedIterator;

/// A bit accumulator that turns a stream of inputs into bytes.
///
/// Each call to [`Self::feed`] may release some output; [`Self::flush`]
/// releases whatever is left once the input is exhausted and resets the
/// accumulator.
pub trait Accumulator {
    type Input;
    type Output: Iterator<Item = u8>;

    fn feed(&mut self, input: Self::Input) -> Self::Output;

    fn flush(&mut self) -> Self::Output;

    /// Bounds on the total output produced by `remaining` more inputs
    /// followed by a flush.
    fn size_hint(
        &self,
        remaining: (usize, Option<usize>),
    ) -> (usize, Option<usize>);
}

/// Drives an [`Accumulator`] over an iterator, flushing it once the
/// iterator is exhausted.
pub struct Pump<I, A: Accumulator> {
    iter: I,
    acc: A,
    out: Option<A::Output>,
    done: bool,
}

impl<I, A: Accumulator> Pump<I, A> {
    pub fn new(iter: I, acc: A) -> Self {
        Self {
            iter,
            acc,
            out: None,
            done: false,
        }
    }
}

impl<I, A> Iterator for Pump<I, A>
where
    I: Iterator<Item = A::Input>,
    A: Accumulator,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(b) = self.out.as_mut().and_then(Iterator::next) {
                return Some(b);
            }
            if self.done {
                self.out = None;
                return None;
            }
            self.out = Some(match self.iter.next() {
                Some(input) => self.acc.feed(input),
                None => {
                    self.done = true;
                    self.acc.flush()
                }
            });
        }
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let mut init = match self.out {
            Some(out) => out.fold(init, &mut f),
            None => init,
        };
        if self.done {
            return init;
        }
        let mut acc = self.acc;
        init = self
            .iter
            .fold(init, |b, input| acc.feed(input).fold(b, &mut f));
        acc.flush().fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered =
            self.out.as_ref().map_or((0, Some(0)), Iterator::size_hint);
        let pending = if self.done {
            (0, Some(0))
        } else {
            self.acc.size_hint(self.iter.size_hint())
        };
        (
            buffered.0.saturating_add(pending.0),
            buffered.1.zip(pending.1).and_then(|(a, b)| a.checked_add(b)),
        )
    }
}

// `done` is never cleared, so `Pump` is fused even if `I` isn't.
impl<I, A> FusedIterator for Pump<I, A>
where
    I: Iterator<Item = A::Input>,
    A: Accumulator,
{
}
