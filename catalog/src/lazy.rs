// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{models::Movie, CatalogStore, Result};

/// Walks the catalog page by page. A failed page is yielded once, then the
/// iterator is exhausted.
pub struct LazyMovieChunks<'a, S: ?Sized> {
    pub(crate) curr_offset: usize,
    pub(crate) chunk_size: usize,
    pub(crate) done: bool,
    pub(crate) store: &'a S,
}

impl<'a, S> Iterator for LazyMovieChunks<'a, S>
where
    S: CatalogStore + ?Sized,
{
    type Item = Result<Vec<Movie>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.chunk_size == 0 {
            return None;
        }

        let movies = self
            .store
            .movies_offset_limit(self.curr_offset, self.chunk_size);

        self.curr_offset += self.chunk_size;
        match movies {
            Ok(movies) => {
                if movies.len() < self.chunk_size {
                    self.done = true;
                }

                if movies.is_empty() {
                    None
                } else {
                    Some(Ok(movies))
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.curr_offset += n * self.chunk_size;
        self.next()
    }
}
