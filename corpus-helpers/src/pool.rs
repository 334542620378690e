// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small fixed-size pool for independent per-file jobs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use log::debug;

use crate::error::{CorpusError, Result};

/// Number of workers used when none is given on the command line.
pub const DEFAULT_WORKERS: usize = 4;

/// Runs `task` on every job with at most `workers` threads and returns
/// the results in job order.
///
/// The first failing job cancels the run: workers finish the job they
/// are on but take no new ones, and that first error is returned.
pub fn run_bounded<T, R, F>(jobs: &[T], workers: usize, task: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync,
{
    let workers = workers.clamp(1, jobs.len().max(1));
    let next = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);
    let first_error = Mutex::new(None);
    let slots = jobs.iter().map(|_| Mutex::new(None)).collect::<Vec<_>>();

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                while !cancelled.load(Ordering::Acquire) {
                    let idx = next.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(idx) else {
                        break;
                    };
                    match task(job) {
                        Ok(result) => {
                            *slots[idx].lock().unwrap_or_else(PoisonError::into_inner) =
                                Some(result);
                        }
                        Err(err) => {
                            debug!("Job {idx} failed, cancelling the remaining jobs");
                            cancelled.store(true, Ordering::Release);
                            first_error
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .get_or_insert(err);
                        }
                    }
                }
            });
        }
    });

    if let Some(err) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(err);
    }
    slots
        .into_iter()
        .map(|slot| {
            slot.into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .ok_or(CorpusError::Cancelled)
        })
        .collect()
}
